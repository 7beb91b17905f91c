//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for the storefront domain.

pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod sourced;
pub mod status;
pub mod validation;

pub use email::{Email, EmailError};
pub use id::*;
pub use order::{NewOrder, Order, OrderLine, ShippingAddress, ValidatedOrder, order_total};
pub use price::{Price, PriceError};
pub use product::{
    DEFAULT_PRODUCT_IMAGE, DEFAULT_PRODUCT_RATING, NewProduct, Product, ProductFilter,
    ProductPatch, ProductRecord, canonical_stock, slugify,
};
pub use sourced::{Origin, Sourced};
pub use status::OrderStatus;
pub use validation::ValidationError;
