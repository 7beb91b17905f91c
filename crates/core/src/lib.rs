//! Shopfront Core - Shared domain types.
//!
//! This crate provides the types shared by every Shopfront component:
//! - `storefront` - Catalog/order data service and HTTP API
//! - `cart` - Client-resident cart state machine and checkout
//! - `cli` - Migrations and one-time seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. The optional `postgres` feature adds `sqlx`
//! encode/decode support for the newtypes.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, emails, statuses, products, orders and source tags
//! - [`api`] - JSON envelope types shared by the server and its clients

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod types;

pub use types::*;
