//! Shopfront cart.
//!
//! The cart lives on the client. It is the only record of what a shopper
//! intends to buy until checkout, when it is projected into an order
//! submission and sent to the storefront.
//!
//! - [`Cart`]: the state machine itself, no I/O.
//! - [`CartStorage`]: where the serialized cart survives reloads.
//! - [`PersistentCart`]: a cart bound to a storage, saved after every change.
//! - [`OrderSubmitter`]: how checkout reaches the server.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod cart;
mod checkout;
mod persistent;
mod storage;

pub use cart::{Cart, CartEntry, CartError, CartState};
pub use checkout::{CheckoutDetails, CheckoutError, HttpOrderSubmitter, OrderSubmitter};
pub use persistent::PersistentCart;
pub use storage::{CART_STORAGE_KEY, CartStorage, FileStorage, MemoryStorage, StorageError};
