//! A cart bound to its storage.

use shopfront_core::{Product, ProductId};
use tracing::{debug, warn};

use crate::cart::{Cart, CartEntry, CartError};
use crate::storage::{CART_STORAGE_KEY, CartStorage};

/// A [`Cart`] that is read from storage when opened and written back after
/// every mutation.
///
/// The container is passed explicitly to whatever needs the cart; there is
/// no process-global instance.
#[derive(Debug)]
pub struct PersistentCart<S> {
    cart: Cart,
    storage: S,
    key: String,
}

impl<S: CartStorage> PersistentCart<S> {
    /// Open the cart stored under [`CART_STORAGE_KEY`].
    pub fn open(storage: S) -> Self {
        Self::open_with_key(storage, CART_STORAGE_KEY)
    }

    /// Open the cart stored under `key`.
    ///
    /// Unreadable or corrupt stored state is logged and replaced by an empty
    /// cart, so opening never fails.
    pub fn open_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = match storage.load(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartEntry>>(&raw) {
                Ok(entries) => Cart::from_entries(entries),
                Err(e) => {
                    warn!(error = %e, key = %key, "Stored cart is corrupt, starting empty");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, key = %key, "Failed to read stored cart, starting empty");
                Cart::new()
            }
        };
        debug!(entries = cart.entries().len(), "Cart opened");
        Self { cart, storage, key }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// See [`Cart::add_item`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] without touching storage, or a
    /// storage error if the updated cart cannot be saved.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        self.cart.add_item(product, quantity)?;
        self.save()
    }

    /// See [`Cart::update_quantity`].
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be saved.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<bool, CartError> {
        let changed = self.cart.update_quantity(product_id, quantity);
        self.save()?;
        Ok(changed)
    }

    /// See [`Cart::remove_item`].
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be saved.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<bool, CartError> {
        let removed = self.cart.remove_item(product_id);
        self.save()?;
        Ok(removed)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the empty cart cannot be saved.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.cart.clear();
        self.save()
    }

    /// Write the current entries to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn save(&self) -> Result<(), CartError> {
        let raw = serde_json::to_string(&self.cart)?;
        self.storage.save(&self.key, &raw)?;
        Ok(())
    }
}
