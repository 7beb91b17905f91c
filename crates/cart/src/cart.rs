//! Cart state machine.
//!
//! A cart is either [`CartState::Empty`] or [`CartState::HasItems`]. Entries
//! keep insertion order and are unique per product id.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{OrderLine, Price, Product, ProductId};
use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product had no stock when it was added.
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    /// The storage backend failed.
    #[error("cart storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be (de)serialized.
    #[error("cart serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Which of the two cart states applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartState {
    Empty,
    HasItems,
}

/// One product line in the cart.
///
/// `name`, `price` and `image` are copied from the product when it is first
/// added and never refreshed, so catalog price changes do not touch an
/// existing cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    #[serde(alias = "id")]
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,
    /// Stock ceiling seen at the last add, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl CartEntry {
    fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: (!product.image.is_empty()).then(|| product.image.clone()),
            quantity,
            stock: Some(product.stock),
        }
    }

    /// `price * quantity`, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }

    fn clamp(&self, quantity: u32) -> u32 {
        self.stock.map_or(quantity, |stock| quantity.min(stock)).max(1)
    }
}

impl From<&CartEntry> for OrderLine {
    fn from(entry: &CartEntry) -> Self {
        Self {
            product_id: entry.product_id.clone(),
            name: entry.name.clone(),
            price: entry.price,
            quantity: entry.quantity,
            image: entry.image.clone(),
        }
    }
}

/// The cart reducer. Pure: persistence is layered on by [`crate::PersistentCart`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a cart from stored entries, dropping zero quantities and
    /// merging duplicate product ids into the first occurrence.
    #[must_use]
    pub fn from_entries(entries: Vec<CartEntry>) -> Self {
        let mut cart = Self::new();
        for entry in entries {
            if entry.quantity < 1 {
                continue;
            }
            match cart.position(&entry.product_id) {
                Some(index) => {
                    if let Some(existing) = cart.entries.get_mut(index) {
                        existing.quantity =
                            existing.clamp(existing.quantity.saturating_add(entry.quantity));
                    }
                }
                None => {
                    let quantity = entry.clamp(entry.quantity);
                    cart.entries.push(CartEntry { quantity, ..entry });
                }
            }
        }
        cart
    }

    #[must_use]
    pub const fn state(&self) -> CartState {
        if self.entries.is_empty() {
            CartState::Empty
        } else {
            CartState::HasItems
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.product_id == product_id)
    }

    /// Total number of units across all entries, saturating at `u32::MAX`.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.entries
            .iter()
            .map(|e| e.quantity)
            .fold(0, u32::saturating_add)
    }

    /// Add `quantity` units of `product`.
    ///
    /// An existing entry for the product is incremented rather than
    /// duplicated. The resulting quantity is clamped to `[1, stock]`, using
    /// the stock carried by `product`. A quantity of zero is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] if the product's stock is zero.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if quantity < 1 {
            return Ok(());
        }
        if product.stock == 0 {
            return Err(CartError::OutOfStock(product.id.clone()));
        }

        match self.position(&product.id) {
            Some(index) => {
                if let Some(entry) = self.entries.get_mut(index) {
                    entry.stock = Some(product.stock);
                    entry.quantity = entry.clamp(entry.quantity.saturating_add(quantity));
                }
            }
            None => {
                let mut entry = CartEntry::from_product(product, quantity);
                entry.quantity = entry.clamp(quantity);
                self.entries.push(entry);
            }
        }
        Ok(())
    }

    /// Set the quantity of an existing entry.
    ///
    /// Quantities below 1 are ignored; use [`Cart::remove_item`] to drop an
    /// entry. The value is not checked against stock.
    /// Returns whether the cart changed.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        if quantity < 1 {
            return false;
        }
        match self.entries.iter_mut().find(|e| &e.product_id == product_id) {
            Some(entry) if entry.quantity != quantity => {
                entry.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Remove the entry for `product_id`. Returns whether one was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.product_id != product_id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Σ price × quantity over the current entries, saturating at
    /// [`Decimal::MAX`]. The storefront rejects an order that large.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.entries
            .iter()
            .map(CartEntry::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Project the entries into order lines, in cart order.
    #[must_use]
    pub fn to_order_lines(&self) -> Vec<OrderLine> {
        self.entries.iter().map(OrderLine::from).collect()
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.entries.iter().position(|e| &e.product_id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn product(id: &str, price: i64, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            slug: format!("product-{id}"),
            name: format!("Product {id}"),
            description: String::new(),
            category: "Electronics".to_string(),
            price: Price::new(Decimal::from(price)).unwrap(),
            stock,
            image: format!("https://example.com/{id}.jpg"),
            rating: 4.0,
            reviews: 0,
            featured: false,
            last_updated: None,
        }
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new();
        assert_eq!(cart.state(), CartState::Empty);
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_adding_same_product_twice_increments() {
        let mut cart = Cart::new();
        let p = product("1", 10, 5);
        cart.add_item(&p, 1).unwrap();
        cart.add_item(&p, 1).unwrap();

        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.get(&p.id).unwrap().quantity, 2);
        assert_eq!(cart.state(), CartState::HasItems);
    }

    #[test]
    fn test_add_clamps_to_stock() {
        let mut cart = Cart::new();
        let p = product("1", 10, 3);
        cart.add_item(&p, 2).unwrap();
        cart.add_item(&p, 5).unwrap();
        assert_eq!(cart.get(&p.id).unwrap().quantity, 3);

        let q = product("2", 10, 2);
        cart.add_item(&q, 9).unwrap();
        assert_eq!(cart.get(&q.id).unwrap().quantity, 2);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 10, 3), 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_out_of_stock_is_rejected() {
        let mut cart = Cart::new();
        let err = cart.add_item(&product("6", 10, 0), 1).unwrap_err();
        assert!(matches!(err, CartError::OutOfStock(id) if id.as_str() == "6"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_price_snapshot_survives_catalog_change() {
        let mut cart = Cart::new();
        let mut p = product("1", 10, 5);
        cart.add_item(&p, 1).unwrap();

        p.price = Price::new(Decimal::from(99)).unwrap();
        cart.add_item(&p, 1).unwrap();

        assert_eq!(cart.total(), Decimal::from(20));
    }

    #[test]
    fn test_update_quantity_below_one_is_noop() {
        let mut cart = Cart::new();
        let p = product("1", 10, 5);
        cart.add_item(&p, 2).unwrap();

        assert!(!cart.update_quantity(&p.id, 0));
        assert_eq!(cart.get(&p.id).unwrap().quantity, 2);

        assert!(cart.update_quantity(&p.id, 4));
        assert_eq!(cart.get(&p.id).unwrap().quantity, 4);
    }

    #[test]
    fn test_update_quantity_unknown_product() {
        let mut cart = Cart::new();
        assert!(!cart.update_quantity(&ProductId::new("nope"), 3));
    }

    #[test]
    fn test_remove_last_item_empties_cart() {
        let mut cart = Cart::new();
        let p = product("1", 10, 5);
        cart.add_item(&p, 1).unwrap();

        assert!(cart.remove_item(&p.id));
        assert_eq!(cart.state(), CartState::Empty);
        assert!(!cart.remove_item(&p.id));
    }

    #[test]
    fn test_total_and_order_lines() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 10, 5), 2).unwrap();
        cart.add_item(&product("b", 5, 5), 1).unwrap();

        assert_eq!(cart.total(), Decimal::from(25));
        assert_eq!(cart.item_count(), 3);

        let lines = cart.to_order_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id.as_str(), "a");
        assert_eq!(shopfront_core::order_total(&lines), Some(Decimal::from(25)));
    }

    #[test]
    fn test_huge_cart_does_not_panic() {
        let mut cart = Cart::new();
        let mut p = product("a", 1, u32::MAX);
        p.price = serde_json::from_str("7.0e28").unwrap();
        cart.add_item(&p, 2).unwrap();
        cart.add_item(&product("b", 1, u32::MAX), 1).unwrap();
        assert!(cart.update_quantity(&ProductId::new("b"), u32::MAX));

        assert_eq!(cart.total(), Decimal::MAX);
        assert_eq!(cart.item_count(), u32::MAX);

        let lines = cart.to_order_lines();
        assert_eq!(shopfront_core::order_total(&lines), None);
    }

    #[test]
    fn test_from_entries_normalizes() {
        let entry = |id: &str, quantity| CartEntry {
            product_id: ProductId::new(id),
            name: id.to_string(),
            price: Price::new(Decimal::from(1)).unwrap(),
            image: None,
            quantity,
            stock: Some(4),
        };
        let cart = Cart::from_entries(vec![entry("a", 1), entry("b", 0), entry("a", 5)]);

        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.get(&ProductId::new("a")).unwrap().quantity, 4);
    }

    #[test]
    fn test_serializes_as_entry_list() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 10, 5), 1).unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["productId"], "1");
        assert_eq!(json[0]["quantity"], 1);

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }
}
