//! Inventory statistics for the dashboard.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use shopfront_core::Product;

/// Products with fewer units than this count as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Summary of the catalog's stock position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_products: usize,
    pub in_stock: usize,
    pub out_of_stock: usize,
    /// Every product below [`LOW_STOCK_THRESHOLD`], out-of-stock ones included.
    pub low_stock: Vec<Product>,
    /// Σ price × stock, saturating at [`Decimal::MAX`].
    #[serde(with = "rust_decimal::serde::float")]
    pub total_inventory_value: Decimal,
    /// Mean list price, rounded to cents. Zero for an empty catalog.
    #[serde(with = "rust_decimal::serde::float")]
    pub average_price: Decimal,
    /// Product count per category label.
    pub categories: BTreeMap<String, usize>,
}

impl InventoryStats {
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let out_of_stock = products.iter().filter(|p| !p.in_stock()).count();
        let low_stock = products
            .iter()
            .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
            .cloned()
            .collect();
        let total_inventory_value = products
            .iter()
            .map(Product::inventory_value)
            .fold(Decimal::ZERO, Decimal::saturating_add);

        let price_sum = products
            .iter()
            .map(|p| p.price.amount())
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let average_price = if products.is_empty() {
            Decimal::ZERO
        } else {
            (price_sum / Decimal::from(products.len())).round_dp(2)
        };

        let mut categories = BTreeMap::new();
        for product in products {
            *categories.entry(product.category.clone()).or_insert(0) += 1;
        }

        Self {
            total_products: products.len(),
            in_stock: products.len() - out_of_stock,
            out_of_stock,
            low_stock,
            total_inventory_value,
            average_price,
            categories,
        }
    }
}
