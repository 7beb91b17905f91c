//! Built-in fallback dataset.
//!
//! The dataset is compiled into the binary and parsed through the same
//! canonicalizing ingestion as any other product JSON. Writes accepted while
//! the durable store is unreachable land in an in-process overlay; they are
//! visible to later degraded reads in this process and lost on restart.

use tokio::sync::RwLock;

use shopfront_core::{Order, Product, ProductFilter, ProductId};

const BUILTIN_PRODUCTS: &str = include_str!("../../fallback/products.json");

/// Fixed product dataset plus the writes accepted while degraded.
#[derive(Debug)]
pub struct FallbackCatalog {
    base: Vec<Product>,
    overlay: RwLock<Vec<Product>>,
    orders: RwLock<Vec<Order>>,
}

impl FallbackCatalog {
    /// The dataset shipped with the storefront.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON does not parse.
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json(BUILTIN_PRODUCTS)
    }

    /// Parse a JSON array of product records.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not an array of product records.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            base: products,
            overlay: RwLock::new(Vec::new()),
            orders: RwLock::new(Vec::new()),
        }
    }

    /// The unmodified dataset, as used for seeding.
    #[must_use]
    pub fn seed_products(&self) -> &[Product] {
        &self.base
    }

    /// Dataset records (with overlay replacements) followed by overlay-only
    /// records, filtered.
    pub async fn products(&self, filter: &ProductFilter) -> Vec<Product> {
        let overlay = self.overlay.read().await;
        let replaced = |base: &Product| {
            overlay
                .iter()
                .find(|p| p.id == base.id)
                .unwrap_or(base)
                .clone()
        };

        self.base
            .iter()
            .map(replaced)
            .chain(
                overlay
                    .iter()
                    .filter(|p| !self.base.iter().any(|b| b.id == p.id))
                    .cloned(),
            )
            .filter(|p| filter.matches(p))
            .collect()
    }

    pub async fn product(&self, id: &ProductId) -> Option<Product> {
        if let Some(product) = self.overlay.read().await.iter().find(|p| &p.id == id) {
            return Some(product.clone());
        }
        self.base.iter().find(|p| &p.id == id).cloned()
    }

    /// Record a product write that could not be persisted.
    pub async fn put_product(&self, product: Product) {
        let mut overlay = self.overlay.write().await;
        match overlay.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => overlay.push(product),
        }
    }

    /// Record an order that could not be persisted.
    pub async fn record_order(&self, order: Order) {
        self.orders.write().await.push(order);
    }

    /// Orders accepted while degraded, newest first.
    pub async fn orders(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.orders.read().await.iter().rev().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_dataset_parses() {
        let fallback = FallbackCatalog::builtin().unwrap();
        assert_eq!(fallback.seed_products().len(), 12);
    }

    #[test]
    fn test_builtin_dataset_canonicalizes_inventory() {
        let fallback = FallbackCatalog::builtin().unwrap();
        let speaker = fallback
            .seed_products()
            .iter()
            .find(|p| p.id.as_str() == "3")
            .unwrap();
        // Recorded as `inventory` in the dataset
        assert_eq!(speaker.stock, 40);
        // No slug in the dataset either
        assert_eq!(speaker.slug, "portable-bluetooth-speaker");
    }

    #[test]
    fn test_builtin_ids_unique() {
        let fallback = FallbackCatalog::builtin().unwrap();
        let mut ids: Vec<&str> = fallback.seed_products().iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), fallback.seed_products().len());
    }

    #[tokio::test]
    async fn test_overlay_replaces_and_appends() {
        let fallback = FallbackCatalog::builtin().unwrap();

        let mut edited = fallback.product(&ProductId::new("1")).await.unwrap();
        edited.name = "Edited".to_string();
        fallback.put_product(edited).await;

        let mut added = edited_clone(&fallback).await;
        added.id = ProductId::new("new-1");
        fallback.put_product(added).await;

        let all = fallback.products(&ProductFilter::default()).await;
        assert_eq!(all.len(), 13);
        assert_eq!(all[0].name, "Edited");
        assert_eq!(all[12].id.as_str(), "new-1");
        // The seed set is untouched
        assert_ne!(fallback.seed_products()[0].name, "Edited");
    }

    async fn edited_clone(fallback: &FallbackCatalog) -> Product {
        fallback.product(&ProductId::new("1")).await.unwrap()
    }

    fn order(name: &str, seconds: i64) -> Order {
        let placed_at = chrono::DateTime::from_timestamp(1_700_000_000 + seconds, 0).unwrap();
        serde_json::from_value::<shopfront_core::NewOrder>(serde_json::json!({
            "items": [{"productId": "1", "name": "A", "price": 10, "quantity": 1}],
            "customerEmail": "sam@example.com",
            "customerName": name,
            "shippingAddress": "1 Main St"
        }))
        .unwrap()
        .validate()
        .unwrap()
        .place(placed_at)
    }

    #[tokio::test]
    async fn test_degraded_orders_newest_first() {
        let fallback = FallbackCatalog::builtin().unwrap();
        fallback.record_order(order("oldest", 0)).await;
        fallback.record_order(order("newest", 120)).await;
        fallback.record_order(order("middle", 60)).await;

        let names: Vec<String> = fallback
            .orders()
            .await
            .into_iter()
            .map(|o| o.customer_name)
            .collect();
        assert_eq!(names, ["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn test_featured_filter() {
        let fallback = FallbackCatalog::builtin().unwrap();
        let featured = fallback
            .products(&ProductFilter {
                category: None,
                featured_only: true,
            })
            .await;
        assert!(!featured.is_empty());
        assert!(featured.iter().all(|p| p.featured));
    }
}
