//! In-process [`CatalogStore`] for tests and local development.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use shopfront_core::{Order, Product, ProductFilter, ProductId};

use super::{CatalogStore, RepositoryError};

/// A store that keeps everything in memory.
///
/// [`MemoryStore::set_available`] flips it into a failing state where every
/// call returns [`RepositoryError::Unavailable`], which is how degraded mode
/// is exercised without a database.
#[derive(Debug)]
pub struct MemoryStore {
    products: RwLock<Vec<Product>>,
    orders: RwLock<Vec<Order>>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// An empty, reachable store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            products: RwLock::new(Vec::new()),
            orders: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the store going down (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn ensure_available(&self) -> Result<(), RepositoryError> {
        if self.is_available() {
            Ok(())
        } else {
            Err(RepositoryError::Unavailable(
                "memory store switched off".to_string(),
            ))
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        self.ensure_available()
    }

    async fn count_products(&self) -> Result<u64, RepositoryError> {
        self.ensure_available()?;
        Ok(self.products.read().await.len() as u64)
    }

    async fn seed_products(&self, products: &[Product]) -> Result<u64, RepositoryError> {
        self.ensure_available()?;
        let mut stored = self.products.write().await;
        let mut inserted = 0;
        for product in products {
            if !stored.iter().any(|p| p.id == product.id) {
                stored.push(product.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        self.ensure_available()?;
        Ok(self
            .products
            .read()
            .await
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        self.ensure_available()?;
        Ok(self
            .products
            .read()
            .await
            .iter()
            .find(|p| &p.id == id)
            .cloned())
    }

    async fn upsert_product(&self, product: &Product) -> Result<(), RepositoryError> {
        self.ensure_available()?;
        let mut stored = self.products.write().await;
        match stored.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product.clone(),
            None => stored.push(product.clone()),
        }
        Ok(())
    }

    async fn insert_order(&self, order: &Order) -> Result<(), RepositoryError> {
        self.ensure_available()?;
        self.orders.write().await.push(order.clone());
        Ok(())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        self.ensure_available()?;
        let mut orders: Vec<Order> = self.orders.read().await.iter().rev().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(id: &str, category: &str) -> Product {
        serde_json::from_value(json!({
            "id": id, "name": format!("Product {id}"), "price": 10, "category": category
        }))
        .unwrap()
    }

    fn order(name: &str, seconds: i64) -> Order {
        let placed_at = chrono::DateTime::from_timestamp(1_700_000_000 + seconds, 0).unwrap();
        serde_json::from_value::<shopfront_core::NewOrder>(json!({
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
    async fn test_orders_listed_newest_first() {
        let store = MemoryStore::new();
        for (name, seconds) in [("middle", 60), ("oldest", 0), ("newest", 120)] {
            store.insert_order(&order(name, seconds)).await.unwrap();
        }

        let names: Vec<String> = store
            .list_orders()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.customer_name)
            .collect();
        assert_eq!(names, ["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = MemoryStore::new();
        let products = vec![product("1", "Books"), product("2", "Sports")];

        assert_eq!(store.seed_products(&products).await.unwrap(), 2);
        assert_eq!(store.seed_products(&products).await.unwrap(), 0);
        assert_eq!(store.count_products().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let store = MemoryStore::new();
        store
            .seed_products(&[product("1", "Books"), product("2", "Sports")])
            .await
            .unwrap();

        let mut changed = product("1", "Books");
        changed.name = "Renamed".to_string();
        store.upsert_product(&changed).await.unwrap();

        let all = store.list_products(&ProductFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Renamed");
    }

    #[tokio::test]
    async fn test_filter_by_category() {
        let store = MemoryStore::new();
        store
            .seed_products(&[product("1", "Books"), product("2", "Sports")])
            .await
            .unwrap();

        let filter = ProductFilter {
            category: Some("Sports".to_string()),
            featured_only: false,
        };
        let found = store.list_products(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "2");
    }

    #[tokio::test]
    async fn test_switched_off_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_available(false);

        assert!(matches!(
            store.list_products(&ProductFilter::default()).await,
            Err(RepositoryError::Unavailable(_))
        ));
        assert!(store.get_product(&ProductId::new("1")).await.is_err());
        assert!(store.health_check().await.is_err());

        store.set_available(true);
        assert!(store.health_check().await.is_ok());
    }
}
