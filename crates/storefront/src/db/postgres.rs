//! `PostgreSQL` implementation of [`CatalogStore`].

use async_trait::async_trait;
use sqlx::PgPool;

use shopfront_core::{Order, Product, ProductFilter, ProductId};

use super::{CatalogStore, OrderRepository, ProductRepository, RepositoryError};

/// The durable store.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn count_products(&self) -> Result<u64, RepositoryError> {
        ProductRepository::new(&self.pool).count().await
    }

    async fn seed_products(&self, products: &[Product]) -> Result<u64, RepositoryError> {
        ProductRepository::new(&self.pool).seed(products).await
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).list(filter).await
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).get(id).await
    }

    async fn upsert_product(&self, product: &Product) -> Result<(), RepositoryError> {
        ProductRepository::new(&self.pool).upsert(product).await
    }

    async fn insert_order(&self, order: &Order) -> Result<(), RepositoryError> {
        OrderRepository::new(&self.pool).insert(order).await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        OrderRepository::new(&self.pool).list().await
    }
}
