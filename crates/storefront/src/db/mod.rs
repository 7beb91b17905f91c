//! Durable storage for the product catalog and placed orders.
//!
//! # Database: `PostgreSQL`, schema `storefront`
//!
//! ## Tables
//!
//! - `product` - Catalog records, keyed by opaque product id
//! - `order` - Orders placed at checkout (line items as `jsonb`)
//!
//! # Backends
//!
//! Every backend implements [`CatalogStore`]. The catalog service treats any
//! error from a store as "store unreachable" and answers from the built-in
//! fallback dataset instead.
//!
//! - [`PgCatalogStore`] - the durable store
//! - [`MemoryStore`] - in-process store for tests and local development; can
//!   be switched off to simulate an outage
//! - [`OfflineStore`] - used when no database is configured; every call fails
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p shopfront-cli -- migrate
//! ```

mod memory;
mod orders;
mod postgres;
mod products;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use shopfront_core::{Order, Product, ProductFilter, ProductId};

pub use memory::MemoryStore;
pub use orders::OrderRepository;
pub use postgres::PgCatalogStore;
pub use products::ProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store cannot be reached at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Storage backend for products and orders.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Short name used in logs.
    fn backend_name(&self) -> &'static str;

    /// Cheap round trip proving the store is reachable.
    async fn health_check(&self) -> Result<(), RepositoryError>;

    async fn count_products(&self) -> Result<u64, RepositoryError>;

    /// Insert every product whose id is not already stored. Returns the number
    /// inserted; repeating a seed inserts nothing.
    async fn seed_products(&self, products: &[Product]) -> Result<u64, RepositoryError>;

    /// Products matching `filter`, in insertion order.
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError>;

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert `product`, or replace the stored record with the same id.
    async fn upsert_product(&self, product: &Product) -> Result<(), RepositoryError>;

    async fn insert_order(&self, order: &Order) -> Result<(), RepositoryError>;

    /// All orders, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError>;
}

/// Store used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineStore;

impl OfflineStore {
    fn unavailable() -> RepositoryError {
        RepositoryError::Unavailable("no database configured".to_string())
    }
}

#[async_trait]
impl CatalogStore for OfflineStore {
    fn backend_name(&self) -> &'static str {
        "offline"
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Err(Self::unavailable())
    }

    async fn count_products(&self) -> Result<u64, RepositoryError> {
        Err(Self::unavailable())
    }

    async fn seed_products(&self, _products: &[Product]) -> Result<u64, RepositoryError> {
        Err(Self::unavailable())
    }

    async fn list_products(&self, _filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        Err(Self::unavailable())
    }

    async fn get_product(&self, _id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        Err(Self::unavailable())
    }

    async fn upsert_product(&self, _product: &Product) -> Result<(), RepositoryError> {
        Err(Self::unavailable())
    }

    async fn insert_order(&self, _order: &Order) -> Result<(), RepositoryError> {
        Err(Self::unavailable())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        Err(Self::unavailable())
    }
}

/// Create a `PostgreSQL` connection pool without connecting.
///
/// Connections are opened on first use, so the service starts (and serves
/// the fallback dataset) while the database is down. `acquire_timeout` is
/// the only bound on how long a store call waits.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `acquire_timeout` - How long to wait for a pooled connection
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection string cannot be parsed.
pub fn create_pool(
    database_url: &secrecy::SecretString,
    acquire_timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(acquire_timeout)
        .connect_lazy(database_url.expose_secret())
}
