//! Catalog and order data service.
//!
//! Every operation tries the durable store first. Any store error is caught
//! here, logged at WARN, and answered from the [`FallbackCatalog`] instead;
//! [`RepositoryError`] never leaves this module. The returned [`Sourced`]
//! value records which path actually answered.
//!
//! Validation and authorization failures are not masked: they surface as
//! [`CatalogError`].

mod fallback;
mod stats;

use std::sync::Arc;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{info, instrument, warn};

use shopfront_core::{
    NewOrder, NewProduct, Order, Product, ProductFilter, ProductId, ProductPatch, Sourced,
    ValidationError,
};

use crate::db::{CatalogStore, RepositoryError};

pub use fallback::FallbackCatalog;
pub use stats::{InventoryStats, LOW_STOCK_THRESHOLD};

/// Errors the catalog reports to its callers.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The administrative credential was missing or wrong.
    #[error("Unauthorized - invalid API key")]
    Unauthorized,

    /// The request body failed validation.
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    /// Neither the store nor the fallback dataset has the product.
    #[error("Product not found")]
    NotFound(ProductId),
}

/// Catalog/order data service.
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    fallback: FallbackCatalog,
    admin_key: SecretString,
}

impl CatalogService {
    #[must_use]
    pub fn new(
        store: Arc<dyn CatalogStore>,
        fallback: FallbackCatalog,
        admin_key: SecretString,
    ) -> Self {
        Self {
            store,
            fallback,
            admin_key,
        }
    }

    /// Name of the durable backend, for logs.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// List products matching `filter`.
    ///
    /// An empty store is seeded from the fallback dataset first. Seeding is
    /// keyed by product id, so concurrent first requests cannot duplicate
    /// records.
    #[instrument(skip(self), fields(backend = self.backend_name()))]
    pub async fn list_products(&self, filter: &ProductFilter) -> Sourced<Vec<Product>> {
        match self.list_from_store(filter).await {
            Ok(products) => Sourced::primary(products),
            Err(e) => {
                self.degraded("list_products", &e);
                Sourced::fallback(self.fallback.products(filter).await)
            }
        }
    }

    async fn list_from_store(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        if self.store.count_products().await? == 0 {
            let inserted = self
                .store
                .seed_products(self.fallback.seed_products())
                .await?;
            info!(inserted, "Seeded empty store from fallback dataset");
        }
        self.store.list_products(filter).await
    }

    /// Look up one product.
    ///
    /// A product missing from a reachable store is still looked up in the
    /// fallback dataset before reporting `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if neither source has `id`.
    #[instrument(skip(self), fields(backend = self.backend_name()))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Sourced<Product>, CatalogError> {
        match self.store.get_product(id).await {
            Ok(Some(product)) => return Ok(Sourced::primary(product)),
            Ok(None) => {}
            Err(e) => self.degraded("get_product", &e),
        }

        self.fallback
            .product(id)
            .await
            .map(Sourced::fallback)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Create a product.
    ///
    /// When the store rejects the write the product is kept in the fallback
    /// overlay and returned tagged as fallback, meaning it was not persisted.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unauthorized` for a wrong or missing key (before
    /// the body is looked at) and `CatalogError::InvalidInput` for a missing
    /// required field.
    #[instrument(skip_all, fields(backend = self.backend_name()))]
    pub async fn create_product(
        &self,
        api_key: Option<&str>,
        request: NewProduct,
    ) -> Result<Sourced<Product>, CatalogError> {
        self.authorize(api_key)?;

        let product = request.into_product(ProductId::generate(), Utc::now())?;
        Ok(self.write_product(product, "create_product").await)
    }

    /// Apply a partial update to an existing product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unauthorized` for a wrong or missing key,
    /// `CatalogError::InvalidInput` for a blank text field and
    /// `CatalogError::NotFound` if neither source has `id`.
    #[instrument(skip(self, api_key, patch), fields(backend = self.backend_name()))]
    pub async fn update_product(
        &self,
        api_key: Option<&str>,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Sourced<Product>, CatalogError> {
        self.authorize(api_key)?;

        let mut product = self.get_product(id).await?.into_inner();
        patch.apply(&mut product, Utc::now())?;
        Ok(self.write_product(product, "update_product").await)
    }

    async fn write_product(&self, product: Product, operation: &'static str) -> Sourced<Product> {
        match self.store.upsert_product(&product).await {
            Ok(()) => {
                info!(product_id = %product.id, "Product saved");
                Sourced::primary(product)
            }
            Err(e) => {
                self.degraded(operation, &e);
                self.fallback.put_product(product.clone()).await;
                Sourced::fallback(product)
            }
        }
    }

    /// Place an order.
    ///
    /// The total is always recomputed from the lines. A store failure still
    /// yields a pending order, tagged as fallback and kept in process memory.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidInput` if a required field is missing or
    /// unusable.
    #[instrument(skip_all, fields(backend = self.backend_name()))]
    pub async fn create_order(&self, request: NewOrder) -> Result<Sourced<Order>, CatalogError> {
        let validated = request.validate()?;

        if let Some(claimed) = validated.total_mismatch() {
            warn!(
                claimed = %claimed,
                computed = %validated.computed_total(),
                "Ignoring client-supplied order total"
            );
        }

        let order = validated.place(Utc::now());
        match self.store.insert_order(&order).await {
            Ok(()) => {
                info!(order_id = %order.id, total = %order.total_amount, "Order placed");
                Ok(Sourced::primary(order))
            }
            Err(e) => {
                self.degraded("create_order", &e);
                self.fallback.record_order(order.clone()).await;
                Ok(Sourced::fallback(order))
            }
        }
    }

    /// All orders, newest first.
    #[instrument(skip(self), fields(backend = self.backend_name()))]
    pub async fn list_orders(&self) -> Sourced<Vec<Order>> {
        match self.store.list_orders().await {
            Ok(orders) => Sourced::primary(orders),
            Err(e) => {
                self.degraded("list_orders", &e);
                Sourced::fallback(self.fallback.orders().await)
            }
        }
    }

    /// Stock statistics over the whole catalog.
    pub async fn inventory_stats(&self) -> Sourced<InventoryStats> {
        self.list_products(&ProductFilter::default())
            .await
            .map(|products| InventoryStats::from_products(&products))
    }

    /// Whether the durable store is reachable right now.
    ///
    /// # Errors
    ///
    /// Returns the store's error when it is not.
    pub async fn check_store(&self) -> Result<(), RepositoryError> {
        self.store.health_check().await
    }

    /// Check the administrative credential by exact match.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unauthorized` if `api_key` is absent or differs.
    pub fn authorize(&self, api_key: Option<&str>) -> Result<(), CatalogError> {
        match api_key {
            Some(key) if key == self.admin_key.expose_secret() => Ok(()),
            _ => {
                warn!("Rejected administrative request with invalid API key");
                Err(CatalogError::Unauthorized)
            }
        }
    }

    fn degraded(&self, operation: &'static str, error: &RepositoryError) {
        warn!(
            operation,
            backend = self.store.backend_name(),
            error = %error,
            "Durable store unavailable, serving fallback"
        );
    }
}
