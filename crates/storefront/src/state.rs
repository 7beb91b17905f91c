//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::CatalogService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It holds no per-client state:
/// carts live with the client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: CatalogService,
}

impl AppState {
    /// Create a new application state around a catalog service.
    #[must_use]
    pub fn new(catalog: CatalogService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { catalog }),
        }
    }

    /// Get a reference to the catalog/order data service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }
}
