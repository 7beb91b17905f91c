//! Integration tests for Shopfront.
//!
//! Every test starts a real storefront server on an ephemeral port with an
//! in-memory store, then talks to it over HTTP with `reqwest`. Tests that
//! need `PostgreSQL` are `#[ignore]`d and read `TEST_DATABASE_URL`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//!
//! # Including the PostgreSQL tests
//! TEST_DATABASE_URL=postgres://... cargo test -p shopfront-integration-tests -- --ignored
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use secrecy::SecretString;
use shopfront_storefront::catalog::{CatalogService, FallbackCatalog};
use shopfront_storefront::db::{CatalogStore, MemoryStore};
use shopfront_storefront::state::AppState;
use tokio::task::JoinHandle;

/// Admin key every test server is configured with.
pub const ADMIN_KEY: &str = "k3y-Adm1n-7qZ!pX";

/// A storefront server running in the background of the current test.
pub struct TestServer {
    addr: SocketAddr,
    store: Arc<MemoryStore>,
    client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server backed by a fresh, reachable in-memory store.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        Self::start_with(Arc::new(MemoryStore::new())).await
    }

    /// Start a server backed by `store`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the fallback dataset is
    /// invalid.
    pub async fn start_with(store: Arc<MemoryStore>) -> Self {
        let fallback = FallbackCatalog::builtin().expect("built-in dataset parses");
        let catalog = CatalogService::new(
            Arc::clone(&store) as Arc<dyn CatalogStore>,
            fallback,
            SecretString::from(ADMIN_KEY),
        );
        let app = shopfront_storefront::build_router(AppState::new(catalog));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("listener has an address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            store,
            client: reqwest::Client::new(),
            handle,
        }
    }

    /// `http://127.0.0.1:<port>`
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }

    #[must_use]
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// The store behind the server, for simulating outages.
    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
