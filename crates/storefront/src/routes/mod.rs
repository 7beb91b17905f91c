//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness
//! GET    /health/ready           - Readiness (503 while the store is down)
//!
//! # Products
//! GET    /products               - Listing (?category=&featured=true)
//! POST   /products               - Create (x-api-key)
//! GET    /products/{id}          - Detail
//! PUT    /products/{id}          - Partial update (x-api-key)
//!
//! # Orders
//! GET    /orders                 - All orders, newest first
//! POST   /orders                 - Place an order
//!
//! # Dashboard
//! GET    /dashboard              - Inventory statistics
//!
//! # Cart (informational, no server-side state)
//! GET    /cart
//! POST   /cart
//! DELETE /cart?productId=
//! ```
//!
//! Catalog responses carry `source: "mongodb" | "mock"`.

pub mod cart;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the full route table.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/products", get(products::list).post(products::create))
        .route("/products/{id}", get(products::show).put(products::update))
        .route("/orders", get(orders::list).post(orders::create))
        .route("/dashboard", get(dashboard::stats))
        .route(
            "/cart",
            get(cart::show).post(cart::add).delete(cart::remove),
        )
}
