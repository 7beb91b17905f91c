//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (`http_request` span with status and latency)
//! 3. Request ID (honour or generate `x-request-id`)
//!
//! The admin key is an extractor rather than a layer, so only the write
//! handlers look at it.

pub mod admin_key;
pub mod request_id;

pub use admin_key::{ADMIN_KEY_HEADER, AdminKey};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
