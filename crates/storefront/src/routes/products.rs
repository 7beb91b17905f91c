//! Product route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use shopfront_core::api::ApiResponse;
use shopfront_core::{NewProduct, Product, ProductFilter, ProductId, ProductPatch, Sourced};

use crate::error::{AppError, Result};
use crate::extract::{Json, Query};
use crate::middleware::AdminKey;
use crate::state::AppState;

/// Message attached to a write the durable store did not accept.
pub const NOT_PERSISTED_MESSAGE: &str =
    "Durable store unavailable; the record was not persisted and will be lost on restart";

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    /// Only the literal `true` enables the featured filter.
    pub featured: Option<String>,
}

impl From<ProductQuery> for ProductFilter {
    fn from(query: ProductQuery) -> Self {
        Self {
            category: query.category.filter(|c| !c.trim().is_empty()),
            featured_only: query.featured.as_deref() == Some("true"),
        }
    }
}

/// Wrap a write result, noting when it was not persisted.
pub(crate) fn write_response<T>(result: Sourced<T>) -> ApiResponse<T> {
    let persisted = result.is_persisted();
    let response = ApiResponse::from(result);
    if persisted {
        response
    } else {
        response.with_message(NOT_PERSISTED_MESSAGE)
    }
}

/// `GET /products?category=&featured=`
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<ApiResponse<Vec<Product>>> {
    let products = state.catalog().list_products(&query.into()).await;
    Json(products.into())
}

/// `GET /products/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>> {
    let product = state.catalog().get_product(&ProductId::new(id)).await?;
    Ok(Json(product.into()))
}

/// `POST /products` (requires `x-api-key`)
///
/// The key is checked before the body, so a wrong key is a 401 even when the
/// body is malformed.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    key: AdminKey,
    body: std::result::Result<Json<NewProduct>, AppError>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>)> {
    state.catalog().authorize(key.as_deref())?;
    let Json(request) = body?;

    let created = state
        .catalog()
        .create_product(key.as_deref(), request)
        .await?;
    Ok((StatusCode::CREATED, Json(write_response(created))))
}

/// `PUT /products/{id}` (requires `x-api-key`)
#[instrument(skip(state, key, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    key: AdminKey,
    body: std::result::Result<Json<ProductPatch>, AppError>,
) -> Result<Json<ApiResponse<Product>>> {
    state.catalog().authorize(key.as_deref())?;
    let Json(patch) = body?;

    let updated = state
        .catalog()
        .update_product(key.as_deref(), &ProductId::new(id), patch)
        .await?;
    Ok(Json(write_response(updated)))
}
