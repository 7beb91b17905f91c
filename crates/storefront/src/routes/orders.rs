//! Order route handlers.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use shopfront_core::api::ApiResponse;
use shopfront_core::{NewOrder, Order};

use super::products::write_response;
use crate::error::Result;
use crate::extract::Json;
use crate::state::AppState;

/// `GET /orders`, newest first.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Json<ApiResponse<Vec<Order>>> {
    Json(state.catalog().list_orders().await.into())
}

/// `POST /orders`
///
/// Responds 201 even when the store is down; the `source` tag and message
/// then say the order was not persisted.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<NewOrder>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>)> {
    let order = state.catalog().create_order(request).await?;
    Ok((StatusCode::CREATED, Json(write_response(order))))
}
