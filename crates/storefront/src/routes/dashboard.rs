//! Inventory dashboard data.

use axum::extract::State;

use shopfront_core::api::ApiResponse;

use crate::catalog::InventoryStats;
use crate::extract::Json;
use crate::state::AppState;

/// `GET /dashboard`
pub async fn stats(State(state): State<AppState>) -> Json<ApiResponse<InventoryStats>> {
    Json(state.catalog().inventory_stats().await.into())
}
