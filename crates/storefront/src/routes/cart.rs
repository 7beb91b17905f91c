//! `/cart` surface.
//!
//! Carts live with the client (see the `shopfront-cart` crate); the server
//! keeps no cart state. These handlers validate and echo their input so
//! clients get a consistent answer, and store nothing.

use serde::{Deserialize, Serialize};

use shopfront_core::api::ApiResponse;

use crate::error::{AppError, Result};
use crate::extract::{Json, Query};

const CLIENT_SIDE_NOTE: &str =
    "Carts are kept client-side; the server stores no cart state until checkout";

/// Description of where cart state lives.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartInfo {
    pub storage: &'static str,
    pub checkout: &'static str,
}

/// Body of `POST /cart`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
}

/// Echo of a validated cart item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemEcho {
    pub product_id: String,
    pub quantity: u32,
}

/// Query of `DELETE /cart`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveQuery {
    pub product_id: Option<String>,
}

/// `GET /cart`
pub async fn show() -> Json<ApiResponse<CartInfo>> {
    Json(
        ApiResponse::ok(CartInfo {
            storage: "client",
            checkout: "POST /orders",
        })
        .with_message(CLIENT_SIDE_NOTE),
    )
}

/// `POST /cart`
pub async fn add(Json(body): Json<CartItemRequest>) -> Result<Json<ApiResponse<CartItemEcho>>> {
    let product_id = body
        .product_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Product ID and quantity are required".to_string()))?;
    let quantity = body
        .quantity
        .and_then(|q| u32::try_from(q).ok())
        .filter(|q| *q >= 1)
        .ok_or_else(|| AppError::BadRequest("Product ID and quantity are required".to_string()))?;

    Ok(Json(
        ApiResponse::ok(CartItemEcho {
            product_id,
            quantity,
        })
        .with_message(CLIENT_SIDE_NOTE),
    ))
}

/// `DELETE /cart?productId=`
pub async fn remove(Query(query): Query<RemoveQuery>) -> Result<Json<ApiResponse<String>>> {
    let product_id = query
        .product_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Product ID is required".to_string()))?;

    Ok(Json(ApiResponse::ok(product_id).with_message(CLIENT_SIDE_NOTE)))
}
