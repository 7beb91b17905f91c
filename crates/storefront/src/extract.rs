//! Extractors whose rejections use the JSON error envelope.
//!
//! axum's own `Json` and `Query` reject with plain-text bodies (and 422 for
//! JSON that parses but does not match the type). These wrappers route the
//! rejection through [`AppError`] so clients always get a 400 with
//! `{"success": false, "error": ...}`.

use axum::extract::{FromRequest, FromRequestParts};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::AppError;

/// JSON body extractor and response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Query string extractor.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);
