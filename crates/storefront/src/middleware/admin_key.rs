//! Administrative credential extractor.
//!
//! Only pulls the header out of the request; the catalog service decides
//! whether it matches, so an unauthorized write is rejected before the body
//! is validated or anything is stored.

use axum::{extract::FromRequestParts, http::request::Parts};

/// The HTTP header carrying the administrative key.
pub const ADMIN_KEY_HEADER: &str = "x-api-key";

/// Value of the `x-api-key` header, if present and valid UTF-8.
#[derive(Debug, Clone, Default)]
pub struct AdminKey(pub Option<String>);

impl AdminKey {
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for AdminKey
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(String::from);

        Ok(Self(key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> AdminKey {
        let (mut parts, ()) = request.into_parts();
        AdminKey::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_reads_header() {
        let request = Request::builder()
            .header(ADMIN_KEY_HEADER, "abc")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_missing_header() {
        let request = Request::builder().body(()).unwrap();
        assert_eq!(extract(request).await.as_deref(), None);
    }
}
