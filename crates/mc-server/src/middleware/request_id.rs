//! Per-request correlation ids.
//!
//! A caller-supplied `x-request-id` is kept when it is a reasonable token;
//! otherwise a UUID is minted. The id scopes the request's tracing span, is
//! echoed on the response, and is available to handlers as [`RequestId`].

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Longest incoming id we accept as-is.
const MAX_INCOMING_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty() && v.len() <= MAX_INCOMING_LEN)
            .map(|v| Self(v.to_string()))
            .unwrap_or_else(|| Self(Uuid::new_v4().to_string()))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(|| RequestId::from_headers(&parts.headers)))
    }
}

pub async fn assign_request_id(mut request: Request, next: Next) -> Response {
    let id = RequestId::from_headers(request.headers());
    let span = tracing::info_span!(
        "request",
        request_id = %id.0,
        method = %request.method(),
        path = %request.uri().path(),
    );
    request.extensions_mut().insert(id.clone());

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id.0) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, HeaderValue::from_str(id).unwrap());
        headers
    }

    #[test]
    fn incoming_id_is_kept_trimmed() {
        let id = RequestId::from_headers(&headers_with(" job-42 "));
        assert_eq!(id, RequestId("job-42".into()));
    }

    #[test]
    fn missing_or_oversized_id_is_replaced() {
        let minted = RequestId::from_headers(&HeaderMap::new());
        assert!(Uuid::parse_str(&minted.0).is_ok());

        let long = "x".repeat(MAX_INCOMING_LEN + 1);
        let replaced = RequestId::from_headers(&headers_with(&long));
        assert!(Uuid::parse_str(&replaced.0).is_ok());
    }
}
