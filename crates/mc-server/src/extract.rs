//! JSON and query-string extractors that fail with the API's error body.
//!
//! axum's own `Json` and `Query` reject with plain text (and 422 for a body
//! that does not fit the type). These wrappers turn every rejection into
//! `InvalidArgument`, tagged with the request id.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::middleware::request_id::RequestId;

/// Request body parsed as JSON.
pub struct ApiJson<T>(pub T);

/// Query string parsed into `T`.
pub struct ApiQuery<T>(pub T);

fn bad_input(message: String, request_id: Option<RequestId>) -> AppError {
    let err = AppError::new(mc_core::Error::invalid(message));
    match request_id {
        Some(RequestId(id)) => err.with_request_id(id),
        None => err,
    }
}

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let request_id = req.extensions().get::<RequestId>().cloned();
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|rejection: JsonRejection| bad_input(rejection.body_text(), request_id))
    }
}

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts.extensions.get::<RequestId>().cloned();
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection: QueryRejection| bad_input(rejection.body_text(), request_id))
    }
}
