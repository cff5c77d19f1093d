//! HTTP-boundary error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::multipart::ParseError;

/// A client mistake that is not a multipart parse failure, e.g. a missing
/// boundary token in the request's Content-Type.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BadRequest(pub String);

/// Anyhow wrapper so handlers can use `?` on anything. Client-side
/// failures map to 400, everything else is a 500.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.downcast_ref::<ParseError>().is_some()
            || self.0.downcast_ref::<BadRequest>().is_some()
        {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        tracing::debug!("request failed: {:#}", self.0);
        (status, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
