//! Upload and download endpoints bridging HTTP to the transfer protocol.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::errors::{AppError, BadRequest};
use crate::multipart;
use crate::server::state::AppState;
use crate::share;
use crate::storage;

/// Accept one multipart upload, stage it, and answer with the offer code.
/// The transfer listener is bound before the code goes out, so a port
/// clash becomes this request's error response rather than a dead code.
pub async fn upload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let boundary = extract_boundary(&headers)?;

    let parsed = multipart::parse(&body, &boundary)?;
    tracing::debug!(
        "parsed upload: {} ({}, {} bytes)",
        parsed.file_name,
        parsed.content_type,
        parsed.content.len()
    );

    let staged = storage::stage(&state.upload_dir, &parsed.file_name, &parsed.content).await?;

    let code = state.registry.register(staged);
    let listener = share::bind(code).await?;

    let registry = state.registry.clone();
    tokio::spawn(async move {
        share::serve(registry, code, listener).await;
    });

    Ok(Json(json!({ "port": code })))
}

/// Bridge an HTTP client onto the one-shot transfer socket for `code`.
pub async fn download_handler(Path(code): Path<u16>) -> Result<Response, AppError> {
    let fetched = share::fetch(code).await?;

    let disposition = format!("attachment; filename=\"{}\"", fetched.file_name);
    let response = (
        StatusCode::OK,
        [
            (header::CONTENT_DISPOSITION, disposition),
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
        ],
        fetched.content,
    )
        .into_response();

    Ok(response)
}

fn extract_boundary(headers: &HeaderMap) -> Result<String, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !content_type.starts_with("multipart/form-data") {
        return Err(BadRequest("Content-Type must be multipart/form-data".into()).into());
    }

    match content_type.split_once("boundary=") {
        Some((_, boundary)) => Ok(boundary.trim_matches('"').to_string()),
        None => Err(BadRequest("multipart Content-Type is missing its boundary".into()).into()),
    }
}
