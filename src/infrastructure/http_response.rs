// HTTP response utilities for JSON+Brotli encoding
use crate::domain::error::DashboardError;
use async_compression::tokio::bufread::BrotliEncoder;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Response, StatusCode},
    response::IntoResponse,
};
use serde::Serialize;
use tokio::io::AsyncReadExt;

/// Whether the client accepts Brotli
pub fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.contains("br"))
        .unwrap_or(false)
}

/// Serialize to JSON with optional Brotli compression
pub async fn json_response<T: Serialize>(
    data: &T,
    compress: bool,
) -> Result<Response<Body>, StatusCode> {
    let json_bytes = serde_json::to_vec(data).map_err(|e| {
        tracing::error!("JSON serialization error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let (body_bytes, content_encoding) = if compress {
        let original_len = json_bytes.len();
        let mut encoder = BrotliEncoder::new(std::io::Cursor::new(json_bytes));
        let mut compressed = Vec::new();
        encoder.read_to_end(&mut compressed).await.map_err(|e| {
            tracing::error!("Brotli compression error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        tracing::debug!("Compressed {} -> {} bytes", original_len, compressed.len());
        (compressed, Some("br"))
    } else {
        (json_bytes, None)
    };

    let mut response_builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, HeaderValue::from(body_bytes.len()));

    if let Some(encoding) = content_encoding {
        response_builder = response_builder.header(header::CONTENT_ENCODING, encoding);
    }

    response_builder.body(Body::from(body_bytes)).map_err(|e| {
        tracing::error!("Response build error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

pub fn error_status(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::UnknownView(_) => StatusCode::NOT_FOUND,
        DashboardError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
        DashboardError::EmptyResult { .. } => StatusCode::CONFLICT,
        DashboardError::Query(_) | DashboardError::MalformedRecord(_) | DashboardError::Fixture(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// `{"error": ...}` body with a status matching the error kind
pub fn error_response(err: DashboardError) -> Response<Body> {
    let status = error_status(&err);
    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    } else {
        tracing::warn!("Request rejected: {}", err);
    }

    (status, axum::Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}
