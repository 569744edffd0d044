use axum::{
    extract::{Json, Multipart},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use formpress::{emit_pdf, Field, FormError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Standard error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message describing what went wrong
    pub error: String,
}

/// Application-specific error types for the API
#[derive(Debug)]
pub enum AppError {
    /// The uploaded or posted payload is unusable
    BadRequest(String),
    /// Core library errors (emission, parsing, flattening)
    Form(FormError),
    /// Anything else
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            // A document-format failure is the caller's input, not our fault
            AppError::Form(FormError::DocumentFormat(msg)) => (
                StatusCode::BAD_REQUEST,
                format!("could not process document: {msg}"),
            ),
            AppError::Form(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        AppError::Form(err)
    }
}

/// Build the application router with all routes configured
pub fn app() -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/export", post(export_form))
        .route("/api/flatten", post(flatten_pdf))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint for monitoring and load balancing
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "formpress API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Export a field layout as a fillable PDF.
///
/// The posted collection is an owned snapshot: edits made after the
/// request is accepted do not affect the in-flight export.
pub async fn export_form(Json(fields): Json<Vec<Field>>) -> Result<Response, AppError> {
    let mut seen = HashSet::new();
    for field in &fields {
        if !seen.insert(field.id.clone()) {
            return Err(AppError::BadRequest(format!(
                "duplicate field id: {}",
                field.id
            )));
        }
    }

    info!(fields = fields.len(), "export requested");

    let pdf_bytes = tokio::task::spawn_blocking(move || emit_pdf(&fields))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok((
        StatusCode::OK,
        [
            ("Content-Type", "application/pdf"),
            ("Content-Disposition", "attachment; filename=\"form.pdf\""),
        ],
        pdf_bytes,
    )
        .into_response())
}

/// Flatten an uploaded PDF into a locked, non-editable copy.
pub async fn flatten_pdf(mut multipart: Multipart) -> Result<Response, AppError> {
    let mut pdf_data = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("failed to read multipart field: {e}")))?
    {
        if field.name() == Some("file") {
            pdf_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("failed to read file data: {e}")))?,
            );
            break;
        }
    }

    let pdf_bytes = pdf_data
        .ok_or_else(|| AppError::BadRequest("no file provided in upload".to_string()))?;

    info!(bytes = pdf_bytes.len(), "flatten requested");

    let flattened =
        tokio::task::spawn_blocking(move || formpress::flatten_document(&pdf_bytes))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok((
        StatusCode::OK,
        [
            ("Content-Type", "application/pdf"),
            (
                "Content-Disposition",
                "attachment; filename=\"flattened.pdf\"",
            ),
        ],
        flattened,
    )
        .into_response())
}
