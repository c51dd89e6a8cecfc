use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use luma_dither::QuantizeError;
use serde_json::json;
use thiserror::Error;

use crate::models::ObjectId;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Scene not found")]
    SceneNotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures while turning a scene into pixels or bytes.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("JPEG encode error: {0}")]
    JpegEncode(String),

    #[error("Quantize error: {0}")]
    Quantize(#[from] QuantizeError),

    #[error("Render task failed: {0}")]
    Task(String),
}

/// Failures of scene editing operations.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("Layer index {index} out of range ({len} layers)")]
    LayerOutOfRange { index: usize, len: usize },

    #[error("Object {0} is not a text box")]
    NotText(ObjectId),

    #[error("Object {0} is not a placeholder")]
    NotPlaceholder(ObjectId),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SceneError {
    fn status(&self) -> StatusCode {
        match self {
            SceneError::ObjectNotFound(_) => StatusCode::NOT_FOUND,
            SceneError::Snapshot(_) | SceneError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::SceneNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Scene(e) => (e.status(), e.to_string()),
            ApiError::Render(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(error = %message, "Request failed");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}
