use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::scenes::find_scene;
use crate::error::ApiError;
use crate::services::{ExportService, SceneStore};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ExportQuery {
    /// Serve for display instead of download
    #[serde(default)]
    pub inline: bool,
}

/// Export the scene as JPEG
///
/// Renders printable objects at canvas resolution, applies the scene's
/// grayscale and dither filters and encodes at the configured quality.
#[utoipa::path(
    get,
    path = "/api/scenes/{id}/export.jpg",
    responses(
        (status = 200, description = "JPEG image", content_type = "image/jpeg"),
        (status = 304, description = "Unchanged since the ETag in If-None-Match"),
        (status = 404, description = "Scene not found"),
        (status = 500, description = "Rendering error"),
    ),
    params(
        ("id" = String, Path, description = "Scene ID"),
        ("inline" = Option<bool>, Query, description = "Content-Disposition inline instead of attachment"),
        ("If-None-Match" = Option<String>, Header, description = "ETag of a previous export"),
    ),
    tag = "Export"
)]
pub async fn export_jpeg<S: SceneStore>(
    State(store): State<Arc<S>>,
    State(exporter): State<Arc<ExportService>>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (scene_id, editor) = find_scene(store.as_ref(), &id).await?;
    let image = exporter.export(&editor).await?;
    let etag = format!("\"{}\"", image.etag);

    if if_none_match(&headers, &etag) {
        tracing::debug!(scene = %scene_id, etag = %etag, "Export unchanged");
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    let disposition = if query.inline {
        "inline".to_string()
    } else {
        format!("attachment; filename=\"{}\"", exporter.filename())
    };
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| ApiError::Internal(format!("Invalid export filename: {e}")))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/jpeg")),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        [(header::ETAG, etag)],
        image.bytes,
    )
        .into_response())
}

/// Whether `If-None-Match` lists the ETag (or `*`).
fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|tag| tag.trim().trim_start_matches("W/"))
        .any(|tag| tag == etag || tag == "*")
}
