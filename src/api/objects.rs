use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::scenes::find_scene;
use crate::error::ApiError;
use crate::models::{ObjectId, ObjectPatch, SceneObject, TextDirection, Transform};
use crate::services::SceneStore;

/// An object as seen by clients
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ObjectView {
    pub id: ObjectId,
    pub name: String,
    /// `image`, `text` or `placeholder`
    pub kind: String,
    pub visible: bool,
    pub transform: Transform,
}

impl From<&SceneObject> for ObjectView {
    fn from(object: &SceneObject) -> Self {
        Self {
            id: object.id,
            name: object.name.clone(),
            kind: object.kind.name().to_string(),
            visible: object.visible,
            transform: object.transform,
        }
    }
}

/// Query parameters for image uploads
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ImageUploadQuery {
    /// Scale to half the canvas width instead of fitting the canvas
    #[serde(default)]
    pub overlay: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AddTextRequest {
    /// Initial text; a default prompt if absent
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RotateRequest {
    /// Added to the current angle, clockwise
    pub degrees: f32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct VisibilityRequest {
    /// Toggles when absent
    pub visible: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DirectionRequest {
    pub direction: TextDirection,
}

/// Parse an optional JSON body; an empty body is the default value.
fn optional_json<T: Default + serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Upload an image
///
/// The body is the encoded image (PNG, JPEG, GIF or WebP).
#[utoipa::path(
    post,
    path = "/api/scenes/{id}/images",
    request_body(content = Vec<u8>, content_type = "application/octet-stream", description = "Encoded image"),
    responses(
        (status = 201, description = "Image added", body = ObjectView),
        (status = 400, description = "Unsupported image"),
        (status = 404, description = "Scene not found"),
    ),
    params(
        ("id" = String, Path, description = "Scene ID"),
        ("overlay" = Option<bool>, Query, description = "Scale to half the canvas width"),
    ),
    tag = "Objects"
)]
pub async fn add_image<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    Query(query): Query<ImageUploadQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let (scene_id, editor) = find_scene(store.as_ref(), &id).await?;
    let mut editor = editor.write().await;
    let oid = if query.overlay {
        editor.add_overlay(body.to_vec())?
    } else {
        editor.add_image(body.to_vec())?
    };
    tracing::info!(scene = %scene_id, object = %oid, overlay = query.overlay, size = body.len(), "Image uploaded");
    let view = ObjectView::from(editor.scene().get(oid)?);
    Ok((StatusCode::CREATED, Json(view)))
}

/// Add a text box at the canvas center
#[utoipa::path(
    post,
    path = "/api/scenes/{id}/texts",
    request_body(content = AddTextRequest, description = "Optional; empty body for the default text"),
    responses(
        (status = 201, description = "Text box added", body = ObjectView),
        (status = 404, description = "Scene not found"),
    ),
    params(("id" = String, Path, description = "Scene ID")),
    tag = "Objects"
)]
pub async fn add_text<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request: AddTextRequest = optional_json(&body)?;
    let (_, editor) = find_scene(store.as_ref(), &id).await?;
    let mut editor = editor.write().await;
    let oid = editor.add_text(request.text.as_deref())?;
    let view = ObjectView::from(editor.scene().get(oid)?);
    Ok((StatusCode::CREATED, Json(view)))
}

/// Update object properties
#[utoipa::path(
    patch,
    path = "/api/scenes/{id}/objects/{oid}",
    request_body = ObjectPatch,
    responses(
        (status = 200, description = "Updated object", body = ObjectView),
        (status = 400, description = "Invalid value, or text fields on a non-text object"),
        (status = 404, description = "Scene or object not found"),
    ),
    params(
        ("id" = String, Path, description = "Scene ID"),
        ("oid" = u64, Path, description = "Object ID"),
    ),
    tag = "Objects"
)]
pub async fn update_object<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path((id, oid)): Path<(String, u64)>,
    Json(patch): Json<ObjectPatch>,
) -> Result<Json<ObjectView>, ApiError> {
    let oid = ObjectId::new(oid);
    let (_, editor) = find_scene(store.as_ref(), &id).await?;
    let mut editor = editor.write().await;
    editor.update_object(oid, &patch)?;
    let view = ObjectView::from(editor.scene().get(oid)?);
    Ok(Json(view))
}

/// Rotate an object
#[utoipa::path(
    post,
    path = "/api/scenes/{id}/objects/{oid}/rotate",
    request_body = RotateRequest,
    responses(
        (status = 200, description = "Rotated object", body = ObjectView),
        (status = 404, description = "Scene or object not found"),
    ),
    params(
        ("id" = String, Path, description = "Scene ID"),
        ("oid" = u64, Path, description = "Object ID"),
    ),
    tag = "Objects"
)]
pub async fn rotate<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path((id, oid)): Path<(String, u64)>,
    Json(request): Json<RotateRequest>,
) -> Result<Json<ObjectView>, ApiError> {
    let oid = ObjectId::new(oid);
    let (_, editor) = find_scene(store.as_ref(), &id).await?;
    let mut editor = editor.write().await;
    editor.rotate(oid, request.degrees)?;
    let view = ObjectView::from(editor.scene().get(oid)?);
    Ok(Json(view))
}

/// Restore the transform an object was created with
#[utoipa::path(
    post,
    path = "/api/scenes/{id}/objects/{oid}/reset",
    responses(
        (status = 200, description = "Reset object", body = ObjectView),
        (status = 404, description = "Scene or object not found"),
    ),
    params(
        ("id" = String, Path, description = "Scene ID"),
        ("oid" = u64, Path, description = "Object ID"),
    ),
    tag = "Objects"
)]
pub async fn reset_transform<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path((id, oid)): Path<(String, u64)>,
) -> Result<Json<ObjectView>, ApiError> {
    let oid = ObjectId::new(oid);
    let (_, editor) = find_scene(store.as_ref(), &id).await?;
    let mut editor = editor.write().await;
    editor.reset_transform(oid)?;
    let view = ObjectView::from(editor.scene().get(oid)?);
    Ok(Json(view))
}

/// Show, hide or toggle an object
#[utoipa::path(
    post,
    path = "/api/scenes/{id}/objects/{oid}/visibility",
    request_body(content = VisibilityRequest, description = "Empty body or no `visible` toggles"),
    responses(
        (status = 200, description = "Updated object", body = ObjectView),
        (status = 404, description = "Scene or object not found"),
    ),
    params(
        ("id" = String, Path, description = "Scene ID"),
        ("oid" = u64, Path, description = "Object ID"),
    ),
    tag = "Objects"
)]
pub async fn set_visibility<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path((id, oid)): Path<(String, u64)>,
    body: Bytes,
) -> Result<Json<ObjectView>, ApiError> {
    let request: VisibilityRequest = optional_json(&body)?;
    let oid = ObjectId::new(oid);
    let (_, editor) = find_scene(store.as_ref(), &id).await?;
    let mut editor = editor.write().await;
    match request.visible {
        Some(visible) => editor.set_visibility(oid, visible)?,
        None => editor.toggle_visibility(oid)?,
    };
    let view = ObjectView::from(editor.scene().get(oid)?);
    Ok(Json(view))
}

/// Switch a text box between horizontal and vertical
#[utoipa::path(
    post,
    path = "/api/scenes/{id}/objects/{oid}/direction",
    request_body = DirectionRequest,
    responses(
        (status = 200, description = "Updated object", body = ObjectView),
        (status = 400, description = "Object is not a text box"),
        (status = 404, description = "Scene or object not found"),
    ),
    params(
        ("id" = String, Path, description = "Scene ID"),
        ("oid" = u64, Path, description = "Object ID"),
    ),
    tag = "Objects"
)]
pub async fn set_direction<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path((id, oid)): Path<(String, u64)>,
    Json(request): Json<DirectionRequest>,
) -> Result<Json<ObjectView>, ApiError> {
    let oid = ObjectId::new(oid);
    let (_, editor) = find_scene(store.as_ref(), &id).await?;
    let mut editor = editor.write().await;
    editor.set_text_direction(oid, request.direction)?;
    let view = ObjectView::from(editor.scene().get(oid)?);
    Ok(Json(view))
}

/// Fill a template placeholder with an image
#[utoipa::path(
    post,
    path = "/api/scenes/{id}/objects/{oid}/fill",
    request_body(content = Vec<u8>, content_type = "application/octet-stream", description = "Encoded image"),
    responses(
        (status = 201, description = "Image replacing the placeholder", body = ObjectView),
        (status = 400, description = "Not a placeholder, or unsupported image"),
        (status = 404, description = "Scene or object not found"),
    ),
    params(
        ("id" = String, Path, description = "Scene ID"),
        ("oid" = u64, Path, description = "Placeholder object ID"),
    ),
    tag = "Objects"
)]
pub async fn fill_placeholder<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path((id, oid)): Path<(String, u64)>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let (_, editor) = find_scene(store.as_ref(), &id).await?;
    let mut editor = editor.write().await;
    let new_id = editor.fill_placeholder(ObjectId::new(oid), body.to_vec())?;
    let view = ObjectView::from(editor.scene().get(new_id)?);
    Ok((StatusCode::CREATED, Json(view)))
}

/// Delete an object
#[utoipa::path(
    delete,
    path = "/api/scenes/{id}/objects/{oid}",
    responses(
        (status = 204, description = "Object deleted"),
        (status = 404, description = "Scene or object not found"),
    ),
    params(
        ("id" = String, Path, description = "Scene ID"),
        ("oid" = u64, Path, description = "Object ID"),
    ),
    tag = "Objects"
)]
pub async fn delete_object<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path((id, oid)): Path<(String, u64)>,
) -> Result<StatusCode, ApiError> {
    let (_, editor) = find_scene(store.as_ref(), &id).await?;
    editor.write().await.delete(ObjectId::new(oid))?;
    Ok(StatusCode::NO_CONTENT)
}
