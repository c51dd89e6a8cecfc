use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{AppConfig, FilterState, LayerInfo, ObjectId, SceneId};
use crate::services::{templates, SceneEditor, SceneStore, SharedEditor, TemplateInfo};

/// Response from scene creation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSceneResponse {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

/// Current state of a scene
#[derive(Debug, Serialize, ToSchema)]
pub struct SceneSummary {
    pub id: String,
    pub width: u32,
    pub height: u32,
    /// Bumped on every content change
    pub revision: u64,
    /// Topmost first
    pub layers: Vec<LayerInfo>,
    pub filters: FilterState,
    pub can_undo: bool,
    pub can_redo: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

impl SceneSummary {
    pub fn new(id: &SceneId, editor: &SceneEditor) -> Self {
        let canvas = editor.scene().canvas;
        Self {
            id: id.to_string(),
            width: canvas.width,
            height: canvas.height,
            revision: editor.revision(),
            layers: editor.layers(),
            filters: editor.filters(),
            can_undo: editor.can_undo(),
            can_redo: editor.can_redo(),
            created_at: editor.created_at(),
            updated_at: editor.updated_at(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TemplateRequest {
    /// Template name, see `GET /api/templates`
    pub name: String,
}

/// Objects created by an operation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ObjectsCreated {
    pub ids: Vec<ObjectId>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FiltersRequest {
    #[serde(default)]
    pub grayscale: bool,
    /// Ignored unless grayscale is on
    #[serde(default)]
    pub dither: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveLayerRequest {
    /// Display index, 0 is the topmost layer
    pub from: usize,
    pub to: usize,
}

/// Result of undo or redo
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    /// False if there was nothing to undo or redo
    pub changed: bool,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Look up a scene or fail with 404.
pub(crate) async fn find_scene<S: SceneStore>(
    store: &S,
    id: &str,
) -> Result<(SceneId, SharedEditor), ApiError> {
    let id = SceneId::new(id);
    let editor = store.get(&id).await.ok_or(ApiError::SceneNotFound)?;
    Ok((id, editor))
}

/// Create an empty scene
#[utoipa::path(
    post,
    path = "/api/scenes",
    responses(
        (status = 201, description = "Scene created", body = CreateSceneResponse),
    ),
    tag = "Scenes"
)]
pub async fn create_scene<S: SceneStore>(
    State(store): State<Arc<S>>,
    State(config): State<Arc<AppConfig>>,
) -> Result<impl IntoResponse, ApiError> {
    let editor = SceneEditor::from_config(&config)?;
    let canvas = editor.scene().canvas;
    let id = SceneId::generate();
    store.insert(id.clone(), editor).await;

    tracing::info!(scene = %id, width = canvas.width, height = canvas.height, "Scene created");

    Ok((
        StatusCode::CREATED,
        Json(CreateSceneResponse {
            id: id.to_string(),
            width: canvas.width,
            height: canvas.height,
        }),
    ))
}

/// Get scene layers, filters and history state
#[utoipa::path(
    get,
    path = "/api/scenes/{id}",
    responses(
        (status = 200, description = "Scene summary", body = SceneSummary),
        (status = 404, description = "Scene not found"),
    ),
    params(("id" = String, Path, description = "Scene ID")),
    tag = "Scenes"
)]
pub async fn get_scene<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<SceneSummary>, ApiError> {
    let (id, editor) = find_scene(store.as_ref(), &id).await?;
    let editor = editor.read().await;
    Ok(Json(SceneSummary::new(&id, &editor)))
}

/// Drop a scene
#[utoipa::path(
    delete,
    path = "/api/scenes/{id}",
    responses(
        (status = 204, description = "Scene deleted"),
        (status = 404, description = "Scene not found"),
    ),
    params(("id" = String, Path, description = "Scene ID")),
    tag = "Scenes"
)]
pub async fn delete_scene<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !store.remove(&SceneId::new(&id)).await {
        return Err(ApiError::SceneNotFound);
    }
    tracing::info!(scene = %id, "Scene deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Remove all objects and switch filters off
#[utoipa::path(
    post,
    path = "/api/scenes/{id}/clear",
    responses(
        (status = 200, description = "Scene cleared", body = SceneSummary),
        (status = 404, description = "Scene not found"),
    ),
    params(("id" = String, Path, description = "Scene ID")),
    tag = "Scenes"
)]
pub async fn clear_scene<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<SceneSummary>, ApiError> {
    let (id, editor) = find_scene(store.as_ref(), &id).await?;
    let mut editor = editor.write().await;
    editor.clear()?;
    Ok(Json(SceneSummary::new(&id, &editor)))
}

/// Replace placeholders with a template layout
#[utoipa::path(
    post,
    path = "/api/scenes/{id}/template",
    request_body = TemplateRequest,
    responses(
        (status = 200, description = "Template applied", body = ObjectsCreated),
        (status = 400, description = "Unknown template"),
        (status = 404, description = "Scene not found"),
    ),
    params(("id" = String, Path, description = "Scene ID")),
    tag = "Scenes"
)]
pub async fn apply_template<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    Json(request): Json<TemplateRequest>,
) -> Result<Json<ObjectsCreated>, ApiError> {
    let (_, editor) = find_scene(store.as_ref(), &id).await?;
    let ids = editor.write().await.apply_template(&request.name)?;
    Ok(Json(ObjectsCreated { ids }))
}

/// List available templates
#[utoipa::path(
    get,
    path = "/api/templates",
    responses(
        (status = 200, description = "Templates", body = Vec<TemplateInfo>),
    ),
    tag = "Scenes"
)]
pub async fn list_templates() -> Json<Vec<TemplateInfo>> {
    Json(templates::TEMPLATES.iter().map(|t| t.info()).collect())
}

/// Set export filters
///
/// Dither is forced off when grayscale is off. Returns the effective filters.
#[utoipa::path(
    put,
    path = "/api/scenes/{id}/filters",
    request_body = FiltersRequest,
    responses(
        (status = 200, description = "Effective filters", body = FilterState),
        (status = 404, description = "Scene not found"),
    ),
    params(("id" = String, Path, description = "Scene ID")),
    tag = "Scenes"
)]
pub async fn set_filters<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    Json(request): Json<FiltersRequest>,
) -> Result<Json<FilterState>, ApiError> {
    let (id, editor) = find_scene(store.as_ref(), &id).await?;
    let filters = editor
        .write()
        .await
        .set_filters(request.grayscale, request.dither);
    tracing::debug!(scene = %id, grayscale = filters.grayscale, dither = filters.dither, "Filters set");
    Ok(Json(filters))
}

/// Move a layer in display order
#[utoipa::path(
    post,
    path = "/api/scenes/{id}/layers/move",
    request_body = MoveLayerRequest,
    responses(
        (status = 200, description = "Layers after the move", body = Vec<LayerInfo>),
        (status = 400, description = "Layer index out of range"),
        (status = 404, description = "Scene not found"),
    ),
    params(("id" = String, Path, description = "Scene ID")),
    tag = "Scenes"
)]
pub async fn move_layer<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    Json(request): Json<MoveLayerRequest>,
) -> Result<Json<Vec<LayerInfo>>, ApiError> {
    let (_, editor) = find_scene(store.as_ref(), &id).await?;
    let mut editor = editor.write().await;
    editor.move_layer(request.from, request.to)?;
    Ok(Json(editor.layers()))
}

/// Step back in the history
#[utoipa::path(
    post,
    path = "/api/scenes/{id}/undo",
    responses(
        (status = 200, description = "History state", body = HistoryResponse),
        (status = 404, description = "Scene not found"),
    ),
    params(("id" = String, Path, description = "Scene ID")),
    tag = "Scenes"
)]
pub async fn undo<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let (_, editor) = find_scene(store.as_ref(), &id).await?;
    let mut editor = editor.write().await;
    let changed = editor.undo()?;
    Ok(Json(history_response(changed, &editor)))
}

/// Step forward in the history
#[utoipa::path(
    post,
    path = "/api/scenes/{id}/redo",
    responses(
        (status = 200, description = "History state", body = HistoryResponse),
        (status = 404, description = "Scene not found"),
    ),
    params(("id" = String, Path, description = "Scene ID")),
    tag = "Scenes"
)]
pub async fn redo<S: SceneStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let (_, editor) = find_scene(store.as_ref(), &id).await?;
    let mut editor = editor.write().await;
    let changed = editor.redo()?;
    Ok(Json(history_response(changed, &editor)))
}

fn history_response(changed: bool, editor: &SceneEditor) -> HistoryResponse {
    HistoryResponse {
        changed,
        can_undo: editor.can_undo(),
        can_redo: editor.can_redo(),
    }
}
