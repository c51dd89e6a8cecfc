//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    http::header::CONNECTION,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::assets::AssetLoader;
use crate::models::AppConfig;
use crate::rendering::SvgRenderer;
use crate::services::{ExportService, InMemorySceneStore};

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InMemorySceneStore>,
    pub exporter: Arc<ExportService>,
    pub renderer: Arc<SvgRenderer>,
    pub config: Arc<AppConfig>,
}

impl FromRef<AppState> for Arc<InMemorySceneStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Arc<ExportService> {
    fn from_ref(state: &AppState) -> Self {
        state.exporter.clone()
    }
}

impl FromRef<AppState> for Arc<SvgRenderer> {
    fn from_ref(state: &AppState) -> Self {
        state.renderer.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

/// Create application state from an asset loader.
pub fn create_app_state(asset_loader: Arc<AssetLoader>) -> anyhow::Result<AppState> {
    let config = Arc::new(AppConfig::load_from_assets(&asset_loader));
    let renderer = Arc::new(SvgRenderer::with_fonts(asset_loader.get_fonts()));
    let exporter = Arc::new(ExportService::new(renderer.clone(), &config.export));
    let store = Arc::new(InMemorySceneStore::new());

    Ok(AppState {
        store,
        exporter,
        renderer,
        config,
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
/// Responses carry `Connection: close`.
pub fn build_router(state: AppState) -> Router {
    type Store = InMemorySceneStore;

    Router::new()
        // Scenes
        .route("/api/scenes", post(api::create_scene::<Store>))
        .route(
            "/api/scenes/:id",
            get(api::get_scene::<Store>).delete(api::delete_scene::<Store>),
        )
        .route("/api/scenes/:id/clear", post(api::clear_scene::<Store>))
        .route("/api/scenes/:id/template", post(api::apply_template::<Store>))
        .route("/api/scenes/:id/filters", put(api::set_filters::<Store>))
        .route("/api/scenes/:id/layers/move", post(api::move_layer::<Store>))
        .route("/api/scenes/:id/undo", post(api::undo::<Store>))
        .route("/api/scenes/:id/redo", post(api::redo::<Store>))
        .route("/api/templates", get(api::list_templates))
        .route("/api/fonts", get(api::list_fonts))
        // Objects
        .route("/api/scenes/:id/images", post(api::add_image::<Store>))
        .route("/api/scenes/:id/texts", post(api::add_text::<Store>))
        .route(
            "/api/scenes/:id/objects/:oid",
            delete(api::delete_object::<Store>).patch(api::update_object::<Store>),
        )
        .route(
            "/api/scenes/:id/objects/:oid/rotate",
            post(api::rotate::<Store>),
        )
        .route(
            "/api/scenes/:id/objects/:oid/reset",
            post(api::reset_transform::<Store>),
        )
        .route(
            "/api/scenes/:id/objects/:oid/visibility",
            post(api::set_visibility::<Store>),
        )
        .route(
            "/api/scenes/:id/objects/:oid/direction",
            post(api::set_direction::<Store>),
        )
        .route(
            "/api/scenes/:id/objects/:oid/fill",
            post(api::fill_placeholder::<Store>),
        )
        // Export
        .route("/api/scenes/:id/export.jpg", get(api::export_jpeg::<Store>))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            CONNECTION,
            axum::http::HeaderValue::from_static("close"),
        ))
}
