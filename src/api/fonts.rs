use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::models::AppConfig;
use crate::rendering::SvgRenderer;

/// A configured text family
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FontInfo {
    pub family: String,
    /// False when no loaded font provides the family; text falls back
    /// to another font at render time
    pub available: bool,
    /// Family given to new text boxes
    pub default: bool,
}

/// List the text families offered to clients
#[utoipa::path(
    get,
    path = "/api/fonts",
    responses(
        (status = 200, description = "Configured families, default first", body = Vec<FontInfo>),
    ),
    tag = "Objects"
)]
pub async fn list_fonts(
    State(config): State<Arc<AppConfig>>,
    State(renderer): State<Arc<SvgRenderer>>,
) -> Json<Vec<FontInfo>> {
    let fonts: Vec<FontInfo> = config
        .text
        .families
        .iter()
        .map(|family| FontInfo {
            family: family.clone(),
            available: renderer.has_family(family),
            default: *family == config.text.default_family,
        })
        .collect();

    for font in fonts.iter().filter(|f| !f.available) {
        tracing::debug!(family = %font.family, "Configured family has no loaded font");
    }
    Json(fonts)
}
