//! Scene documents for offline rendering.
//!
//! A document describes a composition as a list of steps replayed against a
//! fresh scene:
//!
//! ```json
//! {
//!   "template": "top-image-bottom-text",
//!   "filters": { "grayscale": true, "dither": true },
//!   "layers": [
//!     { "type": "image", "path": "photo.jpg", "placeholder": true },
//!     { "type": "text", "text": "Hello", "style": { "font_size": 40 } }
//!   ]
//! }
//! ```
//!
//! Image paths are relative to the document's directory.

use serde::Deserialize;
use std::path::PathBuf;

use crate::models::{FilterState, ObjectPatch, TextDirection};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDocument {
    /// Template applied before any layer
    #[serde(default)]
    pub template: Option<String>,

    #[serde(default)]
    pub filters: FilterState,

    /// Bottom to top
    #[serde(default)]
    pub layers: Vec<DocumentLayer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentLayer {
    Image {
        path: PathBuf,
        /// Place as an overlay (half canvas width)
        #[serde(default)]
        overlay: bool,
        /// Fill the lowest remaining placeholder instead of adding on top
        #[serde(default)]
        placeholder: bool,
        #[serde(default)]
        style: ObjectPatch,
    },
    Text {
        text: String,
        #[serde(default)]
        direction: TextDirection,
        #[serde(default)]
        style: ObjectPatch,
    },
}

impl SceneDocument {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}
