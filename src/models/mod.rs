pub mod asset;
pub mod canvas_spec;
pub mod config;
pub mod document;
pub mod patch;
pub mod scene;
pub mod text_direction;

pub use asset::{AssetId, ImageAsset};
pub use canvas_spec::CanvasSpec;
pub use config::{AppConfig, CanvasConfig, ExportConfig, HistoryConfig, TextConfig};
pub use document::{DocumentLayer, SceneDocument};
pub use patch::ObjectPatch;
pub use scene::{
    FilterState, FontStyle, FontWeight, HorizontalLayout, ImageObject, LayerInfo, ObjectId,
    ObjectKind, PlaceholderObject, Scene, SceneId, SceneObject, TextAlign, TextObject, Transform,
};
pub use text_direction::TextDirection;
