pub mod editor;
pub mod export;
pub mod filter_cache;
pub mod history;
pub mod scene_store;
pub mod templates;

pub use editor::{EditorSettings, SceneEditor, DEFAULT_TEXT};
pub use export::{content_hash, ExportService, ExportedImage};
pub use filter_cache::FilteredRaster;
pub use history::History;
pub use scene_store::{InMemorySceneStore, SceneStore, SharedEditor};
pub use templates::{Template, TemplateInfo, TEMPLATES};
