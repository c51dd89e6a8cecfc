pub mod export;
pub mod fonts;
pub mod objects;
pub mod scenes;

pub use export::{export_jpeg, ExportQuery, __path_export_jpeg};
pub use fonts::{list_fonts, FontInfo, __path_list_fonts};
pub use objects::{
    add_image, add_text, delete_object, fill_placeholder, reset_transform, rotate,
    set_direction, set_visibility, update_object, AddTextRequest, DirectionRequest,
    ImageUploadQuery, ObjectView, RotateRequest, VisibilityRequest,
};
pub use objects::{
    __path_add_image, __path_add_text, __path_delete_object, __path_fill_placeholder,
    __path_reset_transform, __path_rotate, __path_set_direction, __path_set_visibility,
    __path_update_object,
};
pub use scenes::{
    apply_template, clear_scene, create_scene, delete_scene, get_scene, list_templates,
    move_layer, redo, set_filters, undo, CreateSceneResponse, FiltersRequest, HistoryResponse,
    MoveLayerRequest, ObjectsCreated, SceneSummary, TemplateRequest,
};
pub use scenes::{
    __path_apply_template, __path_clear_scene, __path_create_scene, __path_delete_scene,
    __path_get_scene, __path_list_templates, __path_move_layer, __path_redo, __path_set_filters,
    __path_undo,
};
