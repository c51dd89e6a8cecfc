use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::TextAlign;

/// Partial update of a scene object. Absent fields are left unchanged.
///
/// Text fields are rejected for objects that are not text boxes.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ObjectPatch {
    pub name: Option<String>,

    // Text
    pub text: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Flip bold after `bold` is applied
    #[serde(default)]
    pub toggle_bold: bool,
    /// Flip italic after `italic` is applied
    #[serde(default)]
    pub toggle_italic: bool,
    /// Hex color, `#rgb` or `#rrggbb`
    pub fill: Option<String>,
    pub text_align: Option<TextAlign>,
    pub line_height: Option<f32>,
    /// Text box width
    pub width: Option<f32>,

    // Transform
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub scale_x: Option<f32>,
    pub scale_y: Option<f32>,
    /// Sets both scale_x and scale_y
    pub scale: Option<f32>,
    pub angle: Option<f32>,
}

impl ObjectPatch {
    /// Whether the patch touches text-only properties.
    pub fn has_text_fields(&self) -> bool {
        self.text.is_some()
            || self.font_family.is_some()
            || self.font_size.is_some()
            || self.bold.is_some()
            || self.italic.is_some()
            || self.toggle_bold
            || self.toggle_italic
            || self.fill.is_some()
            || self.text_align.is_some()
            || self.line_height.is_some()
            || self.width.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_text_fields()
            && self.name.is_none()
            && self.left.is_none()
            && self.top.is_none()
            && self.scale_x.is_none()
            && self.scale_y.is_none()
            && self.scale.is_none()
            && self.angle.is_none()
    }
}
