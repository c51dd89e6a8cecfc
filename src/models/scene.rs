use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use utoipa::ToSchema;

use crate::error::SceneError;
use crate::models::text_direction::{
    normalize_breaks, to_vertical_stack, vertical_width, TextDirection,
};
use crate::models::{AssetId, CanvasSpec, ImageAsset};

/// Default line height of text boxes, relative to font size.
pub const DEFAULT_LINE_HEIGHT: f32 = 1.16;

/// Scene identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneId(String);

impl SceneId {
    pub fn generate() -> Self {
        use rand::Rng;
        let id: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(12)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        Self(id)
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Object identifier, unique within a scene and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ObjectId(u64);

impl ObjectId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Placement of an object. `left`/`top` is the object's center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Transform {
    pub left: f32,
    pub top: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Degrees, clockwise
    pub angle: f32,
}

impl Transform {
    pub fn at(left: f32, top: f32) -> Self {
        Self {
            left,
            top,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
        }
    }

    pub fn scaled(self, scale: f32) -> Self {
        Self {
            scale_x: scale,
            scale_y: scale,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObject {
    pub asset: AssetId,
    pub natural_width: u32,
    pub natural_height: u32,
}

/// Horizontal layout saved while a text box is vertical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalLayout {
    pub width: f32,
    pub text_align: TextAlign,
    pub line_height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObject {
    /// Display text; one glyph per line when vertical
    pub text: String,
    /// Text as typed, independent of direction
    pub logical_text: String,
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    /// Lowercase `#rrggbb`
    pub fill: String,
    pub text_align: TextAlign,
    pub line_height: f32,
    /// Box width used for alignment
    pub width: f32,
    pub direction: TextDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<HorizontalLayout>,
}

impl TextObject {
    pub fn new(text: &str, font_family: &str, font_size: f32, width: f32) -> Self {
        let logical = normalize_breaks(text);
        Self {
            text: logical.clone(),
            logical_text: logical,
            font_family: font_family.to_string(),
            font_size,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            fill: "#000000".to_string(),
            text_align: TextAlign::Center,
            line_height: DEFAULT_LINE_HEIGHT,
            width,
            direction: TextDirection::Horizontal,
            horizontal: None,
        }
    }

    /// Replace the logical text, re-stacking it when vertical.
    pub fn set_text(&mut self, text: &str) {
        self.logical_text = normalize_breaks(text);
        self.text = match self.direction {
            TextDirection::Horizontal => self.logical_text.clone(),
            TextDirection::Vertical => to_vertical_stack(&self.logical_text),
        };
    }

    /// Switch direction. Returns false if already in that direction.
    pub fn set_direction(&mut self, direction: TextDirection) -> bool {
        if self.direction == direction {
            return false;
        }
        match direction {
            TextDirection::Vertical => {
                self.horizontal = Some(HorizontalLayout {
                    width: self.width,
                    text_align: self.text_align,
                    line_height: self.line_height,
                });
                self.logical_text = normalize_breaks(&self.text);
                self.text = to_vertical_stack(&self.logical_text);
                self.width = vertical_width(self.font_size);
            }
            TextDirection::Horizontal => {
                if let Some(saved) = self.horizontal.take() {
                    self.width = saved.width;
                    self.text_align = saved.text_align;
                    self.line_height = saved.line_height;
                }
                self.text = self.logical_text.clone();
            }
        }
        self.direction = direction;
        true
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    /// Box height: one line height per display line.
    pub fn height(&self) -> f32 {
        self.line_count() as f32 * self.font_size * self.line_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderObject {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKind {
    Image(ImageObject),
    Text(TextObject),
    Placeholder(PlaceholderObject),
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Image(_) => "image",
            ObjectKind::Text(_) => "text",
            ObjectKind::Placeholder(_) => "placeholder",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub visible: bool,
    pub transform: Transform,
    /// Transform at creation, restored by reset
    pub initial: Transform,
    pub kind: ObjectKind,
}

impl SceneObject {
    pub fn new(id: ObjectId, name: impl Into<String>, transform: Transform, kind: ObjectKind) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            transform,
            initial: transform,
            kind,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, ObjectKind::Placeholder(_))
    }

    /// Whether the object ends up in exported rasters.
    pub fn is_printable(&self) -> bool {
        self.visible && !self.is_placeholder()
    }

    /// Unscaled box size.
    pub fn size(&self) -> (f32, f32) {
        match &self.kind {
            ObjectKind::Image(img) => (img.natural_width as f32, img.natural_height as f32),
            ObjectKind::Text(text) => (text.width, text.height()),
            ObjectKind::Placeholder(p) => (p.width, p.height),
        }
    }

    /// Box size after scaling.
    pub fn scaled_size(&self) -> (f32, f32) {
        let (w, h) = self.size();
        (w * self.transform.scale_x.abs(), h * self.transform.scale_y.abs())
    }
}

/// Export filter toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FilterState {
    pub grayscale: bool,
    pub dither: bool,
}

impl FilterState {
    /// Toggles as a client may set them: dither requires grayscale.
    pub fn constrained(grayscale: bool, dither: bool) -> Self {
        Self {
            grayscale,
            dither: grayscale && dither,
        }
    }
}

/// One row of the layer list, topmost first.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LayerInfo {
    /// Display index, 0 is the topmost layer
    pub index: usize,
    pub id: ObjectId,
    pub kind: String,
    pub name: String,
    pub visible: bool,
}

/// History entry: everything undo can restore.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    objects: Vec<SceneObject>,
    filters: FilterState,
}

/// Objects, assets and filters of one composition.
#[derive(Debug, Clone)]
pub struct Scene {
    pub canvas: CanvasSpec,
    /// Bottom to top
    objects: Vec<SceneObject>,
    assets: HashMap<AssetId, ImageAsset>,
    pub filters: FilterState,
    next_object: u64,
    next_asset: u64,
}

impl Scene {
    pub fn new(canvas: CanvasSpec) -> Self {
        Self {
            canvas,
            objects: Vec::new(),
            assets: HashMap::new(),
            filters: FilterState::default(),
            next_object: 1,
            next_asset: 1,
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn asset(&self, id: AssetId) -> Option<&ImageAsset> {
        self.assets.get(&id)
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    pub fn insert_asset(&mut self, asset: ImageAsset) -> AssetId {
        let id = AssetId::new(self.next_asset);
        self.next_asset += 1;
        self.assets.insert(id, asset);
        id
    }

    pub fn next_object_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_object);
        self.next_object += 1;
        id
    }

    /// Add on top of the stack.
    pub fn push(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    fn position(&self, id: ObjectId) -> Result<usize, SceneError> {
        self.objects
            .iter()
            .position(|o| o.id == id)
            .ok_or(SceneError::ObjectNotFound(id))
    }

    pub fn get(&self, id: ObjectId) -> Result<&SceneObject, SceneError> {
        let pos = self.position(id)?;
        Ok(&self.objects[pos])
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Result<&mut SceneObject, SceneError> {
        let pos = self.position(id)?;
        Ok(&mut self.objects[pos])
    }

    pub fn remove(&mut self, id: ObjectId) -> Result<SceneObject, SceneError> {
        let pos = self.position(id)?;
        Ok(self.objects.remove(pos))
    }

    /// Swap an object for another at the same stacking position.
    pub fn replace(&mut self, id: ObjectId, object: SceneObject) -> Result<SceneObject, SceneError> {
        let pos = self.position(id)?;
        Ok(std::mem::replace(&mut self.objects[pos], object))
    }

    /// Remove every object matching the predicate, returning how many went.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&SceneObject) -> bool) -> usize {
        let before = self.objects.len();
        self.objects.retain(|o| !pred(o));
        before - self.objects.len()
    }

    pub fn clear_objects(&mut self) {
        self.objects.clear();
    }

    /// Layers topmost first.
    pub fn layers(&self) -> Vec<LayerInfo> {
        self.objects
            .iter()
            .rev()
            .enumerate()
            .map(|(index, o)| LayerInfo {
                index,
                id: o.id,
                kind: o.kind.name().to_string(),
                name: o.name.clone(),
                visible: o.visible,
            })
            .collect()
    }

    /// Move a layer between display positions (0 = topmost).
    pub fn move_layer(&mut self, from: usize, to: usize) -> Result<(), SceneError> {
        let len = self.objects.len();
        for index in [from, to] {
            if index >= len {
                return Err(SceneError::LayerOutOfRange { index, len });
            }
        }
        let object = self.objects.remove(len - 1 - from);
        self.objects.insert(len - 1 - to, object);
        Ok(())
    }

    /// Objects that end up in the exported raster, bottom to top.
    pub fn printable(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|o| o.is_printable())
    }

    /// Serialize objects and filters for the history.
    pub fn snapshot(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string(&SnapshotRef {
            objects: &self.objects,
            filters: self.filters,
        })?)
    }

    /// Restore objects and filters from a snapshot.
    ///
    /// Assets are not part of snapshots. The caller keeps every asset a
    /// retained snapshot references alive, see [`retain_assets`](Self::retain_assets).
    pub fn restore(&mut self, snapshot: &str) -> Result<(), SceneError> {
        let Snapshot { objects, filters } = serde_json::from_str(snapshot)?;
        self.objects = objects;
        self.filters = filters;
        Ok(())
    }

    /// Assets used by the current objects.
    pub fn asset_refs(&self) -> HashSet<AssetId> {
        image_assets(&self.objects).collect()
    }

    /// Assets used by the objects of a [`snapshot`](Self::snapshot).
    pub fn snapshot_asset_refs(snapshot: &str) -> Result<HashSet<AssetId>, SceneError> {
        let Snapshot { objects, .. } = serde_json::from_str(snapshot)?;
        Ok(image_assets(&objects).collect())
    }

    /// Drop every asset not in `live`. Returns the number dropped.
    pub fn retain_assets(&mut self, live: &HashSet<AssetId>) -> usize {
        let before = self.assets.len();
        self.assets.retain(|id, _| live.contains(id));
        before - self.assets.len()
    }
}

fn image_assets(objects: &[SceneObject]) -> impl Iterator<Item = AssetId> + '_ {
    objects.iter().filter_map(|object| match &object.kind {
        ObjectKind::Image(image) => Some(image.asset),
        _ => None,
    })
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    objects: &'a [SceneObject],
    filters: FilterState,
}
