//! Scene editing with undo history.
//!
//! Every mutating operation validates its input before touching the scene,
//! then commits: the revision is bumped and a snapshot is pushed onto the
//! history. Filter changes are the exception, they neither bump the
//! revision nor create a snapshot because the raster does not depend on
//! them.

use chrono::{DateTime, Utc};
use luma_dither::Rgb;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::SceneError;
use crate::models::{
    AppConfig, CanvasSpec, DocumentLayer, FilterState, FontStyle, FontWeight, ImageAsset,
    ImageObject, LayerInfo, ObjectId, ObjectKind, ObjectPatch, PlaceholderObject, Scene,
    SceneDocument, SceneObject, TextDirection, TextObject, Transform,
};
use crate::models::text_direction::vertical_width;
use crate::services::filter_cache::FilteredRaster;
use crate::services::history::History;
use crate::services::templates;

/// Text of a freshly added text box.
pub const DEFAULT_TEXT: &str = "Double-click to edit";

/// Overlays are scaled to this fraction of the canvas width.
const OVERLAY_WIDTH_RATIO: f32 = 0.5;

/// Defaults applied to new objects.
#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub default_family: String,
    pub default_size: f32,
    pub default_width: f32,
    pub max_snapshots: usize,
}

impl EditorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            default_family: config.text.default_family.clone(),
            default_size: config.text.default_size,
            default_width: config.text.default_width,
            max_snapshots: config.history.max_snapshots,
        }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

pub struct SceneEditor {
    scene: Scene,
    history: History,
    settings: EditorSettings,
    /// Bumped whenever the printable content may have changed
    revision: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    raster: Option<(u64, Arc<FilteredRaster>)>,
}

impl SceneEditor {
    pub fn new(canvas: CanvasSpec, settings: EditorSettings) -> Result<Self, SceneError> {
        let scene = Scene::new(canvas);
        let history = History::new(scene.snapshot()?, settings.max_snapshots);
        let now = Utc::now();
        Ok(Self {
            scene,
            history,
            settings,
            revision: 0,
            created_at: now,
            updated_at: now,
            raster: None,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, SceneError> {
        Self::new(config.canvas_spec(), EditorSettings::from_config(config))
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn filters(&self) -> FilterState {
        self.scene.filters
    }

    pub fn layers(&self) -> Vec<LayerInfo> {
        self.scene.layers()
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.updated_at = Utc::now();
    }

    fn commit(&mut self) -> Result<(), SceneError> {
        self.touch();
        self.history.save(self.scene.snapshot()?);
        self.prune_assets()
    }

    /// Drop image assets that neither the scene nor any retained snapshot
    /// uses. Saving can evict snapshots, so this runs after every commit.
    fn prune_assets(&mut self) -> Result<(), SceneError> {
        if self.scene.asset_count() == 0 {
            return Ok(());
        }
        let mut live = self.scene.asset_refs();
        for snapshot in self.history.snapshots() {
            live.extend(Scene::snapshot_asset_refs(snapshot)?);
        }
        let dropped = self.scene.retain_assets(&live);
        if dropped > 0 {
            tracing::debug!(dropped, kept = self.scene.asset_count(), "Pruned image assets");
        }
        Ok(())
    }

    fn push_object(
        &mut self,
        name: &str,
        transform: Transform,
        kind: ObjectKind,
    ) -> ObjectId {
        let id = self.scene.next_object_id();
        self.scene.push(SceneObject::new(id, name, transform, kind));
        id
    }

    fn image_kind(&mut self, asset: ImageAsset) -> (ObjectKind, u32, u32) {
        let (width, height) = (asset.width(), asset.height());
        let asset = self.scene.insert_asset(asset);
        let kind = ObjectKind::Image(ImageObject {
            asset,
            natural_width: width,
            natural_height: height,
        });
        (kind, width, height)
    }

    /// Add an image centered on the canvas, shrunk to fit if larger.
    pub fn add_image(&mut self, bytes: Vec<u8>) -> Result<ObjectId, SceneError> {
        let asset = ImageAsset::probe(bytes)?;
        let (kind, width, height) = self.image_kind(asset);
        let scale = self.scene.canvas.fit_scale(width, height).min(1.0);
        let (cx, cy) = self.scene.canvas.center();
        let id = self.push_object("Image", Transform::at(cx, cy).scaled(scale), kind);
        self.commit()?;
        tracing::debug!(object = %id, width, height, scale, "Added image");
        Ok(id)
    }

    /// Add an image scaled to half the canvas width.
    pub fn add_overlay(&mut self, bytes: Vec<u8>) -> Result<ObjectId, SceneError> {
        let asset = ImageAsset::probe(bytes)?;
        let (kind, width, height) = self.image_kind(asset);
        let scale = self.scene.canvas.width as f32 * OVERLAY_WIDTH_RATIO / width as f32;
        let (cx, cy) = self.scene.canvas.center();
        let id = self.push_object("Overlay", Transform::at(cx, cy).scaled(scale), kind);
        self.commit()?;
        tracing::debug!(object = %id, width, height, scale, "Added overlay");
        Ok(id)
    }

    pub fn add_text(&mut self, text: Option<&str>) -> Result<ObjectId, SceneError> {
        let text = TextObject::new(
            text.unwrap_or(DEFAULT_TEXT),
            &self.settings.default_family,
            self.settings.default_size,
            self.settings.default_width,
        );
        let (cx, cy) = self.scene.canvas.center();
        let id = self.push_object("Text", Transform::at(cx, cy), ObjectKind::Text(text));
        self.commit()?;
        Ok(id)
    }

    /// Apply a partial update. Nothing changes if any field is invalid.
    pub fn update_object(&mut self, id: ObjectId, patch: &ObjectPatch) -> Result<(), SceneError> {
        let object = self.scene.get(id)?;
        if patch.is_empty() {
            return Err(SceneError::InvalidValue {
                field: "patch",
                reason: "no fields to update".to_string(),
            });
        }
        if patch.has_text_fields() && !matches!(object.kind, ObjectKind::Text(_)) {
            return Err(SceneError::NotText(id));
        }

        let fill = patch
            .fill
            .as_deref()
            .map(|f| {
                f.parse::<Rgb>()
                    .map(Rgb::to_hex)
                    .map_err(|_| SceneError::InvalidColor(f.to_string()))
            })
            .transpose()?;
        if let Some(family) = &patch.font_family {
            if family.trim().is_empty() {
                return Err(invalid("font_family", "must not be empty"));
            }
        }
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(invalid("name", "must not be empty"));
            }
        }
        positive("font_size", patch.font_size)?;
        positive("line_height", patch.line_height)?;
        positive("width", patch.width)?;
        finite("left", patch.left)?;
        finite("top", patch.top)?;
        finite("angle", patch.angle)?;
        non_zero("scale", patch.scale)?;
        non_zero("scale_x", patch.scale_x)?;
        non_zero("scale_y", patch.scale_y)?;

        let object = self.scene.get_mut(id)?;
        if let Some(name) = &patch.name {
            object.name = name.trim().to_string();
        }

        let t = &mut object.transform;
        if let Some(left) = patch.left {
            t.left = left;
        }
        if let Some(top) = patch.top {
            t.top = top;
        }
        if let Some(scale) = patch.scale {
            t.scale_x = scale;
            t.scale_y = scale;
        }
        if let Some(sx) = patch.scale_x {
            t.scale_x = sx;
        }
        if let Some(sy) = patch.scale_y {
            t.scale_y = sy;
        }
        if let Some(angle) = patch.angle {
            t.angle = angle % 360.0;
        }

        if let ObjectKind::Text(text) = &mut object.kind {
            if let Some(content) = &patch.text {
                text.set_text(content);
            }
            if let Some(family) = &patch.font_family {
                text.font_family = family.trim().to_string();
            }
            if let Some(size) = patch.font_size {
                text.font_size = size;
                if text.direction == TextDirection::Vertical {
                    text.width = vertical_width(size);
                }
            }
            if let Some(bold) = patch.bold {
                text.font_weight = if bold { FontWeight::Bold } else { FontWeight::Normal };
            }
            if patch.toggle_bold {
                text.font_weight = match text.font_weight {
                    FontWeight::Bold => FontWeight::Normal,
                    FontWeight::Normal => FontWeight::Bold,
                };
            }
            if let Some(italic) = patch.italic {
                text.font_style = if italic { FontStyle::Italic } else { FontStyle::Normal };
            }
            if patch.toggle_italic {
                text.font_style = match text.font_style {
                    FontStyle::Italic => FontStyle::Normal,
                    FontStyle::Normal => FontStyle::Italic,
                };
            }
            if let Some(fill) = fill {
                text.fill = fill;
            }
            if let Some(align) = patch.text_align {
                text.text_align = align;
            }
            if let Some(line_height) = patch.line_height {
                text.line_height = line_height;
            }
            if let Some(width) = patch.width {
                text.width = width;
            }
        }

        self.commit()
    }

    /// Rotate by `degrees`. The angle stays within (-360, 360).
    pub fn rotate(&mut self, id: ObjectId, degrees: f32) -> Result<f32, SceneError> {
        finite("degrees", Some(degrees))?;
        let object = self.scene.get_mut(id)?;
        object.transform.angle = (object.transform.angle + degrees) % 360.0;
        let angle = object.transform.angle;
        self.commit()?;
        Ok(angle)
    }

    /// Restore the transform the object was created with.
    pub fn reset_transform(&mut self, id: ObjectId) -> Result<(), SceneError> {
        let object = self.scene.get_mut(id)?;
        object.transform = object.initial;
        self.commit()
    }

    pub fn set_visibility(&mut self, id: ObjectId, visible: bool) -> Result<bool, SceneError> {
        self.scene.get_mut(id)?.visible = visible;
        self.commit()?;
        Ok(visible)
    }

    pub fn toggle_visibility(&mut self, id: ObjectId) -> Result<bool, SceneError> {
        let visible = !self.scene.get(id)?.visible;
        self.set_visibility(id, visible)
    }

    pub fn delete(&mut self, id: ObjectId) -> Result<(), SceneError> {
        self.scene.remove(id)?;
        self.commit()
    }

    /// Move a layer between display positions (0 = topmost).
    pub fn move_layer(&mut self, from: usize, to: usize) -> Result<(), SceneError> {
        self.scene.move_layer(from, to)?;
        if from != to {
            self.commit()?;
        }
        Ok(())
    }

    /// Remove every object and switch the filters off.
    ///
    /// Assets stay so undo can bring cleared images back.
    pub fn clear(&mut self) -> Result<(), SceneError> {
        self.scene.clear_objects();
        self.scene.filters = FilterState::default();
        self.commit()
    }

    /// Replace existing placeholders with the template's layout.
    ///
    /// Images and text boxes already in the scene are kept.
    pub fn apply_template(&mut self, name: &str) -> Result<Vec<ObjectId>, SceneError> {
        let template =
            templates::find(name).ok_or_else(|| SceneError::UnknownTemplate(name.to_string()))?;
        let layout = template.layout(&self.scene.canvas);

        let removed = self.scene.remove_where(SceneObject::is_placeholder);
        let mut added = Vec::with_capacity(layout.placeholders.len() + layout.texts.len());
        for p in &layout.placeholders {
            added.push(self.push_object(
                "Placeholder",
                Transform::at(p.left, p.top),
                ObjectKind::Placeholder(PlaceholderObject {
                    width: p.width,
                    height: p.height,
                }),
            ));
        }
        for t in &layout.texts {
            let mut text = TextObject::new(
                t.text,
                &self.settings.default_family,
                t.font_size,
                self.settings.default_width,
            );
            text.text_align = t.align;
            added.push(self.push_object("Text", Transform::at(t.left, t.top), ObjectKind::Text(text)));
        }

        self.commit()?;
        tracing::debug!(template = name, removed, added = added.len(), "Applied template");
        Ok(added)
    }

    /// Replace a placeholder with an image fitted inside it.
    ///
    /// The image takes the placeholder's stacking position and center.
    pub fn fill_placeholder(&mut self, id: ObjectId, bytes: Vec<u8>) -> Result<ObjectId, SceneError> {
        let placeholder = self.scene.get(id)?;
        if !placeholder.is_placeholder() {
            return Err(SceneError::NotPlaceholder(id));
        }
        let (pw, ph) = placeholder.scaled_size();
        let Transform {
            left, top, angle, ..
        } = placeholder.transform;

        let asset = ImageAsset::probe(bytes)?;
        let (kind, width, height) = self.image_kind(asset);
        let scale = (pw / width as f32).min(ph / height as f32);
        let transform = Transform {
            angle,
            ..Transform::at(left, top).scaled(scale)
        };

        let new_id = self.scene.next_object_id();
        self.scene
            .replace(id, SceneObject::new(new_id, "Image", transform, kind))?;
        self.commit()?;
        tracing::debug!(placeholder = %id, object = %new_id, scale, "Filled placeholder");
        Ok(new_id)
    }

    /// Switch a text box between horizontal and vertical layout.
    ///
    /// Returns false if the box already had that direction.
    pub fn set_text_direction(
        &mut self,
        id: ObjectId,
        direction: TextDirection,
    ) -> Result<bool, SceneError> {
        let object = self.scene.get_mut(id)?;
        let ObjectKind::Text(text) = &mut object.kind else {
            return Err(SceneError::NotText(id));
        };
        if !text.set_direction(direction) {
            return Ok(false);
        }
        if direction == TextDirection::Vertical {
            object.transform.angle = 0.0;
        }
        self.commit()?;
        Ok(true)
    }

    /// Set the export filters; dither is dropped unless grayscale is on.
    pub fn set_filters(&mut self, grayscale: bool, dither: bool) -> FilterState {
        self.scene.filters = FilterState::constrained(grayscale, dither);
        self.updated_at = Utc::now();
        self.scene.filters
    }

    pub fn undo(&mut self) -> Result<bool, SceneError> {
        let Some(snapshot) = self.history.undo() else {
            return Ok(false);
        };
        self.scene.restore(snapshot)?;
        self.touch();
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool, SceneError> {
        let Some(snapshot) = self.history.redo() else {
            return Ok(false);
        };
        self.scene.restore(snapshot)?;
        self.touch();
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Raster for the current revision, if one was stored.
    pub fn cached_raster(&self) -> Option<Arc<FilteredRaster>> {
        match &self.raster {
            Some((revision, raster)) if *revision == self.revision => Some(raster.clone()),
            _ => None,
        }
    }

    /// Remember the raster rendered for `revision`. Stale rasters are ignored.
    pub fn store_raster(&mut self, revision: u64, raster: Arc<FilteredRaster>) {
        if revision == self.revision {
            self.raster = Some((revision, raster));
        }
    }

    /// Replay a scene document. Image paths resolve against `base_dir`.
    pub fn apply_document(
        &mut self,
        document: &SceneDocument,
        base_dir: &Path,
    ) -> Result<(), SceneError> {
        if let Some(name) = &document.template {
            self.apply_template(name)?;
        }

        for layer in &document.layers {
            let (id, style) = match layer {
                DocumentLayer::Image {
                    path,
                    overlay,
                    placeholder,
                    style,
                } => {
                    let full = base_dir.join(path);
                    let bytes = fs::read(&full).map_err(|e| {
                        tracing::error!(path = %full.display(), %e, "Failed to read image");
                        e
                    })?;
                    let slot = if *placeholder {
                        self.lowest_placeholder()
                    } else {
                        None
                    };
                    let id = match slot {
                        Some(slot) => self.fill_placeholder(slot, bytes)?,
                        None if *overlay => self.add_overlay(bytes)?,
                        None => {
                            if *placeholder {
                                tracing::warn!(path = %path.display(), "No placeholder left, adding image on top");
                            }
                            self.add_image(bytes)?
                        }
                    };
                    (id, style)
                }
                DocumentLayer::Text {
                    text,
                    direction,
                    style,
                } => {
                    let id = self.add_text(Some(text))?;
                    if *direction == TextDirection::Vertical {
                        self.set_text_direction(id, *direction)?;
                    }
                    (id, style)
                }
            };
            if !style.is_empty() {
                self.update_object(id, style)?;
            }
        }

        self.set_filters(document.filters.grayscale, document.filters.dither);
        Ok(())
    }

    fn lowest_placeholder(&self) -> Option<ObjectId> {
        self.scene
            .objects()
            .iter()
            .find(|o| o.is_placeholder())
            .map(|o| o.id)
    }
}

fn invalid(field: &'static str, reason: &str) -> SceneError {
    SceneError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

fn finite(field: &'static str, value: Option<f32>) -> Result<(), SceneError> {
    match value {
        Some(v) if !v.is_finite() => Err(invalid(field, "must be a finite number")),
        _ => Ok(()),
    }
}

fn positive(field: &'static str, value: Option<f32>) -> Result<(), SceneError> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(invalid(field, "must be positive")),
        _ => Ok(()),
    }
}

fn non_zero(field: &'static str, value: Option<f32>) -> Result<(), SceneError> {
    match value {
        Some(v) if !v.is_finite() || v == 0.0 => Err(invalid(field, "must be non-zero")),
        _ => Ok(()),
    }
}
