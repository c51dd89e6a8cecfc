//! Proportional layouts of placeholders and text boxes.
//!
//! Every position and size is a fraction of the canvas, so a template fits
//! any canvas. Pixel sizes are rounded; centers are not.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{CanvasSpec, TextAlign};

/// A template slot for an image.
#[derive(Debug, Clone, Copy)]
struct Slot {
    cx: f32,
    cy: f32,
    width: f32,
    height: f32,
}

/// A template text box.
#[derive(Debug, Clone, Copy)]
struct Caption {
    cx: f32,
    cy: f32,
    size: f32,
    align: TextAlign,
    text: &'static str,
}

#[derive(Debug)]
pub struct Template {
    pub name: &'static str,
    pub description: &'static str,
    slots: &'static [Slot],
    captions: &'static [Caption],
}

/// Placeholder geometry in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderLayout {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Text box geometry in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub left: f32,
    pub top: f32,
    pub font_size: f32,
    pub align: TextAlign,
    pub text: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateLayout {
    pub placeholders: Vec<PlaceholderLayout>,
    pub texts: Vec<TextLayout>,
}

// Margins of the fullscreen slot, about 20px and 40px on the 480x800 canvas
const FULLSCREEN_MARGIN_X: f32 = 0.04166;
const FULLSCREEN_MARGIN_Y: f32 = 0.05;

pub const TEMPLATES: &[Template] = &[
    Template {
        name: "top-image-bottom-text",
        description: "Large image slot above a centered caption",
        slots: &[Slot {
            cx: 0.5,
            cy: 0.45,
            width: 0.875,
            height: 0.675,
        }],
        captions: &[Caption {
            cx: 0.5,
            cy: 0.875,
            size: 0.035,
            align: TextAlign::Center,
            text: "Enter text here",
        }],
    },
    Template {
        name: "left-image-right-text",
        description: "Narrow image slot on the left, caption on the right",
        slots: &[Slot {
            cx: 0.3125,
            cy: 0.5,
            width: 0.5833,
            height: 0.875,
        }],
        captions: &[Caption {
            cx: 0.75,
            cy: 0.5,
            size: 0.0375,
            align: TextAlign::Left,
            text: "Caption",
        }],
    },
    Template {
        name: "center-text",
        description: "A single centered text box",
        slots: &[],
        captions: &[Caption {
            cx: 0.5,
            cy: 0.5,
            size: 0.045,
            align: TextAlign::Center,
            text: "Centered text",
        }],
    },
    Template {
        name: "fullscreen-image",
        description: "One image slot covering the canvas with a small margin",
        slots: &[Slot {
            cx: 0.5,
            cy: 0.5,
            width: 1.0 - 2.0 * FULLSCREEN_MARGIN_X,
            height: 1.0 - 2.0 * FULLSCREEN_MARGIN_Y,
        }],
        captions: &[],
    },
];

/// Look up a template by name.
pub fn find(name: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.name == name)
}

impl Template {
    /// Resolve the template against a canvas.
    pub fn layout(&self, canvas: &CanvasSpec) -> TemplateLayout {
        let cw = canvas.width as f32;
        let ch = canvas.height as f32;
        TemplateLayout {
            placeholders: self
                .slots
                .iter()
                .map(|s| PlaceholderLayout {
                    left: cw * s.cx,
                    top: ch * s.cy,
                    width: (cw * s.width).round(),
                    height: (ch * s.height).round(),
                })
                .collect(),
            texts: self
                .captions
                .iter()
                .map(|c| TextLayout {
                    left: cw * c.cx,
                    top: ch * c.cy,
                    font_size: (ch * c.size).round(),
                    align: c.align,
                    text: c.text,
                })
                .collect(),
        }
    }

    pub fn info(&self) -> TemplateInfo {
        TemplateInfo {
            name: self.name.to_string(),
            description: self.description.to_string(),
            placeholders: self.slots.len(),
            texts: self.captions.len(),
        }
    }
}

/// Template listing entry
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TemplateInfo {
    pub name: String,
    pub description: String,
    pub placeholders: usize,
    pub texts: usize,
}
