//! Scene to SVG document.
//!
//! Every printable object becomes a group translated to its center, then
//! rotated and scaled, with the content drawn centered on the origin.
//! Placeholders and hidden objects are skipped. Images are inlined as
//! base64 `data:` URIs so the document is self-contained.

use std::fmt::Write;

use crate::models::{
    FontStyle, FontWeight, ImageObject, ObjectKind, Scene, SceneObject, TextAlign, TextObject,
};

/// Ascent of the first line as a fraction of the font size.
const BASELINE_RATIO: f32 = 0.8;

/// Build the SVG for the printable part of a scene.
pub fn scene_to_svg(scene: &Scene) -> String {
    let canvas = scene.canvas;
    let mut svg = String::with_capacity(1024);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = canvas.width,
        h = canvas.height
    );
    let _ = write!(
        svg,
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        canvas.background
    );

    for object in scene.printable() {
        match &object.kind {
            ObjectKind::Image(image) => write_image(&mut svg, scene, object, image),
            ObjectKind::Text(text) => write_text(&mut svg, object, text),
            ObjectKind::Placeholder(_) => {}
        }
    }

    svg.push_str("</svg>");
    svg
}

fn open_group(svg: &mut String, object: &SceneObject) {
    let t = &object.transform;
    let _ = write!(
        svg,
        r#"<g transform="translate({} {}) rotate({}) scale({} {})">"#,
        t.left, t.top, t.angle, t.scale_x, t.scale_y
    );
}

fn write_image(svg: &mut String, scene: &Scene, object: &SceneObject, image: &ImageObject) {
    let Some(asset) = scene.asset(image.asset) else {
        tracing::warn!(object = %object.id, asset = %image.asset, "Image asset missing, skipping");
        return;
    };
    let (w, h) = (image.natural_width as f32, image.natural_height as f32);
    open_group(svg, object);
    let _ = write!(
        svg,
        r#"<image x="{}" y="{}" width="{w}" height="{h}" preserveAspectRatio="none" xlink:href="{}"/>"#,
        -w / 2.0,
        -h / 2.0,
        asset.data_uri()
    );
    svg.push_str("</g>");
}

fn write_text(svg: &mut String, object: &SceneObject, text: &TextObject) {
    let width = text.width;
    let height = text.height();
    let (anchor, x) = match text.text_align {
        TextAlign::Left => ("start", -width / 2.0),
        TextAlign::Center => ("middle", 0.0),
        TextAlign::Right => ("end", width / 2.0),
    };
    let weight = match text.font_weight {
        FontWeight::Normal => "normal",
        FontWeight::Bold => "bold",
    };
    let style = match text.font_style {
        FontStyle::Normal => "normal",
        FontStyle::Italic => "italic",
    };

    open_group(svg, object);
    let _ = write!(
        svg,
        r#"<text font-family="{}" font-size="{}" font-weight="{weight}" font-style="{style}" fill="{}" text-anchor="{anchor}" xml:space="preserve">"#,
        escape_xml(&font_family_list(&text.font_family)),
        text.font_size,
        escape_xml(&text.fill),
    );
    let line_step = text.font_size * text.line_height;
    let first_baseline = -height / 2.0 + text.font_size * BASELINE_RATIO;
    for (i, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let _ = write!(
            svg,
            r#"<tspan x="{x}" y="{}">{}</tspan>"#,
            first_baseline + i as f32 * line_step,
            escape_xml(line)
        );
    }
    svg.push_str("</text></g>");
}

/// Family list with a generic fallback.
fn font_family_list(family: &str) -> String {
    let cleaned: String = family.chars().filter(|c| !matches!(c, '\'' | '"')).collect();
    format!("'{}', sans-serif", cleaned.trim())
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
