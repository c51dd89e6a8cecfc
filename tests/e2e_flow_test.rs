//! End-to-end flow tests covering complete user scenarios.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{assert_jpeg, assert_ok, assert_status, fixtures, TestApp};
use inkcard::models::{AppConfig, SceneDocument};
use inkcard::rendering::SvgRenderer;
use inkcard::services::{ExportService, SceneEditor};
use serde_json::Value;

#[tokio::test]
async fn test_complete_card_flow() {
    let app = TestApp::new();

    // Step 1: New scene with a layout
    let scene = app.create_scene().await;
    let response = app
        .post_json(
            &format!("/api/scenes/{scene}/template"),
            r#"{"name": "top-image-bottom-text"}"#,
        )
        .await;
    assert_ok(&response);
    let created: Value = response.json();
    let placeholder = created["ids"][0].as_u64().unwrap();
    let caption = created["ids"][1].as_u64().unwrap();

    // Step 2: Drop a photo into the slot
    let response = app
        .post_bytes(
            &format!("/api/scenes/{scene}/objects/{placeholder}/fill"),
            fixtures::gradient_png(640, 480),
        )
        .await;
    assert_status(&response, StatusCode::CREATED);

    // Step 3: Edit the caption
    let response = app
        .patch_json(
            &format!("/api/scenes/{scene}/objects/{caption}"),
            r#"{"text": "Greetings", "bold": true}"#,
        )
        .await;
    assert_ok(&response);

    // Step 4: Preview in color, then print-ready
    let color = app
        .get(&format!("/api/scenes/{scene}/export.jpg?inline=true"))
        .await;
    assert_jpeg(&color);

    app.put_json(
        &format!("/api/scenes/{scene}/filters"),
        r#"{"grayscale": true, "dither": true}"#,
    )
    .await;
    let printed = app.get(&format!("/api/scenes/{scene}/export.jpg")).await;
    assert_jpeg(&printed);
    assert_ne!(color.header("etag"), printed.header("etag"));

    let image = fixtures::decode(printed.bytes());
    assert_eq!(image.dimensions(), (480, 800));
    let p = image.get_pixel(240, 360);
    let spread = p.0.iter().max().unwrap() - p.0.iter().min().unwrap();
    assert!(spread <= 3, "expected gray, got {p:?}");

    let summary = app.summary(&scene).await;
    let kinds: Vec<&str> = summary["layers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["text", "image"]);
}

#[tokio::test]
async fn test_undo_restores_export() {
    let app = TestApp::new();
    let scene = app.create_scene().await;
    let path = format!("/api/scenes/{scene}/export.jpg");

    app.add_image(&scene, fixtures::png(200, 200, [0, 0, 255, 255]))
        .await;
    let before = app.get(&path).await;
    assert_jpeg(&before);

    app.add_image(&scene, fixtures::png(50, 50, [255, 255, 0, 255]))
        .await;
    let after = app.get(&path).await;
    assert_ne!(before.header("etag"), after.header("etag"));

    app.post_empty(&format!("/api/scenes/{scene}/undo")).await;
    let undone = app.get(&path).await;
    assert_eq!(before.header("etag"), undone.header("etag"));
}

#[test]
fn test_render_document_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("photo.png"),
        fixtures::png(400, 400, [200, 30, 30, 255]),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("badge.jpg"),
        fixtures::jpeg(40, 40, [0, 0, 0]),
    )
    .unwrap();

    let document = SceneDocument::from_json(
        r#"{
            "template": "fullscreen-image",
            "filters": { "grayscale": true, "dither": true },
            "layers": [
                { "type": "image", "path": "photo.png", "placeholder": true },
                { "type": "image", "path": "badge.jpg", "overlay": true },
                { "type": "text", "text": "Hi", "style": { "font_size": 30 } }
            ]
        }"#,
    )
    .unwrap();

    let config = AppConfig::default();
    let mut editor = SceneEditor::from_config(&config).unwrap();
    editor.apply_document(&document, dir.path()).unwrap();

    let kinds: Vec<String> = editor.layers().into_iter().map(|l| l.kind).collect();
    assert_eq!(kinds, vec!["text", "image", "image"]);
    assert!(editor.filters().dither);

    let exporter = ExportService::new(Arc::new(SvgRenderer::new()), &config.export);
    let image = exporter.export_scene(editor.scene()).unwrap();
    assert_eq!((image.width, image.height), (480, 800));

    let out = dir.path().join("card.jpg");
    std::fs::write(&out, &image.bytes).unwrap();
    let decoded = fixtures::decode(&std::fs::read(&out).unwrap());
    assert_eq!(decoded.dimensions(), (480, 800));
}

#[test]
fn test_document_with_missing_image_fails() {
    let dir = tempfile::tempdir().unwrap();
    let document =
        SceneDocument::from_json(r#"{ "layers": [ { "type": "image", "path": "gone.png" } ] }"#)
            .unwrap();

    let mut editor = SceneEditor::from_config(&AppConfig::default()).unwrap();
    assert!(editor.apply_document(&document, dir.path()).is_err());
}
