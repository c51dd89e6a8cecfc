//! Integration tests for scene, object, layer, template and history endpoints.

mod common;

use axum::http::StatusCode;
use common::{assert_json_error, assert_ok, assert_status, fixtures, TestApp};
use serde_json::{json, Value};

#[tokio::test]
async fn test_scene_lifecycle() {
    let app = TestApp::new();

    let response = app.post_empty("/api/scenes").await;
    assert_status(&response, StatusCode::CREATED);
    let created: Value = response.json();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["width"], 480);
    assert_eq!(created["height"], 800);

    let summary = app.summary(&id).await;
    assert_eq!(summary["id"], id.as_str());
    assert_eq!(summary["revision"], 0);
    assert_eq!(summary["layers"], json!([]));
    assert_eq!(summary["filters"], json!({"grayscale": false, "dither": false}));
    assert_eq!(summary["can_undo"], false);
    assert_eq!(summary["can_redo"], false);

    let response = app.delete(&format!("/api/scenes/{id}")).await;
    assert_status(&response, StatusCode::NO_CONTENT);

    let response = app.get(&format!("/api/scenes/{id}")).await;
    assert_json_error(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_scene_returns_404() {
    let app = TestApp::new();

    assert_json_error(&app.get("/api/scenes/nope").await, StatusCode::NOT_FOUND);
    assert_json_error(&app.delete("/api/scenes/nope").await, StatusCode::NOT_FOUND);
    assert_json_error(
        &app.post_empty("/api/scenes/nope/texts").await,
        StatusCode::NOT_FOUND,
    );
    assert_json_error(
        &app.get("/api/scenes/nope/export.jpg").await,
        StatusCode::NOT_FOUND,
    );
}

#[tokio::test]
async fn test_scenes_are_independent() {
    let app = TestApp::new();
    let a = app.create_scene().await;
    let b = app.create_scene().await;
    assert_ne!(a, b);

    app.add_text(&a, "only in a").await;

    assert_eq!(app.summary(&a).await["layers"].as_array().unwrap().len(), 1);
    assert_eq!(app.summary(&b).await["layers"], json!([]));
}

#[tokio::test]
async fn test_add_text_defaults() {
    let app = TestApp::new();
    let scene = app.create_scene().await;

    // Empty body uses the default prompt
    let response = app.post_empty(&format!("/api/scenes/{scene}/texts")).await;
    assert_status(&response, StatusCode::CREATED);
    let view: Value = response.json();
    assert_eq!(view["kind"], "text");
    assert_eq!(view["visible"], true);
    assert_eq!(view["transform"]["left"], 240.0);
    assert_eq!(view["transform"]["top"], 400.0);

    let summary = app.summary(&scene).await;
    assert_eq!(summary["revision"], 1);
    assert_eq!(summary["can_undo"], true);
}

#[tokio::test]
async fn test_add_text_rejects_malformed_body() {
    let app = TestApp::new();
    let scene = app.create_scene().await;

    let response = app
        .post_json(&format!("/api/scenes/{scene}/texts"), "{not json")
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);
    assert_eq!(app.summary(&scene).await["layers"], json!([]));
}

#[tokio::test]
async fn test_upload_image_fits_canvas() {
    let app = TestApp::new();
    let scene = app.create_scene().await;

    let response = app
        .post_bytes(
            &format!("/api/scenes/{scene}/images"),
            fixtures::png(960, 400, [255, 0, 0, 255]),
        )
        .await;
    assert_status(&response, StatusCode::CREATED);
    let view: Value = response.json();
    assert_eq!(view["kind"], "image");
    assert_eq!(view["transform"]["scale_x"], 0.5);
    assert_eq!(view["transform"]["scale_y"], 0.5);
}

#[tokio::test]
async fn test_upload_overlay_uses_half_width() {
    let app = TestApp::new();
    let scene = app.create_scene().await;

    let response = app
        .post_bytes(
            &format!("/api/scenes/{scene}/images?overlay=true"),
            fixtures::png(120, 120, [0, 0, 255, 255]),
        )
        .await;
    assert_status(&response, StatusCode::CREATED);
    let view: Value = response.json();
    assert_eq!(view["name"], "Overlay");
    assert_eq!(view["transform"]["scale_x"], 2.0);
}

#[tokio::test]
async fn test_upload_garbage_is_rejected() {
    let app = TestApp::new();
    let scene = app.create_scene().await;

    let response = app
        .post_bytes(
            &format!("/api/scenes/{scene}/images"),
            b"definitely not an image".to_vec(),
        )
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);
    assert_eq!(app.summary(&scene).await["revision"], 0);
}

#[tokio::test]
async fn test_update_text_object() {
    let app = TestApp::new();
    let scene = app.create_scene().await;
    let oid = app.add_text(&scene, "Hello").await;

    let response = app
        .patch_json(
            &format!("/api/scenes/{scene}/objects/{oid}"),
            r##"{"text": "Hello world", "fill": "#FF0000", "font_size": 40, "left": 100}"##,
        )
        .await;
    assert_ok(&response);
    let view: Value = response.json();
    assert_eq!(view["transform"]["left"], 100.0);

    let response = app
        .patch_json(
            &format!("/api/scenes/{scene}/objects/{oid}"),
            r#"{"name": "Title"}"#,
        )
        .await;
    assert_ok(&response);
    assert_eq!(response.json::<Value>()["name"], "Title");
}

#[tokio::test]
async fn test_update_rejects_invalid_values() {
    let app = TestApp::new();
    let scene = app.create_scene().await;
    let oid = app.add_text(&scene, "Hello").await;
    let path = format!("/api/scenes/{scene}/objects/{oid}");

    assert_json_error(
        &app.patch_json(&path, r#"{"fill": "reddish"}"#).await,
        StatusCode::BAD_REQUEST,
    );
    assert_json_error(
        &app.patch_json(&path, r##"{"fill": "#+f+f+f"}"##).await,
        StatusCode::BAD_REQUEST,
    );
    assert_json_error(
        &app.patch_json(&path, r#"{"font_size": -3}"#).await,
        StatusCode::BAD_REQUEST,
    );
    assert_json_error(&app.patch_json(&path, "{}").await, StatusCode::BAD_REQUEST);

    // A failed patch changes nothing
    assert_eq!(app.summary(&scene).await["revision"], 1);
}

#[tokio::test]
async fn test_text_fields_on_image_rejected() {
    let app = TestApp::new();
    let scene = app.create_scene().await;
    let oid = app
        .add_image(&scene, fixtures::png(10, 10, [0, 0, 0, 255]))
        .await;

    let response = app
        .patch_json(
            &format!("/api/scenes/{scene}/objects/{oid}"),
            r#"{"text": "nope"}"#,
        )
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_object_returns_404() {
    let app = TestApp::new();
    let scene = app.create_scene().await;

    assert_json_error(
        &app.delete(&format!("/api/scenes/{scene}/objects/99")).await,
        StatusCode::NOT_FOUND,
    );
    assert_json_error(
        &app
            .post_json(
                &format!("/api/scenes/{scene}/objects/99/rotate"),
                r#"{"degrees": 90}"#,
            )
            .await,
        StatusCode::NOT_FOUND,
    );
}

#[tokio::test]
async fn test_rotate_and_reset() {
    let app = TestApp::new();
    let scene = app.create_scene().await;
    let oid = app.add_text(&scene, "spin").await;
    let rotate = format!("/api/scenes/{scene}/objects/{oid}/rotate");

    let view: Value = app.post_json(&rotate, r#"{"degrees": 300}"#).await.json();
    assert_eq!(view["transform"]["angle"], 300.0);

    let view: Value = app.post_json(&rotate, r#"{"degrees": 90}"#).await.json();
    assert_eq!(view["transform"]["angle"], 30.0);

    app.patch_json(
        &format!("/api/scenes/{scene}/objects/{oid}"),
        r#"{"left": 10, "top": 20, "scale": 3}"#,
    )
    .await;

    let response = app
        .post_empty(&format!("/api/scenes/{scene}/objects/{oid}/reset"))
        .await;
    assert_ok(&response);
    let view: Value = response.json();
    assert_eq!(view["transform"]["angle"], 0.0);
    assert_eq!(view["transform"]["left"], 240.0);
    assert_eq!(view["transform"]["top"], 400.0);
    assert_eq!(view["transform"]["scale_x"], 1.0);
}

#[tokio::test]
async fn test_visibility_set_and_toggle() {
    let app = TestApp::new();
    let scene = app.create_scene().await;
    let oid = app.add_text(&scene, "peekaboo").await;
    let path = format!("/api/scenes/{scene}/objects/{oid}/visibility");

    let view: Value = app.post_json(&path, r#"{"visible": false}"#).await.json();
    assert_eq!(view["visible"], false);

    // Empty body toggles
    let view: Value = app.post_empty(&path).await.json();
    assert_eq!(view["visible"], true);

    let view: Value = app.post_empty(&path).await.json();
    assert_eq!(view["visible"], false);

    let layers = &app.summary(&scene).await["layers"];
    assert_eq!(layers[0]["visible"], false);
}

#[tokio::test]
async fn test_text_direction() {
    let app = TestApp::new();
    let scene = app.create_scene().await;
    let oid = app.add_text(&scene, "縦書き").await;
    let path = format!("/api/scenes/{scene}/objects/{oid}/direction");

    app.post_json(
        &format!("/api/scenes/{scene}/objects/{oid}/rotate"),
        r#"{"degrees": 45}"#,
    )
    .await;

    let response = app.post_json(&path, r#"{"direction": "vertical"}"#).await;
    assert_ok(&response);
    assert_eq!(response.json::<Value>()["transform"]["angle"], 0.0);

    let response = app.post_json(&path, r#"{"direction": "horizontal"}"#).await;
    assert_ok(&response);

    let response = app.post_json(&path, r#"{"direction": "diagonal"}"#).await;
    assert!(response.status.is_client_error());
}

#[tokio::test]
async fn test_direction_on_image_rejected() {
    let app = TestApp::new();
    let scene = app.create_scene().await;
    let oid = app
        .add_image(&scene, fixtures::png(10, 10, [0, 0, 0, 255]))
        .await;

    let response = app
        .post_json(
            &format!("/api/scenes/{scene}/objects/{oid}/direction"),
            r#"{"direction": "vertical"}"#,
        )
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_object() {
    let app = TestApp::new();
    let scene = app.create_scene().await;
    let keep = app.add_text(&scene, "keep").await;
    let drop = app.add_text(&scene, "drop").await;

    let response = app
        .delete(&format!("/api/scenes/{scene}/objects/{drop}"))
        .await;
    assert_status(&response, StatusCode::NO_CONTENT);

    let layers = app.summary(&scene).await["layers"].clone();
    assert_eq!(layers.as_array().unwrap().len(), 1);
    assert_eq!(layers[0]["id"], keep);
}

#[tokio::test]
async fn test_move_layer() {
    let app = TestApp::new();
    let scene = app.create_scene().await;
    let a = app.add_text(&scene, "a").await;
    let b = app.add_text(&scene, "b").await;
    let c = app.add_text(&scene, "c").await;

    // Display order is topmost first
    let ids: Vec<u64> = app.summary(&scene).await["layers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![c, b, a]);

    let response = app
        .post_json(
            &format!("/api/scenes/{scene}/layers/move"),
            r#"{"from": 0, "to": 2}"#,
        )
        .await;
    assert_ok(&response);
    let layers: Value = response.json();
    let ids: Vec<u64> = layers
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![b, a, c]);
    assert_eq!(layers[2]["index"], 2);

    let response = app
        .post_json(
            &format!("/api/scenes/{scene}/layers/move"),
            r#"{"from": 5, "to": 0}"#,
        )
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_templates() {
    let app = TestApp::new();

    let response = app.get("/api/templates").await;
    assert_ok(&response);
    let templates: Value = response.json();
    let names: Vec<&str> = templates
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "top-image-bottom-text",
            "left-image-right-text",
            "center-text",
            "fullscreen-image"
        ]
    );
}

#[tokio::test]
async fn test_list_fonts() {
    let app = TestApp::new();

    let response = app.get("/api/fonts").await;
    assert_ok(&response);
    let fonts: Value = response.json();
    let fonts = fonts.as_array().unwrap();

    let families: Vec<&str> = fonts
        .iter()
        .map(|f| f["family"].as_str().unwrap())
        .collect();
    assert_eq!(families, vec!["Noto Sans", "Noto Serif", "DejaVu Sans"]);

    // Availability depends on the host's fonts, but is always reported
    for font in fonts {
        assert!(font["available"].is_boolean(), "{font}");
    }
    let defaults: Vec<&str> = fonts
        .iter()
        .filter(|f| f["default"] == true)
        .map(|f| f["family"].as_str().unwrap())
        .collect();
    assert_eq!(defaults, vec!["Noto Sans"]);
}

#[tokio::test]
async fn test_template_and_fill_placeholder() {
    let app = TestApp::new();
    let scene = app.create_scene().await;
    let photo = app
        .add_image(&scene, fixtures::png(10, 10, [0, 0, 0, 255]))
        .await;

    let response = app
        .post_json(
            &format!("/api/scenes/{scene}/template"),
            r#"{"name": "top-image-bottom-text"}"#,
        )
        .await;
    assert_ok(&response);
    let created: Value = response.json();
    let ids = created["ids"].as_array().unwrap();
    assert_eq!(ids.len(), 2);
    let placeholder = ids[0].as_u64().unwrap();

    let summary = app.summary(&scene).await;
    let kinds: Vec<&str> = summary["layers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["text", "placeholder", "image"]);

    // Applying again replaces the placeholder instead of stacking
    app.post_json(
        &format!("/api/scenes/{scene}/template"),
        r#"{"name": "fullscreen-image"}"#,
    )
    .await;
    let layers = app.summary(&scene).await["layers"].clone();
    let placeholders: Vec<&Value> = layers
        .as_array()
        .unwrap()
        .iter()
        .filter(|l| l["kind"] == "placeholder")
        .collect();
    assert_eq!(placeholders.len(), 1);
    let fullscreen = placeholders[0]["id"].as_u64().unwrap();
    assert_ne!(fullscreen, placeholder);

    let response = app
        .post_bytes(
            &format!("/api/scenes/{scene}/objects/{fullscreen}/fill"),
            fixtures::png(880, 1440, [0, 255, 0, 255]),
        )
        .await;
    assert_status(&response, StatusCode::CREATED);
    let filled: Value = response.json();
    assert_eq!(filled["kind"], "image");
    assert_eq!(filled["transform"]["scale_x"], 0.5);
    assert_ne!(filled["id"], fullscreen);

    // The original image is not a placeholder
    let response = app
        .post_bytes(
            &format!("/api/scenes/{scene}/objects/{photo}/fill"),
            fixtures::png(10, 10, [0, 0, 0, 255]),
        )
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_template_rejected() {
    let app = TestApp::new();
    let scene = app.create_scene().await;

    let response = app
        .post_json(
            &format!("/api/scenes/{scene}/template"),
            r#"{"name": "zigzag"}"#,
        )
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_filters_constrained() {
    let app = TestApp::new();
    let scene = app.create_scene().await;
    let path = format!("/api/scenes/{scene}/filters");

    let filters: Value = app
        .put_json(&path, r#"{"grayscale": false, "dither": true}"#)
        .await
        .json();
    assert_eq!(filters, json!({"grayscale": false, "dither": false}));

    let filters: Value = app
        .put_json(&path, r#"{"grayscale": true, "dither": true}"#)
        .await
        .json();
    assert_eq!(filters, json!({"grayscale": true, "dither": true}));

    let summary = app.summary(&scene).await;
    assert_eq!(summary["filters"], json!({"grayscale": true, "dither": true}));
    // Filters are not part of the edit history
    assert_eq!(summary["revision"], 0);
    assert_eq!(summary["can_undo"], false);
}

#[tokio::test]
async fn test_clear_scene() {
    let app = TestApp::new();
    let scene = app.create_scene().await;
    app.add_text(&scene, "one").await;
    app.add_text(&scene, "two").await;
    app.put_json(
        &format!("/api/scenes/{scene}/filters"),
        r#"{"grayscale": true}"#,
    )
    .await;

    let response = app.post_empty(&format!("/api/scenes/{scene}/clear")).await;
    assert_ok(&response);
    let summary: Value = response.json();
    assert_eq!(summary["layers"], json!([]));
    assert_eq!(summary["filters"], json!({"grayscale": false, "dither": false}));

    let history: Value = app
        .post_empty(&format!("/api/scenes/{scene}/undo"))
        .await
        .json();
    assert_eq!(history["changed"], true);
    assert_eq!(
        app.summary(&scene).await["layers"].as_array().unwrap().len(),
        2
    );
}

#[tokio::test]
async fn test_undo_redo() {
    let app = TestApp::new();
    let scene = app.create_scene().await;
    let undo = format!("/api/scenes/{scene}/undo");
    let redo = format!("/api/scenes/{scene}/redo");

    // Nothing to undo yet
    let history: Value = app.post_empty(&undo).await.json();
    assert_eq!(
        history,
        json!({"changed": false, "can_undo": false, "can_redo": false})
    );

    let oid = app.add_text(&scene, "first").await;
    app.post_json(
        &format!("/api/scenes/{scene}/objects/{oid}/rotate"),
        r#"{"degrees": 90}"#,
    )
    .await;

    let history: Value = app.post_empty(&undo).await.json();
    assert_eq!(
        history,
        json!({"changed": true, "can_undo": true, "can_redo": true})
    );
    assert_eq!(app.summary(&scene).await["layers"][0]["id"], oid);

    app.post_empty(&undo).await;
    assert_eq!(app.summary(&scene).await["layers"], json!([]));

    let history: Value = app.post_empty(&redo).await.json();
    assert_eq!(history["changed"], true);
    app.post_empty(&redo).await;

    let history: Value = app.post_empty(&redo).await.json();
    assert_eq!(
        history,
        json!({"changed": false, "can_undo": true, "can_redo": false})
    );

    // A new edit drops the redo branch
    app.post_empty(&undo).await;
    app.add_text(&scene, "branch").await;
    assert_eq!(app.summary(&scene).await["can_redo"], false);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    assert_ok(&response);
    assert_eq!(response.text(), "OK");
}
