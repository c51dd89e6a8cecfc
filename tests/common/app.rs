//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use inkcard::assets::AssetLoader;
use inkcard::server::{build_router, create_app_state, AppState};
use inkcard::services::InMemorySceneStore;

/// Test application with router and direct access to services
pub struct TestApp {
    router: axum::Router,
    pub store: Arc<InMemorySceneStore>,
}

impl TestApp {
    /// Create a new test application using the embedded config
    pub fn new() -> Self {
        let state = Self::create_state();

        // Keep references for test assertions
        let store = state.store.clone();

        // Build router using shared server module (same as production)
        let router = build_router(state);

        Self { router, store }
    }

    /// Create a test app and return the state for custom router configuration
    pub fn create_state() -> AppState {
        let asset_loader = Arc::new(AssetLoader::new(None, None));
        create_app_state(asset_loader).expect("Failed to create app state")
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a GET request with custom headers
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::get(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// Make a request with a JSON body
    pub async fn send_json(&self, method: &str, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    pub async fn post_json(&self, path: &str, body: &str) -> TestResponse {
        self.send_json("POST", path, body).await
    }

    pub async fn put_json(&self, path: &str, body: &str) -> TestResponse {
        self.send_json("PUT", path, body).await
    }

    pub async fn patch_json(&self, path: &str, body: &str) -> TestResponse {
        self.send_json("PATCH", path, body).await
    }

    /// Make a POST request without a body
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request(Request::post(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with raw bytes (image uploads)
    pub async fn post_bytes(&self, path: &str, bytes: Vec<u8>) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/octet-stream")
            .body(Body::from(bytes))
            .unwrap();
        self.request(request).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Request::delete(path).body(Body::empty()).unwrap())
            .await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Create a scene and return its ID
    pub async fn create_scene(&self) -> String {
        let response = self.post_empty("/api/scenes").await;
        assert_eq!(response.status, StatusCode::CREATED);

        let json: serde_json::Value = response.json();
        json["id"].as_str().unwrap().to_string()
    }

    /// Add a text box and return its object ID
    pub async fn add_text(&self, scene: &str, text: &str) -> u64 {
        let body = serde_json::json!({ "text": text }).to_string();
        let response = self
            .post_json(&format!("/api/scenes/{scene}/texts"), &body)
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json::<serde_json::Value>()["id"].as_u64().unwrap()
    }

    /// Upload an image and return its object ID
    pub async fn add_image(&self, scene: &str, bytes: Vec<u8>) -> u64 {
        let response = self
            .post_bytes(&format!("/api/scenes/{scene}/images"), bytes)
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json::<serde_json::Value>()["id"].as_u64().unwrap()
    }

    /// Fetch the scene summary
    pub async fn summary(&self, scene: &str) -> serde_json::Value {
        let response = self.get(&format!("/api/scenes/{scene}")).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        response.json()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a JPEG image
    pub fn is_jpeg(&self) -> bool {
        self.body.len() >= 2 && self.body[0..2] == [0xFF, 0xD8]
    }
}
