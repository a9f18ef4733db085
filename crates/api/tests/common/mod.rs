#![allow(dead_code)]

use std::future::Future;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;
use tower::ServiceExt;

use roombrief_api::config::{ServerConfig, StoreBackend};
use roombrief_api::router::build_app_router;
use roombrief_api::session::Session;
use roombrief_api::state::AppState;
use roombrief_api::ws::WsManager;
use roombrief_db::{MemoryStore, ProjectStore, Subscription};
use roombrief_genai::Advisor;

pub const BOUNDARY: &str = "roombrief-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        max_upload_bytes: 25 * 1024 * 1024,
        store_backend: StoreBackend::Memory,
        database_url: None,
    }
}

/// A running app over an in-memory store.
///
/// Holds the store subscription so snapshots keep flowing into the session
/// for the lifetime of the test.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub session: Session,
    _subscription: Subscription,
}

/// Build the full application router with all middleware layers.
///
/// The advisor has no API key, so advice endpoints return fallback text.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let memory = Arc::new(MemoryStore::new());
    let store: Arc<dyn ProjectStore> = memory.clone();
    let ws_manager = Arc::new(WsManager::new());
    let session = Session::new(Arc::clone(&store), Arc::clone(&ws_manager));
    let subscription = session.start_subscription(Arc::clone(&store));

    let state = AppState {
        store,
        session: session.clone(),
        advisor: Advisor::disabled("English"),
        config: Arc::new(config.clone()),
        ws_manager,
    };

    TestApp {
        router: build_app_router(state, &config),
        store: memory,
        session,
        _subscription: subscription,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response<Body> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_multipart(&self, uri: &str, files: &[(&str, Vec<u8>)]) -> Response<Body> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(files)))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// POST a UI action and return the parsed response body.
    pub async fn act(&self, action: Value) -> Value {
        let response = self.post_json("/api/v1/session/actions", action).await;
        assert!(
            response.status().is_success(),
            "action failed with {}",
            response.status()
        );
        body_json(response).await
    }

    /// Re-read the session until `done` holds for its view, or panic.
    pub async fn wait_for_session<F>(&self, mut done: F) -> Value
    where
        F: FnMut(&Value) -> bool,
    {
        for _ in 0..100 {
            let json = body_json(self.get("/api/v1/session").await).await;
            if done(&json["data"]) {
                return json;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("session never reached the expected state");
    }
}

/// Parse the response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll an async condition until it holds, or panic.
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition never held");
}

/// Encode a solid-colour PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([90, 140, 200]));
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .unwrap();
    cursor.into_inner()
}

/// Build a `multipart/form-data` body with one `files` part per entry.
pub fn multipart_body(files: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, bytes) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\n\
                 Content-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
