#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use chemistry_cms::{config::AppConfig, db, services::images::FileSystemImageStore, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

/// Application wired to a private in-memory SQLite database and a temporary
/// image directory.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub image_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Builds the app after letting the caller adjust the configuration.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let image_dir = tempfile::tempdir().expect("temp image dir");

        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // One connection keeps every query on the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.upload_dir = image_dir
            .path()
            .join("upload")
            .to_string_lossy()
            .into_owned();
        adjust(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let store = Arc::new(FileSystemImageStore::new(cfg.upload_dir.clone()));
        let state = AppState::new(Arc::new(pool), cfg, store);
        let router = chemistry_cms::build_router(state.clone());

        Self {
            router,
            state,
            image_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Send a request with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).expect("serialize request body"))
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("build request")).await
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri, None).await
    }

    pub async fn get_json(&self, uri: &str) -> Value {
        let response = self.get(uri).await;
        assert_eq!(response.status(), 200, "GET {uri} failed");
        response_json(response).await
    }

    /// POSTs `body` to `uri`, asserts 201 and returns the created JSON.
    pub async fn create(&self, uri: &str, body: Value) -> Value {
        let response = self.request(Method::POST, uri, Some(body)).await;
        assert_eq!(response.status(), 201, "create at {uri} failed");
        response_json(response).await
    }

    pub async fn create_category(&self, name: &str, parent: Option<i64>) -> i64 {
        let mut body = json!({
            "categoryName": name,
            "categoryStatus": "ENABLED",
        });
        if let Some(parent) = parent {
            body["parentCategory"] = json!({ "id": parent });
        }
        self.create("/api/categories", body).await["id"]
            .as_i64()
            .expect("category id")
    }

    pub async fn create_post(&self, body: Value) -> i64 {
        self.create("/api/blog-posts", body).await["id"]
            .as_i64()
            .expect("post id")
    }
}

pub async fn response_bytes(response: Response) -> bytes::Bytes {
    body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes")
}

pub async fn response_json(response: Response) -> Value {
    let bytes = response_bytes(response).await;
    serde_json::from_slice(&bytes).expect("json response")
}

pub fn header_value<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Ids of a JSON array of entities, in order.
pub fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .expect("json array")
        .iter()
        .map(|item| item["id"].as_i64().expect("id"))
        .collect()
}
