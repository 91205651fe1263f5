#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use notes_api::store::{MemoryStore, NoteStore, User, UserStore};
use notes_api::{AppState, app::router::build_router};
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    app: Router,
    pub store: MemoryStore,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let state = AppState::new(Arc::new(store.clone()), Arc::new(store.clone()));

        Self {
            app: build_router(state),
            store,
        }
    }

    /// Router over caller-supplied stores; `store` stays an unused empty memory store.
    pub fn with_stores(notes: Arc<dyn NoteStore>, users: Arc<dyn UserStore>) -> Self {
        Self {
            app: build_router(AppState::new(notes, users)),
            store: MemoryStore::new(),
        }
    }

    pub fn seed_user(&self, username: &str) -> User {
        self.store.insert_user(username)
    }

    pub async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        self.request_json(Method::GET, path, None).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request_json(Method::POST, path, Some(body)).await
    }

    pub async fn patch_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request_json(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request_json(Method::DELETE, path, Some(body)).await
    }

    pub async fn delete_without_body(&self, path: &str) -> (StatusCode, Value) {
        self.request_json(Method::DELETE, path, None).await
    }

    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let (status, bytes) = self.request(Method::GET, path, None).await;
        let text = String::from_utf8(bytes).expect("response is not valid utf-8 text");
        (status, text)
    }

    /// Send a raw body with a JSON content type.
    pub async fn send_raw_json(&self, method: Method, path: &str, raw: &str) -> StatusCode {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw.to_string()))
            .expect("failed to build request");
        let response = self
            .app
            .clone()
            .oneshot(req)
            .await
            .expect("request execution failed");
        response.status()
    }

    async fn request_json(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = self.request(method, path, body).await;

        if bytes.is_empty() {
            return (status, Value::Null);
        }

        let value = serde_json::from_slice(&bytes).expect("response is not valid json");
        (status, value)
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut req_builder = Request::builder().method(method).uri(path);

        let body = match body {
            Some(body) => {
                req_builder = req_builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&body).expect("failed to serialize request body"))
            }
            None => Body::empty(),
        };

        let req = req_builder.body(body).expect("failed to build request");
        let response = self
            .app
            .clone()
            .oneshot(req)
            .await
            .expect("request execution failed");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("failed to read response body");

        (status, bytes.to_vec())
    }
}

pub fn message(body: &Value) -> Option<&str> {
    body.get("message").and_then(Value::as_str)
}
