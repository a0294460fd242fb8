//! Router harness shared by handler tests.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::FromRef,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{app::build_app, auth::jwt::JwtKeys, db::memory::MemoryStore, state::AppState};

pub struct TestApp {
    pub router: Router,
    pub memory: Arc<MemoryStore>,
    pub keys: JwtKeys,
}

impl TestApp {
    pub fn new() -> Self {
        let memory = Arc::new(MemoryStore::default());
        let state = AppState::fake_with(memory.clone());
        let keys = JwtKeys::from_ref(&state);
        Self {
            router: build_app(state),
            memory,
            keys,
        }
    }

    /// Seed a user and return a bearer token for it.
    pub fn login_as(&self, email: &str) -> String {
        let user = self.memory.seed_user(email);
        self.keys.sign(&user).expect("sign test token")
    }
}

/// Fire one request; non-JSON bodies come back as a JSON string.
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(json) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => req.body(Body::empty()),
    }
    .expect("build request");

    let res = router.clone().oneshot(req).await.expect("infallible");
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}
