// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use canna_connect::config::Config;
use canna_connect::session::SessionStore;
use canna_connect::AppState;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    /// Body parsed as JSON, when it is JSON
    pub body: Option<Value>,
    pub raw_body: String,
}

#[derive(Default)]
struct MockState {
    /// Scripted replies per "METHOD /path"; the last one repeats.
    replies: Mutex<HashMap<String, VecDeque<(u16, Value)>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process stand-in for the backend, bound to an ephemeral port.
pub struct MockBackend {
    pub base_url: String,
    state: Arc<MockState>,
}

#[allow(dead_code)]
impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    /// Queue a reply for `method path` (path without the `/api` prefix).
    pub fn on(&self, method: &str, path: &str, status: u16, body: Value) {
        self.state
            .replies
            .lock()
            .unwrap()
            .entry(format!("{} /api{}", method, path))
            .or_default()
            .push_back((status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests for `method path` (path without the `/api` prefix).
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        let full = format!("/api{}", path);
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == full)
            .collect()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_str(&body).ok(),
        raw_body: body,
    });

    let key = format!("{} {}", method, uri.path());
    let reply = {
        let mut replies = state.replies.lock().unwrap();
        match replies.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        }
    };

    let (status, body) =
        reply.unwrap_or((404, serde_json::json!({ "error": "Not found" })));
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

/// App state pointed at `backend` with an in-memory session.
#[allow(dead_code)]
pub fn test_state(backend: &MockBackend) -> AppState {
    let config = Config {
        api_base_url: backend.base_url.clone(),
        ..Config::default()
    };
    AppState::new(config, SessionStore::in_memory()).expect("Failed to build app state")
}

/// Member JSON as served by the backend.
#[allow(dead_code)]
pub fn user_json(id: u64, name: &str) -> Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "role": "Grower",
        "city": "Denver",
        "state": "CO",
        "profile_image": null
    })
}
