//! In-process HTTP backend for client tests
//!
//! Serves canned responses keyed by `"METHOD /path"` and records every
//! request it receives.

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub(crate) struct SeenRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
    pub body: String,
}

impl SeenRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<HashMap<String, (u16, String)>>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

#[derive(Default)]
pub(crate) struct MockBuilder {
    routes: HashMap<String, (u16, String)>,
}

impl MockBuilder {
    pub fn respond(self, route: &str, status: u16, body: Value) -> Self {
        self.respond_raw(route, status, &body.to_string())
    }

    pub fn respond_raw(mut self, route: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert(route.to_string(), (status, body.to_string()));
        self
    }

    pub async fn spawn(self) -> MockServer {
        let state = MockState {
            routes: Arc::new(self.routes),
            seen: Arc::default(),
        };
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockServer {
            base_url: format!("http://{}/api/v1", addr),
            seen: state.seen,
        }
    }
}

pub(crate) struct MockServer {
    base_url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockServer {
    pub fn builder() -> MockBuilder {
        MockBuilder::default()
    }

    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };

    state.seen.lock().unwrap().push(SeenRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(String::from),
        authorization: header("authorization"),
        request_id: header("x-request-id"),
        body,
    });

    let key = format!("{} {}", method, uri.path());
    match state.routes.get(&key) {
        Some((status, body)) => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body.clone(),
        ),
        None => (
            StatusCode::NOT_FOUND,
            r#"{"detail":"Not Found"}"#.to_string(),
        ),
    }
}
