//! In-process HTTP server for exercising the client without a backend.
//!
//! Routes are matched on method and path (query strings are ignored).
//! Unmatched requests get a 404 with a JSON message. Every request is
//! recorded so tests can assert on what was sent.
//!
//! ```ignore
//! let server = MockServer::builder()
//!     .route("GET", "/user/feed", MockResponse::json(200, json!([])))
//!     .start()
//!     .await;
//! let client = ApiClient::new(&server.url())?;
//! ```

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Canned response for one route
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: u16,
    body: String,
    content_type: &'static str,
    headers: Vec<(String, String)>,
    delay: Option<Duration>,
}

impl MockResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            content_type: "application/json",
            headers: Vec::new(),
            delay: None,
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: "text/plain",
            headers: Vec::new(),
            delay: None,
        }
    }

    /// Wait before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A request the server received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug)]
struct Route {
    method: String,
    path: String,
    /// `None` answers forever
    remaining: Option<usize>,
    response: MockResponse,
}

#[derive(Debug, Default)]
struct ServerState {
    routes: Vec<Route>,
    requests: Vec<RecordedRequest>,
}

impl ServerState {
    fn respond(&mut self, method: &str, path: &str) -> MockResponse {
        let route = self.routes.iter_mut().find(|route| {
            route.method.eq_ignore_ascii_case(method)
                && route.path == path
                && route.remaining != Some(0)
        });
        match route {
            Some(route) => {
                if let Some(remaining) = route.remaining.as_mut() {
                    *remaining -= 1;
                }
                route.response.clone()
            }
            None => MockResponse::json(
                404,
                serde_json::json!({ "message": format!("No route for {method} {path}") }),
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct MockServerBuilder {
    routes: Vec<Route>,
}

impl MockServerBuilder {
    /// Answer every `method path` request with `response`
    pub fn route(mut self, method: &str, path: &str, response: MockResponse) -> Self {
        self.routes.push(Route {
            method: method.to_string(),
            path: path.to_string(),
            remaining: None,
            response,
        });
        self
    }

    /// Answer the first `times` matching requests with `response`; later
    /// requests fall through to the next matching route.
    pub fn route_times(
        mut self,
        method: &str,
        path: &str,
        times: usize,
        response: MockResponse,
    ) -> Self {
        self.routes.push(Route {
            method: method.to_string(),
            path: path.to_string(),
            remaining: Some(times),
            response,
        });
        self
    }

    /// Bind to an ephemeral local port and start serving.
    ///
    /// Panics if the port cannot be bound; this type only exists for tests.
    pub async fn start(self) -> MockServer {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        let state = Arc::new(Mutex::new(ServerState {
            routes: self.routes,
            requests: Vec::new(),
        }));

        let app = Router::new()
            .fallback(handle_request)
            .with_state(Arc::clone(&state));
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                warn!("Mock server stopped: {}", e);
            }
        });

        debug!("Mock server listening on {}", addr);
        MockServer {
            addr,
            state,
            handle,
        }
    }
}

/// Running mock server; stops accepting connections when dropped
#[derive(Debug)]
pub struct MockServer {
    addr: SocketAddr,
    state: Arc<Mutex<ServerState>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub fn builder() -> MockServerBuilder {
        MockServerBuilder::default()
    }

    /// Base URL to hand to `ApiClient::new`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests received for `method path`
    pub fn hits(&self, method: &str, path: &str) -> usize {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.method.eq_ignore_ascii_case(method) && r.path == path)
            .count()
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Every request lands here; routing happens against the recorded table.
async fn handle_request(
    State(state): State<Arc<Mutex<ServerState>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let response = {
        let mut state = state.lock();
        let response = state.respond(method.as_str(), &path);
        state.requests.push(RecordedRequest {
            method: method.to_string(),
            path,
            body: String::from_utf8_lossy(&body).into_owned(),
            headers: headers
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.to_string(), value.to_string()))
                })
                .collect(),
        });
        response
    };

    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }
    response.into_response()
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("Skipping invalid mock header {}", name),
            }
        }
        response
    }
}
