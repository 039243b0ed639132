//! In-process HTTP servers for client tests

use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::Router;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// One request as seen by a recording server
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: String,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

pub(crate) type Calls = Arc<Mutex<Vec<Recorded>>>;

/// Bind `router` on an ephemeral port and return its base URL
pub(crate) async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Server answering every request with `status` and a plain-text `body`
pub(crate) async fn serve_fixed(status: StatusCode, body: &'static str) -> (String, Calls) {
    serve_with(status, HeaderMap::new(), body.to_string()).await
}

/// Server answering every request with `status` and a JSON `body`
pub(crate) async fn serve_recording(status: StatusCode, body: serde_json::Value) -> (String, Calls) {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    serve_with(status, headers, body.to_string()).await
}

/// Server answering `201 Created` with a `Location` header
pub(crate) async fn serve_created(location: &'static str) -> (String, Calls) {
    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, HeaderValue::from_static(location));
    serve_with(StatusCode::CREATED, headers, String::new()).await
}

async fn serve_with(status: StatusCode, headers: HeaderMap, body: String) -> (String, Calls) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&calls);

    let router = Router::new().fallback(
        move |method: Method, uri: Uri, request_headers: HeaderMap, request_body: String| {
            let recorder = Arc::clone(&recorder);
            let headers = headers.clone();
            let body = body.clone();
            async move {
                let header_str = |name: header::HeaderName| {
                    request_headers
                        .get(name)
                        .and_then(|v: &HeaderValue| v.to_str().ok())
                        .map(str::to_string)
                };
                recorder.lock().unwrap().push(Recorded {
                    method: method.to_string(),
                    path: uri.path().to_string(),
                    query: uri.query().map(str::to_string),
                    body: request_body,
                    authorization: header_str(header::AUTHORIZATION),
                    user_agent: header_str(header::USER_AGENT),
                });
                (status, headers, body)
            }
        },
    );

    (serve(router).await, calls)
}
