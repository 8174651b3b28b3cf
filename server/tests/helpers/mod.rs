//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full axum
//! router, plus shortcuts for operator requests, JSON bodies and the common
//! confirm-a-token round trip.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{self, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use natioid_server::api::{create_router, AppState};
use natioid_server::config::Config;
use natioid_server::operator::OPERATOR_HEADER;
use tower::ServiceExt;
use uuid::Uuid;

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
///
/// Each app owns fresh in-memory state seeded with the demo records.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub operator: Uuid,
}

impl TestApp {
    /// Create a new test app with the test configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default_for_test())
    }

    /// Create a test app with a custom config.
    pub fn with_config(config: Config) -> Self {
        let state = AppState::new(config);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            operator: Uuid::new_v4(),
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// Send a citizen request with an optional JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        self.oneshot(json_request(Self::request(method, uri), body))
            .await
    }

    /// Send an operator request as this app's operator.
    pub async fn send_admin(
        &self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let builder = Self::request(method, uri).header(OPERATOR_HEADER, self.operator.to_string());
        self.oneshot(json_request(builder, body)).await
    }

    /// Resolve an operator confirmation token.
    pub async fn resolve_admin(&self, token: &str, confirm: bool) -> Response<Body> {
        self.send_admin(
            Method::POST,
            &format!("/api/admin/confirmations/{token}"),
            Some(serde_json::json!({ "confirm": confirm })),
        )
        .await
    }

    /// Resolve a citizen confirmation token.
    pub async fn resolve_citizen(&self, token: &str, confirm: bool) -> Response<Body> {
        self.send(
            Method::POST,
            &format!("/api/confirmations/{token}"),
            Some(serde_json::json!({ "confirm": confirm })),
        )
        .await
    }

    /// Current status of a record as reported by the admin API.
    pub async fn status_of(&self, id: Uuid) -> String {
        let resp = self
            .send_admin(Method::GET, &format!("/api/admin/applications/{id}"), None)
            .await;
        assert_eq!(resp.status(), 200);
        body_to_json(resp).await["status"]
            .as_str()
            .expect("status is a string")
            .to_string()
    }
}

fn json_request(builder: http::request::Builder, body: Option<serde_json::Value>) -> Request<Body> {
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Parse a response body as JSON.
pub async fn body_to_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        let preview = String::from_utf8_lossy(&bytes);
        panic!("Failed to parse response as JSON: {e}\nBody: {preview}")
    })
}

/// Extract the confirmation token from a `202 Accepted` response.
pub async fn confirmation_token(response: Response<Body>) -> String {
    assert_eq!(response.status(), 202, "expected a confirmation");
    let json = body_to_json(response).await;
    json["token"]
        .as_str()
        .or_else(|| json["confirmation"]["token"].as_str())
        .expect("response carries a token")
        .to_string()
}

/// Image reference body for the capture step.
pub fn image(filename: &str) -> serde_json::Value {
    serde_json::json!({
        "uri": format!("blob:captures/{filename}"),
        "filename": filename,
        "size_bytes": 48_000
    })
}
