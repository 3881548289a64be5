//! Integration tests for Shop Panel.
//!
//! The admin router is driven in-process with `tower::ServiceExt::oneshot`
//! while a `mockito` server stands in for both the Shopify Admin API and the
//! staged upload storage.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shop-panel-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use secrecy::SecretString;
use serde_json::Value;
use shop_panel_admin::{
    config::{AdminConfig, ShopifyAdminConfig, UploadConfig},
    routes,
    state::AppState,
};
use tower::ServiceExt;

/// GraphQL endpoint path for the API version the tests configure.
pub const GRAPHQL_PATH: &str = "/admin/api/2026-01/graphql.json";

/// Prefix of REST endpoint paths.
pub const REST_PREFIX: &str = "/admin/api/2026-01";

/// Multipart boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "shop-panel-test-boundary";

/// Admin configuration pointed at `store`, usually a mock server origin.
#[must_use]
pub fn test_config(store: &str) -> AdminConfig {
    AdminConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        shopify: ShopifyAdminConfig {
            store: store.to_string(),
            api_version: "2026-01".to_string(),
            access_token: SecretString::from("shpat_integration_token"),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(5),
        },
        upload: UploadConfig::default(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
        tls: None,
    }
}

/// The full application router for `config`.
///
/// # Panics
///
/// Panics if the Shopify client cannot be built.
#[must_use]
pub fn app(config: AdminConfig) -> Router {
    #[allow(clippy::expect_used)]
    let state = AppState::new(config).expect("failed to build app state");
    routes::router(state)
}

/// Send one request and return the status with the JSON body.
///
/// An empty or non-JSON body comes back as a JSON string of the raw text.
///
/// # Panics
///
/// Panics if the router fails or the body cannot be read.
#[allow(clippy::expect_used)]
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");

    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

/// A JSON request.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("invalid request")
}

/// A request without a body.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("invalid request")
}

/// A file part for [`multipart_body`].
pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub content: &'a [u8],
}

/// Encode text fields and an optional file as `multipart/form-data`.
#[must_use]
pub fn multipart_body(fields: &[(&str, &str)], file: Option<&FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.field, file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.content);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// A multipart upload request.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("invalid request")
}
