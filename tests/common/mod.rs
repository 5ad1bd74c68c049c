//! Test utilities and fixtures for Flowkey integration tests

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

pub use flowkey::app::build_app;
pub use flowkey::config::Config;
pub use flowkey::token::{self, EntitlementClaims, SigningSecret, TokenError};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_CODE: &str = "NOR-TEST-2025";
pub const SECOND_CODE: &str = "VIP-GUEST";

/// Path the deployed planner client posts to
pub const PREMIUM_PATH: &str = "/.netlify/functions/validate-premium";

pub const ONE_DAY: i64 = 86400;
pub const ONE_YEAR: i64 = 365 * ONE_DAY;

/// Build a config from explicit variables on top of the test defaults.
pub fn test_config_with(overrides: &[(&str, &str)]) -> Config {
    let lookup = |key: &str| {
        if let Some((_, v)) = overrides.iter().find(|(k, _)| *k == key) {
            return Some(v.to_string());
        }
        match key {
            "PREMIUM_SECRET" => Some(TEST_SECRET.to_string()),
            "PREMIUM_CODES" => Some(format!("{}, {}", TEST_CODE, SECOND_CODE)),
            _ => None,
        }
    };
    Config::from_lookup(lookup).expect("Failed to build test config")
}

pub fn test_config() -> Config {
    test_config_with(&[])
}

pub fn test_app() -> Router {
    build_app(&test_config())
}

pub fn test_secret() -> SigningSecret {
    SigningSecret::new(TEST_SECRET)
}

pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Sign a premium claim with arbitrary timestamps using the test secret.
pub fn sign_claims(issued_at: i64, expires_at: i64) -> String {
    let claims = EntitlementClaims {
        premium: true,
        issued_at,
        expires_at,
    };
    token::encode(&claims, &test_secret()).expect("Failed to sign test claims")
}

/// Send a request with an optional raw body and return (status, JSON body).
pub async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response should be valid JSON")
    };
    (status, json)
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(&body.to_string())).await
}

/// Redeem `code` against a fresh test app and return the issued token.
pub async fn redeem(code: &str) -> String {
    let body = serde_json::json!({ "code": code });
    let (status, json) = post_json(test_app(), PREMIUM_PATH, &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true, "redeeming {:?} should succeed", code);
    json["token"]
        .as_str()
        .expect("successful redemption should return a token")
        .to_string()
}
