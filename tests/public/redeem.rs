//! Tests for code redemption on the premium endpoint.
//!
//! A code from the configured allow-list is exchanged for a signed token that
//! the client stores and later re-submits.

use axum::http::StatusCode;
use serde_json::json;

#[path = "../common/mod.rs"]
mod common;
use common::*;

#[tokio::test]
async fn test_valid_code_returns_signed_token() {
    let before = now();
    let (status, json) = post_json(test_app(), PREMIUM_PATH, &json!({ "code": TEST_CODE })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert!(json.get("reason").is_none(), "successful redemption has no reason");

    let token = json["token"].as_str().expect("token should be returned");
    assert_eq!(token.split('.').count(), 3, "token should be header.payload.signature");

    let claims: EntitlementClaims = token::verify(token, &test_secret()).unwrap();
    assert!(claims.premium);
    assert!(claims.issued_at >= before && claims.issued_at <= now());
    assert_eq!(
        claims.expires_at - claims.issued_at,
        ONE_YEAR,
        "default validity window is 365 days"
    );
}

#[tokio::test]
async fn test_redeemed_token_verifies_on_next_request() {
    let token = redeem(TEST_CODE).await;

    let (status, json) = post_json(test_app(), PREMIUM_PATH, &json!({ "token": token })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert!(json.get("token").is_none(), "verification never mints a new token");
}

#[tokio::test]
async fn test_every_configured_code_is_redeemable() {
    for code in [TEST_CODE, SECOND_CODE] {
        let token = redeem(code).await;
        assert!(token::verify::<EntitlementClaims>(&token, &test_secret()).is_ok());
    }
}

#[tokio::test]
async fn test_code_is_trimmed_before_lookup() {
    let token = redeem("  NOR-TEST-2025\t").await;
    assert!(token::verify::<EntitlementClaims>(&token, &test_secret()).is_ok());
}

#[tokio::test]
async fn test_unknown_code_is_denied_not_an_error() {
    let (status, json) = post_json(test_app(), PREMIUM_PATH, &json!({ "code": "WRONG" })).await;

    assert_eq!(status, StatusCode::OK, "denial is a business outcome, not a fault");
    assert_eq!(json, json!({ "ok": false }));
}

#[tokio::test]
async fn test_code_match_is_exact_and_case_sensitive() {
    for code in ["nor-test-2025", "NOR-TEST", "NOR-TEST-2025X", "NOR-TEST-2025, VIP-GUEST"] {
        let (status, json) = post_json(test_app(), PREMIUM_PATH, &json!({ "code": code })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], false, "{:?} must not match", code);
        assert!(json.get("token").is_none());
    }
}

#[tokio::test]
async fn test_whitespace_only_code_is_denied() {
    let (status, json) = post_json(test_app(), PREMIUM_PATH, &json!({ "code": "   " })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], false);
}

#[tokio::test]
async fn test_redemption_is_repeatable() {
    let first = redeem(TEST_CODE).await;
    let second = redeem(TEST_CODE).await;

    for token in [&first, &second] {
        assert!(
            token::verify::<EntitlementClaims>(token, &test_secret()).is_ok(),
            "codes are not single-use"
        );
    }
}

#[tokio::test]
async fn test_configured_validity_window() {
    let app = build_app(&test_config_with(&[("PREMIUM_TOKEN_VALIDITY_DAYS", "30")]));

    let (_, json) = post_json(app, PREMIUM_PATH, &json!({ "code": TEST_CODE })).await;
    let claims: EntitlementClaims =
        token::verify(json["token"].as_str().unwrap(), &test_secret()).unwrap();

    assert_eq!(claims.expires_at - claims.issued_at, 30 * ONE_DAY);
}

#[tokio::test]
async fn test_all_premium_routes_redeem() {
    for path in [
        "/premium",
        "/.netlify/functions/validate-premium",
        "/.netlify/functions/verify-premium",
    ] {
        let (status, json) = post_json(test_app(), path, &json!({ "code": TEST_CODE })).await;
        assert_eq!(status, StatusCode::OK, "{} should accept POST", path);
        assert_eq!(json["ok"], true);
    }
}

#[tokio::test]
async fn test_token_signed_with_other_deployment_secret_is_rejected() {
    let token = redeem(TEST_CODE).await;
    let other = build_app(&test_config_with(&[("PREMIUM_SECRET", "rotated-secret")]));

    let (status, json) = post_json(other, PREMIUM_PATH, &json!({ "token": token })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], false);
    assert_eq!(json["reason"], "bad_signature");
}
