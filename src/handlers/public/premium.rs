use axum::extract::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::EntitlementConfig;
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::state::AppState;
use crate::token::{self, EntitlementClaims};

/// Request body for the premium endpoint. Clients send exactly one field.
///
/// Only string members of a JSON object are read. Any other JSON value, or a
/// member of another type, counts as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "Value")]
pub struct PremiumRequest {
    /// Redeemable code typed by the user
    pub code: Option<String>,
    /// Previously issued token the client stored
    pub token: Option<String>,
}

impl From<Value> for PremiumRequest {
    fn from(body: Value) -> Self {
        let Value::Object(fields) = body else {
            return Self::default();
        };
        let string_field = |name: &str| fields.get(name).and_then(Value::as_str).map(str::to_owned);

        Self {
            code: string_field("code"),
            token: string_field("token"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PremiumResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl PremiumResponse {
    fn granted(token: Option<String>) -> Self {
        Self {
            ok: true,
            token,
            reason: None,
        }
    }

    fn denied(reason: Option<&'static str>) -> Self {
        Self {
            ok: false,
            token: None,
            reason,
        }
    }
}

/// POST /premium - Redeem a code for a token, or verify a stored token.
///
/// A non-empty `token` takes precedence and never mints a new token. Denials
/// (unknown code, bad or expired token) are 200 with `ok: false`.
pub async fn redeem_or_verify(
    State(state): State<AppState>,
    Json(req): Json<PremiumRequest>,
) -> Result<Json<PremiumResponse>> {
    let entitlements = &state.entitlements;

    if let Some(token) = req.token.as_deref().filter(|t| !t.is_empty()) {
        return Ok(Json(verify_token(token.trim(), entitlements)));
    }

    let code = req
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or(AppError::CodeRequired)?;

    redeem_code(code, entitlements).map(Json)
}

fn verify_token(token: &str, entitlements: &EntitlementConfig) -> PremiumResponse {
    match token::verify::<EntitlementClaims>(token, &entitlements.secret) {
        Ok(claims) if claims.premium => PremiumResponse::granted(None),
        Ok(_) => {
            tracing::debug!("Premium token verified but carries no premium claim");
            PremiumResponse::denied(Some("not_premium"))
        }
        Err(e) => {
            tracing::debug!("Premium token rejected: {}", e.reason());
            PremiumResponse::denied(Some(e.reason()))
        }
    }
}

fn redeem_code(code: &str, entitlements: &EntitlementConfig) -> Result<PremiumResponse> {
    if !entitlements.codes.contains(code) {
        tracing::info!("Premium code redemption denied");
        return Ok(PremiumResponse::denied(None));
    }

    let claims = EntitlementClaims::premium(Utc::now().timestamp(), entitlements.token_validity);
    let token = token::encode(&claims, &entitlements.secret)?;

    tracing::info!("Premium code redeemed, token valid until {}", claims.expires_at);
    Ok(PremiumResponse::granted(Some(token)))
}

/// Fallback for every method other than POST on the premium routes.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
