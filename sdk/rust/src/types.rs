//! Type definitions for the Flowkey SDK

use serde::{Deserialize, Serialize};

/// Body posted to the premium endpoint. Exactly one field is set.
#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct PremiumRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<&'a str>,
}

/// Successful (200) answer from the premium endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PremiumResponse {
    pub ok: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Outcome of re-validating the stored token at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PremiumStatus {
    /// Server confirmed the stored token
    Active,
    /// No token stored
    Inactive,
    /// Server rejected the token; it has been removed from storage
    Revoked { reason: Option<String> },
    /// Server could not be asked. The token is kept for the next attempt.
    Unverified { message: String },
}

impl PremiumStatus {
    /// Whether premium content should be unlocked right now.
    pub fn is_active(&self) -> bool {
        matches!(self, PremiumStatus::Active)
    }
}
