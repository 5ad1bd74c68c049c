use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Payload of a premium entitlement token.
///
/// Field names are camelCase on the wire so tokens stay readable by the
/// browser client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementClaims {
    pub premium: bool,
    pub issued_at: i64,  // Unix seconds
    pub expires_at: i64, // issued_at + validity window
}

impl EntitlementClaims {
    /// Claim granting premium from `now` until `now + validity`.
    pub fn premium(now: i64, validity: Duration) -> Self {
        Self {
            premium: true,
            issued_at: now,
            expires_at: now + validity.num_seconds(),
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now > self.expires_at
    }
}
