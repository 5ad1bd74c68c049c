//! Premium entitlement client

use std::sync::Arc;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::error::{FlowkeyError, Result, map_status_to_error_code};
use crate::storage::{MemoryStorage, StorageAdapter, keys};
use crate::types::{PremiumRequest, PremiumResponse, PremiumStatus};

/// Endpoint path the planner has always posted to
pub const DEFAULT_ENDPOINT: &str = "/.netlify/functions/validate-premium";

/// Configuration options for the premium client
#[derive(Clone, Default)]
pub struct PremiumClientOptions {
    /// Server origin, e.g. "https://planner.example.com" (required)
    pub base_url: String,
    /// Endpoint path (default: [`DEFAULT_ENDPOINT`])
    pub endpoint: Option<String>,
    /// Custom storage adapter (default: MemoryStorage)
    pub storage: Option<Arc<dyn StorageAdapter>>,
}

impl std::fmt::Debug for PremiumClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PremiumClientOptions")
            .field("base_url", &self.base_url)
            .field("endpoint", &self.endpoint)
            .field("storage", &"<storage>")
            .finish()
    }
}

/// Client for redeeming premium codes and re-validating the stored token.
///
/// The token is the only persisted credential. It is cleared only when the
/// server explicitly rejects it; a failed request leaves it in place.
///
/// # Example
/// ```rust,ignore
/// use flowkey_sdk::{PremiumClient, PremiumClientOptions};
///
/// let client = PremiumClient::new(PremiumClientOptions {
///     base_url: "https://planner.example.com".into(),
///     ..Default::default()
/// })?;
///
/// // On startup
/// if client.restore().await.is_active() {
///     unlock_premium_tracks();
/// }
///
/// // When the user enters a code
/// if client.redeem("NOR-TEST-2025").await? {
///     unlock_premium_tracks();
/// }
/// ```
pub struct PremiumClient {
    url: String,
    storage: Arc<dyn StorageAdapter>,
    http: HttpClient,
}

impl PremiumClient {
    pub fn new(options: PremiumClientOptions) -> Result<Self> {
        let base_url = options.base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(FlowkeyError::validation("base_url is required"));
        }

        let endpoint = options
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let url = format!("{}/{}", base_url, endpoint.trim_start_matches('/'));

        let storage: Arc<dyn StorageAdapter> =
            options.storage.unwrap_or_else(|| Arc::new(MemoryStorage::new()));

        let http = HttpClient::builder()
            .user_agent(concat!("flowkey-sdk-rust/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FlowkeyError::network(e.to_string()))?;

        Ok(Self { url, storage, http })
    }

    /// Exchange a premium code for a token.
    ///
    /// Returns `Ok(true)` and stores the token when the code was accepted,
    /// `Ok(false)` when it was not. Transport and server faults are errors.
    pub async fn redeem(&self, code: &str) -> Result<bool> {
        let code = code.trim();
        if code.is_empty() {
            return Err(FlowkeyError::validation("Premium code is empty"));
        }

        let response = self
            .post(&PremiumRequest {
                code: Some(code),
                token: None,
            })
            .await?;

        if !response.ok {
            return Ok(false);
        }

        match response.token {
            Some(token) => {
                self.storage.set(keys::PREMIUM_TOKEN, &token);
                Ok(true)
            }
            None => Err(FlowkeyError::network("Server accepted the code but sent no token")),
        }
    }

    /// Re-submit the stored token, typically at application start.
    pub async fn restore(&self) -> PremiumStatus {
        self.storage.remove(keys::LEGACY_PREMIUM_FLAG);

        let Some(token) = self.token() else {
            return PremiumStatus::Inactive;
        };

        let request = PremiumRequest {
            code: None,
            token: Some(token.as_str()),
        };

        match self.post(&request).await {
            Ok(response) if response.ok => PremiumStatus::Active,
            Ok(response) => {
                tracing::debug!("Stored premium token rejected: {:?}", response.reason);
                self.clear();
                PremiumStatus::Revoked {
                    reason: response.reason,
                }
            }
            Err(e) => {
                // Keep the token: failing to reach the server says nothing
                // about whether it is still valid.
                tracing::debug!("Premium token not verified: {}", e);
                PremiumStatus::Unverified { message: e.message }
            }
        }
    }

    /// The stored token, if any.
    pub fn token(&self) -> Option<String> {
        self.storage
            .get(keys::PREMIUM_TOKEN)
            .filter(|t| !t.is_empty())
    }

    /// Forget the stored token.
    pub fn clear(&self) {
        self.storage.remove(keys::PREMIUM_TOKEN);
    }

    async fn post(&self, body: &PremiumRequest<'_>) -> Result<PremiumResponse> {
        let response = self
            .http
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| FlowkeyError::network(e.to_string()))?;

        let status = response.status().as_u16();

        if !response.status().is_success() {
            #[derive(Deserialize)]
            struct ErrorResponse {
                error: Option<String>,
            }

            let error_body = response
                .json::<ErrorResponse>()
                .await
                .unwrap_or(ErrorResponse { error: None });

            let message = match &error_body.error {
                Some(err) => err.clone(),
                None => format!("Request failed: {}", status),
            };
            let code = map_status_to_error_code(status, error_body.error.as_deref());

            return Err(FlowkeyError::with_status(code, message, status));
        }

        response
            .json()
            .await
            .map_err(|e| FlowkeyError::network(e.to_string()))
    }
}

impl std::fmt::Debug for PremiumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PremiumClient")
            .field("url", &self.url)
            .field("has_token", &self.token().is_some())
            .finish()
    }
}
