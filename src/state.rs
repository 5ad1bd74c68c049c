use std::sync::Arc;

use crate::config::EntitlementConfig;

/// Application state shared by every request. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Signing secret, code allow-list and validity window
    pub entitlements: Arc<EntitlementConfig>,
}

impl AppState {
    pub fn new(entitlements: EntitlementConfig) -> Self {
        Self {
            entitlements: Arc::new(entitlements),
        }
    }
}
