//! # Flowkey SDK
//!
//! Client for the Flowkey premium entitlement service.
//!
//! The server issues a signed token when a premium code is redeemed. The
//! client stores that token and re-submits it on every start to decide
//! whether premium content is unlocked:
//!
//! - `redeem(code)` stores the token on success
//! - `restore()` re-validates the stored token
//! - a token the server rejects is cleared
//! - a token that could not be checked (offline, server fault) is kept
//!
//! ## Features
//!
//! - `native-storage` (default): File-based storage at a caller-chosen path
//! - `native-tls` (default): Use native TLS for HTTPS
//! - `rustls-tls`: Use rustls for HTTPS (alternative to native-tls)

pub mod client;
pub mod error;
pub mod storage;
pub mod types;

pub use client::{DEFAULT_ENDPOINT, PremiumClient, PremiumClientOptions};
pub use error::{FlowkeyError, FlowkeyErrorCode, Result};
pub use storage::{MemoryStorage, StorageAdapter, keys};
pub use types::PremiumStatus;

#[cfg(feature = "native-storage")]
pub use storage::FileStorage;
