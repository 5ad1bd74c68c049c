//! Signed entitlement tokens.
//!
//! A token is `base64url(header) . base64url(payload) . base64url(hmac)` with
//! an HMAC-SHA256 signature over the first two segments. Verification is a
//! pure function of the token, the shared secret and the current time, so no
//! server-side session state is kept.

mod claims;
mod secret;
mod signing;

pub use claims::*;
pub use secret::SigningSecret;
pub use signing::*;
