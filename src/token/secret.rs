use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Size of secrets produced by [`SigningSecret::generate`] (256 bits).
const GENERATED_SECRET_SIZE: usize = 32;

/// Shared HMAC key used to sign and verify entitlement tokens.
///
/// Rotating it invalidates every outstanding token. The key never appears in
/// `Debug` output.
#[derive(Clone)]
pub struct SigningSecret {
    key: Vec<u8>,
}

impl SigningSecret {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    /// Generate a new random secret (for initial setup).
    /// Returns the secret as a URL-safe base64 string, ready to paste into
    /// `PREMIUM_SECRET`.
    pub fn generate() -> String {
        use rand::RngCore;
        use rand::rngs::OsRng;
        let mut key = [0u8; GENERATED_SECRET_SIZE];
        OsRng.fill_bytes(&mut key);
        URL_SAFE_NO_PAD.encode(key)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}
