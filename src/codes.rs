//! Allow-list of redeemable premium codes.
//!
//! Codes are pre-shared secrets configured out-of-band. Redemption is
//! unlimited and idempotent: there is no usage tracking and no per-code expiry.

use subtle::{Choice, ConstantTimeEq};

#[derive(Clone, Default)]
pub struct CodeAllowList {
    codes: Vec<String>,
}

impl CodeAllowList {
    /// Parse a comma-separated list, trimming entries and dropping empty ones.
    pub fn parse(raw: &str) -> Self {
        Self::from_codes(raw.split(','))
    }

    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes = codes
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        Self { codes }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Exact, case-sensitive match of the trimmed candidate.
    ///
    /// Every entry is compared so the time taken does not depend on which
    /// entry (if any) matched.
    pub fn contains(&self, candidate: &str) -> bool {
        let candidate = candidate.trim().as_bytes();
        if candidate.is_empty() {
            return false;
        }

        self.codes
            .iter()
            .fold(Choice::from(0), |found, code| {
                found | code.as_bytes().ct_eq(candidate)
            })
            .into()
    }
}

impl std::fmt::Debug for CodeAllowList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeAllowList")
            .field("len", &self.codes.len())
            .finish()
    }
}
