use std::env;

use axum::http::HeaderValue;
use chrono::Duration;
use thiserror::Error;

use crate::codes::CodeAllowList;
use crate::token::SigningSecret;

pub const DEFAULT_TOKEN_VALIDITY_DAYS: i64 = 365;
const MAX_TOKEN_VALIDITY_DAYS: i64 = 3650;
const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{0} contains no usable entries")]
    Empty(&'static str),

    #[error("Invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Everything the premium endpoint needs. Built once at startup and shared
/// read-only across requests.
#[derive(Debug, Clone)]
pub struct EntitlementConfig {
    pub secret: SigningSecret,
    pub codes: CodeAllowList,
    pub token_validity: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub dev_mode: bool,
    /// Browser origins allowed to call the API cross-origin (empty = CORS off)
    pub cors_allowed_origins: Vec<HeaderValue>,
    pub max_body_bytes: usize,
    pub entitlements: EntitlementConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dev_mode = lookup("FLOWKEY_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or("PORT", lookup("PORT"), 8888u16)?;
        let max_body_bytes = parse_or(
            "MAX_BODY_BYTES",
            lookup("MAX_BODY_BYTES"),
            DEFAULT_MAX_BODY_BYTES,
        )?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(|origin| {
                if origin == "*" {
                    return Err(ConfigError::Invalid {
                        key: "CORS_ALLOWED_ORIGINS",
                        reason: "wildcard origin is not allowed, list origins explicitly".into(),
                    });
                }
                HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                    key: "CORS_ALLOWED_ORIGINS",
                    reason: format!("{}: {}", origin, e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            host,
            port,
            dev_mode,
            cors_allowed_origins,
            max_body_bytes,
            entitlements: EntitlementConfig::from_lookup(&lookup)?,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl EntitlementConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("PREMIUM_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("PREMIUM_SECRET"))?;

        let codes = CodeAllowList::parse(
            &lookup("PREMIUM_CODES").ok_or(ConfigError::Missing("PREMIUM_CODES"))?,
        );
        if codes.is_empty() {
            return Err(ConfigError::Empty("PREMIUM_CODES"));
        }

        let days = parse_or(
            "PREMIUM_TOKEN_VALIDITY_DAYS",
            lookup("PREMIUM_TOKEN_VALIDITY_DAYS"),
            DEFAULT_TOKEN_VALIDITY_DAYS,
        )?;
        if !(1..=MAX_TOKEN_VALIDITY_DAYS).contains(&days) {
            return Err(ConfigError::Invalid {
                key: "PREMIUM_TOKEN_VALIDITY_DAYS",
                reason: format!("must be between 1 and {}", MAX_TOKEN_VALIDITY_DAYS),
            });
        }

        Ok(Self {
            secret: SigningSecret::new(secret),
            codes,
            token_validity: Duration::days(days),
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}
