//! Casting agency service configuration.
//!
//! Configuration is loaded from environment variables. Issuer and audience
//! are required: token verification always checks both, there is no
//! lenient mode.

use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default signing-key cache TTL in seconds (5 minutes).
pub const DEFAULT_JWKS_CACHE_TTL_SECONDS: u64 = 300;

/// Maximum allowed signing-key cache TTL in seconds (1 hour).
///
/// Bounds misconfiguration: a very large TTL would delay pickup of key
/// rotations at the token issuer.
pub const MAX_JWKS_CACHE_TTL_SECONDS: u64 = 3600;

/// Casting agency service configuration.
///
/// Loaded from environment variables with sensible defaults where a
/// default is safe.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// URL to the token issuer's JWKS endpoint.
    pub jwks_url: String,

    /// Expected `iss` claim of incoming tokens.
    pub token_issuer: String,

    /// Expected `aud` claim of incoming tokens.
    pub token_audience: String,

    /// How long a fetched signing-key snapshot stays fresh.
    pub jwks_cache_ttl: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid JWKS cache TTL configuration: {0}")]
    InvalidJwksCacheTtl(String),
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// is out of range.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let jwks_url = vars
            .get("AUTH_JWKS_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("AUTH_JWKS_URL".to_string()))?
            .clone();

        let token_issuer = vars
            .get("AUTH_TOKEN_ISSUER")
            .ok_or_else(|| ConfigError::MissingEnvVar("AUTH_TOKEN_ISSUER".to_string()))?
            .clone();

        let token_audience = vars
            .get("AUTH_TOKEN_AUDIENCE")
            .ok_or_else(|| ConfigError::MissingEnvVar("AUTH_TOKEN_AUDIENCE".to_string()))?
            .clone();

        // Parse JWKS cache TTL with validation
        let ttl_seconds = if let Some(value_str) = vars.get("JWKS_CACHE_TTL_SECONDS") {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidJwksCacheTtl(format!(
                    "JWKS_CACHE_TTL_SECONDS must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidJwksCacheTtl(
                    "JWKS_CACHE_TTL_SECONDS must be greater than 0".to_string(),
                ));
            }

            if value > MAX_JWKS_CACHE_TTL_SECONDS {
                return Err(ConfigError::InvalidJwksCacheTtl(format!(
                    "JWKS_CACHE_TTL_SECONDS must not exceed {} seconds, got {}",
                    MAX_JWKS_CACHE_TTL_SECONDS, value
                )));
            }

            value
        } else {
            DEFAULT_JWKS_CACHE_TTL_SECONDS
        };

        Ok(Config {
            bind_address,
            jwks_url,
            token_issuer,
            token_audience,
            jwks_cache_ttl: Duration::from_secs(ttl_seconds),
        })
    }
}
