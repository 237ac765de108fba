//! Decoded token claims.
//!
//! Contains the claims extracted from validated tokens. The `sub` field is
//! redacted in Debug output to keep caller identifiers out of logs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Claims of a validated bearer token.
///
/// Returned by the authorizer only after every validation step succeeded.
/// `permissions` is an `Option` because the check that it is present is
/// itself a pipeline step; on the success path it is always `Some`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user or client identifier) - redacted in Debug output.
    #[serde(default)]
    pub sub: String,

    /// Token issuer.
    pub iss: String,

    /// Token audience.
    pub aud: String,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Issued-at timestamp (Unix epoch seconds), when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Permission scopes granted to this token (e.g. `"get:actors"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

/// Custom Debug implementation that redacts the `sub` field.
impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("iss", &self.iss)
            .field("aud", &self.aud)
            .field("exp", &self.exp)
            .field("iat", &self.iat)
            .field("permissions", &self.permissions)
            .finish()
    }
}

impl Claims {
    /// Check whether the token carries a specific permission.
    ///
    /// Exact string match; no wildcard or hierarchy semantics.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|p| p == permission)
    }
}
