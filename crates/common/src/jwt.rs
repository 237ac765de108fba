//! JWT utilities shared by the casting agency services.
//!
//! This module provides the token-shape plumbing that runs before any
//! cryptographic verification:
//! - Size limit for DoS prevention
//! - Structural check (three non-empty dot-separated segments)
//! - Key ID extraction from the token header
//! - Fail-closed expiry validation
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - A token whose `exp` equals the current time is already expired
//! - Error messages are intentionally generic to prevent information leakage

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use thiserror::Error;

/// Maximum allowed JWT size in bytes (8KB).
///
/// Tokens larger than this are rejected before any base64 decode or
/// signature verification. Typical tokens are a few hundred bytes; the
/// limit leaves room for large permission sets while bounding the work an
/// unauthenticated caller can force.
pub const MAX_JWT_SIZE_BYTES: usize = 8192; // 8KB

/// Errors that can occur during pre-verification token checks.
///
/// Note: messages are intentionally generic. Detailed information is
/// logged at debug level for troubleshooting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token size exceeds maximum allowed.
    #[error("The access token is invalid or expired")]
    TokenTooLarge,

    /// Token format is invalid (not a valid JWT structure).
    #[error("The access token is invalid or expired")]
    MalformedToken,

    /// Token is missing a usable `kid` header.
    #[error("The access token is invalid or expired")]
    MissingKid,

    /// Token `exp` claim is at or before the current time.
    #[error("The access token is invalid or expired")]
    TokenExpired,
}

/// Extract the `kid` (key ID) from a JWT header without verifying the
/// signature.
///
/// Also enforces the structural contract: the token must be at most
/// [`MAX_JWT_SIZE_BYTES`] and consist of exactly three non-empty
/// dot-separated segments, the first of which decodes to a JSON object
/// with a non-empty string `kid`.
///
/// # Security
///
/// This function does NOT validate the token signature. The `kid` value
/// must only be used to look up a verification key in a trusted key set,
/// and the token MUST still be verified with that key.
///
/// # Errors
///
/// - `TokenTooLarge` - token exceeds the size limit
/// - `MalformedToken` - wrong segment count, empty segment, bad base64,
///   or invalid header JSON
/// - `MissingKid` - header has no string-valued, non-empty `kid`
pub fn extract_kid(token: &str) -> Result<String, JwtValidationError> {
    // Size check first, before any decoding work.
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtValidationError::TokenTooLarge);
    }

    // JWT format: header.payload.signature, every segment non-empty.
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
        tracing::debug!(
            target: "common.jwt",
            parts = parts.len(),
            "Token rejected: invalid JWT format"
        );
        return Err(JwtValidationError::MalformedToken);
    }

    let header_part = parts.first().ok_or(JwtValidationError::MalformedToken)?;
    let header_bytes = URL_SAFE_NO_PAD.decode(header_part).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode JWT header base64");
        JwtValidationError::MalformedToken
    })?;

    let header: serde_json::Value = serde_json::from_slice(&header_bytes).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to parse JWT header JSON");
        JwtValidationError::MalformedToken
    })?;

    // Reject empty kid values for defense-in-depth.
    let kid = header
        .get("kid")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .ok_or(JwtValidationError::MissingKid)?;

    Ok(kid)
}

/// Validate the `exp` (expiry) claim with zero leeway.
///
/// A token whose `exp` is exactly the current time is treated as expired:
/// a credential is valid strictly before its expiry instant.
///
/// # Errors
///
/// Returns `JwtValidationError::TokenExpired` if `exp` is at or before the
/// current time.
pub fn validate_exp(exp: i64) -> Result<(), JwtValidationError> {
    let now = chrono::Utc::now().timestamp();
    validate_exp_at(exp, now)
}

/// Deterministic expiry validation against an explicit `now` timestamp.
///
/// Prefer [`validate_exp`] in production code. This variant exists so that
/// the boundary condition can be unit-tested without wall-clock dependence.
pub fn validate_exp_at(exp: i64, now: i64) -> Result<(), JwtValidationError> {
    if exp <= now {
        tracing::debug!(
            target: "common.jwt",
            exp = exp,
            now = now,
            "Token rejected: expired"
        );
        return Err(JwtValidationError::TokenExpired);
    }

    Ok(())
}

/// Decode an Ed25519 public key from a JWK `x` field (base64url format).
///
/// The `x` field of an OKP (Octet Key Pair) JWK contains the raw public
/// key in base64url encoding without padding.
///
/// # Errors
///
/// Returns `base64::DecodeError` if the base64url content cannot be
/// decoded.
pub fn decode_ed25519_public_key_jwk(x_b64url: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(x_b64url)
}
