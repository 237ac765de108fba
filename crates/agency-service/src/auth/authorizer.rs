//! Token authorization pipeline.
//!
//! Validates a raw `Authorization` header value against a required
//! permission, in strict order, short-circuiting on the first failure:
//!
//! 1. Header presence
//! 2. `Bearer <token>` scheme check (case-sensitive, exactly two parts)
//! 3. Structural decode (three non-empty segments, usable `kid`)
//! 4. Key resolution against the cached JWKS snapshot
//! 5. EdDSA signature + issuer/audience verification
//! 6. Fail-closed expiry check (zero leeway)
//! 7. `permissions` claim presence
//! 8. Required-permission membership (exact match)
//!
//! # Security
//!
//! - Tokens are size-checked before parsing (DoS prevention)
//! - Only EdDSA (Ed25519) is accepted; `alg: none` and HMAC tokens fail
//! - Claims are returned only when every step succeeds

use crate::auth::claims::Claims;
use crate::auth::error::{AuthError, MalformedHeaderKind, TokenInvalidKind};
use crate::auth::jwks::{Jwk, JwksClient};
use crate::observability::metrics::record_auth_decision;
use common::jwt::{decode_ed25519_public_key_jwk, extract_kid, validate_exp};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tracing::instrument;

/// Token authorizer. Stateless per call except for the shared signing-key
/// cache inside the JWKS client.
pub struct Authorizer {
    /// JWKS client for resolving verification keys.
    jwks: Arc<JwksClient>,

    /// Expected `iss` claim.
    issuer: String,

    /// Expected `aud` claim.
    audience: String,
}

impl Authorizer {
    /// Create a new authorizer.
    pub fn new(jwks: Arc<JwksClient>, issuer: String, audience: String) -> Self {
        Self {
            jwks,
            issuer,
            audience,
        }
    }

    /// Authorize a request.
    ///
    /// Runs the full validation pipeline and returns the decoded claims on
    /// success. The caller supplies the endpoint's required permission;
    /// the authorizer never derives it.
    ///
    /// # Errors
    ///
    /// Returns a classified [`AuthError`]; see the module docs for the
    /// pipeline order and the error type for severity mapping.
    #[instrument(skip_all, name = "agency.auth.authorize", fields(permission = %required_permission))]
    pub async fn authorize(
        &self,
        header: Option<&str>,
        required_permission: &str,
    ) -> Result<Claims, AuthError> {
        let result = self.run_pipeline(header, required_permission).await;

        match &result {
            Ok(_) => record_auth_decision("granted"),
            Err(e) => record_auth_decision(e.metric_label()),
        }

        result
    }

    async fn run_pipeline(
        &self,
        header: Option<&str>,
        required_permission: &str,
    ) -> Result<Claims, AuthError> {
        // 1. Header presence
        let header = header.ok_or_else(|| {
            tracing::debug!(target: "agency.auth", "Missing Authorization header");
            AuthError::MissingHeader
        })?;

        // 2. Scheme check
        let token = extract_bearer_token(header)?;

        // 3. Structural decode (size cap, segment count, kid extraction)
        let kid = extract_kid(token).map_err(|e| {
            tracing::debug!(target: "agency.auth", error = ?e, "Token structure check failed");
            AuthError::InvalidTokenStructure
        })?;

        // 4. Key resolution (at most one JWKS refresh per call)
        let jwk = self.jwks.resolve(&kid).await?;

        // 5. Signature + issuer/audience verification
        let claims = verify_token(token, &jwk, &self.issuer, &self.audience)?;

        // 6. Expiry, fail-closed with zero leeway
        validate_exp(claims.exp).map_err(|e| {
            tracing::debug!(target: "agency.auth", error = ?e, "Token expiry check failed");
            AuthError::TokenInvalid(TokenInvalidKind::Expired)
        })?;

        // 7. Permissions claim presence
        if claims.permissions.is_none() {
            tracing::debug!(target: "agency.auth", "Token has no permissions claim");
            return Err(AuthError::PermissionsClaimMissing);
        }

        // 8. Required-permission membership
        if !claims.has_permission(required_permission) {
            tracing::debug!(
                target: "agency.auth",
                permission = %required_permission,
                "Required permission not granted"
            );
            return Err(AuthError::PermissionDenied);
        }

        tracing::debug!(target: "agency.auth", "Request authorized");
        Ok(claims)
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The header must split into exactly two space-separated parts and the
/// first part must equal `Bearer`, case-sensitively. Each deviation keeps
/// its own descriptive message.
fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    let parts: Vec<&str> = header.split(' ').collect();

    match parts.as_slice() {
        [scheme, ..] if *scheme != "Bearer" => {
            tracing::debug!(target: "agency.auth", "Authorization header has no bearer scheme");
            Err(AuthError::MalformedHeader(
                MalformedHeaderKind::MissingBearerScheme,
            ))
        }
        ["Bearer", token] if !token.is_empty() => Ok(token),
        ["Bearer"] | ["Bearer", _] => {
            tracing::debug!(target: "agency.auth", "Authorization header has no token part");
            Err(AuthError::MalformedHeader(MalformedHeaderKind::MissingToken))
        }
        _ => {
            tracing::debug!(target: "agency.auth", "Authorization header has extra segments");
            Err(AuthError::MalformedHeader(
                MalformedHeaderKind::TooManySegments,
            ))
        }
    }
}

/// Verify the token signature and standard claims against a resolved JWK.
///
/// Only EdDSA (Ed25519) keys are usable. Issuer and audience are always
/// verified; expiry is checked separately by the caller with zero leeway.
fn verify_token(token: &str, jwk: &Jwk, issuer: &str, audience: &str) -> Result<Claims, AuthError> {
    // A key with unusable material is equivalent to no key: the token may
    // be fine, the published key is not.
    if jwk.kty != "OKP" {
        tracing::warn!(target: "agency.auth", kty = %jwk.kty, "Unexpected JWK key type");
        return Err(AuthError::UnknownSigningKey);
    }
    if let Some(alg) = &jwk.alg {
        if alg != "EdDSA" {
            tracing::warn!(target: "agency.auth", alg = %alg, "Unexpected JWK algorithm");
            return Err(AuthError::UnknownSigningKey);
        }
    }

    let public_key_b64 = jwk.x.as_ref().ok_or_else(|| {
        tracing::error!(target: "agency.auth", kid = %jwk.kid, "JWK missing x field");
        AuthError::UnknownSigningKey
    })?;

    let public_key_bytes = decode_ed25519_public_key_jwk(public_key_b64).map_err(|e| {
        tracing::error!(target: "agency.auth", error = %e, "Invalid public key encoding");
        AuthError::UnknownSigningKey
    })?;

    let decoding_key = DecodingKey::from_ed_der(&public_key_bytes);

    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.leeway = 0;
    // Expiry is validated separately with fail-closed boundary semantics.
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp", "iss", "aud"]);
    validation.set_issuer(&[issuer]);
    validation.set_audience(&[audience]);

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(target: "agency.auth", error = %e, "Token verification failed");
        classify_verification_error(e.kind())
    })?;

    Ok(token_data.claims)
}

/// Map a `jsonwebtoken` failure onto the token-invalid taxonomy.
fn classify_verification_error(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::TokenInvalid(TokenInvalidKind::Expired),
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::MissingRequiredClaim(_) => {
            AuthError::TokenInvalid(TokenInvalidKind::ClaimsMismatch)
        }
        _ => AuthError::TokenInvalid(TokenInvalidKind::BadSignature),
    }
}
