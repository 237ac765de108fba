//! Classified authorization failures.
//!
//! Every failure in the authorization pipeline is a typed result, never an
//! uncontrolled fault. Each kind carries an HTTP-status-like severity for
//! the HTTP layer to map, and a stable human-readable description.

use thiserror::Error;

/// Sub-reason for a malformed `Authorization` header.
///
/// All kinds map to the same failure class (401) but preserve a
/// descriptive message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedHeaderKind {
    /// The first space-separated part is not exactly `Bearer`.
    #[error("Authorization header must start with \"Bearer\".")]
    MissingBearerScheme,

    /// There is a scheme but no token part.
    #[error("Token not found.")]
    MissingToken,

    /// More than two space-separated parts.
    #[error("Authorization header must be bearer token.")]
    TooManySegments,
}

/// Sub-classification of a token that failed signature or standard-claim
/// verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenInvalidKind {
    /// The `exp` claim is at or before the current time.
    #[error("Token expired.")]
    Expired,

    /// Signature verification failed, or the declared algorithm is not
    /// supported.
    #[error("Unable to parse authentication token.")]
    BadSignature,

    /// Issuer or audience does not match, or a required claim is absent.
    #[error("Incorrect claims. Please, check the audience and issuer.")]
    ClaimsMismatch,
}

/// Authorization failure taxonomy.
///
/// Severity mapping:
/// - `MissingHeader`, `MalformedHeader`, `InvalidTokenStructure`,
///   `UnknownSigningKey`, `TokenInvalid`: 401 Unauthorized
/// - `PermissionsClaimMissing`: 400 Bad Request
/// - `PermissionDenied`: 403 Forbidden
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header on the request.
    #[error("Authorization header is expected.")]
    MissingHeader,

    /// Header present but not of the form `Bearer <token>`.
    #[error("{0}")]
    MalformedHeader(MalformedHeaderKind),

    /// Token is not three non-empty base64url segments with a usable
    /// header.
    #[error("Authorization malformed.")]
    InvalidTokenStructure,

    /// No usable verification key matches the token's `kid`. Also covers
    /// key-endpoint fetch failures and timeouts: callers cannot
    /// distinguish "key service down" from "bad kid".
    #[error("Unable to find the appropriate key.")]
    UnknownSigningKey,

    /// Signature or standard-claim verification failed.
    #[error("{0}")]
    TokenInvalid(TokenInvalidKind),

    /// The decoded payload has no `permissions` claim.
    #[error("Permissions not included in JWT.")]
    PermissionsClaimMissing,

    /// The required permission is not in the token's permission set.
    #[error("Permission not found.")]
    PermissionDenied,
}

impl AuthError {
    /// Returns the HTTP status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingHeader
            | AuthError::MalformedHeader(_)
            | AuthError::InvalidTokenStructure
            | AuthError::UnknownSigningKey
            | AuthError::TokenInvalid(_) => 401,
            AuthError::PermissionsClaimMissing => 400,
            AuthError::PermissionDenied => 403,
        }
    }

    /// Bounded-cardinality label for metrics.
    pub fn metric_label(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::MalformedHeader(_) => "malformed_header",
            AuthError::InvalidTokenStructure => "invalid_structure",
            AuthError::UnknownSigningKey => "unknown_key",
            AuthError::TokenInvalid(TokenInvalidKind::Expired) => "expired",
            AuthError::TokenInvalid(_) => "token_invalid",
            AuthError::PermissionsClaimMissing => "permissions_claim_missing",
            AuthError::PermissionDenied => "permission_denied",
        }
    }
}
