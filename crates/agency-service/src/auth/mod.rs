//! Authorization core for the casting agency backend.
//!
//! Validates bearer tokens against the token issuer's JWKS endpoint and
//! enforces per-endpoint permission requirements. Each handler passes the
//! raw `Authorization` header and its declared permission string to
//! [`Authorizer::authorize`], which returns either validated claims or a
//! classified [`AuthError`].
//!
//! # Components
//!
//! - `authorizer` - The validation pipeline (header, structure, key, signature, permissions)
//! - `claims` - Decoded claims structure for validated tokens
//! - `error` - Classified authorization failures with HTTP severities
//! - `jwks` - JWKS client fetching and caching public keys

pub mod authorizer;
pub mod claims;
pub mod error;
pub mod jwks;

pub use authorizer::Authorizer;
pub use claims::Claims;
pub use error::{AuthError, MalformedHeaderKind, TokenInvalidKind};
pub use jwks::JwksClient;
