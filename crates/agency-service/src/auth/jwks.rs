//! JWKS client for fetching and caching the token issuer's public keys.
//!
//! The client fetches the JSON Web Key Set from the issuer's JWKS endpoint
//! and keeps an immutable snapshot with a TTL. Readers share the snapshot
//! without blocking each other; a refresh swaps in a whole new snapshot,
//! so concurrent refreshes are idempotent.
//!
//! # Security
//!
//! - Keys are cached to avoid a network round-trip per request
//! - The snapshot expires on TTL to pick up key rotations
//! - The fetch is bounded by a timeout; a failed or timed-out fetch is
//!   indistinguishable from an unknown key to the caller

use crate::auth::error::AuthError;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::instrument;

/// Timeout for a single JWKS fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON Web Key from the JWKS endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key type ("OKP" for Ed25519).
    pub kty: String,

    /// Key ID - used to select the correct key for verification.
    pub kid: String,

    /// Curve name ("Ed25519" for EdDSA).
    #[serde(default)]
    pub crv: Option<String>,

    /// Public key value (base64url encoded).
    #[serde(default)]
    pub x: Option<String>,

    /// Algorithm ("EdDSA").
    #[serde(default)]
    pub alg: Option<String>,

    /// Key use ("sig" for signing).
    #[serde(default, rename = "use")]
    pub key_use: Option<String>,
}

/// JWKS document as served by the key endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct JwkSet {
    /// List of JSON Web Keys.
    pub keys: Vec<Jwk>,
}

/// An immutable, TTL'd snapshot of the key set.
struct Snapshot {
    /// Map of key ID to JWK.
    keys: HashMap<String, Jwk>,

    /// When this snapshot was fetched.
    fetched_at: Instant,
}

impl Snapshot {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// JWKS client with a shared snapshot cache.
pub struct JwksClient {
    /// URL to the JWKS endpoint.
    jwks_url: String,

    /// HTTP client for fetching the key set.
    http_client: reqwest::Client,

    /// Current snapshot, if any has been fetched yet.
    cache: RwLock<Option<Arc<Snapshot>>>,

    /// How long a snapshot stays fresh.
    cache_ttl: Duration,
}

impl JwksClient {
    /// Create a new JWKS client.
    ///
    /// # Arguments
    ///
    /// * `jwks_url` - URL to the issuer's JWKS endpoint
    /// * `cache_ttl` - How long a fetched snapshot stays fresh
    pub fn new(jwks_url: String, cache_ttl: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(target: "agency.auth.jwks", error = %e, "Failed to build HTTP client with custom config, using defaults");
                reqwest::Client::new()
            });

        Self {
            jwks_url,
            http_client,
            cache: RwLock::new(None),
            cache_ttl,
        }
    }

    /// Resolve a verification key by key ID.
    ///
    /// A fresh snapshot is consulted without I/O. If the snapshot is stale
    /// or absent, the key set is fetched at most once; a `kid` that is
    /// still unknown afterwards is a hard failure for this call - there is
    /// no second fetch.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownSigningKey` if the key cannot be
    /// resolved, including when the key endpoint is unreachable.
    #[instrument(skip(self), fields(kid = %kid))]
    pub async fn resolve(&self, kid: &str) -> Result<Jwk, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(snapshot) = cache.as_ref() {
                if snapshot.is_fresh(self.cache_ttl) {
                    if let Some(key) = snapshot.keys.get(kid) {
                        tracing::debug!(target: "agency.auth.jwks", kid = %kid, "JWKS cache hit");
                        return Ok(key.clone());
                    }
                    // Fresh snapshot, unknown kid: do not hammer the key
                    // endpoint for a persistently-unknown key.
                    tracing::debug!(target: "agency.auth.jwks", kid = %kid, "Key not found in fresh JWKS snapshot");
                    return Err(AuthError::UnknownSigningKey);
                }
            }
        }

        // Stale or empty cache - fetch once and look up in the new snapshot.
        let snapshot = self.refresh().await?;

        match snapshot.keys.get(kid) {
            Some(key) => Ok(key.clone()),
            None => {
                tracing::warn!(target: "agency.auth.jwks", kid = %kid, "Key not found in JWKS after refresh");
                Err(AuthError::UnknownSigningKey)
            }
        }
    }

    /// Fetch the key set and swap in a new snapshot.
    #[instrument(skip(self))]
    async fn refresh(&self) -> Result<Arc<Snapshot>, AuthError> {
        tracing::debug!(target: "agency.auth.jwks", url = %self.jwks_url, "Fetching JWKS");

        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(target: "agency.auth.jwks", error = %e, "Failed to fetch JWKS");
                AuthError::UnknownSigningKey
            })?;

        if !response.status().is_success() {
            tracing::error!(
                target: "agency.auth.jwks",
                status = %response.status(),
                "JWKS endpoint returned error"
            );
            return Err(AuthError::UnknownSigningKey);
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            tracing::error!(target: "agency.auth.jwks", error = %e, "Failed to parse JWKS response");
            AuthError::UnknownSigningKey
        })?;

        let keys: HashMap<String, Jwk> = jwks
            .keys
            .into_iter()
            .map(|key| (key.kid.clone(), key))
            .collect();

        tracing::info!(
            target: "agency.auth.jwks",
            key_count = keys.len(),
            "JWKS snapshot refreshed"
        );

        let snapshot = Arc::new(Snapshot {
            keys,
            fetched_at: Instant::now(),
        });

        let mut cache = self.cache.write().await;
        *cache = Some(Arc::clone(&snapshot));

        Ok(snapshot)
    }
}
