//! Shared fixtures for integration tests.
//!
//! Provides Ed25519 test keypairs, token signing, a mocked JWKS endpoint,
//! and a full test server bound to a random port.

#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use agency_service::auth::{Authorizer, JwksClient};
use agency_service::config::Config;
use agency_service::repositories::{ActorRepository, MovieRepository};
use agency_service::routes::{build_routes, init_metrics_recorder, AppState};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use ring::signature::{Ed25519KeyPair, KeyPair};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Issuer every test server expects.
pub const ISSUER: &str = "https://auth.test.example.com/";

/// Audience every test server expects.
pub const AUDIENCE: &str = "agency-api";

/// Path the mock key endpoint serves.
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

/// Global metrics handle: the Prometheus recorder can only be installed
/// once per process.
static TEST_METRICS_HANDLE: OnceLock<metrics_exporter_prometheus::PrometheusHandle> =
    OnceLock::new();

pub fn test_metrics_handle() -> metrics_exporter_prometheus::PrometheusHandle {
    TEST_METRICS_HANDLE
        .get_or_init(|| {
            init_metrics_recorder().unwrap_or_else(|_| {
                metrics_exporter_prometheus::PrometheusBuilder::new()
                    .build_recorder()
                    .handle()
            })
        })
        .clone()
}

/// Test keypair for signing tokens.
pub struct TestKeypair {
    pub kid: String,
    pub public_key_bytes: Vec<u8>,
    pub private_key_pkcs8: Vec<u8>,
}

impl TestKeypair {
    pub fn new(seed: u8, kid: &str) -> Self {
        // Deterministic seed so failures reproduce.
        let mut seed_bytes = [0u8; 32];
        seed_bytes[0] = seed;
        for (i, byte) in seed_bytes.iter_mut().enumerate().skip(1) {
            *byte = seed.wrapping_mul(i as u8).wrapping_add(i as u8);
        }

        let key_pair = Ed25519KeyPair::from_seed_unchecked(&seed_bytes)
            .expect("Failed to create test keypair");

        let public_key_bytes = key_pair.public_key().as_ref().to_vec();
        let private_key_pkcs8 = build_pkcs8_from_seed(&seed_bytes);

        Self {
            kid: kid.to_string(),
            public_key_bytes,
            private_key_pkcs8,
        }
    }

    /// Sign arbitrary claims with this key, stamping the key's `kid` into
    /// the token header.
    pub fn sign_token(&self, claims: &serde_json::Value) -> String {
        let encoding_key = EncodingKey::from_ed_der(&self.private_key_pkcs8);
        let mut header = Header::new(Algorithm::EdDSA);
        header.typ = Some("JWT".to_string());
        header.kid = Some(self.kid.clone());

        encode(&header, claims, &encoding_key).expect("Failed to sign token")
    }

    /// This key as a JWK document entry.
    pub fn jwk_json(&self) -> serde_json::Value {
        json!({
            "kty": "OKP",
            "kid": self.kid,
            "crv": "Ed25519",
            "x": URL_SAFE_NO_PAD.encode(&self.public_key_bytes),
            "alg": "EdDSA",
            "use": "sig"
        })
    }
}

/// Build a PKCS#8 v1 document from an Ed25519 seed.
fn build_pkcs8_from_seed(seed: &[u8; 32]) -> Vec<u8> {
    let mut pkcs8 = Vec::new();

    // Outer SEQUENCE tag
    pkcs8.push(0x30);
    pkcs8.push(0x2e); // Length: 46 bytes

    // Version: INTEGER 0
    pkcs8.extend_from_slice(&[0x02, 0x01, 0x00]);

    // Algorithm Identifier: SEQUENCE
    pkcs8.push(0x30);
    pkcs8.push(0x05); // Length: 5 bytes
                      // OID for Ed25519: 1.3.101.112
    pkcs8.extend_from_slice(&[0x06, 0x03, 0x2b, 0x65, 0x70]);

    // Private Key: OCTET STRING
    pkcs8.push(0x04);
    pkcs8.push(0x22); // Length: 34 bytes
                      // Inner OCTET STRING with seed
    pkcs8.push(0x04);
    pkcs8.push(0x20); // Length: 32 bytes
    pkcs8.extend_from_slice(seed);

    pkcs8
}

/// Claims payload with the given permissions (omitted entirely when
/// `None`), expiring one hour from now.
pub fn valid_claims(permissions: Option<&[&str]>) -> serde_json::Value {
    claims_with_exp(permissions, Utc::now().timestamp() + 3600)
}

/// Claims payload with an explicit expiry.
pub fn claims_with_exp(permissions: Option<&[&str]>, exp: i64) -> serde_json::Value {
    let mut claims = json!({
        "sub": "auth0|test-user",
        "iss": ISSUER,
        "aud": AUDIENCE,
        "exp": exp,
        "iat": exp - 7200,
    });
    if let Some(permissions) = permissions {
        claims["permissions"] = json!(permissions);
    }
    claims
}

/// Mount a JWKS document with the given keys on a mock server.
pub async fn mount_jwks(mock_server: &MockServer, keypairs: &[&TestKeypair]) {
    let jwks = json!({
        "keys": keypairs.iter().map(|k| k.jwk_json()).collect::<Vec<_>>()
    });

    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&jwks))
        .mount(mock_server)
        .await;
}

/// Build an authorizer pointed at a mock JWKS server, for direct pipeline
/// tests that do not need an HTTP listener.
pub fn authorizer_for(mock_server: &MockServer) -> Authorizer {
    let jwks = Arc::new(JwksClient::new(
        format!("{}{}", mock_server.uri(), JWKS_PATH),
        Duration::from_secs(300),
    ));
    Authorizer::new(jwks, ISSUER.to_string(), AUDIENCE.to_string())
}

/// A running service instance with a mocked key endpoint.
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
    pub mock_server: MockServer,
    pub keypair: TestKeypair,
    _server_handle: JoinHandle<()>,
}

impl TestServer {
    /// Spawn a server whose JWKS endpoint serves one known key.
    pub async fn spawn() -> anyhow::Result<Self> {
        let mock_server = MockServer::start().await;
        let keypair = TestKeypair::new(1, "test-key-01");
        mount_jwks(&mock_server, &[&keypair]).await;

        let vars = HashMap::from([
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            (
                "AUTH_JWKS_URL".to_string(),
                format!("{}{}", mock_server.uri(), JWKS_PATH),
            ),
            ("AUTH_TOKEN_ISSUER".to_string(), ISSUER.to_string()),
            ("AUTH_TOKEN_AUDIENCE".to_string(), AUDIENCE.to_string()),
        ]);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let jwks = Arc::new(JwksClient::new(
            config.jwks_url.clone(),
            config.jwks_cache_ttl,
        ));
        let authorizer = Arc::new(Authorizer::new(
            jwks,
            config.token_issuer.clone(),
            config.token_audience.clone(),
        ));

        let state = Arc::new(AppState {
            config,
            authorizer,
            actors: ActorRepository::new(),
            movies: MovieRepository::new(),
        });

        let app = build_routes(Arc::clone(&state), test_metrics_handle());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let server_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            state,
            mock_server,
            keypair,
            _server_handle: server_handle,
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A valid one-hour token carrying the given permissions.
    pub fn token(&self, permissions: &[&str]) -> String {
        self.keypair.sign_token(&valid_claims(Some(permissions)))
    }

    /// Replace the JWKS response with a different key, so tokens signed
    /// with the original key no longer resolve.
    pub async fn rotate_key_away(&self) {
        let different_keypair = TestKeypair::new(2, "different-key");
        self.mock_server.reset().await;
        mount_jwks(&self.mock_server, &[&different_keypair]).await;
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self._server_handle.abort();
    }
}
