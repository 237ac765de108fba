//! End-to-end authentication tests.
//!
//! Drives the full HTTP stack with a mocked JWKS endpoint: every failure
//! class must surface with the right status code and the uniform
//! `{success, error, message}` envelope.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use anyhow::Result;
use support::TestServer;

async fn get_actors_with_header(
    server: &TestServer,
    header: Option<&str>,
) -> Result<(u16, serde_json::Value)> {
    let client = reqwest::Client::new();
    let mut request = client.get(format!("{}/actors", server.url()));
    if let Some(header) = header {
        request = request.header("Authorization", header);
    }

    let response = request.send().await?;
    let status = response.status().as_u16();
    let body: serde_json::Value = response.json().await?;
    Ok((status, body))
}

/// Requests without an Authorization header are rejected with 401.
#[tokio::test]
async fn test_missing_header_returns_401() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = get_actors_with_header(&server, None).await?;

    assert_eq!(status, 401);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 401);
    assert_eq!(body["message"], "Authorization header is expected.");

    Ok(())
}

/// 401 responses advertise the bearer scheme.
#[tokio::test]
async fn test_401_includes_www_authenticate() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/actors", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 401);
    let www_auth = response.headers().get("www-authenticate");
    assert!(www_auth.is_some(), "Should include WWW-Authenticate header");

    Ok(())
}

/// A non-bearer scheme is a malformed header.
#[tokio::test]
async fn test_basic_scheme_returns_401() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = get_actors_with_header(&server, Some("Basic abc123")).await?;

    assert_eq!(status, 401);
    assert_eq!(body["message"], "Authorization header must start with \"Bearer\".");

    Ok(())
}

/// A bearer scheme with no token part is a malformed header.
#[tokio::test]
async fn test_scheme_without_token_returns_401() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = get_actors_with_header(&server, Some("Bearer")).await?;

    assert_eq!(status, 401);
    assert_eq!(body["message"], "Token not found.");

    Ok(())
}

/// A bearer header with extra segments is a malformed header.
#[tokio::test]
async fn test_extra_header_segments_return_401() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = get_actors_with_header(&server, Some("Bearer abc def")).await?;

    assert_eq!(status, 401);
    assert_eq!(body["message"], "Authorization header must be bearer token.");

    Ok(())
}

/// A token that is not three dot-separated segments is structurally
/// invalid.
#[tokio::test]
async fn test_malformed_token_returns_401() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = get_actors_with_header(&server, Some("Bearer not-a-jwt")).await?;

    assert_eq!(status, 401);
    assert_eq!(body["message"], "Authorization malformed.");

    Ok(())
}

/// Oversized tokens are rejected before parsing.
#[tokio::test]
async fn test_oversized_token_returns_401() -> Result<()> {
    let server = TestServer::spawn().await?;

    let oversized = format!("Bearer {}", "a".repeat(9000));
    let (status, body) = get_actors_with_header(&server, Some(&oversized)).await?;

    assert_eq!(status, 401);
    assert_eq!(body["message"], "Authorization malformed.");

    Ok(())
}

/// A valid token with the required permission reaches the resource.
#[tokio::test]
async fn test_valid_token_with_permission_returns_200() -> Result<()> {
    let server = TestServer::spawn().await?;
    server
        .state
        .actors
        .insert("Keanu Reeves".to_string(), 58, "male".to_string())
        .await;

    let token = server.token(&["get:actors"]);
    let header = format!("Bearer {token}");
    let (status, body) = get_actors_with_header(&server, Some(&header)).await?;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["actors"].as_array().unwrap().len(), 1);
    assert_eq!(body["actors"][0]["name"], "Keanu Reeves");

    Ok(())
}

/// A valid token without the endpoint's permission is forbidden.
#[tokio::test]
async fn test_valid_token_without_permission_returns_403() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    // Can read actors, cannot create them.
    let token = server.token(&["get:actors"]);

    let response = client
        .post(format!("{}/actors", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&serde_json::json!({"name": "Keanu Reeves", "age": 58, "gender": "male"}))
        .send()
        .await?;

    assert_eq!(response.status(), 403);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 403);
    assert_eq!(body["message"], "Permission not found.");

    Ok(())
}

/// A token without a permissions claim is a 400-class failure.
#[tokio::test]
async fn test_token_without_permissions_claim_returns_400() -> Result<()> {
    let server = TestServer::spawn().await?;

    let token = server.keypair.sign_token(&support::valid_claims(None));
    let header = format!("Bearer {token}");
    let (status, body) = get_actors_with_header(&server, Some(&header)).await?;

    assert_eq!(status, 400);
    assert_eq!(body["error"], 400);
    assert_eq!(body["message"], "Permissions not included in JWT.");

    Ok(())
}

/// An expired token is rejected.
#[tokio::test]
async fn test_expired_token_returns_401() -> Result<()> {
    let server = TestServer::spawn().await?;

    let expired = support::claims_with_exp(
        Some(&["get:actors"]),
        chrono::Utc::now().timestamp() - 3600,
    );
    let token = server.keypair.sign_token(&expired);
    let header = format!("Bearer {token}");
    let (status, body) = get_actors_with_header(&server, Some(&header)).await?;

    assert_eq!(status, 401);
    assert_eq!(body["message"], "Token expired.");

    Ok(())
}

/// A token signed with a key the JWKS does not publish is rejected.
#[tokio::test]
async fn test_unknown_kid_returns_401() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.rotate_key_away().await;

    let token = server.token(&["get:actors"]);
    let header = format!("Bearer {token}");
    let (status, body) = get_actors_with_header(&server, Some(&header)).await?;

    assert_eq!(status, 401);
    assert_eq!(body["message"], "Unable to find the appropriate key.");

    Ok(())
}

/// The same valid request twice yields the same outcome both times.
#[tokio::test]
async fn test_repeated_requests_are_stable() -> Result<()> {
    let server = TestServer::spawn().await?;
    server
        .state
        .actors
        .insert("Keanu Reeves".to_string(), 58, "male".to_string())
        .await;

    let token = server.token(&["get:actors"]);
    let header = format!("Bearer {token}");

    let (first_status, first_body) = get_actors_with_header(&server, Some(&header)).await?;
    let (second_status, second_body) = get_actors_with_header(&server, Some(&header)).await?;

    assert_eq!(first_status, 200);
    assert_eq!(second_status, 200);
    assert_eq!(first_body, second_body);

    Ok(())
}

/// The health endpoint is public.
#[tokio::test]
async fn test_health_endpoint_is_public() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "healthy");

    Ok(())
}

/// The metrics endpoint is public and renders Prometheus text.
#[tokio::test]
async fn test_metrics_endpoint_is_public() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    // Trigger at least one authorization decision first.
    let _ = get_actors_with_header(&server, None).await?;

    let response = client
        .get(format!("{}/metrics", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 200);

    Ok(())
}
