//! Casting agency API error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl and are
//! rendered in a uniform JSON envelope:
//!
//! ```json
//! {"success": false, "error": 404, "message": "resource not found"}
//! ```

use crate::auth::AuthError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Casting agency API error type.
///
/// Maps to HTTP status codes:
/// - Auth: 400 / 401 / 403 depending on the failure kind
/// - NotFound: 404 Not Found
/// - Unprocessable: 422 Unprocessable Entity
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("resource not found")]
    NotFound,

    #[error("unprocessable")]
    Unprocessable,
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Auth(e) => e.status_code(),
            ApiError::NotFound => 404,
            ApiError::Unprocessable => 422,
        }
    }
}

/// Uniform JSON error envelope.
#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let envelope = ErrorEnvelope {
            success: false,
            error: code,
            message: self.to_string(),
        };

        let mut response = (status, Json(envelope)).into_response();

        // Advertise the expected scheme on credential failures.
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) =
                "Bearer realm=\"agency-api\", error=\"invalid_token\"".parse()
            {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}
