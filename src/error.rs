//! Error taxonomy shared by the lookup and commentary handlers.
//!
//! Every variant maps to one HTTP status and a machine-readable code:
//!
//! ```json
//! { "success": false, "error": { "code": "not_found", "message": "..." } }
//! ```
//!
//! | Variant | Code | Status |
//! |---------|------|--------|
//! | [`ExplorerError::Validation`] | `bad_request` | 400 |
//! | [`ExplorerError::MissingCredential`] | `missing_credential` | 401 |
//! | [`ExplorerError::NotFound`] | `not_found` | 404 |
//! | [`ExplorerError::Upstream`] | `upstream_error` | 502 |
//! | [`ExplorerError::BadResponse`] | `upstream_error` | 502 |
//! | [`ExplorerError::EmptyCompletion`] | `empty_completion` | 502 |
//! | [`ExplorerError::Timeout`] | `timeout` | 504 |
//! | [`ExplorerError::Configuration`] | `configuration` | 500 |
//! | [`ExplorerError::Internal`] | `internal` | 500 |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// A request field is missing or malformed. No network call was made.
    #[error("{0}")]
    Validation(String),

    /// The caller did not supply the credential the route requires.
    #[error("{0}")]
    MissingCredential(String),

    /// VedaWeb has no document for the requested coordinate.
    #[error("{0}")]
    NotFound(String),

    /// An external service answered with a non-success status.
    #[error("{service} returned {status}: {detail}")]
    Upstream {
        service: &'static str,
        status: u16,
        detail: String,
    },

    /// An external service could not be reached, or its reply could not be read.
    #[error("{service} request failed: {detail}")]
    BadResponse {
        service: &'static str,
        detail: String,
    },

    /// An external call did not complete within the configured timeout.
    #[error("{0} did not respond in time")]
    Timeout(&'static str),

    /// The language model answered without any usable text.
    #[error("language model returned an empty completion")]
    EmptyCompletion,

    /// A server-side setting (such as an API key) is absent.
    #[error("server misconfiguration: {0}")]
    Configuration(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ExplorerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::MissingCredential(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream { .. } | Self::BadResponse { .. } | Self::EmptyCompletion => {
                StatusCode::BAD_GATEWAY
            }
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Configuration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "bad_request",
            Self::MissingCredential(_) => "missing_credential",
            Self::NotFound(_) => "not_found",
            Self::Upstream { .. } | Self::BadResponse { .. } => "upstream_error",
            Self::Timeout(_) => "timeout",
            Self::EmptyCompletion => "empty_completion",
            Self::Configuration(_) => "configuration",
            Self::Internal(_) => "internal",
        }
    }

    /// Classifies a `reqwest` failure that happened before any status was seen,
    /// or while reading the body.
    pub fn from_transport(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout(service);
        }
        let detail = if err.is_decode() {
            format!("unreadable response body: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        Self::BadResponse { service, detail }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl IntoResponse for ExplorerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                "An internal error occurred. Please try again later.".to_string()
            }
            Self::Configuration(msg) => {
                tracing::error!(detail = %msg, "server misconfiguration");
                self.to_string()
            }
            Self::Upstream { .. }
            | Self::BadResponse { .. }
            | Self::Timeout(_)
            | Self::EmptyCompletion => {
                tracing::warn!(error = %self, "upstream failure");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorBody {
            success: false,
            error: ErrorDetail {
                code: self.code(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}
