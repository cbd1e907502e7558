//! API error taxonomy and its HTTP mapping.
//!
//! Every failure the REST boundary can surface is one of five typed
//! variants; the [`IntoResponse`] impl maps each to its status code and a
//! safe `{"message": ...}` JSON body. Internal detail is logged, never sent
//! to the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Typed API failure.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed, missing, or inconsistent input (400).
    #[error("{0}")]
    Validation(String),
    /// Missing, invalid, or expired credential (401).
    #[error("{0}")]
    Authentication(String),
    /// Authenticated but insufficient permission (403).
    #[error("{0}")]
    Forbidden(String),
    /// Resource or referenced id absent (404).
    #[error("{0}")]
    NotFound(String),
    /// Unexpected failure (500). The inner detail is logged only.
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    /// Creates a [`ApiError::Validation`] error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates an [`ApiError::Authentication`] error.
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Creates an [`ApiError::Forbidden`] error.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Creates an [`ApiError::NotFound`] error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Creates an [`ApiError::Internal`] error carrying log-only detail.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(detail = %detail, "internal error");
        }
        let body = Json(serde_json::json!({ "message": self.to_string() }));
        (self.status(), body).into_response()
    }
}
