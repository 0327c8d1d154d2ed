//! Typed failures for the auth and admission core, translated to HTTP at the
//! boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Everything a handler can fail with. Each variant maps to exactly one
/// status code; the upstream variant never leaks its cause to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Rate limit exceeded: Only {limit} confessions allowed per hour.")]
    RateLimited { limit: i64 },

    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // The cause stays in the server log; clients get a generic message.
        let message = if let Self::Upstream(err) = &self {
            error!("Upstream failure: {err:#}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<crate::auth::TokenError> for ApiError {
    fn from(err: crate::auth::TokenError) -> Self {
        use crate::auth::TokenError;
        match err {
            TokenError::WrongRole => Self::Authorization(err.to_string()),
            TokenError::Missing | TokenError::Invalid | TokenError::Expired => {
                Self::Authentication(err.to_string())
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Upstream(anyhow::Error::new(err))
    }
}
