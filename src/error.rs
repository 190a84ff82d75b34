use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing {0}")]
    MissingConfig(&'static str),

    #[error("Missing required query parameter: {0}")]
    MissingParam(&'static str),

    #[error("{0}")]
    BadQuery(#[from] QueryRejection),

    #[error("Upstream responded with status {status}")]
    Upstream { status: u16, relay: bool },

    #[error("Upstream request failed")]
    Transport(#[from] reqwest::Error),

    #[error("IGDB token has an unusable lifetime of {0}s")]
    TokenLifetime(i64),

    #[error("Malformed upstream response")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid upstream URL")]
    Url(#[from] url::ParseError),
}

impl AppError {
    /// Marks an upstream status failure so the response carries that status
    /// instead of a generic 500.
    pub fn relayed(self) -> Self {
        match self {
            AppError::Upstream { status, .. } => AppError::Upstream {
                status,
                relay: true,
            },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingParam(_) | AppError::BadQuery(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream {
                status,
                relay: true,
            } => StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            AppError::MissingConfig(_)
            | AppError::Upstream { .. }
            | AppError::TokenLifetime(_)
            | AppError::Transport(_)
            | AppError::Decode(_)
            | AppError::Url(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!(status = status.as_u16(), error = ?self, "request failed: {}", self);

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
