use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::Value;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum BuddyError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required fields: {0}")]
    MissingFields(&'static str),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Plaid answered with a non-success status. `body` is the raw error payload.
    #[error("Plaid API error ({status}): {body}")]
    Provider { status: StatusCode, body: Value },

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    /// The REST persistence store rejected a write.
    #[error("Store error ({status}): {body}")]
    Store { status: StatusCode, body: Value },

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl BuddyError {
    pub fn status(&self) -> StatusCode {
        match self {
            BuddyError::MissingFields(_) | BuddyError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Raw upstream payload when one was received, otherwise the error text.
    pub fn detail(&self) -> Value {
        match self {
            BuddyError::Provider { body, .. } | BuddyError::Store { body, .. } => body.clone(),
            BuddyError::MissingFields(fields) => Value::String(format!("{fields} are required")),
            BuddyError::InvalidBody(reason) => Value::String(reason.clone()),
            BuddyError::Join(_) => Value::String("An internal server error occurred.".to_string()),
            other => Value::String(other.to_string()),
        }
    }
}

/// Error surfaced at the handler boundary: a fixed summary plus the cause.
#[derive(Debug)]
pub struct ApiError {
    pub error: &'static str,
    pub cause: BuddyError,
}

impl ApiError {
    pub fn new(error: &'static str, cause: BuddyError) -> Self {
        Self { error, cause }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.cause.status();
        let body = ApiErrorBody {
            error: self.error.to_string(),
            message: self.cause.detail(),
        };
        (status, Json(body)).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub message: Value,
}
