use crate::phrases::PhraseId;
use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TasbihError {
    #[error("unknown phrase '{0}'")]
    UnknownPhrase(PhraseId),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage unavailable")]
    Unavailable,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<TasbihError> for AppError {
    fn from(err: TasbihError) -> Self {
        match err {
            TasbihError::UnknownPhrase(_) => Self::not_found(err.to_string()),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
