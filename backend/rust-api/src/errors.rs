use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum TutorError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("No active question")]
    NoActiveQuestion,

    #[error("Shape not found: {0}")]
    UnknownShape(String),

    #[error("No visitor session; visit / first")]
    MissingVisitor,

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl TutorError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        TutorError::InvalidInput(message.into())
    }

    pub fn unknown_shape(name: impl Into<String>) -> Self {
        TutorError::UnknownShape(name.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            TutorError::InvalidInput(_) | TutorError::NoActiveQuestion => StatusCode::BAD_REQUEST,
            TutorError::UnknownShape(_) => StatusCode::NOT_FOUND,
            TutorError::MissingVisitor => StatusCode::UNAUTHORIZED,
            TutorError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TutorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            TutorError::Unexpected(err) => {
                tracing::error!("Unexpected failure: {:#}", err);
                "Internal server error".to_string()
            }
            other => {
                tracing::warn!("Request rejected ({}): {}", status, other);
                other.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
