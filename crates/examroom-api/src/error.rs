use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use examroom_core::EngineError;
use serde_json::json;
use tracing::error;

/// Application error type
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        let message: String = message.into();
        AppError {
            status: StatusCode::NOT_FOUND,
            error: anyhow::anyhow!(message),
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        let status = match err {
            EngineError::InvalidTimeRange(_) | EngineError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            EngineError::ScheduleConflict { .. } => StatusCode::CONFLICT,
        };
        AppError {
            status,
            error: err.into(),
        }
    }
}

/// Request items that do not match the collection's shape.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            error: err.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request error: {}", self.error);
        } else {
            tracing::warn!("Rejected request: {}", self.error);
        }

        (
            self.status,
            Json(json!({
                "error": self.error.to_string(),
            })),
        )
            .into_response()
    }
}
