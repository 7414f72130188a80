use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::Message;
use crate::service::ServiceError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// Not-found shares 400 with invalid input; existing clients rely on it.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(ServiceError::InvalidInput(_) | ServiceError::NotFound(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Service(ServiceError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Service(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Server-side failure details go to the log only.
        let message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
            self.to_string()
        };
        (status, Message::new(message)).into_response()
    }
}
