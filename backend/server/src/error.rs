use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Project not found")]
    ProjectNotFound,

    #[error("Not found")]
    RouteNotFound,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Stored data is corrupted: {0}")]
    StorageCorruption(#[source] serde_json::Error),

    #[error("No project id left to assign")]
    IdSpaceExhausted,

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<bool>,
    error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ProjectNotFound | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::StorageCorruption(_) | AppError::IdSpaceExhausted | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            // Unmatched routes answer with the bare `{"error": ...}` shape.
            AppError::RouteNotFound => ErrorBody {
                success: None,
                error: self.to_string(),
            },
            AppError::ProjectNotFound | AppError::MalformedPayload(_) => ErrorBody {
                success: Some(false),
                error: self.to_string(),
            },
            AppError::StorageCorruption(_) => ErrorBody {
                success: Some(false),
                error: "Stored data is corrupted".to_string(),
            },
            AppError::IdSpaceExhausted | AppError::Io(_) => ErrorBody {
                success: Some(false),
                error: "Internal server error".to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            warn!("Request rejected: {self}");
        }

        (status, Json(self.body())).into_response()
    }
}
