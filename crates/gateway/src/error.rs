use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use inference::{ErrorKind, PipelineError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("{}", multipart_message(.0))]
    Multipart(#[from] MultipartError),
}

fn multipart_message(err: &MultipartError) -> String {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        format!("Upload too large: {}", err.body_text())
    } else {
        format!("Malformed multipart body: {}", err)
    }
}

/// JSON body of every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Pipeline(e) => match e.kind() {
                ErrorKind::ClientInput => StatusCode::BAD_REQUEST,
                ErrorKind::Backend => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Multipart(e) => e.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Failed to process request");
        } else {
            tracing::debug!(error = %self, %status, "Rejected request");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
