use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::models::job::JobIdError;
use crate::services::ledger::LedgerError;
use crate::services::rekognition::DetectionError;
use crate::services::sns::SnsError;

/// Failure of a single pipeline invocation.
///
/// Delivery errors never appear here: they are logged by the correlator
/// and the invocation still succeeds.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid payload: {0}")]
    Validation(String),

    #[error("Invalid job id: {0}")]
    JobId(#[from] JobIdError),

    #[error("Malformed JSON payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Notification from unexpected topic {0:?}")]
    ForeignTopic(String),

    #[error(transparent)]
    Detection(#[from] DetectionError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Sns(#[from] SnsError),
}

impl PipelineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::Validation(_) | PipelineError::JobId(_) | PipelineError::Payload(_) => {
                StatusCode::BAD_REQUEST
            }
            PipelineError::Sns(SnsError::UntrustedUrl(_)) => StatusCode::BAD_REQUEST,
            PipelineError::ForeignTopic(_) => StatusCode::FORBIDDEN,
            PipelineError::Detection(_) | PipelineError::Sns(_) => StatusCode::BAD_GATEWAY,
            PipelineError::Ledger(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<garde::Report> for PipelineError {
    fn from(report: garde::Report) -> Self {
        PipelineError::Validation(report.to_string())
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Invocation failed");
        } else {
            tracing::warn!(error = %self, "Invocation rejected");
        }
        (status, Json(json!({ "status": "failure", "error": self.to_string() }))).into_response()
    }
}
