use std::fmt;

use garde::Validate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Status of a label detection job as reported by Rekognition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    InProgress,
    Succeeded,
    Failed,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Map a raw status string, falling back to `Unknown` for values this
    /// version does not know about.
    pub fn from_raw(raw: &str) -> Self {
        raw.parse().unwrap_or(JobStatus::Unknown)
    }
}

/// Identifier Rekognition assigns to a submitted job.
///
/// Always non-empty, at most 64 characters of `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobIdError {
    #[error("job id is missing or empty")]
    Empty,

    #[error("job id is longer than {max} characters", max = JobId::MAX_LEN)]
    TooLong,

    #[error("job id contains invalid character {0:?}")]
    InvalidChar(char),
}

impl JobId {
    pub const MAX_LEN: usize = 64;

    /// Validate a raw id as received. Surrounding whitespace is not
    /// stripped; it is rejected like any other invalid character.
    pub fn parse(raw: &str) -> Result<Self, JobIdError> {
        if raw.is_empty() {
            return Err(JobIdError::Empty);
        }
        if raw.len() > Self::MAX_LEN {
            return Err(JobIdError::TooLong);
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(JobIdError::InvalidChar(bad));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location of the stored video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct VideoReference {
    #[garde(length(min = 1, max = 255))]
    pub bucket: String,

    #[garde(length(min = 1, max = 1024))]
    pub key: String,
}

/// SNS topic and the role Rekognition assumes to publish completion to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NotificationChannel {
    #[garde(length(min = 1))]
    pub topic_arn: String,

    #[garde(length(min = 1))]
    pub role_arn: String,
}

/// A label detection job ready to be submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnalysisJobRequest {
    #[garde(dive)]
    pub video: VideoReference,

    #[garde(range(min = 0.0, max = 100.0))]
    pub min_confidence: f32,

    #[garde(length(min = 1, max = 256))]
    pub job_tag: String,

    #[garde(dive)]
    pub notification_channel: NotificationChannel,

    /// Idempotency token; repeated submissions with the same token return
    /// the original job id.
    #[garde(length(min = 1, max = 64))]
    pub client_request_token: Option<String>,
}

/// Returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisJobHandle {
    pub job_id: JobId,
}

/// One label occurrence in a job's results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLabel {
    pub name: String,
    pub confidence: f32,
    /// Offset into the video, in milliseconds.
    pub timestamp_ms: i64,
}

/// Status and labels of a finished (or still running) job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub status: JobStatus,
    pub status_message: Option<String>,
    pub labels: Vec<DetectedLabel>,
}
