use async_trait::async_trait;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::types::{NotificationChannel, S3Object, Video};
use aws_sdk_rekognition::Client;

use crate::models::job::{
    AnalysisJobHandle, AnalysisJobRequest, AnalysisResult, DetectedLabel, JobId, JobStatus,
};

/// Page size requested from GetLabelDetection (the service maximum).
const RESULT_PAGE_SIZE: i32 = 1000;

/// The external video label detection service.
#[async_trait]
pub trait LabelDetector: Send + Sync {
    /// Start an asynchronous label detection job.
    async fn start_label_detection(
        &self,
        request: &AnalysisJobRequest,
    ) -> Result<AnalysisJobHandle, DetectionError>;

    /// Fetch the status and complete label list of a job.
    async fn get_label_detection(&self, job_id: &JobId) -> Result<AnalysisResult, DetectionError>;
}

/// Client for AWS Rekognition Video label detection.
pub struct RekognitionClient {
    client: Client,
}

impl RekognitionClient {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl LabelDetector for RekognitionClient {
    async fn start_label_detection(
        &self,
        request: &AnalysisJobRequest,
    ) -> Result<AnalysisJobHandle, DetectionError> {
        let video = Video::builder()
            .s3_object(
                S3Object::builder()
                    .bucket(&request.video.bucket)
                    .name(&request.video.key)
                    .build(),
            )
            .build();

        let channel = NotificationChannel::builder()
            .sns_topic_arn(&request.notification_channel.topic_arn)
            .role_arn(&request.notification_channel.role_arn)
            .build()
            .map_err(|e| DetectionError::Request(e.to_string()))?;

        let output = self
            .client
            .start_label_detection()
            .video(video)
            .min_confidence(request.min_confidence)
            .job_tag(&request.job_tag)
            .notification_channel(channel)
            .set_client_request_token(request.client_request_token.clone())
            .send()
            .await
            .map_err(|e| DetectionError::Service(DisplayErrorContext(&e).to_string()))?;

        let raw_id = output.job_id().ok_or(DetectionError::MissingJobId)?;
        let job_id =
            JobId::parse(raw_id).map_err(|e| DetectionError::Response(e.to_string()))?;

        Ok(AnalysisJobHandle { job_id })
    }

    async fn get_label_detection(&self, job_id: &JobId) -> Result<AnalysisResult, DetectionError> {
        let mut labels = Vec::new();
        let mut status = JobStatus::Unknown;
        let mut status_message = None;
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .get_label_detection()
                .job_id(job_id.as_str())
                .max_results(RESULT_PAGE_SIZE)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| DetectionError::Service(DisplayErrorContext(&e).to_string()))?;

            if let Some(job_status) = output.job_status() {
                status = JobStatus::from_raw(job_status.as_str());
            }
            if let Some(message) = output.status_message() {
                status_message = Some(message.to_string());
            }

            labels.extend(output.labels().iter().filter_map(|detection| {
                let label = detection.label()?;
                Some(DetectedLabel {
                    name: label.name()?.to_string(),
                    confidence: label.confidence().unwrap_or_default(),
                    timestamp_ms: detection.timestamp(),
                })
            }));

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        tracing::debug!(
            job_id = %job_id,
            status = %status,
            label_count = labels.len(),
            "Fetched label detection results"
        );

        Ok(AnalysisResult {
            status,
            status_message,
            labels,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("Invalid Rekognition request: {0}")]
    Request(String),

    #[error("Rekognition call failed: {0}")]
    Service(String),

    #[error("Rekognition response did not include a job id")]
    MissingJobId,

    #[error("Unexpected Rekognition response: {0}")]
    Response(String),
}
