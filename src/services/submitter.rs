use garde::Validate;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::models::events::{StorageEvent, StorageEventRecord};
use crate::models::job::{AnalysisJobHandle, AnalysisJobRequest, NotificationChannel, VideoReference};
use crate::services::rekognition::LabelDetector;

/// Minimum label confidence Rekognition should report.
pub const MIN_CONFIDENCE: f32 = 50.0;

/// Tag attached to every job this service starts.
pub const JOB_TAG: &str = "VideoWatchStartLabelDetection";

/// Namespace for deterministic client request tokens.
const REQUEST_TOKEN_NAMESPACE: Uuid = Uuid::from_u128(0x3f1c_2a7e_9b4d_4e0f_8a61_5c2d_7e90_b1a4);

/// Build the label detection request for a newly stored video.
///
/// The bucket always comes from configuration; the event only supplies the
/// object key (and, when present, the version/sequencer used for the
/// idempotency token).
pub fn build_request(
    config: &AppConfig,
    record: &StorageEventRecord,
) -> Result<AnalysisJobRequest, PipelineError> {
    let key = record.s3.object.decoded_key();
    if key.is_empty() {
        return Err(PipelineError::Validation("object key is empty".to_string()));
    }

    if record.s3.bucket.name != config.s3_bucket_name {
        tracing::warn!(
            event_bucket = %record.s3.bucket.name,
            configured_bucket = %config.s3_bucket_name,
            "Storage event bucket differs from configured bucket"
        );
    }

    let client_request_token = record
        .s3
        .object
        .version_id
        .as_deref()
        .or(record.s3.object.sequencer.as_deref())
        .map(|revision| {
            let name = format!("{}/{}/{}", config.s3_bucket_name, key, revision);
            Uuid::new_v5(&REQUEST_TOKEN_NAMESPACE, name.as_bytes()).to_string()
        });

    let request = AnalysisJobRequest {
        video: VideoReference {
            bucket: config.s3_bucket_name.clone(),
            key,
        },
        min_confidence: MIN_CONFIDENCE,
        job_tag: JOB_TAG.to_string(),
        notification_channel: NotificationChannel {
            topic_arn: config.sns_topic_arn.clone(),
            role_arn: config.rekognition_role_arn.clone(),
        },
        client_request_token,
    };

    request.validate()?;
    Ok(request)
}

/// Submit one label detection job for a storage event.
///
/// Only the first record is used: one event, one job.
pub async fn submit(
    config: &AppConfig,
    detector: &dyn LabelDetector,
    event: &StorageEvent,
) -> Result<AnalysisJobHandle, PipelineError> {
    let record = event
        .records
        .first()
        .ok_or_else(|| PipelineError::Validation("storage event has no records".to_string()))?;

    if event.records.len() > 1 {
        tracing::warn!(
            record_count = event.records.len(),
            "Storage event carries several records, only the first is submitted"
        );
    }

    let request = build_request(config, record)?;

    tracing::info!(
        bucket = %request.video.bucket,
        key = %request.video.key,
        event_name = ?record.event_name,
        "Starting label detection"
    );

    let handle = match detector.start_label_detection(&request).await {
        Ok(handle) => handle,
        Err(e) => {
            metrics::counter!("analysis_jobs_failed_total").increment(1);
            return Err(e.into());
        }
    };

    metrics::counter!("analysis_jobs_submitted_total").increment(1);
    tracing::info!(
        job_id = %handle.job_id,
        key = %request.video.key,
        "Label detection job started"
    );

    Ok(handle)
}
