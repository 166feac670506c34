use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;
use crate::error::PipelineError;
use crate::models::events::{
    CompletionNotification, NotificationDelivery, SnsMessageType, StorageEvent,
};
use crate::models::job::JobId;
use crate::services::correlator::CorrelationOutcome;
use crate::services::submitter;

/// Header SNS sets on every HTTP(S) delivery, raw or enveloped.
pub const TOPIC_ARN_HEADER: &str = "x-amz-sns-topic-arn";

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub status: &'static str,
    pub job_id: JobId,
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub status: &'static str,
    /// `correlated`, `subscription_confirmed` or `ignored`
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CorrelationOutcome>,
}

impl NotificationResponse {
    fn without_outcome(action: &'static str) -> Self {
        Self {
            status: "success",
            action,
            outcome: None,
        }
    }
}

/// POST /events/storage: a new video was stored, start label detection.
pub async fn storage_event(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<SubmissionResponse>, PipelineError> {
    let event: StorageEvent = serde_json::from_str(&body)?;
    let handle = submitter::submit(&state.config, state.detector.as_ref(), &event).await?;

    Ok(Json(SubmissionResponse {
        status: "success",
        job_id: handle.job_id,
    }))
}

/// POST /events/notification: SNS delivery announcing a finished job.
pub async fn completion_notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<NotificationResponse>, PipelineError> {
    // SNS posts with a text/plain content type, so the body is parsed by hand.
    let notification = match serde_json::from_str::<NotificationDelivery>(&body)? {
        NotificationDelivery::Raw(notification) => {
            // A raw message carries no topic of its own.
            let topic_arn = headers
                .get(TOPIC_ARN_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            ensure_expected_topic(&state, topic_arn)?;
            notification
        }
        NotificationDelivery::Envelope(envelope) => {
            ensure_expected_topic(&state, &envelope.topic_arn)?;

            tracing::debug!(
                message_id = %envelope.message_id,
                message_type = ?envelope.message_type,
                timestamp = ?envelope.timestamp,
                "Received SNS delivery"
            );

            match envelope.message_type {
                SnsMessageType::Notification => {
                    serde_json::from_str::<CompletionNotification>(&envelope.message)?
                }
                SnsMessageType::SubscriptionConfirmation => {
                    let subscribe_url = envelope.subscribe_url.ok_or_else(|| {
                        PipelineError::Validation("SubscriptionConfirmation without SubscribeURL".to_string())
                    })?;
                    state.confirmer.confirm(&subscribe_url).await?;
                    return Ok(Json(NotificationResponse::without_outcome(
                        "subscription_confirmed",
                    )));
                }
                SnsMessageType::UnsubscribeConfirmation => {
                    tracing::warn!(topic_arn = %envelope.topic_arn, "SNS subscription removed");
                    return Ok(Json(NotificationResponse::without_outcome("ignored")));
                }
            }
        }
    };

    let outcome = state.correlator().handle(&notification).await?;

    Ok(Json(NotificationResponse {
        status: "success",
        action: "correlated",
        outcome: Some(outcome),
    }))
}

fn ensure_expected_topic(state: &AppState, topic_arn: &str) -> Result<(), PipelineError> {
    if topic_arn != state.config.sns_topic_arn {
        return Err(PipelineError::ForeignTopic(topic_arn.to_string()));
    }
    Ok(())
}
