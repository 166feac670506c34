use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::job::JobStatus;

/// S3 event notification, as delivered for `s3:ObjectCreated:*`.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<StorageEventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEventRecord {
    #[serde(default)]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Object {
    /// URL-form-encoded object key.
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub e_tag: Option<String>,
    #[serde(default)]
    pub version_id: Option<String>,
    #[serde(default)]
    pub sequencer: Option<String>,
}

impl S3Object {
    /// Object key with S3's form encoding (`+` for space, `%XX`) removed.
    pub fn decoded_key(&self) -> String {
        percent_encoding::percent_decode_str(&self.key.replace('+', " "))
            .decode_utf8_lossy()
            .into_owned()
    }
}

/// Message Rekognition publishes to SNS when a job finishes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionNotification {
    /// Left empty when absent so the correlator can reject it explicitly.
    #[serde(rename = "JobId", default)]
    pub job_id: String,

    #[serde(rename = "Status", default)]
    pub status: Option<JobStatus>,

    #[serde(rename = "API", default)]
    pub api: Option<String>,

    #[serde(rename = "JobTag", default)]
    pub job_tag: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SnsMessageType {
    Notification,
    SubscriptionConfirmation,
    UnsubscribeConfirmation,
}

/// JSON envelope SNS wraps around every HTTP(S) delivery.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsEnvelope {
    #[serde(rename = "Type")]
    pub message_type: SnsMessageType,
    pub message_id: String,
    pub topic_arn: String,
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "SubscribeURL", default)]
    pub subscribe_url: Option<String>,
}

/// Body received on the notification webhook: either a full SNS envelope
/// or, with raw message delivery enabled, the Rekognition message itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NotificationDelivery {
    Envelope(SnsEnvelope),
    Raw(CompletionNotification),
}
