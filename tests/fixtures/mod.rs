//! Payloads shaped like the ones S3 and SNS actually deliver

#![allow(dead_code)]

use serde_json::json;

use crate::helpers::TOPIC_ARN;

/// S3 `ObjectCreated:Put` notification for a single object.
pub fn storage_event(bucket: &str, key: &str, sequencer: Option<&str>) -> String {
    let mut object = json!({
        "key": key,
        "size": 5_242_880,
        "eTag": "d41d8cd98f00b204e9800998ecf8427e",
    });
    if let Some(sequencer) = sequencer {
        object["sequencer"] = json!(sequencer);
    }

    json!({
        "Records": [{
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "awsRegion": "eu-west-1",
            "eventTime": "2024-05-01T10:00:00.000Z",
            "eventName": "ObjectCreated:Put",
            "s3": {
                "s3SchemaVersion": "1.0",
                "configurationId": "video-upload",
                "bucket": {"name": bucket, "arn": format!("arn:aws:s3:::{bucket}")},
                "object": object
            }
        }]
    })
    .to_string()
}

/// Message Rekognition publishes when a label detection job finishes.
pub fn rekognition_message(job_id: &str, status: &str) -> String {
    json!({
        "JobId": job_id,
        "Status": status,
        "API": "StartLabelDetection",
        "JobTag": "VideoWatchStartLabelDetection",
        "Timestamp": 1714557600000u64,
        "Video": {"S3ObjectName": "clip1.mp4", "S3Bucket": "videos"}
    })
    .to_string()
}

fn envelope(message_type: &str, topic_arn: &str, message: String) -> serde_json::Value {
    json!({
        "Type": message_type,
        "MessageId": "22b80b92-fdea-4c2c-8f9d-bdfb0c7bf324",
        "TopicArn": topic_arn,
        "Subject": null,
        "Message": message,
        "Timestamp": "2024-05-01T10:05:00.000Z",
        "SignatureVersion": "1",
        "Signature": "EXAMPLE",
        "SigningCertURL": "https://sns.eu-west-1.amazonaws.com/SimpleNotificationService.pem",
        "UnsubscribeURL": "https://sns.eu-west-1.amazonaws.com/?Action=Unsubscribe"
    })
}

/// SNS HTTP delivery wrapping a Rekognition completion message.
pub fn sns_notification(job_id: &str) -> String {
    envelope("Notification", TOPIC_ARN, rekognition_message(job_id, "SUCCEEDED")).to_string()
}

/// SNS delivery whose message has no `JobId` at all.
pub fn sns_notification_without_job_id() -> String {
    envelope(
        "Notification",
        TOPIC_ARN,
        json!({"Status": "SUCCEEDED", "API": "StartLabelDetection"}).to_string(),
    )
    .to_string()
}

pub fn sns_notification_from_topic(topic_arn: &str, job_id: &str) -> String {
    envelope("Notification", topic_arn, rekognition_message(job_id, "SUCCEEDED")).to_string()
}

pub fn sns_subscription_confirmation(subscribe_url: &str) -> String {
    let mut body = envelope(
        "SubscriptionConfirmation",
        TOPIC_ARN,
        "You have chosen to subscribe to the topic.".to_string(),
    );
    body["SubscribeURL"] = json!(subscribe_url);
    body["Token"] = json!("2336412f37f");
    body.to_string()
}

pub fn sns_unsubscribe_confirmation() -> String {
    envelope(
        "UnsubscribeConfirmation",
        TOPIC_ARN,
        "You have chosen to deactivate subscription.".to_string(),
    )
    .to_string()
}
