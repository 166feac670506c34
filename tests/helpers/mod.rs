//! Test doubles and app construction shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use video_watch::app_state::AppState;
use video_watch::config::AppConfig;
use video_watch::models::job::{
    AnalysisJobHandle, AnalysisJobRequest, AnalysisResult, DetectedLabel, JobId, JobStatus,
};
use video_watch::models::message::OutboundMessage;
use video_watch::routes;
use video_watch::services::ledger::{InMemoryLedger, ProcessedJobLedger};
use video_watch::services::messenger::{DeliveryReceipt, MessageSink, MessengerError};
use video_watch::services::rekognition::{DetectionError, LabelDetector};
use video_watch::services::sns::SubscriptionConfirmer;

pub const TOPIC_ARN: &str = "arn:aws:sns:eu-west-1:123456789012:label-detection";
pub const RECIPIENT: &str = "psid-1234";

/// Configuration with safe defaults; nothing in it points at a real service.
pub fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        region: "eu-west-1".to_string(),
        s3_bucket_name: "videos".to_string(),
        sns_topic_arn: TOPIC_ARN.to_string(),
        rekognition_role_arn: "arn:aws:iam::123456789012:role/rekognition-sns".to_string(),
        fb_messenger_access_token: "test-token".to_string(),
        fb_messenger_psid: RECIPIENT.to_string(),
        graph_api_url: "http://127.0.0.1:9".to_string(),
        redis_url: None,
        processed_job_ttl_secs: 60,
        extra_suspicious_labels: Vec::new(),
    }
}

pub fn labels(names: &[&str]) -> Vec<DetectedLabel> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| DetectedLabel {
            name: name.to_string(),
            confidence: 87.5,
            timestamp_ms: i as i64 * 1000,
        })
        .collect()
}

pub fn succeeded(names: &[&str]) -> AnalysisResult {
    AnalysisResult {
        status: JobStatus::Succeeded,
        status_message: None,
        labels: labels(names),
    }
}

/// In-memory stand-in for Rekognition.
#[derive(Default)]
pub struct FakeDetector {
    results: Mutex<HashMap<String, AnalysisResult>>,
    submitted: Mutex<Vec<AnalysisJobRequest>>,
    fetched: Mutex<Vec<String>>,
    fail_start: bool,
    fail_fetch: bool,
}

impl FakeDetector {
    pub fn with_result(job_id: &str, result: AnalysisResult) -> Self {
        Self::with_results([(job_id, result)])
    }

    pub fn with_results<'a>(results: impl IntoIterator<Item = (&'a str, AnalysisResult)>) -> Self {
        let detector = Self::default();
        detector.results.lock().unwrap().extend(
            results
                .into_iter()
                .map(|(job_id, result)| (job_id.to_string(), result)),
        );
        detector
    }

    pub fn failing() -> Self {
        Self {
            fail_start: true,
            fail_fetch: true,
            ..Self::default()
        }
    }

    pub fn submitted(&self) -> Vec<AnalysisJobRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl LabelDetector for FakeDetector {
    async fn start_label_detection(
        &self,
        request: &AnalysisJobRequest,
    ) -> Result<AnalysisJobHandle, DetectionError> {
        if self.fail_start {
            return Err(DetectionError::Service("AccessDeniedException".to_string()));
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(request.clone());
        let job_id = JobId::parse(&format!("job-{}", submitted.len())).unwrap();
        Ok(AnalysisJobHandle { job_id })
    }

    async fn get_label_detection(&self, job_id: &JobId) -> Result<AnalysisResult, DetectionError> {
        self.fetched.lock().unwrap().push(job_id.to_string());
        if self.fail_fetch {
            return Err(DetectionError::Service("ThrottlingException".to_string()));
        }
        self.results
            .lock()
            .unwrap()
            .get(job_id.as_str())
            .cloned()
            .ok_or_else(|| DetectionError::Service("InvalidParameterException".to_string()))
    }
}

/// Messaging sink that records what it was asked to send.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<OutboundMessage>>,
    reject: bool,
}

impl RecordingSink {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, MessengerError> {
        self.sent.lock().unwrap().push(message.clone());
        if self.reject {
            return Err(MessengerError::Rejected {
                status: 400,
                body: r#"{"error":{"message":"Invalid OAuth access token."}}"#.to_string(),
            });
        }
        Ok(DeliveryReceipt {
            status: 200,
            body: r#"{"recipient_id":"psid-1234","message_id":"mid.1"}"#.to_string(),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub detector: Arc<FakeDetector>,
    pub sink: Arc<RecordingSink>,
    pub ledger: Arc<InMemoryLedger>,
}

/// Build the application router around the given fakes, mirroring `main`.
pub fn build_test_app(detector: FakeDetector, sink: RecordingSink) -> TestApp {
    let detector = Arc::new(detector);
    let sink = Arc::new(sink);
    let ledger = Arc::new(InMemoryLedger::default());

    let state = AppState::new(
        test_config(),
        detector.clone(),
        sink.clone(),
        ledger.clone() as Arc<dyn ProcessedJobLedger>,
        SubscriptionConfirmer::new(reqwest::Client::new()),
    );

    TestApp {
        router: routes::router(state),
        detector,
        sink,
        ledger,
    }
}

pub async fn post_json(app: &TestApp, uri: &str, body: String) -> Response<Body> {
    post_with_headers(app, uri, &[], body).await
}

pub async fn post_with_headers(
    app: &TestApp,
    uri: &str,
    headers: &[(&str, &str)],
    body: String,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "text/plain; charset=UTF-8");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(Body::from(body)).unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
