use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::models::message::{OutboundMessage, SendMessageRequest};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where composed alerts are sent.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, MessengerError>;
}

/// What the sink answered. Logged, never interpreted.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub status: u16,
    pub body: String,
}

/// Client for the Facebook Messenger Send API.
pub struct MessengerClient {
    http: Client,
    endpoint: String,
    access_token: String,
}

impl MessengerClient {
    pub fn new(graph_api_url: &str, access_token: &str) -> Result<Self, MessengerError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(MessengerError::Http)?;

        Ok(Self {
            http,
            endpoint: format!("{}/me/messages", graph_api_url.trim_end_matches('/')),
            access_token: access_token.to_string(),
        })
    }
}

#[async_trait]
impl MessageSink for MessengerClient {
    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, MessengerError> {
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("access_token", &self.access_token)])
            .json(&SendMessageRequest::from(message))
            .send()
            .await
            .map_err(MessengerError::from_request)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(MessengerError::from_request)?;

        tracing::info!(
            status = status.as_u16(),
            response = %body,
            "Received Messenger response"
        );

        if !status.is_success() {
            return Err(MessengerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(DeliveryReceipt {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MessengerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Messenger rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl MessengerError {
    /// The request URL carries the page access token; keep it out of logs.
    fn from_request(error: reqwest::Error) -> Self {
        MessengerError::Http(error.without_url())
    }
}
