use reqwest::Client;
use url::Url;

/// Confirms SNS HTTP(S) subscriptions by visiting the `SubscribeURL`
/// sent with a `SubscriptionConfirmation` message.
pub struct SubscriptionConfirmer {
    http: Client,
}

impl SubscriptionConfirmer {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    pub async fn confirm(&self, subscribe_url: &str) -> Result<(), SnsError> {
        let url = checked_subscribe_url(subscribe_url)?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(SnsError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SnsError::Rejected(status.as_u16()));
        }

        tracing::info!(host = ?response.url().host_str(), "SNS subscription confirmed");
        Ok(())
    }
}

/// Only HTTPS URLs on an SNS endpoint are followed.
fn checked_subscribe_url(raw: &str) -> Result<Url, SnsError> {
    let url = Url::parse(raw).map_err(|_| SnsError::UntrustedUrl(raw.to_string()))?;
    let trusted = url.scheme() == "https"
        && url
            .host_str()
            .is_some_and(|host| host.starts_with("sns.") && host.ends_with(".amazonaws.com"));
    if !trusted {
        return Err(SnsError::UntrustedUrl(raw.to_string()));
    }
    Ok(url)
}

#[derive(Debug, thiserror::Error)]
pub enum SnsError {
    #[error("Refusing to follow subscribe URL {0}")]
    UntrustedUrl(String),

    #[error("Subscription confirmation failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Subscription confirmation rejected with status {0}")]
    Rejected(u16),
}
