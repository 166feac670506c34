use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// AWS region hosting Rekognition, S3 and SNS
    pub region: String,

    /// Bucket the uploaded videos are stored in
    pub s3_bucket_name: String,

    /// SNS topic Rekognition publishes job completion to
    pub sns_topic_arn: String,

    /// IAM role Rekognition assumes to publish to the topic
    pub rekognition_role_arn: String,

    /// Messenger page access token
    pub fb_messenger_access_token: String,

    /// Page-scoped id of the alert recipient
    pub fb_messenger_psid: String,

    /// Graph API base URL, version included
    #[serde(default = "default_graph_api_url")]
    pub graph_api_url: String,

    /// Redis connection string for the processed-notification ledger.
    /// Deduplication is process-local when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// How long a processed job id is remembered, at least one second
    #[serde(default = "default_processed_job_ttl_secs")]
    pub processed_job_ttl_secs: u64,

    /// Keywords appended to the built-in suspicion taxonomy (comma separated)
    #[serde(default)]
    pub extra_suspicious_labels: Vec<String>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_graph_api_url() -> String {
    "https://graph.facebook.com/v3.2".to_string()
}

fn default_processed_job_ttl_secs() -> u64 {
    24 * 60 * 60
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>()?.checked()
    }

    /// Reject values that parse but cannot work at runtime.
    pub fn checked(self) -> Result<Self, envy::Error> {
        if self.processed_job_ttl_secs == 0 {
            return Err(envy::Error::Custom(
                "PROCESSED_JOB_TTL_SECS must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}
