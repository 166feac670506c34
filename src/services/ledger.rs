use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::models::job::JobId;

const KEY_PREFIX: &str = "video_watch:processed";

/// Record of completion notifications already handled, so redelivered
/// notifications do not produce a second alert.
#[async_trait]
pub trait ProcessedJobLedger: Send + Sync {
    /// Claim a job id. Returns `false` if it was already claimed.
    async fn claim(&self, job_id: &JobId) -> Result<bool, LedgerError>;

    /// Drop a claim so a later redelivery can process the job again.
    async fn release(&self, job_id: &JobId) -> Result<(), LedgerError>;

    /// Check backing store connectivity (for health checks).
    async fn health_check(&self) -> Result<(), LedgerError>;
}

/// Redis-backed ledger; claims expire after a fixed TTL.
pub struct RedisJobLedger {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisJobLedger {
    pub fn new(redis_url: &str, ttl_secs: u64) -> Result<Self, LedgerError> {
        let client = redis::Client::open(redis_url).map_err(LedgerError::Redis)?;
        Ok(Self { client, ttl_secs })
    }

    fn key(job_id: &JobId) -> String {
        format!("{KEY_PREFIX}:{job_id}")
    }
}

#[async_trait]
impl ProcessedJobLedger for RedisJobLedger {
    async fn claim(&self, job_id: &JobId) -> Result<bool, LedgerError> {
        let mut conn = self.client.get_multiplexed_async_connection().await.map_err(LedgerError::Redis)?;
        // SET NX replies OK when the key was written and nil when it existed.
        let reply: Option<String> = redis::cmd("SET")
            .arg(Self::key(job_id))
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async(&mut conn)
            .await
            .map_err(LedgerError::Redis)?;
        Ok(reply.is_some())
    }

    async fn release(&self, job_id: &JobId) -> Result<(), LedgerError> {
        let mut conn = self.client.get_multiplexed_async_connection().await.map_err(LedgerError::Redis)?;
        redis::cmd("DEL")
            .arg(Self::key(job_id))
            .query_async::<()>(&mut conn)
            .await
            .map_err(LedgerError::Redis)?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), LedgerError> {
        let mut conn = self.client.get_multiplexed_async_connection().await.map_err(LedgerError::Redis)?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(LedgerError::Redis)?;
        Ok(())
    }
}

/// Process-local ledger, used when no Redis is configured. Only
/// deduplicates within one instance. Claims expire like the Redis keys do.
#[derive(Debug)]
pub struct InMemoryLedger {
    ttl: Duration,
    claimed: Mutex<HashMap<JobId, Instant>>,
}

impl InMemoryLedger {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            claimed: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(Duration::from_secs(24 * 60 * 60))
    }
}

#[async_trait]
impl ProcessedJobLedger for InMemoryLedger {
    async fn claim(&self, job_id: &JobId) -> Result<bool, LedgerError> {
        let mut claimed = self.claimed.lock().map_err(|_| LedgerError::Poisoned)?;
        let now = Instant::now();
        claimed.retain(|_, expires_at| *expires_at > now);

        if claimed.contains_key(job_id) {
            return Ok(false);
        }
        claimed.insert(job_id.clone(), now + self.ttl);
        Ok(true)
    }

    async fn release(&self, job_id: &JobId) -> Result<(), LedgerError> {
        let mut claimed = self.claimed.lock().map_err(|_| LedgerError::Poisoned)?;
        claimed.remove(job_id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), LedgerError> {
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Ledger lock poisoned")]
    Poisoned,
}
