use std::time::Instant;

use serde::Serialize;

use crate::error::PipelineError;
use crate::models::events::CompletionNotification;
use crate::models::job::{JobId, JobStatus};
use crate::models::message::OutboundMessage;
use crate::services::ledger::ProcessedJobLedger;
use crate::services::messenger::MessageSink;
use crate::services::rekognition::LabelDetector;
use crate::services::report;
use crate::services::taxonomy::{SuspicionTaxonomy, SuspiciousFindings};

/// Collaborators a correlation run needs.
pub struct Correlator<'a> {
    pub detector: &'a dyn LabelDetector,
    pub messenger: &'a dyn MessageSink,
    pub ledger: &'a dyn ProcessedJobLedger,
    pub taxonomy: &'a SuspicionTaxonomy,
    pub recipient_id: &'a str,
}

/// How one completion notification was handled.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CorrelationOutcome {
    /// The job id was already processed; nothing was sent.
    Duplicate { job_id: JobId },
    Processed(CorrelationReport),
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationReport {
    pub job_id: JobId,
    pub status: JobStatus,
    pub label_count: usize,
    pub findings: SuspiciousFindings,
    pub message: OutboundMessage,
    pub delivered: bool,
}

impl Correlator<'_> {
    /// Parse, fetch, classify, compose and deliver for one notification.
    pub async fn handle(
        &self,
        notification: &CompletionNotification,
    ) -> Result<CorrelationOutcome, PipelineError> {
        let job_id = JobId::parse(&notification.job_id)?;
        metrics::counter!("completion_notifications_total").increment(1);

        tracing::info!(
            job_id = %job_id,
            notified_status = ?notification.status,
            api = ?notification.api,
            job_tag = ?notification.job_tag,
            "Received job completion notification"
        );

        if !self.ledger.claim(&job_id).await? {
            metrics::counter!("duplicate_notifications_total").increment(1);
            tracing::info!(job_id = %job_id, "Notification already processed, skipping");
            return Ok(CorrelationOutcome::Duplicate { job_id });
        }

        match self.correlate(&job_id).await {
            Ok(report) => Ok(CorrelationOutcome::Processed(report)),
            Err(e) => {
                // Let a redelivery try again.
                if let Err(release_err) = self.ledger.release(&job_id).await {
                    tracing::error!(
                        job_id = %job_id,
                        error = %release_err,
                        "Failed to release processed-job claim"
                    );
                }
                Err(e)
            }
        }
    }

    async fn correlate(&self, job_id: &JobId) -> Result<CorrelationReport, PipelineError> {
        let start = Instant::now();

        let result = self.detector.get_label_detection(job_id).await?;

        tracing::info!(
            job_id = %job_id,
            status = %result.status,
            label_count = result.labels.len(),
            "Label detection result acquired"
        );

        if result.status != JobStatus::Succeeded {
            tracing::warn!(
                job_id = %job_id,
                status = %result.status,
                status_message = ?result.status_message,
                "Label detection job did not succeed"
            );
        }

        let findings = self.taxonomy.classify(&result.labels);
        metrics::counter!("suspicious_findings_total").increment(findings.len() as u64);

        let message = OutboundMessage {
            recipient_id: self.recipient_id.to_string(),
            text: report::compose(job_id, &findings),
        };

        tracing::info!(
            job_id = %job_id,
            findings = ?findings,
            "Composed analysis message"
        );

        let delivered = match self.messenger.send(&message).await {
            Ok(receipt) => {
                tracing::info!(
                    job_id = %job_id,
                    status = receipt.status,
                    "Analysis message delivered"
                );
                true
            }
            Err(e) => {
                metrics::counter!("message_deliveries_failed_total").increment(1);
                tracing::error!(job_id = %job_id, error = %e, "Analysis message delivery failed");
                false
            }
        };

        metrics::histogram!("result_correlation_seconds").record(start.elapsed().as_secs_f64());

        Ok(CorrelationReport {
            job_id: job_id.clone(),
            status: result.status,
            label_count: result.labels.len(),
            findings,
            message,
            delivered,
        })
    }
}
