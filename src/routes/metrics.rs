use axum::extract::State;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Prometheus scrape endpoint, text exposition format.
pub async fn prometheus_metrics(State(handle): State<Arc<PrometheusHandle>>) -> impl IntoResponse {
    handle.render()
}

/// Register descriptions for the metrics the pipeline records.
pub fn describe() {
    metrics::describe_counter!(
        "analysis_jobs_submitted_total",
        "Label detection jobs started"
    );
    metrics::describe_counter!(
        "analysis_jobs_failed_total",
        "Label detection jobs Rekognition refused to start"
    );
    metrics::describe_counter!(
        "completion_notifications_total",
        "Job completion notifications with a valid job id"
    );
    metrics::describe_counter!(
        "duplicate_notifications_total",
        "Redelivered notifications skipped by the ledger"
    );
    metrics::describe_counter!(
        "suspicious_findings_total",
        "Suspicious findings reported across all jobs"
    );
    metrics::describe_counter!(
        "message_deliveries_failed_total",
        "Alert messages the messaging sink did not accept"
    );
    metrics::describe_histogram!(
        "result_correlation_seconds",
        "Time from fetching job results to delivering the alert"
    );
}
