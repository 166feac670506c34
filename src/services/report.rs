use crate::models::job::JobId;
use crate::services::taxonomy::SuspiciousFindings;

pub const NO_FINDINGS_TEXT: &str = "There is no suspicious activity detected in this video";
pub const FINDINGS_HEADING: &str = "Detected suspicious activities :";

/// Header line identifying the job a message is about.
pub fn header(job_id: &JobId) -> String {
    format!("Analysis result for video with job id: {job_id}")
}

/// Render the alert text for a job's findings.
///
/// Findings are listed one per line in the set's (alphabetical) order.
pub fn compose(job_id: &JobId, findings: &SuspiciousFindings) -> String {
    let mut text = header(job_id);
    text.push_str("\n\n");

    if findings.is_empty() {
        text.push_str(NO_FINDINGS_TEXT);
    } else {
        text.push_str(FINDINGS_HEADING);
        text.push('\n');
        for finding in findings {
            text.push_str(finding);
            text.push('\n');
        }
    }

    text
}
