//! Types for video synthesis operations.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a synthesis job.
///
/// Jobs transition from Queued → Processing → Completed. Failed may occur at
/// any point due to auth issues, invalid presenters, or rendering errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

/// Narration script and presenter identity submitted to a provider.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub script: String,
    pub presenter_id: String,
}

/// Result of submitting a render request.
///
/// Asynchronous providers return only `job_id`; synchronous providers may
/// populate `media_url` directly, making any `resolve` calls unnecessary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub job_id: String,
    pub media_url: Option<String>,
}

/// Complete information about a synthesis job's state and output.
///
/// Monitor the status field; `media_url` becomes available when status
/// reaches Completed. Check `error_message` when status is Failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub media_url: Option<String>,
    pub error_message: Option<String>,
}
