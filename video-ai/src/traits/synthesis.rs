//! Video synthesis provider trait.

use crate::types::synthesis::{Job, Submission, SubmitRequest};
use crate::Error;
use async_trait::async_trait;

/// Abstraction for services that render narration text into an avatar video.
///
/// Implementations submit a script and presenter identity, then expose job
/// completion either asynchronously (job id resolved by polling) or
/// synchronously (a directly-usable URL on the submission). Supports
/// providers like HeyGen and D-ID. This trait enables cost optimization by
/// swapping providers without code changes.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Submit narration text for rendering.
    ///
    /// Asynchronous providers return a job id for subsequent `resolve` calls;
    /// synchronous providers may populate `media_url` directly on the
    /// submission, in which case no polling is required.
    async fn submit(&self, request: SubmitRequest) -> Result<Submission, Error>;

    /// Retrieve current status and media URL for a submitted job.
    ///
    /// Poll this until status reaches Completed or Failed. The media URL
    /// populates when the provider finishes rendering.
    async fn resolve(&self, job_id: &str) -> Result<Job, Error>;

    /// Return unique identifier for this provider (e.g., "heygen", "d_id").
    ///
    /// Used for logging, cost tracking, and selecting providers at runtime.
    /// Must be lowercase, alphanumeric with underscores only.
    fn provider_id(&self) -> &str;

    /// Validate API credentials by making a lightweight test request.
    ///
    /// Call during deployment or settings updates to provide immediate feedback.
    /// Returns false if credentials are invalid, expired, or lack permissions.
    async fn verify_credentials(&self) -> Result<bool, Error>;
}
