//! Persistence collaborator contract for uploads and generated videos.

use crate::error::Error;
use async_trait::async_trait;
use entity::compliance_details::ComplianceDetails;
use entity::compliance_status::ComplianceStatus;
use entity::meditag_segment::MeditagSegment;
use entity::{uploads, videos, Id};

/// Fields for creating a new upload record.
/// The store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub user_id: Id,
    pub hcp_text: String,
    pub document_path: Option<String>,
}

/// Fields for creating a new video record.
/// The store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub upload_id: Id,
    pub prompt: String,
    pub target_hcp: String,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: f64,
    pub compliance_status: ComplianceStatus,
    pub compliance_details: ComplianceDetails,
    pub meditag_segment: MeditagSegment,
    pub generated_script: String,
}

/// Backing store for upload and video records.
///
/// Modeled as a trait so upper layers receive an explicitly constructed,
/// injected handle and tests can substitute a double. Upload records are
/// immutable once created; video records are mutated only by the explicit
/// compliance-approval transition or deleted outright.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_upload(&self, new_upload: NewUpload) -> Result<uploads::Model, Error>;

    async fn get_upload(&self, id: Id) -> Result<uploads::Model, Error>;

    async fn create_video(&self, new_video: NewVideo) -> Result<videos::Model, Error>;

    async fn get_video(&self, id: Id) -> Result<videos::Model, Error>;

    /// Newest-first. A `limit` of `None` returns all rows.
    async fn list_videos(&self, limit: Option<usize>) -> Result<Vec<videos::Model>, Error>;

    /// Returns `false` when no record with `id` exists.
    async fn delete_video(&self, id: Id) -> Result<bool, Error>;

    /// Sets the compliance status of an existing video record.
    async fn update_video_compliance(
        &self,
        id: Id,
        status: ComplianceStatus,
    ) -> Result<videos::Model, Error>;
}
