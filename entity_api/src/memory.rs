//! In-memory `Store` implementation.
//! Backs single-process runs and the orchestrator test suite; a SQL-backed
//! implementation plugs in behind the same trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use log::*;
use tokio::sync::RwLock;

use crate::error::{EntityApiErrorKind, Error};
use crate::store::{NewUpload, NewVideo, Store};
use entity::compliance_status::ComplianceStatus;
use entity::{uploads, videos, Id};

#[derive(Default)]
struct VideoRows {
    rows: HashMap<Id, videos::Model>,
    // Insertion order, oldest first
    order: Vec<Id>,
}

#[derive(Default)]
pub struct InMemoryStore {
    uploads: RwLock<HashMap<Id, uploads::Model>>,
    videos: RwLock<VideoRows>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create_upload(&self, new_upload: NewUpload) -> Result<uploads::Model, Error> {
        let model = uploads::Model {
            id: Id::new_v4(),
            user_id: new_upload.user_id,
            hcp_text: new_upload.hcp_text,
            document_path: new_upload.document_path,
            created_at: Utc::now(),
        };

        debug!("Creating new upload: {}", model.id);
        self.uploads.write().await.insert(model.id, model.clone());
        Ok(model)
    }

    async fn get_upload(&self, id: Id) -> Result<uploads::Model, Error> {
        self.uploads
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordNotFound,
            })
    }

    async fn create_video(&self, new_video: NewVideo) -> Result<videos::Model, Error> {
        let model = videos::Model {
            id: Id::new_v4(),
            title: new_video.title,
            upload_id: new_video.upload_id,
            prompt: new_video.prompt,
            target_hcp: new_video.target_hcp,
            video_url: new_video.video_url,
            thumbnail_url: new_video.thumbnail_url,
            duration_seconds: new_video.duration_seconds,
            compliance_status: new_video.compliance_status,
            compliance_details: new_video.compliance_details,
            meditag_segment: new_video.meditag_segment,
            generated_script: new_video.generated_script,
            created_at: Utc::now(),
        };

        debug!("Creating new video: {}", model.id);
        let mut inner = self.videos.write().await;
        inner.order.push(model.id);
        inner.rows.insert(model.id, model.clone());
        Ok(model)
    }

    async fn get_video(&self, id: Id) -> Result<videos::Model, Error> {
        self.videos
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordNotFound,
            })
    }

    async fn list_videos(&self, limit: Option<usize>) -> Result<Vec<videos::Model>, Error> {
        let inner = self.videos.read().await;
        let mut listed: Vec<videos::Model> = inner
            .order
            .iter()
            .rev()
            .filter_map(|id| inner.rows.get(id).cloned())
            .collect();
        if let Some(limit) = limit {
            listed.truncate(limit);
        }
        Ok(listed)
    }

    async fn delete_video(&self, id: Id) -> Result<bool, Error> {
        let mut inner = self.videos.write().await;
        if inner.rows.remove(&id).is_some() {
            inner.order.retain(|ordered| *ordered != id);
            debug!("Deleted video: {id}");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn update_video_compliance(
        &self,
        id: Id,
        status: ComplianceStatus,
    ) -> Result<videos::Model, Error> {
        let mut inner = self.videos.write().await;
        match inner.rows.get_mut(&id) {
            Some(existing) => {
                debug!("Updating video compliance status to {status}: {id}");
                existing.compliance_status = status;
                Ok(existing.clone())
            }
            None => Err(Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordNotFound,
            }),
        }
    }
}
