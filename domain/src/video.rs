//! Generated video operations.

use crate::error::Error;
use entity::compliance_status::ComplianceStatus;
use entity::{videos, Id};
use entity_api::store::Store;
use log::*;

pub async fn find_by_id(store: &dyn Store, id: Id) -> Result<videos::Model, Error> {
    Ok(store.get_video(id).await?)
}

/// Lists stored videos newest-first.
pub async fn list(store: &dyn Store, limit: Option<usize>) -> Result<Vec<videos::Model>, Error> {
    Ok(store.list_videos(limit).await?)
}

/// Returns `false` when no video with `id` exists; deletion of a missing
/// record is not an error.
pub async fn delete_by_id(store: &dyn Store, id: Id) -> Result<bool, Error> {
    Ok(store.delete_video(id).await?)
}

/// Explicit user compliance approval: Review and Failed transition to
/// Passed. Approving an already-passed video is a no-op returning the
/// record unchanged.
pub async fn approve_compliance(store: &dyn Store, id: Id) -> Result<videos::Model, Error> {
    let video = store.get_video(id).await?;
    match video.compliance_status {
        ComplianceStatus::Passed => Ok(video),
        ComplianceStatus::Review | ComplianceStatus::Failed => {
            info!("Approving compliance for video: {id}");
            Ok(store
                .update_video_compliance(id, ComplianceStatus::Passed)
                .await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_api::memory::InMemoryStore;
    use entity_api::store::NewVideo;
    use entity::compliance_details::ComplianceDetails;
    use entity::meditag_segment::MeditagSegment;

    async fn seeded_video(store: &InMemoryStore, status: ComplianceStatus) -> videos::Model {
        store
            .create_video(NewVideo {
                title: "Cardiologists: Heart Failure Drug".to_string(),
                upload_id: Id::new_v4(),
                prompt: "Create a video about a new heart failure drug".to_string(),
                target_hcp: "Cardiologist".to_string(),
                video_url: "https://cdn.example.com/renders/1.mp4".to_string(),
                thumbnail_url: Some("https://cdn.example.com/renders/1.jpg".to_string()),
                duration_seconds: 7.0,
                compliance_status: status,
                compliance_details: ComplianceDetails {
                    score: 55,
                    issues: vec!["Missing safety disclosure".to_string()],
                    recommendations: vec![],
                },
                meditag_segment: MeditagSegment::EarlyAdopter,
                generated_script: "Narration".to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_approve_compliance_transitions_review_to_passed() {
        let store = InMemoryStore::new();
        let video = seeded_video(&store, ComplianceStatus::Review).await;

        let approved = approve_compliance(&store, video.id).await.unwrap();
        assert_eq!(approved.compliance_status, ComplianceStatus::Passed);
    }

    #[tokio::test]
    async fn test_approve_compliance_transitions_failed_to_passed() {
        let store = InMemoryStore::new();
        let video = seeded_video(&store, ComplianceStatus::Failed).await;

        let approved = approve_compliance(&store, video.id).await.unwrap();
        assert_eq!(approved.compliance_status, ComplianceStatus::Passed);
    }

    #[tokio::test]
    async fn test_approve_compliance_is_noop_for_passed() {
        let store = InMemoryStore::new();
        let video = seeded_video(&store, ComplianceStatus::Passed).await;

        let approved = approve_compliance(&store, video.id).await.unwrap();
        assert_eq!(approved, video);
    }

    #[tokio::test]
    async fn test_approve_compliance_missing_video_is_not_found() {
        let store = InMemoryStore::new();
        let err = approve_compliance(&store, Id::new_v4()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_missing_video_returns_false_without_error() {
        let store = InMemoryStore::new();
        assert!(!delete_by_id(&store, Id::new_v4()).await.unwrap());
    }
}
