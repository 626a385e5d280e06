//! Aggregate compliance statistics for dashboards.

use crate::error::Error;
use entity_api::stats::{self, ComplianceStats};
use entity_api::store::Store;

/// Computes the dashboard aggregate over all stored videos.
pub async fn compliance_stats(store: &dyn Store) -> Result<ComplianceStats, Error> {
    let videos = store.list_videos(None).await?;
    Ok(stats::compute(&videos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::compliance_details::ComplianceDetails;
    use entity::compliance_status::ComplianceStatus;
    use entity::meditag_segment::MeditagSegment;
    use entity::Id;
    use entity_api::memory::InMemoryStore;
    use entity_api::store::NewVideo;

    #[tokio::test]
    async fn test_compliance_stats_over_store() {
        let store = InMemoryStore::new();
        for (status, duration) in [
            (ComplianceStatus::Passed, 6.0),
            (ComplianceStatus::Review, 10.0),
        ] {
            store
                .create_video(NewVideo {
                    title: "Title".to_string(),
                    upload_id: Id::new_v4(),
                    prompt: "Prompt".to_string(),
                    target_hcp: "HCP".to_string(),
                    video_url: "/assets/placeholder-video.mp4".to_string(),
                    thumbnail_url: None,
                    duration_seconds: duration,
                    compliance_status: status,
                    compliance_details: ComplianceDetails {
                        score: 70,
                        issues: vec![],
                        recommendations: vec![],
                    },
                    meditag_segment: MeditagSegment::General,
                    generated_script: "Narration".to_string(),
                })
                .await
                .unwrap();
        }

        let stats = compliance_stats(&store).await.unwrap();
        assert_eq!(stats.total_videos, 2);
        assert_eq!(stats.passed, 1);
        assert_eq!(stats.pass_rate, 0.5);
        assert_eq!(stats.average_duration_seconds, 8.0);
    }
}
