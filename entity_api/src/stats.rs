//! Aggregate compliance statistics over video records.
//! Derived on demand; never stored.

use entity::compliance_status::ComplianceStatus;
use entity::videos;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceStats {
    pub total_videos: usize,
    pub passed: usize,
    pub review: usize,
    pub failed: usize,
    /// Fraction of videos with a passed status; 0.0 when no videos exist
    pub pass_rate: f64,
    /// Mean estimated duration in seconds; 0.0 when no videos exist
    pub average_duration_seconds: f64,
}

pub fn compute(videos: &[videos::Model]) -> ComplianceStats {
    let total_videos = videos.len();
    let mut passed = 0;
    let mut review = 0;
    let mut failed = 0;
    let mut duration_sum = 0.0;

    for video in videos {
        match video.compliance_status {
            ComplianceStatus::Passed => passed += 1,
            ComplianceStatus::Review => review += 1,
            ComplianceStatus::Failed => failed += 1,
        }
        duration_sum += video.duration_seconds;
    }

    let (pass_rate, average_duration_seconds) = if total_videos == 0 {
        (0.0, 0.0)
    } else {
        (
            passed as f64 / total_videos as f64,
            duration_sum / total_videos as f64,
        )
    };

    ComplianceStats {
        total_videos,
        passed,
        review,
        failed,
        pass_rate,
        average_duration_seconds,
    }
}
