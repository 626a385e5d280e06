//! Generated narrated video record.
//! One row is written per successful pipeline run.

use crate::compliance_details::ComplianceDetails;
use crate::compliance_status::ComplianceStatus;
use crate::meditag_segment::MeditagSegment;
use crate::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_deserializing)]
    pub id: Id,

    pub title: String,

    /// Upload this video was generated from. One upload may back any number
    /// of videos: a user can retry prompts against the same profile.
    pub upload_id: Id,

    /// The natural-language prompt that drove the script draft
    pub prompt: String,

    /// HCP profile text the narration was personalized for
    pub target_hcp: String,

    pub video_url: String,

    pub thumbnail_url: Option<String>,

    /// Spoken duration as estimated by the drafting model. Not reconciled
    /// against the synthesized media.
    pub duration_seconds: f64,

    pub compliance_status: ComplianceStatus,

    pub compliance_details: ComplianceDetails,

    pub meditag_segment: MeditagSegment,

    /// Narration text that was sent to the synthesis provider
    pub generated_script: String,

    #[serde(skip_deserializing)]
    pub created_at: DateTime<Utc>,
}
