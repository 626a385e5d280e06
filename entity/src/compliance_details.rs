use serde::{Deserialize, Serialize};

/// Structured outcome of a compliance evaluation, persisted alongside the
/// status on a generated video to drive dashboards and approvals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceDetails {
    /// Rubric score from 0 to 100
    pub score: i32,
    /// Specific problems the evaluator found in the narration
    pub issues: Vec<String>,
    /// Suggested wording or content changes
    pub recommendations: Vec<String>,
}
