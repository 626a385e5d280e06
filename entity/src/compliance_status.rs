use serde::{Deserialize, Serialize};

/// Regulatory-compliance verdict for a generated narration script.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceStatus {
    /// Script cleared the rubric and can be surfaced without review
    Passed,
    /// Script needs a human compliance review before use
    Review,
    /// Script violates the rubric
    Failed,
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceStatus::Passed => write!(fmt, "passed"),
            ComplianceStatus::Review => write!(fmt, "review"),
            ComplianceStatus::Failed => write!(fmt, "failed"),
        }
    }
}
