use serde::{Deserialize, Serialize};

/// Meditag marketing-behavior segment assigned to an HCP profile.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeditagSegment {
    /// Adopts new treatments quickly, typically high prescription volume
    EarlyAdopter,
    /// Waits for strong clinical evidence before changing practice
    EvidenceDriven,
    /// Follows peer consensus once a treatment is established
    Mainstream,
    /// Rarely changes prescribing habits
    Conservative,
    /// No strong signal present in the profile
    #[default]
    General,
}

impl std::fmt::Display for MeditagSegment {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeditagSegment::EarlyAdopter => write!(fmt, "early_adopter"),
            MeditagSegment::EvidenceDriven => write!(fmt, "evidence_driven"),
            MeditagSegment::Mainstream => write!(fmt, "mainstream"),
            MeditagSegment::Conservative => write!(fmt, "conservative"),
            MeditagSegment::General => write!(fmt, "general"),
        }
    }
}
