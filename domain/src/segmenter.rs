//! HCP profile parsing and Meditag segment assignment.
//!
//! Pure functions over the submitted free text. Segmentation never fails:
//! when no signal is present it degrades to the `General` segment with a
//! default confidence.

use entity::meditag_segment::MeditagSegment;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Specialty keywords matched as substrings, mapped to their canonical
/// specialty name. Stems cover both the field form ("Cardiology") and the
/// practitioner form ("Cardiologist").
const SPECIALTY_KEYWORDS: &[(&str, &str)] = &[
    ("oncolog", "Oncology"),
    ("cardiolog", "Cardiology"),
    ("neurolog", "Neurology"),
    ("endocrinolog", "Endocrinology"),
    ("pediatric", "Pediatrics"),
    ("psychiatr", "Psychiatry"),
    ("dermatolog", "Dermatology"),
    ("general practi", "General Practice"),
    ("primary care", "General Practice"),
];

/// Practices at or above this headcount count as large for the
/// Cardiology adjustment.
const LARGE_PRACTICE_HEADCOUNT: u32 = 50;

static SPECIALTY_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)specialty\s*[:=]\s*([A-Za-z][A-Za-z /-]*)").expect("hardcoded regex compiles")
});
static PRESCRIPTION_RATE_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)prescription[_\s]?rate\s*[:=]\s*([0-9]*\.?[0-9]+)\s*(%)?")
        .expect("hardcoded regex compiles")
});
static YEARS_EXPERIENCE_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)years[_\s]?(?:of[_\s])?experience\s*[:=]\s*([0-9]+)")
        .expect("hardcoded regex compiles")
});
static PRACTICE_SIZE_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)practice[_\s]?size\s*[:=]\s*([A-Za-z0-9]+)").expect("hardcoded regex compiles")
});

/// Optional-field record parsed from HCP free text.
/// Recomputed fresh on every pipeline run; any field may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HcpProfile {
    pub specialty: Option<String>,
    pub prescription_rate: Option<f64>,
    pub practice_size: Option<String>,
    pub years_experience: Option<u32>,
}

/// Segment assignment with confidence and a human-readable rationale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentResult {
    pub segment: MeditagSegment,
    /// May drift slightly outside [0, 1] after the specialty adjustment;
    /// callers clamp defensively before presenting it.
    pub confidence: f64,
    pub reasoning: String,
}

/// Parses the raw HCP text and assigns a Meditag segment.
pub fn segment(hcp_text: &str) -> SegmentResult {
    classify(&parse_profile(hcp_text))
}

/// Extracts labeled fields and specialty keywords from HCP free text.
/// An explicit `specialty:` field takes priority over keyword matches.
pub fn parse_profile(hcp_text: &str) -> HcpProfile {
    let lowered = hcp_text.to_lowercase();

    let specialty = SPECIALTY_FIELD
        .captures(hcp_text)
        .map(|captures| canonicalize_specialty(captures[1].trim()))
        .or_else(|| {
            SPECIALTY_KEYWORDS
                .iter()
                .find(|(stem, _)| lowered.contains(stem))
                .map(|(_, canonical)| canonical.to_string())
        });

    let prescription_rate = PRESCRIPTION_RATE_FIELD.captures(hcp_text).and_then(|captures| {
        let raw: f64 = captures[1].parse().ok()?;
        // Accept "80%" and bare "80" as percentages of the 0-1 scale
        if captures.get(2).is_some() || raw > 1.0 {
            Some(raw / 100.0)
        } else {
            Some(raw)
        }
    });

    let years_experience = YEARS_EXPERIENCE_FIELD
        .captures(hcp_text)
        .and_then(|captures| captures[1].parse().ok());

    let practice_size = PRACTICE_SIZE_FIELD
        .captures(hcp_text)
        .map(|captures| captures[1].to_string());

    HcpProfile {
        specialty,
        prescription_rate,
        practice_size,
        years_experience,
    }
}

fn canonicalize_specialty(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    SPECIALTY_KEYWORDS
        .iter()
        .find(|(stem, _)| lowered.contains(stem))
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Assigns a segment from a parsed profile.
///
/// The prescription-rate rule takes precedence; the experience-based rule
/// only applies when no rate was parsed. Specialty adjustments shift the
/// confidence afterwards and intentionally do not re-clamp it.
pub fn classify(profile: &HcpProfile) -> SegmentResult {
    let (segment, mut confidence, mut reasoning) = match profile.prescription_rate {
        Some(rate) if rate > 0.7 => (
            MeditagSegment::EarlyAdopter,
            0.85,
            format!("High prescription rate ({rate:.2})"),
        ),
        Some(rate) if rate > 0.4 => {
            if profile.years_experience.is_some_and(|years| years > 10) {
                (
                    MeditagSegment::EvidenceDriven,
                    0.9,
                    format!("Moderate prescription rate ({rate:.2}) with long experience"),
                )
            } else {
                (
                    MeditagSegment::Mainstream,
                    0.75,
                    format!("Moderate prescription rate ({rate:.2})"),
                )
            }
        }
        Some(rate) => (
            MeditagSegment::Conservative,
            0.8,
            format!("Low prescription rate ({rate:.2})"),
        ),
        None => match profile.years_experience {
            Some(years) if years > 15 => (
                MeditagSegment::EvidenceDriven,
                0.7,
                format!("{years} years of experience without prescribing data"),
            ),
            Some(years) if years < 5 => (
                MeditagSegment::EarlyAdopter,
                0.6,
                format!("Early career ({years} years) without prescribing data"),
            ),
            _ => (
                MeditagSegment::General,
                0.7,
                "No strong signal in profile".to_string(),
            ),
        },
    };

    if let Some(specialty) = &profile.specialty {
        let lowered = specialty.to_lowercase();
        if lowered.contains("oncolog") {
            if segment == MeditagSegment::EvidenceDriven {
                confidence += 0.05;
                reasoning.push_str("; oncology reinforces evidence-driven behavior");
            } else {
                confidence -= 0.1;
                reasoning.push_str("; oncology weakens non-evidence-driven assignments");
            }
        } else if lowered.contains("cardiolog")
            && is_large_practice(profile.practice_size.as_deref())
            && segment != MeditagSegment::Mainstream
        {
            confidence -= 0.1;
            reasoning.push_str("; large cardiology practices trend mainstream");
        }
    }

    SegmentResult {
        segment,
        confidence,
        reasoning,
    }
}

fn is_large_practice(practice_size: Option<&str>) -> bool {
    match practice_size {
        Some(size) => size
            .parse::<u32>()
            .map(|headcount| headcount >= LARGE_PRACTICE_HEADCOUNT)
            .unwrap_or_else(|_| size.to_lowercase().contains("large")),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labeled_fields() {
        let profile =
            parse_profile("Cardiologist, prescription_rate: 0.8, years_experience: 12");
        assert_eq!(profile.specialty.as_deref(), Some("Cardiology"));
        assert_eq!(profile.prescription_rate, Some(0.8));
        assert_eq!(profile.years_experience, Some(12));
        assert_eq!(profile.practice_size, None);
    }

    #[test]
    fn test_parse_explicit_specialty_field_takes_priority() {
        let profile = parse_profile("specialty: Oncology. Also mentions cardiology in passing");
        assert_eq!(profile.specialty.as_deref(), Some("Oncology"));
    }

    #[test]
    fn test_parse_percent_rate_normalized() {
        let profile = parse_profile("prescription rate: 80%");
        assert_eq!(profile.prescription_rate, Some(0.8));
        let bare = parse_profile("prescription_rate: 55");
        assert_eq!(bare.prescription_rate, Some(0.55));
    }

    #[test]
    fn test_parse_empty_text_yields_empty_profile() {
        assert_eq!(parse_profile(""), HcpProfile::default());
    }

    #[test]
    fn test_high_rate_yields_early_adopter() {
        let result = segment("prescription_rate: 0.75");
        assert_eq!(result.segment, MeditagSegment::EarlyAdopter);
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn test_rate_rule_takes_precedence_over_experience_rule() {
        // years_experience alone would suggest EvidenceDriven, but the rate wins
        let result = segment("Cardiologist, prescription_rate: 0.8, years_experience: 12");
        assert_eq!(result.segment, MeditagSegment::EarlyAdopter);
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn test_moderate_rate_splits_on_experience() {
        let veteran = segment("prescription_rate: 0.5, years_experience: 15");
        assert_eq!(veteran.segment, MeditagSegment::EvidenceDriven);
        assert_eq!(veteran.confidence, 0.9);

        let newer = segment("prescription_rate: 0.5, years_experience: 4");
        assert_eq!(newer.segment, MeditagSegment::Mainstream);
        assert_eq!(newer.confidence, 0.75);
    }

    #[test]
    fn test_low_rate_yields_conservative() {
        let result = segment("prescription_rate: 0.4");
        assert_eq!(result.segment, MeditagSegment::Conservative);
        assert_eq!(result.confidence, 0.8);
    }

    #[test]
    fn test_experience_fallback_without_rate() {
        let veteran = segment("years_experience: 20");
        assert_eq!(veteran.segment, MeditagSegment::EvidenceDriven);
        assert_eq!(veteran.confidence, 0.7);

        let early = segment("years_experience: 3");
        assert_eq!(early.segment, MeditagSegment::EarlyAdopter);
        assert_eq!(early.confidence, 0.6);

        let middle = segment("years_experience: 10");
        assert_eq!(middle.segment, MeditagSegment::General);
        assert_eq!(middle.confidence, 0.7);
    }

    #[test]
    fn test_no_signal_defaults_to_general() {
        let result = segment("An experienced physician");
        assert_eq!(result.segment, MeditagSegment::General);
        assert_eq!(result.confidence, 0.7);
    }

    #[test]
    fn test_oncology_reinforces_evidence_driven() {
        let result = segment("Oncologist, prescription_rate: 0.5, years_experience: 15");
        assert_eq!(result.segment, MeditagSegment::EvidenceDriven);
        assert!((result.confidence - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_oncology_weakens_other_segments() {
        let result = segment("Oncologist, prescription_rate: 0.9");
        assert_eq!(result.segment, MeditagSegment::EarlyAdopter);
        assert!((result.confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_large_cardiology_practice_weakens_non_mainstream() {
        let adjusted = segment("Cardiologist, prescription_rate: 0.8, practice_size: large");
        assert_eq!(adjusted.segment, MeditagSegment::EarlyAdopter);
        assert!((adjusted.confidence - 0.75).abs() < 1e-9);

        // Mainstream assignments are left alone
        let mainstream = segment("Cardiologist, prescription_rate: 0.5, practice_size: 120");
        assert_eq!(mainstream.segment, MeditagSegment::Mainstream);
        assert_eq!(mainstream.confidence, 0.75);

        // Small practices are left alone
        let small = segment("Cardiologist, prescription_rate: 0.8, practice_size: 5");
        assert_eq!(small.confidence, 0.85);
    }

    #[test]
    fn test_is_large_practice() {
        assert!(is_large_practice(Some("large")));
        assert!(is_large_practice(Some("Large")));
        assert!(is_large_practice(Some("120")));
        assert!(!is_large_practice(Some("12")));
        assert!(!is_large_practice(Some("solo")));
        assert!(!is_large_practice(None));
    }
}
