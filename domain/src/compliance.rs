//! Narration compliance evaluation against the regulatory marketing rubric.
//!
//! The primary path scores the script with the LLM text service. When that
//! service is unavailable the evaluator falls back to a fully local
//! heuristic: content whose compliance cannot be confidently evaluated is
//! never silently failed outright, and never fully passed either.

use entity::compliance_details::ComplianceDetails;
use entity::compliance_status::ComplianceStatus;
use log::*;
use serde::Deserialize;
use std::sync::Arc;
use video_ai::traits::text;

/// Evidence-language markers, matched case-insensitively. Presence rescues a
/// failing verdict into Review and drives the local fallback heuristic.
const EVIDENCE_MARKERS: &[&str] = &[
    "evidence-based",
    "evidence based",
    "clinical trial",
    "clinical data",
    "peer-reviewed",
    "peer reviewed",
    "randomized controlled trial",
    "meta-analysis",
    "published study",
];

/// Marketing language that always fails the local fallback heuristic.
const BANNED_TERMS: &[&str] = &[
    "best in class",
    "best-in-class",
    "guaranteed",
    "miracle",
    "cure",
    "risk free",
    "risk-free",
    "revolutionary",
    "100% effective",
];

/// Score recorded when the local heuristic clears a script.
const FALLBACK_PASS_SCORE: i32 = 80;
/// Score recorded when the local heuristic cannot clear a script.
const FALLBACK_REVIEW_SCORE: i32 = 50;
/// Evaluator scores at or above this are reviewable rather than failed.
const REVIEW_SCORE_FLOOR: i32 = 60;

/// Structured verdict expected from the LLM evaluator.
#[derive(Debug, Deserialize)]
struct RubricVerdict {
    passed: bool,
    score: i32,
    #[serde(default)]
    issues: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
}

/// Outcome of a compliance evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub status: ComplianceStatus,
    pub details: ComplianceDetails,
    /// True when the verdict came from the local fallback heuristic rather
    /// than the evaluator service
    pub degraded: bool,
}

pub struct ComplianceEvaluator {
    llm: Arc<dyn text::Provider>,
}

impl ComplianceEvaluator {
    pub fn new(llm: Arc<dyn text::Provider>) -> Self {
        Self { llm }
    }

    /// Scores a narration script. Never fails: evaluator service errors fall
    /// back to the local heuristic with the degraded flag set.
    pub async fn evaluate(&self, script: &str) -> Evaluation {
        match self.evaluate_with_rubric(script).await {
            Ok(evaluation) => evaluation,
            Err(e) => {
                warn!("Compliance evaluator unavailable, using local heuristic: {e}");
                local_fallback(script)
            }
        }
    }

    async fn evaluate_with_rubric(&self, script: &str) -> Result<Evaluation, video_ai::Error> {
        let system_instruction = "You review pharmaceutical marketing narration for regulatory \
            compliance. Score the script against this rubric: claims are evidence-based; no \
            exaggerated efficacy claims; appropriate safety disclosure; correct medical \
            terminology; no misleading comparisons. Respond with only a JSON object of the \
            shape {\"passed\": boolean, \"score\": number from 0 to 100, \
            \"issues\": [string], \"recommendations\": [string]}.";

        let value = self
            .llm
            .generate_structured(system_instruction, script)
            .await?;
        let verdict: RubricVerdict = serde_json::from_value(value)
            .map_err(|e| video_ai::Error::Deserialization(e.to_string()))?;

        debug!(
            "Compliance verdict: passed={} score={}",
            verdict.passed, verdict.score
        );
        Ok(derive_status(script, verdict))
    }
}

/// Derives the compliance status from an evaluator verdict, applying the
/// evidence-language rescue: a hard fail with evidence markers present is
/// promoted to Review, never to Passed.
fn derive_status(script: &str, verdict: RubricVerdict) -> Evaluation {
    let mut status = if verdict.passed {
        ComplianceStatus::Passed
    } else if verdict.score >= REVIEW_SCORE_FLOOR {
        ComplianceStatus::Review
    } else {
        ComplianceStatus::Failed
    };

    if status == ComplianceStatus::Failed && contains_evidence_marker(script) {
        debug!("Evidence language present, promoting failed verdict to review");
        status = ComplianceStatus::Review;
    }

    Evaluation {
        status,
        details: ComplianceDetails {
            score: verdict.score,
            issues: verdict.issues,
            recommendations: verdict.recommendations,
        },
        degraded: false,
    }
}

/// Deterministic rule-based check used when the evaluator service is down.
fn local_fallback(script: &str) -> Evaluation {
    if contains_evidence_marker(script) && !contains_banned_term(script) {
        Evaluation {
            status: ComplianceStatus::Passed,
            details: ComplianceDetails {
                score: FALLBACK_PASS_SCORE,
                issues: vec![],
                recommendations: vec![],
            },
            degraded: true,
        }
    } else {
        Evaluation {
            status: ComplianceStatus::Review,
            details: ComplianceDetails {
                score: FALLBACK_REVIEW_SCORE,
                issues: vec![
                    "Automated compliance evaluation was unavailable; validation confidence is reduced"
                        .to_string(),
                ],
                recommendations: vec![
                    "Request a manual compliance review before distributing this video".to_string(),
                ],
            },
            degraded: true,
        }
    }
}

fn contains_evidence_marker(script: &str) -> bool {
    let lowered = script.to_lowercase();
    EVIDENCE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

fn contains_banned_term(script: &str) -> bool {
    let lowered = script.to_lowercase();
    BANNED_TERMS.iter().any(|term| lowered.contains(term))
}
