//! The video generation pipeline orchestrator.
//!
//! Sequences input resolution, segmentation, script drafting, compliance
//! evaluation, video synthesis, and persistence for one generation request.
//! Each run is strictly linear with no orchestrator-level retries: the
//! compliance evaluator and video synthesizer absorb their own fallback
//! burden, so only input resolution and drafting can abort a run.

use crate::compliance::ComplianceEvaluator;
use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use crate::gateway::d_id::DIdClient;
use crate::gateway::heygen::HeyGenClient;
use crate::gateway::local_files::LocalFileStore;
use crate::gateway::open_ai::OpenAiClient;
use crate::script::ScriptDrafter;
use crate::segmenter;
use crate::synthesis::VideoSynthesizer;
use entity::{uploads, videos, Id};
use entity_api::store::{NewUpload, NewVideo, Store};
use log::*;
use service::config::Config;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use video_ai::traits::{document, synthesis, text};

/// Profile substituted when a run arrives with no HCP text at all, so every
/// generation attempt remains attributable to a durable upload record.
const DEFAULT_HCP_TEXT: &str = "General practitioner, mid-career, mixed patient panel";

/// Filler phrases stripped from the head of a prompt before titling,
/// ordered longest first.
const TITLE_FILLERS: &[&str] = &[
    "create a video about",
    "generate a video about",
    "make a video about",
    "create a video",
    "generate a video",
    "make a video",
    "video about",
    "about",
];

/// Title used when stripping fillers leaves nothing usable.
const FALLBACK_TITLE: &str = "Engagement Video";

/// Progression of a single generation run. `Failed` is reachable only from
/// `ResolvingInput` and `Drafting`; the later stages degrade instead of
/// failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    ResolvingInput,
    Segmenting,
    Drafting,
    Evaluating,
    Synthesizing,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::ResolvingInput => write!(fmt, "resolving_input"),
            PipelineStage::Segmenting => write!(fmt, "segmenting"),
            PipelineStage::Drafting => write!(fmt, "drafting"),
            PipelineStage::Evaluating => write!(fmt, "evaluating"),
            PipelineStage::Synthesizing => write!(fmt, "synthesizing"),
            PipelineStage::Persisting => write!(fmt, "persisting"),
            PipelineStage::Done => write!(fmt, "done"),
            PipelineStage::Failed => write!(fmt, "failed"),
        }
    }
}

/// One inbound generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub user_id: Id,
    pub prompt: String,
    /// Existing upload to generate against; takes priority over `hcp_text`
    pub upload_id: Option<Id>,
    pub hcp_text: Option<String>,
    pub document_path: Option<String>,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub video: videos::Model,
    /// Soft-failure explanations (degraded compliance evaluation or
    /// placeholder media); empty on a fully clean run
    pub warnings: Vec<String>,
}

impl PipelineOutcome {
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

pub struct GenerationPipeline {
    store: Arc<dyn Store>,
    drafter: ScriptDrafter,
    evaluator: ComplianceEvaluator,
    synthesizer: VideoSynthesizer,
}

impl GenerationPipeline {
    /// All collaborators are injected so a boundary layer (or a test) decides
    /// which concrete store, LLM, and synthesis providers back a run.
    pub fn new(
        store: Arc<dyn Store>,
        drafter: ScriptDrafter,
        evaluator: ComplianceEvaluator,
        synthesizer: VideoSynthesizer,
    ) -> Self {
        Self {
            store,
            drafter,
            evaluator,
            synthesizer,
        }
    }

    /// Wires a pipeline from configuration: one LLM client shared by the
    /// drafter and evaluator, synthesis providers in configured order, and
    /// the local document store. Synthesis providers missing an API key are
    /// skipped (their absence degrades to placeholder content at run time);
    /// a missing LLM key is a configuration error because drafting has no
    /// fallback.
    pub fn from_config(config: &Config, store: Arc<dyn Store>) -> Result<Self, Error> {
        let llm_api_key = config.llm_api_key().ok_or_else(|| {
            warn!("No LLM API key is configured");
            Error {
                source: None,
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
            }
        })?;
        let llm: Arc<dyn text::Provider> = Arc::new(
            OpenAiClient::new(&llm_api_key, config.llm_base_url(), config.llm_model())
                .map_err(config_error)?,
        );
        let documents: Arc<dyn document::Provider> =
            Arc::new(LocalFileStore::new(config.document_root()));

        let mut providers: Vec<Arc<dyn synthesis::Provider>> = Vec::new();
        for name in &config.synthesis_providers {
            match name.as_str() {
                "heygen" => match config.heygen_api_key() {
                    Some(key) => providers.push(Arc::new(
                        HeyGenClient::new(&key, config.heygen_base_url())
                            .map_err(config_error)?,
                    )),
                    None => warn!("HeyGen is listed as a synthesis provider but has no API key"),
                },
                "d_id" => match config.did_api_key() {
                    Some(key) => providers.push(Arc::new(
                        DIdClient::new(&key, config.did_base_url()).map_err(config_error)?,
                    )),
                    None => warn!("D-ID is listed as a synthesis provider but has no API key"),
                },
                other => warn!("Unknown synthesis provider in configuration: {other}"),
            }
        }

        Ok(Self::new(
            store,
            ScriptDrafter::new(llm.clone(), documents),
            ComplianceEvaluator::new(llm),
            VideoSynthesizer::new(
                providers,
                Duration::from_secs(config.synthesis_poll_interval_secs),
                Duration::from_secs(config.synthesis_poll_timeout_secs),
            ),
        ))
    }

    /// Runs one generation request through the full pipeline and persists
    /// the resulting video record.
    pub async fn run(&self, request: GenerationRequest) -> Result<PipelineOutcome, Error> {
        // Validated before any side effect: a run with no prompt never
        // creates an upload record.
        if request.prompt.trim().is_empty() {
            return Err(Error {
                source: None,
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Validation(
                    "A prompt is required to generate a video".to_string(),
                )),
            });
        }

        debug!("Pipeline stage: {}", PipelineStage::ResolvingInput);
        let upload = match self.resolve_input(&request).await {
            Ok(upload) => upload,
            Err(e) => {
                warn!("Pipeline stage: {} ({e})", PipelineStage::Failed);
                return Err(e);
            }
        };

        debug!("Pipeline stage: {}", PipelineStage::Segmenting);
        let segment_result = segmenter::segment(&upload.hcp_text);
        info!(
            "Segmented HCP as {} (confidence {:.2})",
            segment_result.segment,
            clamp_confidence(segment_result.confidence)
        );

        debug!("Pipeline stage: {}", PipelineStage::Drafting);
        let document_path = request
            .document_path
            .as_deref()
            .or(upload.document_path.as_deref());
        let draft = match self
            .drafter
            .draft(&upload.hcp_text, &request.prompt, document_path)
            .await
        {
            Ok(draft) => draft,
            Err(e) => {
                warn!("Pipeline stage: {} ({e})", PipelineStage::Failed);
                return Err(e);
            }
        };

        debug!("Pipeline stage: {}", PipelineStage::Evaluating);
        let evaluation = self.evaluator.evaluate(&draft.script).await;

        debug!("Pipeline stage: {}", PipelineStage::Synthesizing);
        let rendering = self
            .synthesizer
            .render(&draft.script, &draft.target_audience)
            .await;

        debug!("Pipeline stage: {}", PipelineStage::Persisting);
        let mut warnings = Vec::new();
        if evaluation.degraded {
            warnings.push(
                "Compliance was scored by the local heuristic; validation confidence is reduced"
                    .to_string(),
            );
        }
        if let Some(warning) = &rendering.warning {
            warnings.push(warning.clone());
        }

        let video = self
            .store
            .create_video(NewVideo {
                title: derive_title(&request.prompt, &draft.target_audience),
                upload_id: upload.id,
                prompt: request.prompt.clone(),
                target_hcp: upload.hcp_text.clone(),
                video_url: rendering.video_url,
                thumbnail_url: rendering.thumbnail_url,
                duration_seconds: draft.estimated_duration_seconds,
                compliance_status: evaluation.status,
                compliance_details: evaluation.details,
                meditag_segment: segment_result.segment,
                generated_script: draft.script,
            })
            .await?;

        info!("Pipeline stage: {}, video {}", PipelineStage::Done, video.id);
        Ok(PipelineOutcome { video, warnings })
    }

    /// Resolves the run's upload record: an existing id is looked up, raw
    /// HCP text creates a new record, and an empty request falls back to the
    /// default profile so the attempt still gets a durable record.
    async fn resolve_input(&self, request: &GenerationRequest) -> Result<uploads::Model, Error> {
        if let Some(upload_id) = request.upload_id {
            return Ok(self.store.get_upload(upload_id).await?);
        }

        let hcp_text = request
            .hcp_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(DEFAULT_HCP_TEXT);

        Ok(self
            .store
            .create_upload(NewUpload {
                user_id: request.user_id,
                hcp_text: hcp_text.to_string(),
                document_path: request.document_path.clone(),
            })
            .await?)
    }
}

fn config_error(e: video_ai::Error) -> Error {
    Error {
        source: Some(Box::new(e)),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
    }
}

/// Confidence values drift outside [0, 1] after specialty adjustments;
/// clamped here before being presented.
fn clamp_confidence(confidence: f64) -> f64 {
    confidence.clamp(0.0, 1.0)
}

/// Derives a human-readable title: strip filler phrases from the prompt,
/// keep the first three words longer than three characters, title-case
/// them, and prefix the target audience.
pub fn derive_title(prompt: &str, target_audience: &str) -> String {
    let mut cleaned = prompt.trim().to_lowercase();
    for filler in TITLE_FILLERS {
        if let Some(rest) = cleaned.strip_prefix(filler) {
            cleaned = rest.trim_start().to_string();
        }
    }

    let words: Vec<String> = cleaned
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| word.len() > 3)
        .take(3)
        .map(title_case)
        .collect();

    if words.is_empty() {
        format!("{target_audience}: {FALLBACK_TITLE}")
    } else {
        format!("{target_audience}: {}", words.join(" "))
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
