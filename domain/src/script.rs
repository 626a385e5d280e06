//! Narration script drafting via the LLM text service.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use log::*;
use serde::Deserialize;
use std::sync::Arc;
use video_ai::traits::{document, text};
use video_ai::types::document::Content;

/// Marker substituted for supplied documents whose format is not extracted
/// to text. Full binary extraction (PDF, DOCX) is a deliberate scope limit
/// of the drafting step, not an oversight.
const UNEXTRACTED_DOCUMENT_NOTE: &str =
    "[A reference document was supplied by the user; its content was not extracted]";

/// A drafted narration script.
///
/// Transient: embedded into the final video record, never persisted on its
/// own. `estimated_duration_seconds` is the model's own estimate and
/// `target_audience` is a free-text HCP label, not a Meditag segment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptDraft {
    pub script: String,
    #[serde(rename = "duration_seconds")]
    pub estimated_duration_seconds: f64,
    pub target_audience: String,
}

pub struct ScriptDrafter {
    llm: Arc<dyn text::Provider>,
    documents: Arc<dyn document::Provider>,
}

impl ScriptDrafter {
    pub fn new(llm: Arc<dyn text::Provider>, documents: Arc<dyn document::Provider>) -> Self {
        Self { llm, documents }
    }

    /// Drafts a short narration personalized to the HCP text and prompt.
    ///
    /// Fatal on LLM transport failure or malformed structured output; no
    /// local fallback script is synthesized.
    pub async fn draft(
        &self,
        hcp_text: &str,
        prompt: &str,
        document_path: Option<&str>,
    ) -> Result<ScriptDraft, Error> {
        let excerpt = match document_path {
            Some(path) => Some(self.resolve_document(path).await),
            None => None,
        };

        let system_instruction = "You draft narration scripts for healthcare-professional \
            marketing videos. Write an evidence-based narration, 5 to 10 seconds when spoken, \
            personalized to the HCP profile and request below. Respond with only a JSON object \
            of the shape {\"script\": string, \"duration_seconds\": number, \
            \"target_audience\": string} where duration_seconds is your own estimate of the \
            spoken duration and target_audience names the type of healthcare professional \
            the narration addresses.";

        let mut user_content = format!("HCP profile:\n{hcp_text}\n\nRequest:\n{prompt}");
        if let Some(excerpt) = excerpt {
            user_content.push_str("\n\nReference document:\n");
            user_content.push_str(&excerpt);
        }

        let value = self
            .llm
            .generate_structured(system_instruction, &user_content)
            .await
            .map_err(|e| {
                warn!("Script drafting call failed: {e}");
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::ScriptGeneration(
                        "LLM text service call failed".to_string(),
                    )),
                }
            })?;

        let draft: ScriptDraft = serde_json::from_value(value).map_err(|e| {
            warn!("Malformed script draft from LLM: {e:?}");
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::ScriptGeneration(
                    "LLM returned malformed structured output".to_string(),
                )),
            }
        })?;

        debug!(
            "Drafted {:.1}s narration for audience: {}",
            draft.estimated_duration_seconds, draft.target_audience
        );
        Ok(draft)
    }

    /// Resolves a stored document to an excerpt usable in the instruction.
    /// Unresolvable documents degrade to the not-extracted marker; a missing
    /// document must not make drafting fail harder than an unreadable one.
    async fn resolve_document(&self, path: &str) -> String {
        match self.documents.resolve(path).await {
            Ok(Content::PlainText(text)) => text,
            Ok(Content::NotExtracted { format }) => {
                debug!("Document {path} not extracted (format: {format})");
                UNEXTRACTED_DOCUMENT_NOTE.to_string()
            }
            Err(e) => {
                warn!("Failed to resolve document {path}: {e}");
                UNEXTRACTED_DOCUMENT_NOTE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, ExternalErrorKind};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct StaticTextProvider {
        responses: Mutex<Vec<Result<serde_json::Value, video_ai::Error>>>,
        last_user_content: Mutex<Option<String>>,
    }

    impl StaticTextProvider {
        fn new(responses: Vec<Result<serde_json::Value, video_ai::Error>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                last_user_content: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl text::Provider for StaticTextProvider {
        async fn generate_structured(
            &self,
            _system_instruction: &str,
            user_content: &str,
        ) -> Result<serde_json::Value, video_ai::Error> {
            *self.last_user_content.lock().unwrap() = Some(user_content.to_string());
            self.responses.lock().unwrap().remove(0)
        }

        fn provider_id(&self) -> &str {
            "static"
        }

        async fn verify_credentials(&self) -> Result<bool, video_ai::Error> {
            Ok(true)
        }
    }

    struct StaticDocumentStore {
        content: Result<Content, fn() -> video_ai::Error>,
    }

    #[async_trait]
    impl document::Provider for StaticDocumentStore {
        async fn resolve(&self, _path: &str) -> Result<Content, video_ai::Error> {
            match &self.content {
                Ok(content) => Ok(content.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn drafter(
        llm: StaticTextProvider,
        documents: StaticDocumentStore,
    ) -> (ScriptDrafter, Arc<StaticTextProvider>) {
        let llm = Arc::new(llm);
        (
            ScriptDrafter::new(llm.clone(), Arc::new(documents)),
            llm,
        )
    }

    fn draft_value() -> serde_json::Value {
        json!({
            "script": "Backed by a randomized controlled trial, this therapy improves outcomes.",
            "duration_seconds": 7.5,
            "target_audience": "Cardiologists"
        })
    }

    #[tokio::test]
    async fn test_draft_parses_structured_output() {
        let (drafter, _) = drafter(
            StaticTextProvider::new(vec![Ok(draft_value())]),
            StaticDocumentStore {
                content: Ok(Content::PlainText(String::new())),
            },
        );

        let draft = drafter
            .draft("Cardiologist", "Create a video about a heart failure drug", None)
            .await
            .unwrap();
        assert_eq!(draft.estimated_duration_seconds, 7.5);
        assert_eq!(draft.target_audience, "Cardiologists");
    }

    #[tokio::test]
    async fn test_draft_includes_plain_text_document() {
        let (drafter, llm) = drafter(
            StaticTextProvider::new(vec![Ok(draft_value())]),
            StaticDocumentStore {
                content: Ok(Content::PlainText("Phase III trial summary".to_string())),
            },
        );

        drafter
            .draft("Cardiologist", "Summarize the attached study", Some("study.txt"))
            .await
            .unwrap();
        let sent = llm.last_user_content.lock().unwrap().clone().unwrap();
        assert!(sent.contains("Phase III trial summary"));
    }

    #[tokio::test]
    async fn test_draft_substitutes_marker_for_unextracted_document() {
        let (drafter, llm) = drafter(
            StaticTextProvider::new(vec![Ok(draft_value())]),
            StaticDocumentStore {
                content: Ok(Content::NotExtracted {
                    format: "pdf".to_string(),
                }),
            },
        );

        drafter
            .draft("Cardiologist", "Summarize the attached study", Some("study.pdf"))
            .await
            .unwrap();
        let sent = llm.last_user_content.lock().unwrap().clone().unwrap();
        assert!(sent.contains(UNEXTRACTED_DOCUMENT_NOTE));
    }

    #[tokio::test]
    async fn test_transport_failure_is_script_generation_error() {
        let (drafter, _) = drafter(
            StaticTextProvider::new(vec![Err(video_ai::Error::Network(
                "connection refused".to_string(),
            ))]),
            StaticDocumentStore {
                content: Ok(Content::PlainText(String::new())),
            },
        );

        let err = drafter
            .draft("Cardiologist", "Create a video", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::ScriptGeneration(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_output_is_script_generation_error() {
        let (drafter, _) = drafter(
            StaticTextProvider::new(vec![Ok(json!({"unexpected": true}))]),
            StaticDocumentStore {
                content: Ok(Content::PlainText(String::new())),
            },
        );

        let err = drafter
            .draft("Cardiologist", "Create a video", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::ScriptGeneration(_))
        ));
    }
}
