//! LLM text service provider trait.

use crate::Error;
use async_trait::async_trait;

/// Abstraction for LLM text services that return structured output.
///
/// Implementations submit a system instruction plus user content and return a
/// best-effort structured JSON object. Supports OpenAI, Anthropic Claude,
/// Azure OpenAI. This trait enables model comparison, cost optimization, and
/// provider switching. Completely domain-agnostic - applications define what
/// to generate via the instruction text.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Run the instruction against the user content and return parsed JSON.
    ///
    /// Implementations are responsible for requesting JSON output from their
    /// model and parsing the raw response; callers receive a `Value` they can
    /// deserialize into domain types. Transport and parse failures surface as
    /// `Error::Network` / `Error::Deserialization`.
    async fn generate_structured(
        &self,
        system_instruction: &str,
        user_content: &str,
    ) -> Result<serde_json::Value, Error>;

    /// Return unique identifier for this provider (e.g., "open_ai", "claude").
    ///
    /// Used for cost tracking, model-specific logic, and provider selection.
    /// Must be lowercase, alphanumeric with underscores only.
    fn provider_id(&self) -> &str;

    /// Validate API credentials by making a lightweight test request.
    ///
    /// Call during deployment or settings updates for immediate validation.
    /// Returns false if credentials are invalid, expired, or lack permissions.
    async fn verify_credentials(&self) -> Result<bool, Error>;
}
