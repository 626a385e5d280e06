//! OpenAI-compatible chat completions client used as the LLM text service.
//!
//! This module provides an HTTP client for OpenAI-style chat completion
//! endpoints, requesting structured JSON output for script drafting and
//! compliance scoring.

use async_trait::async_trait;
use log::*;
use serde::{Deserialize, Serialize};
use video_ai::error::Error;
use video_ai::traits::text;

/// Request body for a chat completion
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Forces the model to emit a JSON object
#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Response from a chat completion
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// OpenAI-compatible chat completions client
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    /// Create a new client with the given API key, base URL, and model id
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let auth_value = format!("Bearer {}", api_key);
        let mut header_value = reqwest::header::HeaderValue::from_str(&auth_value)
            .map_err(|e| {
                warn!("Failed to create auth header: {:?}", e);
                Error::Configuration("Invalid API key format".to_string())
            })?;
        header_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl text::Provider for OpenAiClient {
    async fn generate_structured(
        &self,
        system_instruction: &str,
        user_content: &str,
    ) -> Result<serde_json::Value, Error> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_instruction.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_content.to_string(),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
            temperature: 0.7,
        };

        debug!("Requesting chat completion from model: {}", self.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to call chat completions: {:?}", e);
                Error::Network(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse chat completion response: {:?}", e);
                Error::Deserialization("Invalid response from chat completions".to_string())
            })?;

            let content = completion
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .ok_or_else(|| Error::Provider("Chat completion returned no choices".to_string()))?;

            serde_json::from_str(&content).map_err(|e| {
                warn!("Chat completion content was not valid JSON: {:?}", e);
                Error::Deserialization("Model did not return valid JSON".to_string())
            })
        } else if status == reqwest::StatusCode::UNAUTHORIZED {
            Err(Error::Authentication(
                "Chat completions rejected the API key".to_string(),
            ))
        } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Err(Error::Quota(
                "Chat completions quota or rate limit reached".to_string(),
            ))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            error!("Chat completions API: {}", error_text);
            Err(Error::Provider(error_text))
        }
    }

    fn provider_id(&self) -> &str {
        "open_ai"
    }

    /// Verify the API key is valid by making a test request
    async fn verify_credentials(&self) -> Result<bool, Error> {
        let url = format!("{}/models", self.base_url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Failed to verify LLM API key: {:?}", e);
            Error::Network(e.to_string())
        })?;

        // 200 means valid key; 401 means invalid key
        Ok(response.status().is_success())
    }
}
