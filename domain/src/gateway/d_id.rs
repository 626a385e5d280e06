//! D-ID API client for avatar video synthesis.
//!
//! This module provides an HTTP client for the D-ID clips API: a clip is
//! created from narration text and a presenter, then resolved by polling
//! until a result URL is available. D-ID occasionally returns the result
//! URL on creation, which short-circuits polling entirely.

use async_trait::async_trait;
use log::*;
use serde::{Deserialize, Serialize};
use video_ai::error::Error;
use video_ai::traits::synthesis;
use video_ai::types::synthesis::{Job, JobStatus, Submission, SubmitRequest};

/// Request to create a clip
#[derive(Debug, Serialize)]
struct CreateClipRequest {
    presenter_id: String,
    script: ClipScript,
}

#[derive(Debug, Serialize)]
struct ClipScript {
    #[serde(rename = "type")]
    script_type: String,
    input: String,
}

/// Response from creating or fetching a clip
#[derive(Debug, Deserialize)]
struct ClipResponse {
    id: String,
    status: String,
    #[serde(default)]
    result_url: Option<String>,
    #[serde(default)]
    error: Option<ClipError>,
}

#[derive(Debug, Deserialize)]
struct ClipError {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl ClipError {
    fn describe(&self) -> String {
        format!(
            "{}: {}",
            self.kind.as_deref().unwrap_or("unknown"),
            self.description.as_deref().unwrap_or("no detail")
        )
    }
}

/// D-ID API client
pub struct DIdClient {
    client: reqwest::Client,
    base_url: String,
}

impl DIdClient {
    /// Create a new D-ID client with the given API key and base URL
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let auth_value = format!("Basic {}", api_key);
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
        })
    }
}

fn map_status(status: &str) -> JobStatus {
    match status {
        "done" => JobStatus::Completed,
        "error" | "rejected" => JobStatus::Failed,
        "created" => JobStatus::Queued,
        _ => JobStatus::Processing,
    }
}

#[async_trait]
impl synthesis::Provider for DIdClient {
    async fn submit(&self, request: SubmitRequest) -> Result<Submission, Error> {
        let url = format!("{}/clips", self.base_url);

        let body = CreateClipRequest {
            presenter_id: request.presenter_id,
            script: ClipScript {
                script_type: "text".to_string(),
                input: request.script,
            },
        };

        debug!("Submitting D-ID clip");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to submit D-ID clip: {:?}", e);
                Error::Network(e.to_string())
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::PAYMENT_REQUIRED {
            return Err(Error::Quota("D-ID account is out of credits".to_string()));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication(
                "D-ID rejected the API key".to_string(),
            ));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("D-ID API: {}", error_text);
            return Err(Error::Provider(error_text));
        }

        let clip: ClipResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse D-ID response: {:?}", e);
            Error::Deserialization("Invalid response from D-ID".to_string())
        })?;
        info!("Submitted D-ID clip: {}", clip.id);

        Ok(Submission {
            job_id: clip.id,
            media_url: clip.result_url,
        })
    }

    async fn resolve(&self, job_id: &str) -> Result<Job, Error> {
        let url = format!("{}/clips/{}", self.base_url, job_id);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Failed to get D-ID clip status: {:?}", e);
            Error::Network(e.to_string())
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("No D-ID clip with id {job_id}")));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("D-ID API: {}", error_text);
            return Err(Error::Provider(error_text));
        }

        let clip: ClipResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse D-ID status response: {:?}", e);
            Error::Deserialization("Invalid response from D-ID".to_string())
        })?;

        Ok(Job {
            id: clip.id,
            status: map_status(&clip.status),
            media_url: clip.result_url,
            error_message: clip.error.map(|error| error.describe()),
        })
    }

    fn provider_id(&self) -> &str {
        "d_id"
    }

    /// Verify the API key is valid by making a test request
    async fn verify_credentials(&self) -> Result<bool, Error> {
        let url = format!("{}/credits", self.base_url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Failed to verify D-ID API key: {:?}", e);
            Error::Network(e.to_string())
        })?;

        Ok(response.status().is_success())
    }
}
