//! HeyGen API client for avatar video synthesis.
//!
//! This module provides an HTTP client for the HeyGen API: renders are
//! submitted through the v2 generate endpoint and resolved by polling the
//! v1 status endpoint.

use async_trait::async_trait;
use log::*;
use serde::{Deserialize, Serialize};
use video_ai::error::Error;
use video_ai::traits::synthesis;
use video_ai::types::synthesis::{Job, JobStatus, Submission, SubmitRequest};

/// Request to generate an avatar video
#[derive(Debug, Serialize)]
struct GenerateVideoRequest {
    video_inputs: Vec<VideoInput>,
    dimension: Dimension,
}

#[derive(Debug, Serialize)]
struct VideoInput {
    character: Character,
    voice: Voice,
}

#[derive(Debug, Serialize)]
struct Character {
    #[serde(rename = "type")]
    character_type: String,
    avatar_id: String,
    avatar_style: String,
}

#[derive(Debug, Serialize)]
struct Voice {
    #[serde(rename = "type")]
    voice_type: String,
    input_text: String,
}

#[derive(Debug, Serialize)]
struct Dimension {
    width: u32,
    height: u32,
}

/// Error payload embedded in HeyGen responses
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    fn describe(&self) -> String {
        format!(
            "{}: {}",
            self.code.as_deref().unwrap_or("unknown"),
            self.message.as_deref().unwrap_or("no detail")
        )
    }

    fn is_quota(&self) -> bool {
        let text = self.describe().to_lowercase();
        text.contains("credit") || text.contains("quota")
    }
}

/// Response from submitting a generate request
#[derive(Debug, Deserialize)]
struct GenerateVideoResponse {
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    data: Option<GenerateVideoData>,
}

#[derive(Debug, Deserialize)]
struct GenerateVideoData {
    video_id: String,
}

/// Response from the status endpoint
#[derive(Debug, Deserialize)]
struct VideoStatusResponse {
    #[serde(default)]
    data: Option<VideoStatusData>,
}

#[derive(Debug, Deserialize)]
struct VideoStatusData {
    status: String,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    error: Option<ApiError>,
}

/// HeyGen API client
pub struct HeyGenClient {
    client: reqwest::Client,
    base_url: String,
}

impl HeyGenClient {
    /// Create a new HeyGen client with the given API key and base URL
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let mut header_value = reqwest::header::HeaderValue::from_str(api_key).map_err(|e| {
            warn!("Failed to create auth header: {:?}", e);
            Error::Configuration("Invalid API key format".to_string())
        })?;
        header_value.set_sensitive(true);
        headers.insert("x-api-key", header_value);

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
        "completed" => JobStatus::Completed,
        "failed" => JobStatus::Failed,
        "pending" | "waiting" => JobStatus::Queued,
        _ => JobStatus::Processing,
    }
}

#[async_trait]
impl synthesis::Provider for HeyGenClient {
    async fn submit(&self, request: SubmitRequest) -> Result<Submission, Error> {
        let url = format!("{}/v2/video/generate", self.base_url);

        let body = GenerateVideoRequest {
            video_inputs: vec![VideoInput {
                character: Character {
                    character_type: "avatar".to_string(),
                    avatar_id: request.presenter_id,
                    avatar_style: "normal".to_string(),
                },
                voice: Voice {
                    voice_type: "text".to_string(),
                    input_text: request.script,
                },
            }],
            dimension: Dimension {
                width: 1280,
                height: 720,
            },
        };

        debug!("Submitting HeyGen render");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to submit HeyGen render: {:?}", e);
                Error::Network(e.to_string())
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::PAYMENT_REQUIRED {
            return Err(Error::Quota("HeyGen account is out of credits".to_string()));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication(
                "HeyGen rejected the API key".to_string(),
            ));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("HeyGen API: {}", error_text);
            return Err(Error::Provider(error_text));
        }

        let generated: GenerateVideoResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse HeyGen response: {:?}", e);
            Error::Deserialization("Invalid response from HeyGen".to_string())
        })?;

        if let Some(error) = generated.error {
            warn!("HeyGen returned an error payload: {}", error.describe());
            return Err(if error.is_quota() {
                Error::Quota(error.describe())
            } else {
                Error::Provider(error.describe())
            });
        }

        let data = generated
            .data
            .ok_or_else(|| Error::Deserialization("HeyGen response had no data".to_string()))?;
        info!("Submitted HeyGen render: {}", data.video_id);

        Ok(Submission {
            job_id: data.video_id,
            media_url: None,
        })
    }

    async fn resolve(&self, job_id: &str) -> Result<Job, Error> {
        let url = format!(
            "{}/v1/video_status.get?video_id={}",
            self.base_url, job_id
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Failed to get HeyGen render status: {:?}", e);
            Error::Network(e.to_string())
        })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("HeyGen API: {}", error_text);
            return Err(Error::Provider(error_text));
        }

        let parsed: VideoStatusResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse HeyGen status response: {:?}", e);
            Error::Deserialization("Invalid response from HeyGen".to_string())
        })?;

        let data = parsed
            .data
            .ok_or_else(|| Error::Deserialization("HeyGen status had no data".to_string()))?;

        Ok(Job {
            id: job_id.to_string(),
            status: map_status(&data.status),
            media_url: data.video_url,
            error_message: data.error.map(|error| error.describe()),
        })
    }

    fn provider_id(&self) -> &str {
        "heygen"
    }

    /// Verify the API key is valid by making a test request
    async fn verify_credentials(&self) -> Result<bool, Error> {
        let url = format!("{}/v2/avatars", self.base_url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Failed to verify HeyGen API key: {:?}", e);
            Error::Network(e.to_string())
        })?;

        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use video_ai::traits::synthesis::Provider;

    fn request() -> SubmitRequest {
        SubmitRequest {
            script: "An evidence-based narration.".to_string(),
            presenter_id: "presenter_ava_office".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_returns_job_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/video/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"error": null, "data": {"video_id": "vid-123"}}).to_string())
            .create_async()
            .await;

        let client = HeyGenClient::new("test-key", &server.url()).unwrap();
        let submission = client.submit(request()).await.unwrap();
        assert_eq!(submission.job_id, "vid-123");
        assert!(submission.media_url.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_maps_credit_error_to_quota() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v2/video/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"error": {"code": "insufficient_credit", "message": "Not enough credits"}})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = HeyGenClient::new("test-key", &server.url()).unwrap();
        let err = client.submit(request()).await.unwrap_err();
        assert!(matches!(err, Error::Quota(_)));
    }

    #[tokio::test]
    async fn test_resolve_completed_render() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "GET",
                "/v1/video_status.get?video_id=vid-123",
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"data": {"status": "completed", "video_url": "https://cdn.heygen.example/vid-123.mp4"}})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = HeyGenClient::new("test-key", &server.url()).unwrap();
        let job = client.resolve("vid-123").await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(
            job.media_url.as_deref(),
            Some("https://cdn.heygen.example/vid-123.mp4")
        );
    }

    #[tokio::test]
    async fn test_resolve_processing_render() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "GET",
                "/v1/video_status.get?video_id=vid-123",
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"data": {"status": "processing"}}).to_string())
            .create_async()
            .await;

        let client = HeyGenClient::new("test-key", &server.url()).unwrap();
        let job = client.resolve("vid-123").await.unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert!(job.media_url.is_none());
    }

    #[test]
    fn test_map_status_variants() {
        assert_eq!(map_status("completed"), JobStatus::Completed);
        assert_eq!(map_status("failed"), JobStatus::Failed);
        assert_eq!(map_status("pending"), JobStatus::Queued);
        assert_eq!(map_status("processing"), JobStatus::Processing);
        assert_eq!(map_status("rendering"), JobStatus::Processing);
    }
}
