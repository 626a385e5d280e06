//! Avatar video synthesis with ordered provider fallback.
//!
//! Providers are attempted in configuration order until one produces a
//! render. All provider failures (auth, quota, transport, timeout,
//! unexpected shape) degrade to the canned placeholder asset; synthesis
//! never fails to its caller.

use log::*;
use std::sync::Arc;
use std::time::Duration;
use video_ai::traits::synthesis;
use video_ai::types::synthesis::{JobStatus, SubmitRequest};

/// Canned media served when no provider can produce a render. Served by the
/// boundary layer as a static asset.
pub const PLACEHOLDER_VIDEO_URL: &str = "/assets/placeholder-video.mp4";
pub const PLACEHOLDER_THUMBNAIL_URL: &str = "/assets/placeholder-video.jpg";

/// Target-audience label fragments mapped to presenter identities. Labels
/// come from the drafting model as free text and are matched loosely.
const PRESENTER_MAP: &[(&str, &str)] = &[
    ("oncolog", "presenter_amelia_lab"),
    ("cardiolog", "presenter_daniel_clinic"),
    ("pediatric", "presenter_sofia_ward"),
    ("nurse", "presenter_maya_scrubs"),
    ("pharmac", "presenter_liam_counter"),
    ("general", "presenter_ava_office"),
];

/// Presenter used for audience labels with no mapping.
const DEFAULT_PRESENTER: &str = "presenter_ava_office";

/// Maps a free-text audience label to a presenter identity.
pub fn presenter_for_audience(label: &str) -> &'static str {
    let lowered = label.to_lowercase();
    PRESENTER_MAP
        .iter()
        .find(|(fragment, _)| lowered.contains(fragment))
        .map(|(_, presenter)| *presenter)
        .unwrap_or(DEFAULT_PRESENTER)
}

/// Pluggable thumbnail derivation step.
pub trait ThumbnailResolver: Send + Sync {
    fn thumbnail_url(&self, video_url: &str) -> Option<String>;
}

/// Placeholder heuristic: swap the media extension for `.jpg`. A real
/// frame-extraction service plugs in behind the same trait.
pub struct ExtensionThumbnail;

impl ThumbnailResolver for ExtensionThumbnail {
    fn thumbnail_url(&self, video_url: &str) -> Option<String> {
        let (base, _extension) = video_url.rsplit_once('.')?;
        Some(format!("{base}.jpg"))
    }
}

/// A synthesized (or placeholder) video asset.
#[derive(Debug, Clone)]
pub struct Rendering {
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    /// Provider-side job id; absent for placeholder content
    pub provider_video_id: Option<String>,
    /// Human-readable soft-failure explanation when placeholder content was
    /// substituted
    pub warning: Option<String>,
}

impl Rendering {
    pub fn is_degraded(&self) -> bool {
        self.warning.is_some()
    }
}

pub struct VideoSynthesizer {
    providers: Vec<Arc<dyn synthesis::Provider>>,
    poll_interval: Duration,
    poll_timeout: Duration,
    thumbnails: Box<dyn ThumbnailResolver>,
}

impl VideoSynthesizer {
    pub fn new(
        providers: Vec<Arc<dyn synthesis::Provider>>,
        poll_interval: Duration,
        poll_timeout: Duration,
    ) -> Self {
        Self {
            providers,
            poll_interval,
            poll_timeout,
            thumbnails: Box::new(ExtensionThumbnail),
        }
    }

    /// Substitutes a different thumbnail derivation step.
    pub fn with_thumbnail_resolver(mut self, thumbnails: Box<dyn ThumbnailResolver>) -> Self {
        self.thumbnails = thumbnails;
        self
    }

    /// Renders the narration with the first provider that succeeds.
    /// Never fails: exhausting every provider yields the placeholder asset
    /// with a warning explaining the degradation.
    pub async fn render(&self, script: &str, target_audience: &str) -> Rendering {
        let presenter_id = presenter_for_audience(target_audience);
        debug!("Presenter for audience '{target_audience}': {presenter_id}");

        let mut last_error: Option<video_ai::Error> = None;
        for provider in &self.providers {
            match self.attempt(provider.as_ref(), script, presenter_id).await {
                Ok((media_url, job_id)) => {
                    info!("Synthesized video via {}: {job_id}", provider.provider_id());
                    return Rendering {
                        thumbnail_url: self.thumbnails.thumbnail_url(&media_url),
                        video_url: media_url,
                        provider_video_id: Some(job_id),
                        warning: None,
                    };
                }
                Err(e) => {
                    warn!(
                        "Synthesis attempt via {} failed: {e}",
                        provider.provider_id()
                    );
                    last_error = Some(e);
                }
            }
        }

        placeholder_rendering(last_error)
    }

    async fn attempt(
        &self,
        provider: &dyn synthesis::Provider,
        script: &str,
        presenter_id: &str,
    ) -> Result<(String, String), video_ai::Error> {
        let submission = provider
            .submit(SubmitRequest {
                script: script.to_string(),
                presenter_id: presenter_id.to_string(),
            })
            .await?;

        // Synchronous providers hand back a playable URL on submission
        if let Some(media_url) = submission.media_url {
            return Ok((media_url, submission.job_id));
        }

        let media_url = self.poll(provider, &submission.job_id).await?;
        Ok((media_url, submission.job_id))
    }

    /// Bounded poll: the deadline expiring is a normal provider error,
    /// resolved by the placeholder fallback like any other.
    async fn poll(
        &self,
        provider: &dyn synthesis::Provider,
        job_id: &str,
    ) -> Result<String, video_ai::Error> {
        let deadline = tokio::time::Instant::now() + self.poll_timeout;
        loop {
            let job = provider.resolve(job_id).await?;
            match job.status {
                JobStatus::Completed => {
                    return job.media_url.ok_or_else(|| {
                        video_ai::Error::Provider(
                            "Completed render did not include a media URL".to_string(),
                        )
                    });
                }
                JobStatus::Failed => {
                    return Err(video_ai::Error::Provider(job.error_message.unwrap_or_else(
                        || "Render failed without detail".to_string(),
                    )));
                }
                JobStatus::Queued | JobStatus::Processing => {
                    if tokio::time::Instant::now() + self.poll_interval > deadline {
                        return Err(video_ai::Error::Timeout(format!(
                            "Render {job_id} unfinished after {:?}",
                            self.poll_timeout
                        )));
                    }
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }
}

fn placeholder_rendering(last_error: Option<video_ai::Error>) -> Rendering {
    let warning = match last_error {
        Some(video_ai::Error::Quota(msg)) => format!(
            "Video provider credits are exhausted ({msg}); placeholder content was used"
        ),
        Some(e) => format!("Video synthesis was unavailable ({e}); placeholder content was used"),
        None => "No video synthesis provider is configured; placeholder content was used"
            .to_string(),
    };
    info!("Serving placeholder video: {warning}");

    Rendering {
        video_url: PLACEHOLDER_VIDEO_URL.to_string(),
        thumbnail_url: Some(PLACEHOLDER_THUMBNAIL_URL.to_string()),
        provider_video_id: None,
        warning: Some(warning),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use video_ai::types::synthesis::{Job, Submission};

    struct DirectUrlProvider;

    #[async_trait]
    impl synthesis::Provider for DirectUrlProvider {
        async fn submit(&self, _request: SubmitRequest) -> Result<Submission, video_ai::Error> {
            Ok(Submission {
                job_id: "direct-1".to_string(),
                media_url: Some("https://cdn.example.com/renders/direct-1.mp4".to_string()),
            })
        }

        async fn resolve(&self, _job_id: &str) -> Result<Job, video_ai::Error> {
            panic!("direct provider must not be polled");
        }

        fn provider_id(&self) -> &str {
            "direct"
        }

        async fn verify_credentials(&self) -> Result<bool, video_ai::Error> {
            Ok(true)
        }
    }

    struct PollingProvider {
        polls_until_done: usize,
        polls: AtomicUsize,
    }

    #[async_trait]
    impl synthesis::Provider for PollingProvider {
        async fn submit(&self, _request: SubmitRequest) -> Result<Submission, video_ai::Error> {
            Ok(Submission {
                job_id: "poll-1".to_string(),
                media_url: None,
            })
        }

        async fn resolve(&self, job_id: &str) -> Result<Job, video_ai::Error> {
            let seen = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
            if seen >= self.polls_until_done {
                Ok(Job {
                    id: job_id.to_string(),
                    status: JobStatus::Completed,
                    media_url: Some("https://cdn.example.com/renders/poll-1.mp4".to_string()),
                    error_message: None,
                })
            } else {
                Ok(Job {
                    id: job_id.to_string(),
                    status: JobStatus::Processing,
                    media_url: None,
                    error_message: None,
                })
            }
        }

        fn provider_id(&self) -> &str {
            "polling"
        }

        async fn verify_credentials(&self) -> Result<bool, video_ai::Error> {
            Ok(true)
        }
    }

    struct FailingProvider {
        error: fn() -> video_ai::Error,
    }

    #[async_trait]
    impl synthesis::Provider for FailingProvider {
        async fn submit(&self, _request: SubmitRequest) -> Result<Submission, video_ai::Error> {
            Err((self.error)())
        }

        async fn resolve(&self, _job_id: &str) -> Result<Job, video_ai::Error> {
            Err((self.error)())
        }

        fn provider_id(&self) -> &str {
            "failing"
        }

        async fn verify_credentials(&self) -> Result<bool, video_ai::Error> {
            Ok(false)
        }
    }

    fn synthesizer(providers: Vec<Arc<dyn synthesis::Provider>>) -> VideoSynthesizer {
        VideoSynthesizer::new(
            providers,
            Duration::from_millis(1),
            Duration::from_millis(50),
        )
    }

    #[test]
    fn test_presenter_lookup_with_default() {
        assert_eq!(presenter_for_audience("Oncologists"), "presenter_amelia_lab");
        assert_eq!(
            presenter_for_audience("Pediatric specialists"),
            "presenter_sofia_ward"
        );
        assert_eq!(presenter_for_audience("Veterinarians"), DEFAULT_PRESENTER);
    }

    #[test]
    fn test_extension_thumbnail_substitution() {
        let resolver = ExtensionThumbnail;
        assert_eq!(
            resolver.thumbnail_url("https://cdn.example.com/a/b.mp4"),
            Some("https://cdn.example.com/a/b.jpg".to_string())
        );
        assert_eq!(resolver.thumbnail_url("no-extension"), None);
    }

    #[tokio::test]
    async fn test_direct_url_provider_skips_polling() {
        let rendering = synthesizer(vec![Arc::new(DirectUrlProvider)])
            .render("script", "Cardiologists")
            .await;
        assert_eq!(
            rendering.video_url,
            "https://cdn.example.com/renders/direct-1.mp4"
        );
        assert_eq!(
            rendering.thumbnail_url.as_deref(),
            Some("https://cdn.example.com/renders/direct-1.jpg")
        );
        assert_eq!(rendering.provider_video_id.as_deref(), Some("direct-1"));
        assert!(!rendering.is_degraded());
    }

    #[tokio::test]
    async fn test_polling_provider_resolves_after_processing() {
        let rendering = synthesizer(vec![Arc::new(PollingProvider {
            polls_until_done: 3,
            polls: AtomicUsize::new(0),
        })])
        .render("script", "Oncologists")
        .await;
        assert_eq!(
            rendering.video_url,
            "https://cdn.example.com/renders/poll-1.mp4"
        );
        assert!(!rendering.is_degraded());
    }

    #[tokio::test]
    async fn test_second_provider_attempted_after_first_fails() {
        let rendering = synthesizer(vec![
            Arc::new(FailingProvider {
                error: || video_ai::Error::Authentication("bad key".to_string()),
            }),
            Arc::new(DirectUrlProvider),
        ])
        .render("script", "Nurses")
        .await;
        assert_eq!(
            rendering.video_url,
            "https://cdn.example.com/renders/direct-1.mp4"
        );
        assert!(!rendering.is_degraded());
    }

    #[tokio::test]
    async fn test_all_providers_failing_yields_placeholder() {
        let rendering = synthesizer(vec![Arc::new(FailingProvider {
            error: || video_ai::Error::Network("unreachable".to_string()),
        })])
        .render("script", "Pharmacists")
        .await;
        assert_eq!(rendering.video_url, PLACEHOLDER_VIDEO_URL);
        assert_eq!(
            rendering.thumbnail_url.as_deref(),
            Some(PLACEHOLDER_THUMBNAIL_URL)
        );
        assert!(rendering.provider_video_id.is_none());
        assert!(rendering.is_degraded());
    }

    #[tokio::test]
    async fn test_quota_exhaustion_is_distinguished_in_warning() {
        let rendering = synthesizer(vec![Arc::new(FailingProvider {
            error: || video_ai::Error::Quota("0 credits remaining".to_string()),
        })])
        .render("script", "Cardiologists")
        .await;
        let warning = rendering.warning.unwrap();
        assert!(warning.contains("credits are exhausted"));
    }

    #[tokio::test]
    async fn test_poll_timeout_degrades_to_placeholder() {
        let synthesizer = VideoSynthesizer::new(
            vec![Arc::new(PollingProvider {
                polls_until_done: usize::MAX,
                polls: AtomicUsize::new(0),
            })],
            Duration::from_millis(2),
            Duration::from_millis(10),
        );
        let rendering = synthesizer.render("script", "Cardiologists").await;
        assert_eq!(rendering.video_url, PLACEHOLDER_VIDEO_URL);
        assert!(rendering.is_degraded());
    }

    #[tokio::test]
    async fn test_no_providers_configured_yields_placeholder() {
        let rendering = synthesizer(vec![]).render("script", "Anyone").await;
        assert_eq!(rendering.video_url, PLACEHOLDER_VIDEO_URL);
        let warning = rendering.warning.unwrap();
        assert!(warning.contains("No video synthesis provider"));
    }
}
