//! Veo generation client: submit, poll, download.

use crate::error::{truncate_body, Result, VeoGenError};
use crate::video::sleeper::{Sleeper, TokioSleeper};
use crate::video::types::{DownloadedArtifact, GenerationRequest, OperationHandle, OperationStatus};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Gemini Developer API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";

/// Model addressed by the generate endpoint.
pub const DEFAULT_MODEL: &str = "veo-1";

/// Fixed wait between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Builder for [`VideoGenerationClient`].
#[derive(Clone)]
pub struct VideoGenerationClientBuilder {
    api_key: Option<String>,
    base_url: String,
    model: String,
    poll_interval: Duration,
    max_attempts: Option<u32>,
    timeout: Option<Duration>,
    sleeper: Arc<dyn Sleeper>,
}

impl Default for VideoGenerationClientBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
            timeout: None,
            sleeper: Arc::new(TokioSleeper),
        }
    }
}

impl std::fmt::Debug for VideoGenerationClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoGenerationClientBuilder")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("poll_interval", &self.poll_interval)
            .field("max_attempts", &self.max_attempts)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl VideoGenerationClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Required.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the API root (used to point at a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the model name in the generate endpoint path.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the wait between status polls.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Caps the number of status polls. Unbounded when unset.
    pub fn max_attempts(mut self, attempts: Option<u32>) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Caps the total time spent polling. Unbounded when unset.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the delay implementation used between polls.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Builds the client. Fails if no API key was provided.
    pub fn build(self) -> Result<VideoGenerationClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| VeoGenError::Configuration("API key not provided".into()))?;

        if self.max_attempts == Some(0) {
            return Err(VeoGenError::Configuration(
                "max attempts must be at least 1".into(),
            ));
        }

        Ok(VideoGenerationClient {
            client: reqwest::Client::new(),
            api_key,
            base_url: self.base_url,
            model: self.model,
            poll_interval: self.poll_interval,
            max_attempts: self.max_attempts,
            timeout: self.timeout,
            sleeper: self.sleeper,
        })
    }
}

/// Client for the Veo generate/poll/download workflow.
pub struct VideoGenerationClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    poll_interval: Duration,
    max_attempts: Option<u32>,
    timeout: Option<Duration>,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for VideoGenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoGenerationClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("poll_interval", &self.poll_interval)
            .field("max_attempts", &self.max_attempts)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl VideoGenerationClient {
    /// Creates a new `VideoGenerationClientBuilder`.
    pub fn builder() -> VideoGenerationClientBuilder {
        VideoGenerationClientBuilder::new()
    }

    /// Starts a generation job and returns its operation handle.
    ///
    /// Anything other than HTTP 200 is a [`VeoGenError::Submission`] carrying
    /// the response body.
    pub async fn submit_generation(&self, request: &GenerationRequest) -> Result<OperationHandle> {
        let url = format!("{}/models/{}:generateVideo", self.base_url, self.model);
        let body = GenerateVideoBody::from_request(request);
        tracing::debug!(url = %url, "submitting video generation request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if status != StatusCode::OK {
            return Err(VeoGenError::Submission {
                status: status.as_u16(),
                body: text,
            });
        }

        let submitted: SubmitResponse = serde_json::from_str(&text)?;
        let name = submitted.name.filter(|n| !n.is_empty()).ok_or_else(|| {
            VeoGenError::UnexpectedResponse("submit response has no operation name".into())
        })?;
        Ok(OperationHandle::new(name))
    }

    /// Fetches the operation resource once and classifies it.
    pub async fn poll_once(&self, handle: &OperationHandle) -> Result<OperationStatus> {
        let url = format!("{}/{}", self.base_url, handle.name());

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(VeoGenError::Api {
                status: status.as_u16(),
                message: truncate_body(&text),
            });
        }

        let operation: OperationResponse = serde_json::from_str(&text)?;
        Ok(operation.into_status())
    }

    /// Polls until the operation reaches a terminal status.
    ///
    /// Waits `poll_interval` after each pending response. Without a
    /// configured attempt cap or timeout the loop never gives up. The timeout
    /// is measured on the sleeper's clock.
    pub async fn poll_until_complete(&self, handle: &OperationHandle) -> Result<OperationStatus> {
        let start = self.sleeper.now();
        let mut attempts: u32 = 0;

        loop {
            let status = self.poll_once(handle).await?;
            attempts += 1;

            if status.is_terminal() {
                tracing::debug!(operation = %handle, attempts, "operation finished");
                return Ok(status);
            }

            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    return Err(VeoGenError::PollLimitExceeded { attempts });
                }
            }
            let elapsed = self.sleeper.now().saturating_duration_since(start);
            if let Some(timeout) = self.timeout {
                if elapsed >= timeout {
                    return Err(VeoGenError::Timeout(timeout));
                }
            }

            tracing::info!(
                operation = %handle,
                attempt = attempts,
                elapsed_secs = elapsed.as_secs(),
                "...waiting {} seconds...",
                self.poll_interval.as_secs_f64()
            );
            self.sleeper.sleep(self.poll_interval).await;
        }
    }

    /// Downloads the video at `video_url` and writes it to `destination`.
    ///
    /// No API key is attached to this request.
    pub async fn download_artifact(
        &self,
        video_url: &str,
        destination: impl Into<PathBuf>,
    ) -> Result<DownloadedArtifact> {
        let destination = destination.into();
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let response = self.client.get(video_url).send().await?;
        if !response.status().is_success() {
            return Err(VeoGenError::Download {
                status: response.status().as_u16(),
            });
        }

        let artifact = DownloadedArtifact::new(response.bytes().await?.to_vec(), destination);
        artifact.save()?;
        tracing::debug!(
            path = %artifact.path().display(),
            size_bytes = artifact.size(),
            "video written"
        );
        Ok(artifact)
    }

    /// Runs the whole workflow: submit, poll, then download on success.
    ///
    /// A failed operation becomes [`VeoGenError::Generation`] and nothing is
    /// downloaded.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        destination: impl Into<PathBuf>,
    ) -> Result<DownloadedArtifact> {
        tracing::info!("Generating Veo video via REST API...");
        tracing::info!("Prompt: {}...", request.prompt_preview());

        let handle = self.submit_generation(request).await?;
        tracing::info!(operation = %handle, "Operation started: {}", handle);

        match self.poll_until_complete(&handle).await? {
            OperationStatus::Succeeded { video_url } => {
                tracing::info!("Video ready! Downloading...");
                self.download_artifact(&video_url, destination).await
            }
            OperationStatus::Failed { message } => Err(VeoGenError::Generation(message)),
            OperationStatus::Pending => Err(VeoGenError::UnexpectedResponse(
                "polling stopped on a pending operation".into(),
            )),
        }
    }
}

// Request/Response types
#[derive(Debug, Serialize)]
struct GenerateVideoBody<'a> {
    prompt: &'a str,
    resolution: &'a str,
    duration: String,
}

impl<'a> GenerateVideoBody<'a> {
    fn from_request(req: &'a GenerationRequest) -> Self {
        Self {
            prompt: req.prompt(),
            resolution: req.resolution(),
            duration: req.duration(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OperationResponse {
    done: Option<bool>,
    response: Option<OperationResult>,
    error: Option<OperationError>,
}

#[derive(Debug, Deserialize)]
struct OperationResult {
    video: Option<VideoRef>,
}

#[derive(Debug, Deserialize)]
struct VideoRef {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    message: Option<String>,
}

impl OperationResponse {
    fn into_status(self) -> OperationStatus {
        if !self.done.unwrap_or(false) {
            return OperationStatus::Pending;
        }

        let video_url = self
            .response
            .and_then(|r| r.video)
            .and_then(|v| v.url)
            .filter(|u| !u.is_empty());
        if let Some(video_url) = video_url {
            return OperationStatus::Succeeded { video_url };
        }

        OperationStatus::Failed {
            message: self
                .error
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Unknown error".into()),
        }
    }
}
