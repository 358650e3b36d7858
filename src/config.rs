//! Run settings: API key resolution and workflow defaults.

use crate::error::{Result, VeoGenError};
use crate::video::{
    GenerationRequest, VideoGenerationClient, DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL,
    DEFAULT_RESOLUTION,
};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// The "nature" preset prompt.
pub const DEFAULT_PROMPT: &str = "A majestic lion slowly walks through tall savanna grass, \
golden hour sunlight, cinematic 4K, wildlife documentary style";

/// Default clip length in seconds.
pub const DEFAULT_DURATION_SECS: u32 = 5;

/// Default destination of the downloaded video.
pub const DEFAULT_OUTPUT: &str = "output/nature_veo.mp4";

/// Everything one generation run needs.
#[derive(Clone)]
pub struct Settings {
    /// Gemini API key. Only ever sent as the `key` query parameter.
    pub api_key: String,
    /// Text prompt.
    pub prompt: String,
    /// Output resolution, e.g. "1920x1080".
    pub resolution: String,
    /// Clip length in seconds.
    pub duration_secs: u32,
    /// Where the video is written.
    pub output: PathBuf,
    /// API root.
    pub base_url: String,
    /// Wait between status polls.
    pub poll_interval: Duration,
    /// Optional cap on status polls.
    pub max_attempts: Option<u32>,
    /// Optional cap on total polling time.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("prompt", &self.prompt)
            .field("resolution", &self.resolution)
            .field("duration_secs", &self.duration_secs)
            .field("output", &self.output)
            .field("base_url", &self.base_url)
            .field("poll_interval", &self.poll_interval)
            .field("max_attempts", &self.max_attempts)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Settings {
    /// Reads the API key from `GEMINI_API_KEY`; everything else gets defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`Settings::from_env`], with a custom variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                VeoGenError::Configuration(format!(
                    "{API_KEY_ENV} not found. Set it in your environment or .env file."
                ))
            })?;

        Ok(Self::with_api_key(api_key))
    }

    /// Default settings around an explicit API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            prompt: DEFAULT_PROMPT.to_string(),
            resolution: DEFAULT_RESOLUTION.to_string(),
            duration_secs: DEFAULT_DURATION_SECS,
            output: PathBuf::from(DEFAULT_OUTPUT),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
            timeout: None,
        }
    }

    /// Builds the generation request.
    pub fn request(&self) -> Result<GenerationRequest> {
        GenerationRequest::new(&self.prompt, &self.resolution, self.duration_secs)
    }

    /// Builds a client with these settings.
    pub fn client(&self) -> Result<VideoGenerationClient> {
        VideoGenerationClient::builder()
            .api_key(&self.api_key)
            .base_url(&self.base_url)
            .poll_interval(self.poll_interval)
            .max_attempts(self.max_attempts)
            .timeout(self.timeout)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key() {
        let err = Settings::from_lookup(|_| None).unwrap_err();
        match err {
            VeoGenError::Configuration(msg) => assert!(msg.contains("GEMINI_API_KEY")),
            other => panic!("expected Configuration, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_api_key() {
        let err = Settings::from_lookup(|_| Some("  ".into())).unwrap_err();
        assert!(matches!(err, VeoGenError::Configuration(_)));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(|name| {
            (name == API_KEY_ENV).then(|| "test-key".to_string())
        })
        .unwrap();

        assert_eq!(settings.api_key, "test-key");
        assert!(settings.prompt.starts_with("A majestic lion"));
        assert_eq!(settings.resolution, "1920x1080");
        assert_eq!(settings.duration_secs, 5);
        assert_eq!(settings.output, PathBuf::from("output/nature_veo.mp4"));
        assert_eq!(settings.poll_interval, Duration::from_secs(10));
        assert!(settings.max_attempts.is_none());
        assert!(settings.timeout.is_none());
    }

    #[test]
    fn test_request_from_defaults() {
        let req = Settings::with_api_key("test-key").request().unwrap();
        assert_eq!(req.prompt(), DEFAULT_PROMPT);
        assert_eq!(req.duration(), "5s");
    }

    #[test]
    fn test_client_from_settings() {
        assert!(Settings::with_api_key("test-key").client().is_ok());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = Settings::with_api_key("secret-key");
        assert!(!format!("{settings:?}").contains("secret-key"));
    }
}
