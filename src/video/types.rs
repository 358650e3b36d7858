//! Core types for video generation.

use crate::error::{Result, VeoGenError};
use std::path::{Path, PathBuf};

/// Default output resolution (16:9).
pub const DEFAULT_RESOLUTION: &str = "1920x1080";

/// A request to generate a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    resolution: String,
    duration_secs: u32,
}

impl GenerationRequest {
    /// Creates a request, rejecting an empty prompt or a zero duration.
    pub fn new(
        prompt: impl Into<String>,
        resolution: impl Into<String>,
        duration_secs: u32,
    ) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(VeoGenError::InvalidRequest("prompt must not be empty".into()));
        }
        if duration_secs == 0 {
            return Err(VeoGenError::InvalidRequest(
                "duration must be at least 1 second".into(),
            ));
        }
        Ok(Self {
            prompt,
            resolution: resolution.into(),
            duration_secs,
        })
    }

    /// The text prompt describing the desired video.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Resolution as sent to the API (e.g. "1920x1080").
    pub fn resolution(&self) -> &str {
        &self.resolution
    }

    /// Desired video duration in seconds.
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Duration in the API's `"<seconds>s"` form.
    pub fn duration(&self) -> String {
        format!("{}s", self.duration_secs)
    }

    /// Prompt preview for progress output: first 60 characters.
    pub fn prompt_preview(&self) -> &str {
        match self.prompt.char_indices().nth(60) {
            Some((idx, _)) => &self.prompt[..idx],
            None => &self.prompt,
        }
    }
}

/// Opaque identifier of a long-running operation, as returned by submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationHandle(String);

impl OperationHandle {
    /// Wraps an operation name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The operation name (e.g. "operations/abc123").
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a single status poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    /// Not done yet.
    Pending,
    /// Done, with the URL of the generated video.
    Succeeded {
        /// Where the video can be downloaded.
        video_url: String,
    },
    /// Done, with the provider's error message.
    Failed {
        /// Provider message, or "Unknown error".
        message: String,
    },
}

impl OperationStatus {
    /// Returns true for `Succeeded` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A downloaded video and where it was written.
#[derive(Debug, Clone)]
pub struct DownloadedArtifact {
    /// Raw video bytes.
    pub data: Vec<u8>,
    /// Destination path the bytes were written to.
    pub path: PathBuf,
}

impl DownloadedArtifact {
    /// Creates an artifact that has not been written yet.
    pub fn new(data: Vec<u8>, path: impl Into<PathBuf>) -> Self {
        Self {
            data,
            path: path.into(),
        }
    }

    /// Returns the size of the video data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Writes the bytes to `self.path`, creating the parent directory if
    /// needed and replacing any existing file.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, &self.data)?;
        Ok(())
    }

    /// Absolute form of the destination path.
    pub fn absolute_path(&self) -> Result<PathBuf> {
        Ok(std::path::absolute(&self.path)?)
    }

    /// Returns the destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_duration_format() {
        let req = GenerationRequest::new("A lion", DEFAULT_RESOLUTION, 5).unwrap();
        assert_eq!(req.duration(), "5s");
        assert_eq!(req.resolution(), "1920x1080");
        assert_eq!(req.duration_secs(), 5);
    }

    #[test]
    fn test_request_rejects_empty_prompt() {
        let err = GenerationRequest::new("   ", DEFAULT_RESOLUTION, 5).unwrap_err();
        assert!(matches!(err, VeoGenError::InvalidRequest(_)));
    }

    #[test]
    fn test_request_rejects_zero_duration() {
        let err = GenerationRequest::new("A lion", DEFAULT_RESOLUTION, 0).unwrap_err();
        assert!(matches!(err, VeoGenError::InvalidRequest(_)));
    }

    #[test]
    fn test_prompt_preview() {
        let short = GenerationRequest::new("A lion", DEFAULT_RESOLUTION, 5).unwrap();
        assert_eq!(short.prompt_preview(), "A lion");

        let long = GenerationRequest::new("x".repeat(100), DEFAULT_RESOLUTION, 5).unwrap();
        assert_eq!(long.prompt_preview().len(), 60);
    }

    #[test]
    fn test_status_is_terminal() {
        assert!(!OperationStatus::Pending.is_terminal());
        assert!(OperationStatus::Succeeded {
            video_url: "https://x/video.mp4".into()
        }
        .is_terminal());
        assert!(OperationStatus::Failed {
            message: "Unknown error".into()
        }
        .is_terminal());
    }

    #[test]
    fn test_save_creates_dir_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output").join("nature_veo.mp4");

        DownloadedArtifact::new(b"old contents, longer".to_vec(), &path)
            .save()
            .unwrap();
        DownloadedArtifact::new(vec![0x00, 0x01, 0x02], &path)
            .save()
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![0x00, 0x01, 0x02]);
    }

    #[test]
    fn test_absolute_path() {
        let artifact = DownloadedArtifact::new(Vec::new(), "output/nature_veo.mp4");
        let abs = artifact.absolute_path().unwrap();
        assert!(abs.is_absolute());
        assert!(abs.ends_with("output/nature_veo.mp4"));
    }
}
