//! Video generation module.

mod client;
mod sleeper;
mod types;

pub use client::{
    VideoGenerationClient, VideoGenerationClientBuilder, DEFAULT_BASE_URL, DEFAULT_MODEL,
    DEFAULT_POLL_INTERVAL,
};
pub use sleeper::{Sleeper, TokioSleeper};
pub use types::{
    DownloadedArtifact, GenerationRequest, OperationHandle, OperationStatus, DEFAULT_RESOLUTION,
};
