#![warn(missing_docs)]
//! veogen - generate a video with Google Veo and save it to disk.
//!
//! The workflow is three HTTP calls: submit a generation request, poll the
//! long-running operation until it is done, then download the video.
//!
//! # Quick Start
//!
//! ```no_run
//! use veogen::{GenerationRequest, VideoGenerationClient};
//!
//! #[tokio::main]
//! async fn main() -> veogen::Result<()> {
//!     let client = VideoGenerationClient::builder()
//!         .api_key(std::env::var("GEMINI_API_KEY").unwrap_or_default())
//!         .build()?;
//!     let request = GenerationRequest::new("Ocean waves at sunset", "1920x1080", 5)?;
//!     let video = client.generate(&request, "output/waves.mp4").await?;
//!     println!("saved {} bytes", video.size());
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `veogen` command-line binary

pub mod config;
mod error;
pub mod video;

// Re-export error types at crate root
pub use error::{Result, VeoGenError};

pub use config::Settings;
pub use video::{
    DownloadedArtifact, GenerationRequest, OperationHandle, OperationStatus, Sleeper,
    TokioSleeper, VideoGenerationClient, VideoGenerationClientBuilder,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::Settings;
    pub use crate::error::{Result, VeoGenError};
    pub use crate::video::{
        DownloadedArtifact, GenerationRequest, OperationStatus, VideoGenerationClient,
    };
}
