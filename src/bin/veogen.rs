//! CLI for veogen - generate a Veo video and save it locally.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use veogen::{DownloadedArtifact, Settings};

#[derive(Parser)]
#[command(name = "veogen")]
#[command(about = "Generate a video with Veo (Google) and download it")]
#[command(version)]
struct Cli {
    /// The text prompt describing the video (defaults to the nature preset)
    #[arg(short, long)]
    prompt: Option<String>,

    /// Video duration in seconds
    #[arg(short, long)]
    duration: Option<u32>,

    /// Resolution (e.g., 1920x1080)
    #[arg(long)]
    resolution: Option<String>,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seconds to wait between status polls
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Give up after this many status polls
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Give up after polling for this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(prompt) = &self.prompt {
            settings.prompt = prompt.clone();
        }
        if let Some(duration) = self.duration {
            settings.duration_secs = duration;
        }
        if let Some(resolution) = &self.resolution {
            settings.resolution = resolution.clone();
        }
        if let Some(output) = &self.output {
            settings.output = output.clone();
        }
        if let Some(secs) = self.poll_interval {
            settings.poll_interval = Duration::from_secs(secs);
        }
        settings.max_attempts = self.max_attempts;
        settings.timeout = self.timeout.map(Duration::from_secs);
        settings
    }
}

/// Resolves the API key first, then layers the flags on top. Nothing here
/// touches the network.
fn resolve_settings<F>(cli: &Cli, lookup: F) -> veogen::Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    Settings::from_lookup(lookup).map(|settings| cli.apply(settings))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // A missing .env file is fine; a malformed one is worth a warning.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!("failed to load .env: {e}");
        }
    }

    let json_output = cli.json;
    match run(&cli, json_output, |name| std::env::var(name).ok()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json_output {
                let result = serde_json::json!({
                    "type": "video",
                    "success": false,
                    "error": e.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default());
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

async fn run<F>(cli: &Cli, json_output: bool, lookup: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = resolve_settings(cli, lookup)?;
    let request = settings.request()?;
    let client = settings.client()?;

    let video = client.generate(&request, &settings.output).await?;
    report(&video, json_output)
}

fn report(video: &DownloadedArtifact, json_output: bool) -> anyhow::Result<()> {
    let saved = video.absolute_path()?;

    if json_output {
        let result = serde_json::json!({
            "type": "video",
            "success": true,
            "output": saved.display().to_string(),
            "size_bytes": video.size(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Saved to: {} ({} bytes)", saved.display(), video.size());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use veogen::config::API_KEY_ENV;
    use veogen::VeoGenError;

    fn with_key(name: &str) -> Option<String> {
        (name == API_KEY_ENV).then(|| "test-key".to_string())
    }

    #[test]
    fn test_no_flags_keeps_defaults() {
        let cli = Cli::try_parse_from(["veogen"]).unwrap();
        let settings = resolve_settings(&cli, with_key).unwrap();

        assert!(settings.prompt.starts_with("A majestic lion"));
        assert_eq!(settings.duration_secs, 5);
        assert_eq!(settings.resolution, "1920x1080");
        assert_eq!(settings.output, PathBuf::from("output/nature_veo.mp4"));
        assert_eq!(settings.poll_interval, Duration::from_secs(10));
        assert!(settings.max_attempts.is_none());
        assert!(settings.timeout.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "veogen",
            "--prompt",
            "Ocean waves",
            "--duration",
            "8",
            "--resolution",
            "1280x720",
            "--output",
            "clips/waves.mp4",
            "--poll-interval",
            "2",
            "--max-attempts",
            "30",
            "--timeout",
            "600",
            "--json",
        ])
        .unwrap();
        let settings = resolve_settings(&cli, with_key).unwrap();

        assert_eq!(settings.prompt, "Ocean waves");
        assert_eq!(settings.duration_secs, 8);
        assert_eq!(settings.resolution, "1280x720");
        assert_eq!(settings.output, PathBuf::from("clips/waves.mp4"));
        assert_eq!(settings.poll_interval, Duration::from_secs(2));
        assert_eq!(settings.max_attempts, Some(30));
        assert_eq!(settings.timeout, Some(Duration::from_secs(600)));
        assert!(cli.json);
    }

    #[test]
    fn test_missing_key_fails_before_client() {
        let cli = Cli::try_parse_from(["veogen", "--prompt", "Ocean waves"]).unwrap();
        let err = resolve_settings(&cli, |_| None).unwrap_err();
        assert!(matches!(err, VeoGenError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_run_without_key_stops_at_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output").join("nature_veo.mp4");
        let output_arg = output.to_str().unwrap();
        let cli = Cli::try_parse_from(["veogen", "--output", output_arg]).unwrap();

        let err = run(&cli, false, |_| None).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VeoGenError>(),
            Some(VeoGenError::Configuration(_))
        ));
        assert!(!dir.path().join("output").exists());
    }
}
