use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rehearsalyzer::config::ScoringConfig;
use rehearsalyzer::pipeline::{self, AnalysisInputs};
use rehearsalyzer::semantic::{MiniLmEncoder, SentenceEncoder};

/// Rehearsalyzer - presentation rehearsal scoring engine
///
/// Correlates a spoken-word transcript, audio prosody, and slide timing
/// into a per-slide performance report.
#[derive(Parser, Debug)]
#[command(name = "rehearsalyzer")]
#[command(version = "0.1.0")]
#[command(about = "Presentation rehearsal scoring engine", long_about = None)]
struct Args {
    /// Slide records with expanded keywords (JSON)
    #[arg(long, value_name = "PATH")]
    slides: PathBuf,

    /// Transcript artifact with timestamped segments (JSON)
    #[arg(long, value_name = "PATH")]
    transcript: PathBuf,

    /// Slide-transition timing artifact (JSON)
    #[arg(long, value_name = "PATH")]
    timing: PathBuf,

    /// Rehearsal audio file (WAV, MP3, FLAC, OGG, ...)
    #[arg(long, value_name = "PATH")]
    audio: PathBuf,

    /// Where to write the enriched report (JSON)
    #[arg(long, value_name = "PATH")]
    output: PathBuf,

    /// Directory holding the sentence-embedding model (config.json,
    /// tokenizer.json, model.safetensors); semantic keyword matching is
    /// disabled when omitted
    #[arg(long, value_name = "DIR")]
    model_dir: Option<PathBuf>,
}

impl Args {
    fn validate(&self) -> Result<()> {
        for (label, path) in [
            ("slides", &self.slides),
            ("transcript", &self.transcript),
            ("timing", &self.timing),
            ("audio", &self.audio),
        ] {
            if !path.is_file() {
                anyhow::bail!("{} file does not exist: {:?}", label, path);
            }
        }
        if let Some(dir) = &self.model_dir {
            if !dir.is_dir() {
                anyhow::bail!("model directory does not exist: {:?}", dir);
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    args.validate()
        .context("failed to validate command-line arguments")?;

    let config = ScoringConfig::from_env().context("failed to load scoring configuration")?;

    let encoder = match &args.model_dir {
        Some(dir) => Some(
            MiniLmEncoder::load(dir).context("failed to load sentence embedding model")?,
        ),
        None => {
            info!("no model directory given; semantic keyword tier disabled");
            None
        }
    };

    let inputs = AnalysisInputs {
        slides: args.slides,
        transcript: args.transcript,
        timing: args.timing,
        audio: args.audio,
    };

    let reports = pipeline::run_analysis(
        &inputs,
        &args.output,
        &config,
        encoder.as_ref().map(|e| e as &dyn SentenceEncoder),
    )?;

    info!(
        slides = reports.len(),
        output = %args.output.display(),
        "analysis complete"
    );

    Ok(())
}
