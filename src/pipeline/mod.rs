//! Pipeline orchestrator: one synchronous pass over all slides.
//!
//! Failure granularity is deliberate: a missing input file aborts the run
//! before any per-slide work; a missing timing entry degrades one slide to
//! explicit error markers; a pitch failure degrades one signal to 0.0.
//! One bad slide never aborts the batch.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::analysis::{collect_slide_speech, KeywordMatcher, ScoreCalculator};
use crate::audio::pitch;
use crate::config::ScoringConfig;
use crate::ingest;
use crate::semantic::SentenceEncoder;
use crate::types::{AnalysisBlock, Slide, SlideReport, TimingEntry, TranscriptSegment};

/// Paths to the four required input artifacts.
#[derive(Debug, Clone)]
pub struct AnalysisInputs {
    pub slides: PathBuf,
    pub transcript: PathBuf,
    pub timing: PathBuf,
    pub audio: PathBuf,
}

/// Run the full analysis pass and write the enriched slide list to
/// `output_path` as one UTF-8 JSON document.
pub fn run_analysis(
    inputs: &AnalysisInputs,
    output_path: &Path,
    config: &ScoringConfig,
    encoder: Option<&dyn SentenceEncoder>,
) -> Result<Vec<SlideReport>> {
    ingest::ensure_inputs_exist(&[
        inputs.slides.as_path(),
        inputs.transcript.as_path(),
        inputs.timing.as_path(),
        inputs.audio.as_path(),
    ])?;

    let slides = ingest::load_slides(&inputs.slides)?;
    let transcript = ingest::load_transcript(&inputs.transcript)?;
    let timings = ingest::load_timings(&inputs.timing)?;

    info!(
        slides = slides.len(),
        segments = transcript.segments.len(),
        timings = timings.len(),
        "starting analysis pass"
    );

    let matcher = KeywordMatcher::new(config, encoder);
    let calculator = ScoreCalculator::new(config);

    let mut reports = Vec::with_capacity(slides.len());
    for (index, slide) in slides.into_iter().enumerate() {
        let report = analyze_slide(
            slide,
            timings.get(index),
            &transcript.segments,
            &inputs.audio,
            &matcher,
            &calculator,
        );
        reports.push(report);
    }

    let json = serde_json::to_string_pretty(&reports).context("failed to serialize report")?;
    fs::write(output_path, json)
        .with_context(|| format!("failed to write report {}", output_path.display()))?;
    info!(path = %output_path.display(), "analysis report written");

    Ok(reports)
}

fn analyze_slide(
    slide: Slide,
    timing: Option<&TimingEntry>,
    segments: &[TranscriptSegment],
    audio_path: &Path,
    matcher: &KeywordMatcher,
    calculator: &ScoreCalculator,
) -> SlideReport {
    let page_index = slide.page_index;
    let Some(timing) = timing else {
        warn!(page_index, "slide has no timing entry, skipping analysis");
        return SlideReport::missing_timing(slide);
    };

    let start_t = timing.start_time;
    // Clamp inverted windows on ingest rather than propagating them.
    let end_t = timing.end_time.max(start_t);

    let speech = collect_slide_speech(segments, start_t, end_t);
    let outcome = matcher.match_keywords(&slide.keywords_expanded, &speech.full_text());
    let pitch_variability = pitch::pitch_variability(audio_path, start_t, end_t);
    let analysis = calculator.score_slide(&speech, &outcome, pitch_variability, (start_t, end_t));

    info!(
        page_index,
        overall = analysis.overall_score,
        content = analysis.content.score,
        filler_rate_pm = analysis.metrics.filler_rate_pm,
        "slide scored"
    );

    SlideReport {
        page_index,
        keywords_expanded: slide.keywords_expanded,
        extra: slide.extra,
        start_time: Some(start_t),
        end_time: Some(end_t),
        overall_score: Some(analysis.overall_score),
        content_analysis: AnalysisBlock::Ready(analysis.content),
        tone_analysis: AnalysisBlock::Ready(analysis.tone),
        metrics: AnalysisBlock::Ready(analysis.metrics),
    }
}
