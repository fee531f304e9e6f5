//! Core types for the rehearsal scoring pipeline

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One slide record as produced by upstream slide extraction.
///
/// Upstream attaches fields this engine does not interpret (raw slide text,
/// image references); those ride along in `extra` and are written back
/// verbatim so the report stays a superset of the input.
#[derive(Debug, Clone, Deserialize)]
pub struct Slide {
    pub page_index: usize,
    /// Expected concepts: canonical key mapped to its synonym phrases.
    #[serde(default)]
    pub keywords_expanded: BTreeMap<String, Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Transcript artifact root.
#[derive(Debug, Clone, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
    #[serde(default)]
    pub language: Option<String>,
}

/// A contiguous span of recognized speech, canonicalized at ingest.
///
/// Older transcriber builds emitted `start`/`end` instead of
/// `voice_start`/`voice_end`; the aliases fold both shapes into one struct
/// so nothing downstream has to care.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptSegment {
    #[serde(default)]
    pub text: String,
    #[serde(alias = "start", default)]
    pub voice_start: f64,
    #[serde(alias = "end", default)]
    pub voice_end: f64,
    #[serde(default = "default_avg_logprob")]
    pub avg_logprob: f64,
    #[serde(default)]
    pub no_speech_prob: f64,
    #[serde(default)]
    pub mumbled_words: Vec<MumbledWord>,
    #[serde(default)]
    pub filler_words: Vec<FillerWord>,
}

fn default_avg_logprob() -> f64 {
    -1.0
}

/// A word whose recognition confidence fell below the transcriber threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MumbledWord {
    pub word: String,
    #[serde(default)]
    pub conf: f64,
    #[serde(default)]
    pub start: f64,
}

/// A disfluency token ("um", "uh", ...) flagged by the transcriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillerWord {
    pub word: String,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
}

/// One slide-transition event on the audio's own time axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingEntry {
    pub page_index: usize,
    pub start_time: f64,
    pub end_time: f64,
}

/// Analysis block that is either a populated result or an explicit error
/// marker (`{"error": "..."}`), never silently absent.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisBlock<T> {
    Ready(T),
    Error(AnalysisError),
}

impl<T> AnalysisBlock<T> {
    pub fn error(message: impl Into<String>) -> Self {
        AnalysisBlock::Error(AnalysisError {
            error: message.into(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisError {
    pub error: String,
}

/// Content-coverage result for one slide.
#[derive(Debug, Clone, Serialize)]
pub struct ContentAnalysis {
    pub score: f64,
    pub covered_keywords: Vec<String>,
    pub missed_keywords: Vec<String>,
    pub filler_count: usize,
    pub transcript_extract: String,
    pub confidence_score: f64,
    pub confidence_level: ConfidenceLevel,
    pub status: ContentStatus,
}

/// Speech-presence classification for a slide window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "Speech Not Captured")]
    SpeechNotCaptured,
    #[serde(rename = "No Speech Detected")]
    NoSpeechDetected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfidenceLevel {
    High,
    Low,
    None,
}

/// Pitch-variability result for one slide.
#[derive(Debug, Clone, Serialize)]
pub struct ToneAnalysis {
    pub pitch_variability: f64,
    pub status: ToneStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ToneStatus {
    Dynamic,
    Monotone,
    Unknown,
}

/// Delivery-rate metrics for one slide.
#[derive(Debug, Clone, Serialize)]
pub struct SlideMetrics {
    pub wpm: f64,
    pub mumble_rate: f64,
    pub filler_rate_pm: f64,
    pub status: MetricsStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricsStatus {
    Excellent,
    Pass,
    #[serde(rename = "Unclear Speech")]
    UnclearSpeech,
    #[serde(rename = "Speech Not Captured")]
    SpeechNotCaptured,
    #[serde(rename = "No Speech Detected")]
    NoSpeechDetected,
}

/// A slide enriched with its time window and all analysis blocks; one of
/// these per input slide makes up the output report.
#[derive(Debug, Clone, Serialize)]
pub struct SlideReport {
    pub page_index: usize,
    pub keywords_expanded: BTreeMap<String, Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    pub content_analysis: AnalysisBlock<ContentAnalysis>,
    pub tone_analysis: AnalysisBlock<ToneAnalysis>,
    pub metrics: AnalysisBlock<SlideMetrics>,
}

impl SlideReport {
    /// Report for a slide with no timing entry: explicit error markers in
    /// every block, no score.
    pub fn missing_timing(slide: Slide) -> Self {
        const MESSAGE: &str = "No timing data";
        Self {
            page_index: slide.page_index,
            keywords_expanded: slide.keywords_expanded,
            extra: slide.extra,
            start_time: None,
            end_time: None,
            overall_score: None,
            content_analysis: AnalysisBlock::error(MESSAGE),
            tone_analysis: AnalysisBlock::error(MESSAGE),
            metrics: AnalysisBlock::error(MESSAGE),
        }
    }
}

/// Raw audio data representation (mono, f32 samples)
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Audio samples, normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g., 44100)
    pub sample_rate: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_accepts_current_field_names() {
        let seg: TranscriptSegment = serde_json::from_str(
            r#"{"text": "hello", "voice_start": 1.5, "voice_end": 2.0, "avg_logprob": -0.2}"#,
        )
        .unwrap();
        assert_eq!(seg.voice_start, 1.5);
        assert_eq!(seg.voice_end, 2.0);
        assert_eq!(seg.avg_logprob, -0.2);
    }

    #[test]
    fn segment_accepts_legacy_field_names() {
        let seg: TranscriptSegment =
            serde_json::from_str(r#"{"text": "hello", "start": 3.0, "end": 4.5}"#).unwrap();
        assert_eq!(seg.voice_start, 3.0);
        assert_eq!(seg.voice_end, 4.5);
        // Missing confidence defaults to the transcriber's worst-case proxy.
        assert_eq!(seg.avg_logprob, -1.0);
        assert_eq!(seg.no_speech_prob, 0.0);
    }

    #[test]
    fn analysis_block_serializes_error_marker() {
        let block: AnalysisBlock<ContentAnalysis> = AnalysisBlock::error("No timing data");
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json, serde_json::json!({"error": "No timing data"}));
    }

    #[test]
    fn slide_preserves_unknown_fields() {
        let slide: Slide = serde_json::from_str(
            r#"{"page_index": 0, "slide_text": "Intro", "keywords_expanded": {"topic": ["topic"]}}"#,
        )
        .unwrap();
        assert_eq!(slide.extra.get("slide_text").unwrap(), "Intro");
        assert_eq!(slide.keywords_expanded.len(), 1);
    }
}
