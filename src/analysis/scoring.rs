//! Fuses content, fluency, and tone signals into the final weighted score.

use crate::analysis::aligner::SlideSpeech;
use crate::analysis::matcher::KeywordOutcome;
use crate::config::ScoringConfig;
use crate::types::{
    ConfidenceLevel, ContentAnalysis, ContentStatus, MetricsStatus, SlideMetrics, ToneAnalysis,
    ToneStatus,
};

/// Minimum accumulated overlap-speech time (seconds) before a window is
/// considered to contain audible speech at all.
pub const SPEECH_PRESENCE_THRESHOLD: f64 = 0.30;

/// Pitch standard deviation above which delivery is labelled Dynamic.
const DYNAMIC_PITCH_THRESHOLD: f64 = 12.0;

/// Pitch std-dev that earns full tone credit.
const FULL_TONE_PITCH: f64 = 15.0;

const MUMBLE_PENALTY_FACTOR: f64 = 2.0;
const FILLER_PENALTY_FACTOR: f64 = 5.0;
const WPM_DECAY_PER_UNIT: f64 = 1.5;

const EXCELLENT_SCORE: f64 = 85.0;
const PASS_MUMBLE_RATE: f64 = 20.0;
const HIGH_CONFIDENCE: f64 = 60.0;

/// Speech presence for one slide window, in priority order: a window with
/// audible speech the transcriber failed to capture as usable text must be
/// reported differently from genuine silence, because the remediation
/// advice differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpeechPresence {
    Matched,
    NotCaptured,
    NoSpeech,
}

/// All three analysis blocks plus the fused score for one slide.
#[derive(Debug, Clone)]
pub struct SlideAnalysis {
    pub overall_score: f64,
    pub content: ContentAnalysis,
    pub tone: ToneAnalysis,
    pub metrics: SlideMetrics,
}

pub struct ScoreCalculator<'a> {
    config: &'a ScoringConfig,
}

impl<'a> ScoreCalculator<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    /// Score one slide from its aligned speech, keyword outcome, and pitch
    /// signal. `window` is the slide's `[start_time, end_time)`.
    pub fn score_slide(
        &self,
        speech: &SlideSpeech,
        outcome: &KeywordOutcome,
        pitch_variability: f64,
        window: (f64, f64),
    ) -> SlideAnalysis {
        let (start_t, end_t) = window;
        let window_duration = end_t - start_t;

        let presence = if speech.has_matches() {
            SpeechPresence::Matched
        } else if speech.overlap_speech > SPEECH_PRESENCE_THRESHOLD {
            SpeechPresence::NotCaptured
        } else {
            SpeechPresence::NoSpeech
        };
        let has_text = presence == SpeechPresence::Matched;

        // Genuine silence invalidates the pitch estimate along with the
        // rate metrics.
        let pitch_variability = if presence == SpeechPresence::NoSpeech {
            0.0
        } else {
            pitch_variability
        };

        let (wpm, mumble_rate) = match presence {
            SpeechPresence::Matched if speech.word_count > 0 => {
                let duration = speech.span_duration();
                (
                    speech.word_count as f64 / duration * 60.0,
                    speech.mumbled.len() as f64 / speech.word_count as f64 * 100.0,
                )
            }
            _ => (0.0, 0.0),
        };

        let content_score = outcome.content_score();
        let filler_count = speech.fillers.len();

        let overall_score = self.overall_score(
            content_score,
            wpm,
            mumble_rate,
            filler_count,
            pitch_variability,
            window_duration,
            has_text,
        );

        let content_status = match presence {
            SpeechPresence::Matched => ContentStatus::Ok,
            SpeechPresence::NotCaptured => ContentStatus::SpeechNotCaptured,
            SpeechPresence::NoSpeech => ContentStatus::NoSpeechDetected,
        };

        let (confidence_score, confidence_level) = confidence(&speech.logprobs, has_text);

        let content = ContentAnalysis {
            score: if has_text { round1(content_score) } else { 0.0 },
            covered_keywords: if has_text {
                outcome.covered.clone()
            } else {
                Vec::new()
            },
            missed_keywords: if has_text {
                outcome.missed.clone()
            } else {
                Vec::new()
            },
            filler_count,
            transcript_extract: if has_text {
                speech.full_text()
            } else {
                String::new()
            },
            confidence_score,
            confidence_level,
            status: content_status,
        };

        let audible = speech.overlap_speech > SPEECH_PRESENCE_THRESHOLD;
        let tone = ToneAnalysis {
            pitch_variability,
            status: if pitch_variability > DYNAMIC_PITCH_THRESHOLD && audible {
                ToneStatus::Dynamic
            } else if audible {
                ToneStatus::Monotone
            } else {
                ToneStatus::Unknown
            },
        };

        let filler_rate_pm = filler_count as f64 / window_duration.max(1e-6) * 60.0;
        let metrics = SlideMetrics {
            wpm: round1(wpm),
            mumble_rate: round1(mumble_rate),
            filler_rate_pm: round1(filler_rate_pm),
            status: if overall_score >= EXCELLENT_SCORE {
                MetricsStatus::Excellent
            } else if has_text && mumble_rate <= PASS_MUMBLE_RATE {
                MetricsStatus::Pass
            } else if has_text {
                MetricsStatus::UnclearSpeech
            } else {
                match presence {
                    SpeechPresence::NotCaptured => MetricsStatus::SpeechNotCaptured,
                    _ => MetricsStatus::NoSpeechDetected,
                }
            },
        };

        SlideAnalysis {
            overall_score,
            content,
            tone,
            metrics,
        }
    }

    /// Weighted fusion of the three sub-scores. Each term is bounded to
    /// [0, 100] before weighting and the weights sum to 1.0, so the result
    /// is bounded by construction. An empty or broken slide must never earn
    /// positive credit from stale defaults.
    #[allow(clippy::too_many_arguments)]
    fn overall_score(
        &self,
        content_score: f64,
        wpm: f64,
        mumble_rate: f64,
        filler_count: usize,
        pitch_variability: f64,
        window_duration: f64,
        has_text: bool,
    ) -> f64 {
        if !has_text || window_duration <= 0.0 {
            return 0.0;
        }

        let score_content = content_score * self.config.weight_content;

        let filler_rate_pm = filler_count as f64 / window_duration.max(1e-6) * 60.0;
        let fluency = self.wpm_sub_score(wpm)
            - mumble_rate * MUMBLE_PENALTY_FACTOR
            - filler_rate_pm * FILLER_PENALTY_FACTOR;
        let score_fluency = fluency.max(0.0) * self.config.weight_fluency;

        let score_tone =
            (pitch_variability / FULL_TONE_PITCH * 100.0).min(100.0) * self.config.weight_tone;

        round1(score_content + score_fluency + score_tone)
    }

    /// 100 inside the ideal band, linear decay outside it, floored at 0.
    pub fn wpm_sub_score(&self, wpm: f64) -> f64 {
        let low = self.config.ideal_wpm_low;
        let high = self.config.ideal_wpm_high;
        if (low..=high).contains(&wpm) {
            return 100.0;
        }
        let distance = (wpm - low).abs().min((wpm - high).abs());
        (100.0 - distance * WPM_DECAY_PER_UNIT).max(0.0)
    }
}

/// Diagnostic recognition confidence: `exp(mean(avg_logprobs)) * 100`.
/// Not part of the weighted formula.
fn confidence(logprobs: &[f64], has_text: bool) -> (f64, ConfidenceLevel) {
    if !has_text || logprobs.is_empty() {
        return (0.0, ConfidenceLevel::None);
    }
    let mean = logprobs.iter().sum::<f64>() / logprobs.len() as f64;
    let score = mean.exp() * 100.0;
    let level = if score >= HIGH_CONFIDENCE {
        ConfidenceLevel::High
    } else {
        ConfidenceLevel::Low
    };
    (round1(score), level)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
