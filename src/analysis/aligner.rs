//! Maps transcript segments onto a slide's time window by overlap.

use crate::types::{FillerWord, MumbledWord, TranscriptSegment};

/// Minimum overlap (seconds) before a segment counts as belonging to the
/// window. Absorbs boundary jitter from imprecise slide-switch timestamps
/// without pulling in unrelated adjacent-slide speech.
pub const MIN_OVERLAP_SECS: f64 = 0.15;

/// Segments the transcriber itself marks as near-certain silence are
/// excluded even when they overlap.
pub const MAX_NO_SPEECH_PROB: f64 = 0.97;

/// Everything spoken within one slide's window, in transcript order.
#[derive(Debug, Clone, Default)]
pub struct SlideSpeech {
    /// Raw segment texts, in original order.
    pub texts: Vec<String>,
    /// Per-segment average log-probabilities (confidence proxy).
    pub logprobs: Vec<f64>,
    pub word_count: usize,
    pub mumbled: Vec<MumbledWord>,
    pub fillers: Vec<FillerWord>,
    /// `(voice_start, voice_end)` of each matched segment, in order.
    pub spans: Vec<(f64, f64)>,
    /// Total overlapping-speech time across ALL segments, ignoring the
    /// no-speech filter. Distinguishes "nothing was said" from "something
    /// was said but not captured as usable text".
    pub overlap_speech: f64,
}

impl SlideSpeech {
    pub fn has_matches(&self) -> bool {
        !self.spans.is_empty()
    }

    /// Concatenated transcript for the window, skipping empty texts.
    pub fn full_text(&self) -> String {
        let parts: Vec<&str> = self
            .texts
            .iter()
            .map(String::as_str)
            .filter(|t| !t.is_empty())
            .collect();
        parts.join(" ")
    }

    /// Elapsed time from the first matched segment's start to the last
    /// matched segment's end, floored to avoid division by zero.
    pub fn span_duration(&self) -> f64 {
        match (self.spans.first(), self.spans.last()) {
            (Some(&(first_start, _)), Some(&(_, last_end))) => (last_end - first_start).max(1e-6),
            _ => 1e-6,
        }
    }
}

/// Select every segment whose overlap with `[start_t, end_t)` exceeds
/// [`MIN_OVERLAP_SECS`] and accumulate its text, confidence, and word flags.
pub fn collect_slide_speech(
    segments: &[TranscriptSegment],
    start_t: f64,
    end_t: f64,
) -> SlideSpeech {
    let mut speech = SlideSpeech::default();

    for segment in segments {
        let overlap = overlap_secs(segment, start_t, end_t);
        if overlap > 0.0 {
            speech.overlap_speech += overlap;
        }

        if overlap <= MIN_OVERLAP_SECS {
            continue;
        }
        if segment.no_speech_prob > MAX_NO_SPEECH_PROB {
            continue;
        }

        speech.word_count += segment.text.split_whitespace().count();
        speech.texts.push(segment.text.clone());
        speech.logprobs.push(segment.avg_logprob);
        speech.mumbled.extend(segment.mumbled_words.iter().cloned());
        speech.fillers.extend(segment.filler_words.iter().cloned());
        speech.spans.push((segment.voice_start, segment.voice_end));
    }

    speech
}

fn overlap_secs(segment: &TranscriptSegment, start_t: f64, end_t: f64) -> f64 {
    end_t.min(segment.voice_end) - start_t.max(segment.voice_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f64, end: f64, text: &str) -> TranscriptSegment {
        serde_json::from_str(&format!(
            r#"{{"text": "{}", "voice_start": {}, "voice_end": {}, "avg_logprob": -0.3}}"#,
            text, start, end
        ))
        .unwrap()
    }

    #[test]
    fn collects_segments_inside_window() {
        let segments = vec![segment(1.0, 4.0, "first part"), segment(4.5, 9.0, "second part")];
        let speech = collect_slide_speech(&segments, 0.0, 10.0);
        assert_eq!(speech.texts.len(), 2);
        assert_eq!(speech.word_count, 4);
        assert_eq!(speech.full_text(), "first part second part");
        assert_eq!(speech.spans, vec![(1.0, 4.0), (4.5, 9.0)]);
    }

    #[test]
    fn exact_threshold_overlap_is_excluded() {
        // overlap == 0.15 exactly: excluded
        let segments = vec![segment(9.85, 12.0, "boundary")];
        let speech = collect_slide_speech(&segments, 0.0, 10.0);
        assert!(!speech.has_matches());

        // overlap == 0.1501: included
        let segments = vec![segment(9.8499, 12.0, "boundary")];
        let speech = collect_slide_speech(&segments, 0.0, 10.0);
        assert!(speech.has_matches());
    }

    #[test]
    fn near_certain_silence_is_filtered_but_still_accumulates_overlap() {
        let mut noisy = segment(2.0, 5.0, "hiss");
        noisy.no_speech_prob = 0.99;
        let speech = collect_slide_speech(&[noisy], 0.0, 10.0);
        assert!(!speech.has_matches());
        assert!((speech.overlap_speech - 3.0).abs() < 1e-9);
    }

    #[test]
    fn span_duration_floors_at_epsilon() {
        let speech = SlideSpeech::default();
        assert_eq!(speech.span_duration(), 1e-6);

        let segments = vec![segment(3.0, 3.0, "instant")];
        let speech = collect_slide_speech(&segments, 0.0, 10.0);
        // zero-length segment never passes the overlap threshold
        assert!(!speech.has_matches());
    }
}
