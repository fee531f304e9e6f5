use approx::assert_relative_eq;
use rehearsalyzer::analysis::{collect_slide_speech, KeywordMatcher, ScoreCalculator};
use rehearsalyzer::config::ScoringConfig;
use rehearsalyzer::types::{ContentStatus, MetricsStatus, ToneStatus, TranscriptSegment};
use std::collections::BTreeMap;

fn segment(start: f64, end: f64, text: &str, logprob: f64) -> TranscriptSegment {
    serde_json::from_str(&format!(
        r#"{{"text": "{}", "voice_start": {}, "voice_end": {}, "avg_logprob": {}}}"#,
        text, start, end, logprob
    ))
    .unwrap()
}

fn keyword_map(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(k, syns)| (k.to_string(), syns.iter().map(|s| s.to_string()).collect()))
        .collect()
}

/// The worked photosynthesis scenario: one matched segment spanning [1, 9)
/// with 10 words, keyword coverage 100%, pitch variability 14.0.
#[test]
fn photosynthesis_scenario_end_to_end() {
    let config = ScoringConfig::default();
    let matcher = KeywordMatcher::new(&config, None);
    let calculator = ScoreCalculator::new(&config);

    let spoken = "Today we explain how the plants make energy from light";
    let segments = vec![segment(1.0, 9.0, spoken, -0.3)];
    let speech = collect_slide_speech(&segments, 0.0, 10.0);
    assert_eq!(speech.word_count, 10);

    let keywords = keyword_map(&[(
        "photosynthesis",
        &["photosynthesis", "making energy from light"],
    )]);
    let outcome = matcher.match_keywords(&keywords, &speech.full_text());
    assert_eq!(outcome.covered, vec!["photosynthesis"]);
    assert_relative_eq!(outcome.content_score(), 100.0, epsilon = 1e-9);

    let analysis = calculator.score_slide(&speech, &outcome, 14.0, (0.0, 10.0));

    // wpm = 10 words / 8 s * 60 = 75; sub-score = 100 - 1.5 * 55 = 17.5
    assert_relative_eq!(analysis.metrics.wpm, 75.0, epsilon = 1e-9);
    // overall = 100*0.3 + 17.5*0.4 + (14/15*100)*0.3 = 30 + 7 + 28 = 65.0
    assert_relative_eq!(analysis.overall_score, 65.0, epsilon = 1e-9);

    assert_eq!(analysis.content.status, ContentStatus::Ok);
    assert_eq!(analysis.metrics.status, MetricsStatus::Pass);
    assert_eq!(analysis.tone.status, ToneStatus::Dynamic);
    assert_relative_eq!(analysis.tone.pitch_variability, 14.0, epsilon = 1e-9);
    assert_eq!(analysis.content.transcript_extract, spoken);
}

#[test]
fn overall_score_bounded_for_adversarial_inputs() {
    let config = ScoringConfig::default();
    let matcher = KeywordMatcher::new(&config, None);
    let calculator = ScoreCalculator::new(&config);

    let cases = [
        // (segment span, text, pitch, window)
        ((0.0, 0.2), "a", 1e9, (0.0, 0.2)),
        ((0.0, 600.0), "word ", 0.0, (0.0, 600.0)),
        ((5.0, 5.5), "rapid fire words crammed into nothing", 50.0, (0.0, 6.0)),
    ];

    for ((seg_start, seg_end), word, pitch, window) in cases {
        let text = word.repeat(40);
        let segments = vec![segment(seg_start, seg_end, text.trim(), -0.2)];
        let speech = collect_slide_speech(&segments, window.0, window.1);
        let outcome = matcher.match_keywords(&keyword_map(&[]), &speech.full_text());
        let analysis = calculator.score_slide(&speech, &outcome, pitch, window);
        assert!(
            (0.0..=100.0).contains(&analysis.overall_score),
            "overall {} out of bounds",
            analysis.overall_score
        );
    }
}

#[test]
fn mumble_and_filler_penalties_reduce_fluency() {
    let config = ScoringConfig::default();
    let calculator = ScoreCalculator::new(&config);

    // 20 words over 8s -> 150 wpm (full band credit); 4 mumbles -> 20%
    // mumble rate -> 40 penalty; 2 fillers over 10s window -> 12/min -> 60
    // penalty; fluency floors at 0.
    let words: Vec<String> = (0..20).map(|i| format!("word{}", i)).collect();
    let json = serde_json::json!({
        "text": words.join(" "),
        "voice_start": 1.0,
        "voice_end": 9.0,
        "avg_logprob": -0.2,
        "mumbled_words": [
            {"word": "word1", "conf": 0.4, "start": 1.2},
            {"word": "word5", "conf": 0.3, "start": 2.1},
            {"word": "word9", "conf": 0.5, "start": 4.4},
            {"word": "word12", "conf": 0.2, "start": 6.0}
        ],
        "filler_words": [
            {"word": "um", "start": 1.5, "end": 1.7},
            {"word": "uh", "start": 7.2, "end": 7.4}
        ]
    });
    let seg: TranscriptSegment = serde_json::from_value(json).unwrap();
    let speech = collect_slide_speech(&[seg], 0.0, 10.0);

    let outcome = rehearsalyzer::analysis::KeywordOutcome::default();
    let analysis = calculator.score_slide(&speech, &outcome, 0.0, (0.0, 10.0));

    assert_relative_eq!(analysis.metrics.wpm, 150.0, epsilon = 1e-9);
    assert_relative_eq!(analysis.metrics.mumble_rate, 20.0, epsilon = 1e-9);
    assert_relative_eq!(analysis.metrics.filler_rate_pm, 12.0, epsilon = 1e-9);
    assert_eq!(analysis.content.filler_count, 2);
    // content 100*0.3 = 30; fluency max(0, 100-40-60)*0.4 = 0; tone 0
    assert_relative_eq!(analysis.overall_score, 30.0, epsilon = 1e-9);
    // mumble rate is right at the Pass limit
    assert_eq!(analysis.metrics.status, MetricsStatus::Pass);
}
