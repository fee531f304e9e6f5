//! Pitch variability over a slide's time window.
//!
//! Pitch is an auxiliary signal: any failure here (bad window, decode
//! error, too little voiced speech) degrades to 0.0 with a logged warning
//! and never aborts the surrounding analysis pass.

use std::path::Path;

use anyhow::{ensure, Result};
use aus::analysis;
use tracing::warn;

use crate::audio::decoder;

// Musical pitch range C2..C7; estimates outside it are discarded as octave
// errors or noise.
const FREQ_MIN: f64 = 65.41;
const FREQ_MAX: f64 = 2093.0;
const PITCH_SAMPLE_RATE: u32 = 16_000;
const WINDOW_MS: usize = 25;
// A standard deviation needs at least two voiced estimates.
const MIN_VOICED_ESTIMATES: usize = 2;

/// Standard deviation of the estimated fundamental frequency inside
/// `[start, end)`, rounded to two decimals; 0.0 on any failure.
pub fn pitch_variability(audio_path: &Path, start: f64, end: f64) -> f64 {
    if end <= start {
        return 0.0;
    }
    match analyze_window(audio_path, start, end) {
        Ok(value) => value,
        Err(err) => {
            warn!(start, end, error = %err, "pitch analysis failed, defaulting to 0.0");
            0.0
        }
    }
}

fn analyze_window(audio_path: &Path, start: f64, end: f64) -> Result<f64> {
    let audio = decoder::decode_window(audio_path, start, end)?;
    let samples = if audio.sample_rate == PITCH_SAMPLE_RATE {
        audio.samples
    } else {
        linear_resample(&audio.samples, audio.sample_rate, PITCH_SAMPLE_RATE)?
    };

    let audio_f64: Vec<f64> = samples.into_iter().map(|s| s as f64).collect();
    let frame_len = ((PITCH_SAMPLE_RATE as usize * WINDOW_MS) / 1000).max(1);
    if audio_f64.len() < frame_len {
        // window lies partly or wholly outside the recording
        return Ok(0.0);
    }
    let (_timestamps, pitches, voiced_flags, _confidence) = analysis::pyin_pitch_estimator(
        &audio_f64,
        PITCH_SAMPLE_RATE,
        FREQ_MIN,
        FREQ_MAX,
        frame_len,
    );

    let valid: Vec<f64> = pitches
        .iter()
        .zip(voiced_flags.iter())
        .filter_map(|(&pitch, &voiced)| {
            (voiced && pitch.is_finite() && pitch > 0.0).then_some(pitch)
        })
        .collect();

    if valid.len() < MIN_VOICED_ESTIMATES {
        return Ok(0.0);
    }

    Ok(round2(std_deviation(&valid)))
}

fn std_deviation(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Linearly resample `samples` from `source_rate` to `target_rate`.
fn linear_resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    ensure!(source_rate > 0, "source sample rate must be positive");
    ensure!(target_rate > 0, "target sample rate must be positive");
    if samples.is_empty() || source_rate == target_rate {
        return Ok(samples.to_vec());
    }
    let ratio = target_rate as f32 / source_rate as f32;
    let output_len = ((samples.len() as f32) * ratio).ceil().max(1.0) as usize;
    let mut output = Vec::with_capacity(output_len);
    let last_index = samples.len() - 1;
    for i in 0..output_len {
        let position = i as f32 / ratio;
        let left = position.floor() as usize;
        let right = (left + 1).min(last_index);
        let t = position - left as f32;
        output.push(samples[left] * (1.0 - t) + samples[right] * t);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn degenerate_window_yields_zero() {
        let path = Path::new("does-not-matter.wav");
        assert_eq!(pitch_variability(path, 5.0, 5.0), 0.0);
        assert_eq!(pitch_variability(path, 5.0, 4.0), 0.0);
    }

    #[test]
    fn missing_file_degrades_to_zero() {
        let path = Path::new("/definitely/not/here.wav");
        assert_eq!(pitch_variability(path, 0.0, 1.0), 0.0);
    }

    #[test]
    fn std_deviation_is_population_form() {
        // numpy-style population std: sqrt(mean of squared deviations)
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(std_deviation(&values), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn resample_preserves_constant_signal() {
        let input = vec![0.5; 480];
        let resampled = linear_resample(&input, 48_000, 16_000).unwrap();
        let expected_len = ((input.len() as f32) * 16_000_f32 / 48_000_f32).ceil() as usize;
        assert_eq!(resampled.len(), expected_len);
        assert!(resampled.iter().all(|&sample| (sample - 0.5).abs() < 1e-6));
    }
}
