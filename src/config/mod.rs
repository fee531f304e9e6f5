use std::env;

use anyhow::{ensure, Context, Result};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Scoring weights and thresholds, resolved once at startup and passed by
/// reference to every component that needs them.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Reserved for a future precision tightening of the semantic tier;
    /// validated but not applied to matching.
    pub semantic_threshold_strict: f64,
    /// Minimum cosine similarity for a semantic keyword match.
    pub semantic_threshold_weak: f64,
    pub weight_content: f64,
    pub weight_fluency: f64,
    pub weight_tone: f64,
    /// Ideal words-per-minute band; speech inside it earns full pace credit.
    pub ideal_wpm_low: f64,
    pub ideal_wpm_high: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            semantic_threshold_strict: 0.28,
            semantic_threshold_weak: 0.15,
            weight_content: 0.3,
            weight_fluency: 0.4,
            weight_tone: 0.3,
            ideal_wpm_low: 130.0,
            ideal_wpm_high: 160.0,
        }
    }
}

impl ScoringConfig {
    /// Build the configuration from environment variables, falling back to
    /// the documented defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            semantic_threshold_strict: env_f64(
                "SEMANTIC_THRESHOLD_STRICT",
                defaults.semantic_threshold_strict,
            )?,
            semantic_threshold_weak: env_f64(
                "SEMANTIC_THRESHOLD_WEAK",
                defaults.semantic_threshold_weak,
            )?,
            weight_content: env_f64("WEIGHT_CONTENT", defaults.weight_content)?,
            weight_fluency: env_f64("WEIGHT_FLUENCY", defaults.weight_fluency)?,
            weight_tone: env_f64("WEIGHT_TONE", defaults.weight_tone)?,
            ideal_wpm_low: env_f64("IDEAL_WPM_LOW", defaults.ideal_wpm_low)?,
            ideal_wpm_high: env_f64("IDEAL_WPM_HIGH", defaults.ideal_wpm_high)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let weight_sum = self.weight_content + self.weight_fluency + self.weight_tone;
        ensure!(
            (weight_sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE,
            "score weights must sum to 1.0, got {}",
            weight_sum
        );
        ensure!(
            self.weight_content >= 0.0 && self.weight_fluency >= 0.0 && self.weight_tone >= 0.0,
            "score weights must be non-negative"
        );
        for (name, value) in [
            ("SEMANTIC_THRESHOLD_STRICT", self.semantic_threshold_strict),
            ("SEMANTIC_THRESHOLD_WEAK", self.semantic_threshold_weak),
        ] {
            ensure!(
                (0.0..=1.0).contains(&value),
                "{} must lie in [0, 1], got {}",
                name,
                value
            );
        }
        ensure!(
            self.ideal_wpm_low > 0.0 && self.ideal_wpm_high > self.ideal_wpm_low,
            "ideal WPM band must satisfy 0 < low < high, got {}..{}",
            self.ideal_wpm_low,
            self.ideal_wpm_high
        );
        Ok(())
    }
}

fn env_f64(name: &str, default: f64) -> Result<f64> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid numeric value for {}: '{}'", name, raw)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("failed to read {}", name)),
    }
}
