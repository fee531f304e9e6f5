//! Three-tier keyword matching: lexical, substring, then semantic.
//!
//! Tiers escalate from cheapest and most precise to the embedding fallback,
//! short-circuiting on the first hit. The semantic tier exists because a
//! speaker may paraphrase a concept with entirely different words; its
//! threshold is deliberately low since it is a recall mechanism of last
//! resort, not a precision one.

use std::collections::{BTreeMap, HashSet};

use ndarray::Array1;
use tracing::warn;

use crate::config::ScoringConfig;
use crate::semantic::{max_cosine_similarity, SentenceEncoder};
use crate::text;

pub struct KeywordMatcher<'a> {
    config: &'a ScoringConfig,
    encoder: Option<&'a dyn SentenceEncoder>,
}

/// Covered/missed partition of a slide's concept keys.
#[derive(Debug, Clone, Default)]
pub struct KeywordOutcome {
    pub covered: Vec<String>,
    pub missed: Vec<String>,
}

impl KeywordOutcome {
    /// Fraction of concepts covered, as a percentage. A slide with no
    /// expected concepts is trivially satisfied.
    pub fn content_score(&self) -> f64 {
        let total = self.covered.len() + self.missed.len();
        if total == 0 {
            return 100.0;
        }
        self.covered.len() as f64 / total as f64 * 100.0
    }
}

impl<'a> KeywordMatcher<'a> {
    pub fn new(config: &'a ScoringConfig, encoder: Option<&'a dyn SentenceEncoder>) -> Self {
        Self { config, encoder }
    }

    /// Classify every concept in `keywords` as covered or missed given the
    /// slide's spoken text.
    pub fn match_keywords(
        &self,
        keywords: &BTreeMap<String, Vec<String>>,
        spoken_text: &str,
    ) -> KeywordOutcome {
        let spoken_tokens = text::normalize(spoken_text);
        let condensed = condense(spoken_text);
        // Encoded lazily: slides whose concepts all resolve lexically never
        // touch the embedding model.
        let mut spoken_embeddings: Option<Vec<Array1<f32>>> = None;

        let mut outcome = KeywordOutcome::default();
        for (concept, synonyms) in keywords {
            let matched = self.lexical_match(synonyms, &spoken_tokens)
                || substring_match(synonyms, &condensed)
                || self.semantic_match(concept, synonyms, spoken_text, &mut spoken_embeddings);
            if matched {
                outcome.covered.push(concept.clone());
            } else {
                outcome.missed.push(concept.clone());
            }
        }
        outcome
    }

    /// Tier 1: pre-normalized synonym lemmas intersect the spoken tokens.
    fn lexical_match(&self, synonyms: &[String], spoken_tokens: &HashSet<String>) -> bool {
        if spoken_tokens.is_empty() {
            return false;
        }
        synonyms
            .iter()
            .flat_map(|synonym| text::normalize(synonym))
            .any(|lemma| spoken_tokens.contains(&lemma))
    }

    /// Tier 3: best cosine similarity between the concept candidates and the
    /// spoken sentences meets the weak threshold. Encoder failures degrade
    /// to a miss; matching must never abort a slide.
    fn semantic_match(
        &self,
        concept: &str,
        synonyms: &[String],
        spoken_text: &str,
        spoken_embeddings: &mut Option<Vec<Array1<f32>>>,
    ) -> bool {
        let Some(encoder) = self.encoder else {
            return false;
        };

        if spoken_embeddings.is_none() {
            *spoken_embeddings = Some(encode_sentences(encoder, spoken_text));
        }
        let spoken = spoken_embeddings.as_ref().expect("just populated");
        if spoken.is_empty() {
            return false;
        }

        let mut candidates = Vec::with_capacity(synonyms.len() + 1);
        candidates.push(concept.to_string());
        candidates.extend(synonyms.iter().cloned());

        match encoder.encode(&candidates) {
            Ok(candidate_embeddings) => {
                let best = max_cosine_similarity(&candidate_embeddings, spoken);
                best >= self.config.semantic_threshold_weak as f32
            }
            Err(err) => {
                warn!(concept, error = %err, "keyword embedding failed, treating as missed");
                false
            }
        }
    }
}

/// Tier 2: any synonym, space-stripped and lowercased, appears literally in
/// the condensed transcript. Catches multi-word phrases that lemma matching
/// would miss.
fn substring_match(synonyms: &[String], condensed_transcript: &str) -> bool {
    if condensed_transcript.is_empty() {
        return false;
    }
    synonyms
        .iter()
        .map(|synonym| condense(synonym))
        .any(|needle| !needle.is_empty() && condensed_transcript.contains(&needle))
}

fn condense(text: &str) -> String {
    text.replace(' ', "").to_lowercase()
}

fn encode_sentences(encoder: &dyn SentenceEncoder, spoken_text: &str) -> Vec<Array1<f32>> {
    let sentences = text::split_sentences(spoken_text);
    if sentences.is_empty() {
        return Vec::new();
    }
    match encoder.encode(&sentences) {
        Ok(embeddings) => embeddings,
        Err(err) => {
            warn!(error = %err, "sentence embedding failed, semantic tier disabled for slide");
            Vec::new()
        }
    }
}
