//! Correlation and analytics engine: aligns transcript segments to slide
//! windows, matches expected concepts against spoken content, and fuses
//! content, fluency, and tone signals into one weighted score.

pub mod aligner;
pub mod matcher;
pub mod scoring;

pub use aligner::{collect_slide_speech, SlideSpeech};
pub use matcher::{KeywordMatcher, KeywordOutcome};
pub use scoring::{ScoreCalculator, SlideAnalysis};
