//! Rehearsalyzer - scores a recorded presentation rehearsal against slide
//! content by fusing transcript, prosody, and slide-timing signals into a
//! per-slide performance score.

pub mod analysis;
pub mod audio;
pub mod config;
pub mod ingest;
pub mod pipeline;
pub mod semantic;
pub mod text;
pub mod types;
