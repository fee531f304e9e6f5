//! Sentence embeddings backing the semantic keyword tier.
//!
//! The encoder is an explicitly-owned component constructed once at startup
//! and passed by reference into the matcher. Tests substitute their own
//! [`SentenceEncoder`] implementation, so nothing in the engine depends on
//! model files being present.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use ndarray::Array1;
use tokenizers::Tokenizer;
use tracing::info;

/// Maps texts into a shared embedding space. Returned vectors are
/// L2-normalized, so cosine similarity reduces to a dot product.
pub trait SentenceEncoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Array1<f32>>>;
}

/// Maximum pairwise cosine similarity across two embedding sets.
pub fn max_cosine_similarity(left: &[Array1<f32>], right: &[Array1<f32>]) -> f32 {
    let mut best = f32::NEG_INFINITY;
    for a in left {
        for b in right {
            best = best.max(a.dot(b));
        }
    }
    best
}

/// MiniLM-class BERT encoder loaded from a local model directory holding
/// `config.json`, `tokenizer.json`, and `model.safetensors`.
pub struct MiniLmEncoder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl MiniLmEncoder {
    pub fn load(model_dir: &Path) -> Result<Self> {
        let device = Device::Cpu;

        let config_path = model_dir.join("config.json");
        let config_raw = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read model config {}", config_path.display()))?;
        let config: BertConfig =
            serde_json::from_str(&config_raw).context("failed to parse model config")?;

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|err| anyhow!("failed to load tokenizer {}: {err}", tokenizer_path.display()))?;

        let weights_path = model_dir.join("model.safetensors");
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.clone()], DType::F32, &device)
        }
        .with_context(|| format!("failed to map model weights {}", weights_path.display()))?;
        let model = BertModel::load(vb, &config).context("failed to build embedding model")?;

        info!(model_dir = %model_dir.display(), "sentence embedding model loaded");
        Ok(Self {
            model,
            tokenizer,
            device,
        })
    }

    /// Mean-pool token states into one L2-normalized sentence vector.
    fn encode_one(&self, text: &str) -> Result<Array1<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|err| anyhow!("tokenization failed: {err}"))?;
        let token_ids = encoding.get_ids().to_vec();

        let input_ids = Tensor::new(token_ids.as_slice(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, None)?;

        let (_batch, tokens, _hidden) = hidden.dims3()?;
        let pooled = (hidden.sum(1)? / (tokens as f64))?.squeeze(0)?;
        let values = pooled.to_vec1::<f32>()?;
        Ok(l2_normalize(Array1::from(values)))
    }
}

impl SentenceEncoder for MiniLmEncoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Array1<f32>>> {
        texts.iter().map(|text| self.encode_one(text)).collect()
    }
}

fn l2_normalize(vector: Array1<f32>) -> Array1<f32> {
    let norm = vector.dot(&vector).sqrt();
    if norm > 0.0 {
        vector / norm
    } else {
        vector
    }
}
