//! ONNX-based embedding backend.
//!
//! Loads a SentenceTransformers ONNX export and its tokenizer to produce
//! float32 sentence embeddings. Expects `model.onnx` and `tokenizer.json`
//! in the model directory; both must be provisioned locally before the
//! run (no network access at run time).

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array1;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;

use crate::error::{Error, Result};

use super::Embedder;

/// Maximum token sequence length fed to the model.
const MAX_SEQ_LEN: usize = 512;

/// Embedding dimension of all-MiniLM-L6-v2, the default model.
const DEFAULT_DIM: usize = 384;

/// ONNX Runtime embedding backend.
pub struct OnnxEmbedder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    dimension: usize,
}

impl OnnxEmbedder {
    /// Load the model and tokenizer from `model_dir`.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            return Err(Error::Embedder(format!(
                "model not found: {}",
                model_path.display()
            )));
        }
        if !tokenizer_path.exists() {
            return Err(Error::Embedder(format!(
                "tokenizer not found: {}",
                tokenizer_path.display()
            )));
        }

        ort::init().commit();

        let session = Session::builder()
            .map_err(|e| Error::Embedder(format!("session builder: {e}")))?
            .with_intra_threads(2)
            .map_err(|e| Error::Embedder(format!("thread config: {e}")))?
            .commit_from_file(&model_path)
            .map_err(|e| Error::Embedder(format!("model load: {e}")))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| Error::Embedder(format!("tokenizer load: {e}")))?;

        log::info!(
            "ONNX embedder loaded: dim={}, model={}",
            DEFAULT_DIM,
            model_path.display()
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            dimension: DEFAULT_DIM,
        })
    }

    fn infer(&self, text: &str) -> Result<Array1<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::Embedder(format!("tokenization: {e}")))?;

        let ids = encoding.get_ids();
        if ids.is_empty() {
            return Err(Error::Embedder("empty token encoding".into()));
        }
        let seq_len = ids.len().min(MAX_SEQ_LEN);
        let input_ids = &ids[..seq_len];
        let attention_mask = &encoding.get_attention_mask()[..seq_len];

        let ids_data: Vec<i64> = input_ids.iter().map(|&id| id as i64).collect();
        let mask_data: Vec<i64> = attention_mask.iter().map(|&m| m as i64).collect();
        let type_ids_data: Vec<i64> = vec![0i64; seq_len];

        let ids_tensor = Tensor::from_array(([1usize, seq_len], ids_data))
            .map_err(|e| Error::Embedder(format!("ids tensor: {e}")))?;
        let mask_tensor = Tensor::from_array(([1usize, seq_len], mask_data))
            .map_err(|e| Error::Embedder(format!("mask tensor: {e}")))?;
        let type_ids_tensor = Tensor::from_array(([1usize, seq_len], type_ids_data))
            .map_err(|e| Error::Embedder(format!("type_ids tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| Error::Embedder("session lock poisoned".into()))?;
        let outputs = session
            .run(ort::inputs![ids_tensor, mask_tensor, type_ids_tensor])
            .map_err(|e| Error::Embedder(format!("inference: {e}")))?;

        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Embedder(format!("output tensor: {e}")))?;
        let dims: Vec<i64> = shape.iter().copied().collect();

        // SentenceTransformers exports output either token embeddings
        // [1, seq_len, dim] (mean-pool with the attention mask) or an
        // already pooled [1, dim].
        match dims.len() {
            3 => {
                let dim = dims[2] as usize;
                let mask_sum: f32 = attention_mask.iter().map(|&m| m as f32).sum();
                if mask_sum < 1e-9 {
                    return Err(Error::Embedder("empty attention mask".into()));
                }
                let mut pooled = Array1::zeros(dim);
                for (i, &m) in attention_mask.iter().enumerate() {
                    if m > 0 {
                        let offset = i * dim;
                        for d in 0..dim {
                            pooled[d] += data[offset + d];
                        }
                    }
                }
                Ok(pooled / mask_sum)
            }
            2 => {
                let dim = dims[1] as usize;
                Ok(Array1::from_vec(data[..dim].to_vec()))
            }
            _ => Err(Error::Embedder(format!("unexpected output shape: {dims:?}"))),
        }
    }
}

impl Embedder for OnnxEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Array1<f32>>> {
        texts.iter().map(|t| self.infer(t)).collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
