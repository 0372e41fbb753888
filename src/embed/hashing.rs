//! Deterministic token-hash embedding backend.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use ndarray::Array1;

use crate::error::Result;
use crate::nlp;

use super::Embedder;

/// Default projection dimension.
const DEFAULT_DIM: usize = 256;

/// Bag-of-words embedder using the hashing trick: each token maps to a
/// signed bucket, the resulting vector is L2-normalized.
///
/// The projection is fully deterministic, needs no model files and no
/// network, and keeps cosine similarity meaningful as token overlap. It is
/// the explicit offline backend; its semantics differ from a learned
/// model, so it must be chosen deliberately via configuration.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    /// Create an embedder with the default dimension.
    pub fn new() -> Self {
        Self { dim: DEFAULT_DIM }
    }

    /// Create an embedder with a custom dimension.
    pub fn with_dimension(dim: usize) -> Self {
        Self { dim: dim.max(2) }
    }

    fn bucket(&self, token: &str) -> (usize, f32) {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let h = hasher.finish();
        let index = (h % self.dim as u64) as usize;
        // One hash bit decides the sign, so colliding tokens partially
        // cancel instead of always reinforcing.
        let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for HashEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Array1<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            let mut vector: Array1<f32> = Array1::zeros(self.dim);
            for token in nlp::tokenize(text) {
                let (index, sign) = self.bucket(&token);
                vector[index] += sign;
            }
            let norm = vector.dot(&vector).sqrt();
            if norm > f32::EPSILON {
                vector /= norm;
            }
            vectors.push(vector);
        }
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}
