//! Embedding backends.
//!
//! The [`Embedder`] trait abstracts dense text embedding. Backends:
//! - [`OnnxEmbedder`]: ONNX Runtime with a SentenceTransformers model
//!   (requires the `onnx` feature),
//! - [`HashEmbedder`]: deterministic token-hash projection for offline and
//!   test use; selecting it is an explicit configuration choice, never a
//!   silent fallback.
//!
//! A backend that cannot produce a vector returns [`Error::Embedder`],
//! which is fatal for the run.

mod hashing;
#[cfg(feature = "onnx")]
mod onnx;

pub use hashing::HashEmbedder;
#[cfg(feature = "onnx")]
pub use onnx::OnnxEmbedder;

use ndarray::Array1;

use crate::error::{Error, Result};

/// Trait for dense embedding backends.
///
/// The pipeline embeds all texts of a collection in batched passes;
/// `embed_batch` is the primary entry point.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input, in input order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Array1<f32>>>;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Array1<f32>> {
        let mut vectors = self.embed_batch(&[text])?;
        if vectors.is_empty() {
            return Err(Error::Embedder("backend returned no vector".into()));
        }
        Ok(vectors.remove(0))
    }

    /// Embedding dimension.
    fn dimension(&self) -> usize;
}

/// Cosine similarity between two vectors. Zero-magnitude input yields 0.
pub fn cosine_similarity(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    let dot = a.dot(b);
    let norm = a.dot(a).sqrt() * b.dot(b).sqrt();
    if norm <= f32::EPSILON {
        0.0
    } else {
        dot / norm
    }
}
