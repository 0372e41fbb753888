//! Persona-driven hybrid relevance ranking.

mod bm25;
mod hybrid;
mod query;
mod summarize;

pub use bm25::Bm25Index;
pub use hybrid::{min_max_normalize, HybridRanker};
pub use query::{Query, QueryEncoder};
pub use summarize::SubsectionSummarizer;
