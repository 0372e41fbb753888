//! Hybrid semantic + lexical section ranking.

use ndarray::Array1;

use crate::config::RankConfig;
use crate::embed::cosine_similarity;
use crate::model::{RankedSection, Section};
use crate::nlp;

use super::bm25::Bm25Index;
use super::query::Query;

/// Fuses dense and sparse relevance into one deterministic ordering.
///
/// Both axes are min-max normalized over the candidate set before the
/// weighted sum — cosine similarity and BM25 live on incompatible native
/// scales. The sort is stable and descending, so equal hybrid scores keep
/// document order.
pub struct HybridRanker<'a> {
    config: &'a RankConfig,
}

impl<'a> HybridRanker<'a> {
    /// Create a ranker with the given weights and budgets.
    pub fn new(config: &'a RankConfig) -> Self {
        Self { config }
    }

    /// Rank sections against the query. `vectors[i]` is the embedding of
    /// `sections[i]`'s (truncated) text, produced by the batched pass.
    pub fn rank(
        &self,
        sections: Vec<Section>,
        vectors: &[Array1<f32>],
        query: &Query,
    ) -> Vec<RankedSection> {
        if sections.is_empty() {
            return Vec::new();
        }

        let streams: Vec<Vec<String>> = sections.iter().map(|s| nlp::tokenize(&s.text)).collect();
        let bm25 = Bm25Index::build(&streams);

        let mut semantic: Vec<f32> = sections
            .iter()
            .enumerate()
            .map(|(i, _)| {
                if query.is_empty() {
                    0.0
                } else {
                    vectors
                        .get(i)
                        .map(|v| cosine_similarity(&query.vector, v))
                        .unwrap_or(0.0)
                }
            })
            .collect();
        let mut lexical: Vec<f32> = (0..sections.len())
            .map(|i| bm25.score(i, &query.tokens))
            .collect();

        min_max_normalize(&mut semantic);
        min_max_normalize(&mut lexical);

        // Blank sections sink regardless of what normalization produced.
        for (i, section) in sections.iter().enumerate() {
            if section.is_blank() {
                semantic[i] = 0.0;
                lexical[i] = 0.0;
            }
        }

        let alpha = self.config.semantic_weight;
        let mut ranked: Vec<RankedSection> = sections
            .into_iter()
            .enumerate()
            .map(|(i, section)| RankedSection {
                section,
                semantic_score: semantic[i],
                lexical_score: lexical[i],
                hybrid_score: alpha * semantic[i] + (1.0 - alpha) * lexical[i],
                rank: 0,
            })
            .collect();

        // Stable: ties resolve to earlier document order.
        ranked.sort_by(|a, b| {
            b.hybrid_score
                .partial_cmp(&a.hybrid_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (i, entry) in ranked.iter_mut().enumerate() {
            entry.rank = i + 1;
        }
        ranked
    }
}

/// Normalize scores into [0, 1] in place. A degenerate axis (all values
/// equal) collapses to 0 so it cannot dominate the other signal.
pub fn min_max_normalize(values: &mut [f32]) {
    let Some(&first) = values.first() else { return };
    let (min, max) = values.iter().fold((first, first), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    });
    let range = max - min;
    if range <= f32::EPSILON {
        values.iter_mut().for_each(|v| *v = 0.0);
        return;
    }
    values.iter_mut().for_each(|v| *v = (*v - min) / range);
}
