//! Sentence-level extractive refinement of top-ranked sections.

use crate::config::RankConfig;
use crate::embed::{cosine_similarity, Embedder};
use crate::error::Result;
use crate::model::ScoredSentence;
use crate::nlp;

use super::bm25::Bm25Index;
use super::hybrid::min_max_normalize;
use super::query::Query;

/// Refines a section into its most query-relevant sentences.
///
/// Sentences are scored with the same hybrid formula as section ranking
/// (normalization and BM25 statistics over the section's own sentence
/// set), selected greedily by descending score within the character and
/// sentence budgets, then reassembled in original document order so the
/// result reads as prose rather than as a score dump.
pub struct SubsectionSummarizer<'a> {
    config: &'a RankConfig,
    embedder: &'a dyn Embedder,
}

impl<'a> SubsectionSummarizer<'a> {
    /// Create a summarizer over the shared embedding resource.
    pub fn new(config: &'a RankConfig, embedder: &'a dyn Embedder) -> Self {
        Self { config, embedder }
    }

    /// Produce the refined text for one section.
    ///
    /// Returns `None` only when the section has no sentence with
    /// alphabetic content; any section with at least one non-empty
    /// sentence yields non-empty text (the single best sentence when
    /// nothing clears the score threshold).
    pub fn refine(&self, section_text: &str, query: &Query) -> Result<Option<String>> {
        let sentences = self.score_sentences(section_text, query)?;
        if sentences.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.select(&sentences)))
    }

    /// Split and score a section's sentences.
    pub fn score_sentences(
        &self,
        section_text: &str,
        query: &Query,
    ) -> Result<Vec<ScoredSentence>> {
        let texts = nlp::split_sentences(section_text);
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let streams: Vec<Vec<String>> = texts.iter().map(|t| nlp::tokenize(t)).collect();
        let bm25 = Bm25Index::build(&streams);

        let mut semantic: Vec<f32> = if query.is_empty() {
            vec![0.0; texts.len()]
        } else {
            let refs: Vec<&str> = texts.iter().map(|t| t.as_str()).collect();
            self.embedder
                .embed_batch(&refs)?
                .iter()
                .map(|v| cosine_similarity(&query.vector, v))
                .collect()
        };
        let mut lexical: Vec<f32> = (0..texts.len())
            .map(|i| bm25.score(i, &query.tokens))
            .collect();

        min_max_normalize(&mut semantic);
        min_max_normalize(&mut lexical);

        let alpha = self.config.semantic_weight;
        Ok(texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| ScoredSentence {
                text,
                index: i,
                score: alpha * semantic[i] + (1.0 - alpha) * lexical[i],
            })
            .collect())
    }

    /// Greedy budgeted selection, reassembled in document order.
    fn select(&self, sentences: &[ScoredSentence]) -> String {
        let mut by_score: Vec<&ScoredSentence> = sentences.iter().collect();
        by_score.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });

        let mut chosen: Vec<&ScoredSentence> = Vec::new();
        let mut used_chars = 0usize;
        for sentence in &by_score {
            if sentence.score < self.config.min_sentence_score {
                break;
            }
            if chosen.len() >= self.config.max_summary_sentences {
                break;
            }
            if used_chars + sentence.text.len() > self.config.max_summary_chars
                && !chosen.is_empty()
            {
                break;
            }
            used_chars += sentence.text.len();
            chosen.push(sentence);
        }

        // Totality: nothing cleared the threshold, keep the single best.
        if chosen.is_empty() {
            chosen.push(by_score[0]);
        }

        chosen.sort_by_key(|s| s.index);
        chosen
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
