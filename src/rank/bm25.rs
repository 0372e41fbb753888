//! BM25 lexical relevance over the current candidate set.

use std::collections::{HashMap, HashSet};

/// Okapi BM25 term-frequency saturation constant.
const K1: f32 = 1.2;
/// Okapi BM25 length-normalization constant.
const B: f32 = 0.75;

/// A BM25 index over one candidate set's token streams.
///
/// IDF statistics cover only the documents handed to [`Bm25Index::build`];
/// nothing survives across runs or collections, so identical inputs always
/// produce identical scores.
pub struct Bm25Index {
    term_freqs: Vec<HashMap<String, usize>>,
    doc_lens: Vec<usize>,
    avg_len: f32,
    idf: HashMap<String, f32>,
}

impl Bm25Index {
    /// Build an index from token streams, one per candidate.
    pub fn build(streams: &[Vec<String>]) -> Self {
        let doc_lens: Vec<usize> = streams.iter().map(|s| s.len()).collect();
        let total: usize = doc_lens.iter().sum();
        let avg_len = if streams.is_empty() {
            0.0
        } else {
            total as f32 / streams.len() as f32
        };

        let mut term_freqs = Vec::with_capacity(streams.len());
        let mut doc_freqs: HashMap<String, usize> = HashMap::new();
        for stream in streams {
            let mut tf: HashMap<String, usize> = HashMap::new();
            for token in stream {
                *tf.entry(token.clone()).or_insert(0) += 1;
            }
            for term in tf.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            term_freqs.push(tf);
        }

        let n = streams.len() as f32;
        let idf = doc_freqs
            .into_iter()
            .map(|(term, df)| {
                let df = df as f32;
                (term, ((n - df + 0.5) / (df + 0.5) + 1.0).ln())
            })
            .collect();

        Self {
            term_freqs,
            doc_lens,
            avg_len,
            idf,
        }
    }

    /// Number of indexed candidates.
    pub fn len(&self) -> usize {
        self.term_freqs.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.term_freqs.is_empty()
    }

    /// BM25 score of candidate `index` against a query token set.
    /// Out-of-range indices and empty candidates score 0.
    pub fn score(&self, index: usize, query: &HashSet<String>) -> f32 {
        let Some(tf) = self.term_freqs.get(index) else {
            return 0.0;
        };
        let doc_len = self.doc_lens[index] as f32;
        if doc_len == 0.0 || self.avg_len == 0.0 {
            return 0.0;
        }

        let mut score = 0.0;
        for term in query {
            let Some(&freq) = tf.get(term) else { continue };
            let Some(&idf) = self.idf.get(term) else {
                continue;
            };
            let freq = freq as f32;
            let norm = K1 * (1.0 - B + B * doc_len / self.avg_len);
            score += idf * (freq * (K1 + 1.0)) / (freq + norm);
        }
        score
    }
}
