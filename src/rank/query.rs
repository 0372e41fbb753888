//! Persona/job query encoding.

use std::collections::HashSet;

use ndarray::Array1;

use crate::embed::Embedder;
use crate::error::Result;
use crate::nlp::{self, StopwordFilter};

/// An encoded persona/job query: the composite text, its dense vector and
/// its normalized token set.
#[derive(Debug, Clone)]
pub struct Query {
    /// Composite query text
    pub text: String,
    /// Dense embedding of the composite text (all-zero for an empty query)
    pub vector: Array1<f32>,
    /// Lower-cased, stopword-free token set
    pub tokens: HashSet<String>,
}

impl Query {
    /// Whether the query carries no signal at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Encodes persona and job text into a [`Query`].
pub struct QueryEncoder<'a> {
    embedder: &'a dyn Embedder,
    stopwords: &'a StopwordFilter,
}

impl<'a> QueryEncoder<'a> {
    /// Create an encoder over shared embedding and stopword resources.
    pub fn new(embedder: &'a dyn Embedder, stopwords: &'a StopwordFilter) -> Self {
        Self {
            embedder,
            stopwords,
        }
    }

    /// Encode a persona and job-to-be-done pair.
    ///
    /// Both strings empty is a valid degenerate case: the query embeds to
    /// the zero vector and all candidates will score 0 on both axes.
    pub fn encode(&self, persona: &str, job: &str) -> Result<Query> {
        let persona = persona.trim();
        let job = job.trim();

        if persona.is_empty() && job.is_empty() {
            return Ok(Query {
                text: String::new(),
                vector: Array1::zeros(self.embedder.dimension()),
                tokens: HashSet::new(),
            });
        }

        let text = format!("User Persona: {persona}. Task: {job}");
        let vector = self.embedder.embed(&text)?;

        let tokens = nlp::tokenize(&text);
        let tokens = self
            .stopwords
            .filter(tokens.iter().map(|t| t.as_str()))
            .into_iter()
            .collect();

        Ok(Query {
            text,
            vector,
            tokens,
        })
    }
}
