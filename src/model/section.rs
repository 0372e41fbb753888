//! Document sections and ranking result types.

use serde::{Deserialize, Serialize};

use super::{HeadingLevel, LogicalBlock};

/// A contiguous document section at finest granularity: one heading (of
/// any level) plus every block up to the next heading.
///
/// Sections partition a document's blocks exactly once; they never
/// overlap and follow document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Source document identifier (filename); stamped by the pipeline
    pub document: String,
    /// Heading text, or `None` for a preamble/whole-document section
    pub title: Option<String>,
    /// Heading level, or `None` for a preamble/whole-document section
    pub level: Option<HeadingLevel>,
    /// Page the section starts on (1-indexed)
    pub page: u32,
    /// Constituent blocks in document order
    pub blocks: Vec<LogicalBlock>,
    /// Concatenated section text (heading line included)
    pub text: String,
    /// Document-order index within the collection candidate set
    pub order: usize,
}

impl Section {
    /// Display title: the heading text or the document name for untitled
    /// sections.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.document)
    }

    /// Whether the section carries no text at all.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A section with its relevance scores and final rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedSection {
    /// The scored section
    pub section: Section,
    /// Cosine similarity to the query, min-max normalized over the
    /// candidate set
    pub semantic_score: f32,
    /// BM25 score against the query tokens, min-max normalized over the
    /// candidate set
    pub lexical_score: f32,
    /// Weighted fusion of the two normalized axes
    pub hybrid_score: f32,
    /// Importance rank (1 = most relevant)
    pub rank: usize,
}

/// A sentence scored for subsection refinement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredSentence {
    /// Sentence text
    pub text: String,
    /// Position within the owning section (document order)
    pub index: usize,
    /// Hybrid relevance score
    pub score: f32,
}
