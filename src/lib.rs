//! # sectrank
//!
//! Persona-driven PDF section extraction and hybrid relevance ranking.
//!
//! The library turns a collection of PDFs into a ranked, persona-relevant
//! set of document sections with extractive summaries:
//!
//! 1. positioned text spans are reconstructed into logical blocks,
//! 2. typography heuristics recover a Title/H1–H4 outline and partition
//!    each document into sections,
//! 3. sections are ranked against a persona/job query by a hybrid of
//!    dense cosine similarity and BM25 lexical overlap,
//! 4. the top sections are refined into their most relevant sentences.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sectrank::{AnalysisContext, CollectionAnalyzer};
//! use sectrank::collection::Collection;
//! use sectrank::embed::HashEmbedder;
//!
//! fn main() -> sectrank::Result<()> {
//!     let ctx = AnalysisContext::new(Box::new(HashEmbedder::new()));
//!     let collection = Collection::load("collections/travel")?;
//!     let result = CollectionAnalyzer::new(&ctx).analyze(&collection)?;
//!     println!("{}", result.to_json()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Structure from typography**: no markup needed; headings are
//!   inferred from font style divergence, numbering tokens and layout
//! - **Deterministic ranking**: min-max normalized score fusion with
//!   document-order tie-breaking
//! - **Batched embedding**: all section and sentence texts of a
//!   collection go through the embedder in batched passes
//! - **Failure isolation**: a corrupt document is recorded and skipped,
//!   never fatal for its collection

pub mod collection;
pub mod config;
pub mod embed;
pub mod error;
pub mod extract;
pub mod model;
pub mod nlp;
pub mod outline;
pub mod output;
pub mod pipeline;
pub mod rank;

// Re-export commonly used types
pub use collection::{discover, Collection};
pub use config::{OutlineConfig, RankConfig};
pub use error::{Error, Result};
pub use model::{
    BoundingBox, DocumentOutline, FontStyleProfile, Heading, HeadingLevel, LogicalBlock,
    OutlineNode, RankedSection, ScoredSentence, Section, TextSpan,
};
pub use output::CollectionResult;
pub use pipeline::{AnalysisContext, CollectionAnalyzer};

use std::path::Path;

/// Analyze every collection under an input root.
///
/// Returns one result per collection, in name order. Per-document
/// failures are recorded inside each result; only a missing or unreadable
/// root is an error.
pub fn analyze_root<P: AsRef<Path>>(
    root: P,
    ctx: &AnalysisContext,
) -> Result<Vec<(Collection, CollectionResult)>> {
    let analyzer = CollectionAnalyzer::new(ctx);
    let mut results = Vec::new();
    for collection in discover(root)? {
        let result = analyzer.analyze(&collection)?;
        results.push((collection, result));
    }
    Ok(results)
}

/// Analyze a single collection directory.
pub fn analyze_collection<P: AsRef<Path>>(
    dir: P,
    ctx: &AnalysisContext,
) -> Result<CollectionResult> {
    let collection = Collection::load(dir)?;
    CollectionAnalyzer::new(ctx).analyze(&collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::HashEmbedder;
    use std::fs;

    #[test]
    fn test_analyze_root_missing_is_fatal() {
        let ctx = AnalysisContext::new(Box::new(HashEmbedder::new()));
        assert!(matches!(
            analyze_root("/no/such/root", &ctx),
            Err(Error::InputRoot(_))
        ));
    }

    #[test]
    fn test_analyze_root_iterates_collections() {
        let root = tempfile::tempdir().unwrap();
        for name in ["one", "two"] {
            let dir = root.path().join(name);
            fs::create_dir(&dir).unwrap();
            fs::write(
                dir.join("collection.json"),
                r#"{"documents": [], "persona": {"role": "r"}, "job_to_be_done": {"task": "t"}}"#,
            )
            .unwrap();
        }

        let ctx = AnalysisContext::new(Box::new(HashEmbedder::new()));
        let results = analyze_root(root.path(), &ctx).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.name, "one");
    }
}
