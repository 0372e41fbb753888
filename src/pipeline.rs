//! Collection analysis pipeline.
//!
//! Documents are independent through block reconstruction and
//! sectionizing and run in parallel; embedding happens afterwards in
//! batched passes over the whole collection because the embedder
//! dominates latency. One document failing is recorded and skipped, never
//! fatal for the collection.

use std::path::Path;

use chrono::Utc;
use rayon::prelude::*;

use crate::collection::Collection;
use crate::config::{OutlineConfig, RankConfig};
use crate::embed::Embedder;
use crate::error::Result;
use crate::extract::PdfSpanSource;
use crate::model::Section;
use crate::nlp::StopwordFilter;
use crate::outline::OutlineExtractor;
use crate::output::{
    CollectionResult, ExtractedSection, FailedDocument, RunMetadata, SubsectionAnalysis,
};
use crate::rank::{HybridRanker, QueryEncoder, SubsectionSummarizer};

/// Long-lived shared resources and tuning for a whole run.
///
/// Constructed once at process start and passed by reference into every
/// collection; the embedder and stopword tables are never re-initialized
/// per document.
pub struct AnalysisContext {
    /// Embedding backend
    pub embedder: Box<dyn Embedder>,
    /// Stopword tables for query/token normalization
    pub stopwords: StopwordFilter,
    /// Outline extraction tuning
    pub outline: OutlineConfig,
    /// Ranking and refinement tuning
    pub rank: RankConfig,
}

impl AnalysisContext {
    /// Create a context with default tuning around the given embedder.
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self {
            embedder,
            stopwords: StopwordFilter::default(),
            outline: OutlineConfig::default(),
            rank: RankConfig::default(),
        }
    }

    /// Replace the outline tuning.
    pub fn with_outline_config(mut self, config: OutlineConfig) -> Self {
        self.outline = config;
        self
    }

    /// Replace the ranking tuning.
    pub fn with_rank_config(mut self, config: RankConfig) -> Self {
        self.rank = config;
        self
    }
}

/// Runs the full analysis for collections.
pub struct CollectionAnalyzer<'a> {
    ctx: &'a AnalysisContext,
}

impl<'a> CollectionAnalyzer<'a> {
    /// Create an analyzer over shared run resources.
    pub fn new(ctx: &'a AnalysisContext) -> Self {
        Self { ctx }
    }

    /// Analyze one collection end to end.
    pub fn analyze(&self, collection: &Collection) -> Result<CollectionResult> {
        let documents = collection.pdf_paths();

        // Structural pass, one document at a time, in parallel.
        let outcomes: Vec<(String, Result<Vec<Section>>)> = documents
            .par_iter()
            .map(|(name, path)| (name.clone(), self.document_sections(path)))
            .collect();

        let mut sections: Vec<Section> = Vec::new();
        let mut failed = Vec::new();
        for (name, outcome) in outcomes {
            match outcome {
                Ok(mut document_sections) => {
                    for section in &mut document_sections {
                        section.document = name.clone();
                    }
                    sections.extend(document_sections);
                }
                Err(e) => {
                    log::warn!("{name}: {e}");
                    failed.push(FailedDocument {
                        document: name,
                        reason: e.to_string(),
                    });
                }
            }
        }
        for (order, section) in sections.iter_mut().enumerate() {
            section.order = order;
        }

        let encoder = QueryEncoder::new(self.ctx.embedder.as_ref(), &self.ctx.stopwords);
        let query = encoder.encode(
            &collection.spec.persona.role,
            &collection.spec.job_to_be_done.task,
        )?;

        // One batched embedding pass over every section text.
        let vectors = if query.is_empty() {
            Vec::new()
        } else {
            let truncated: Vec<String> = sections
                .iter()
                .map(|s| truncate_chars(&s.text, self.ctx.rank.embed_char_limit))
                .collect();
            let refs: Vec<&str> = truncated.iter().map(|t| t.as_str()).collect();
            self.ctx.embedder.embed_batch(&refs)?
        };

        let ranked = HybridRanker::new(&self.ctx.rank).rank(sections, &vectors, &query);

        let extracted_sections: Vec<ExtractedSection> = ranked
            .iter()
            .take(self.ctx.rank.top_sections)
            .map(ExtractedSection::from_ranked)
            .collect();

        let summarizer = SubsectionSummarizer::new(&self.ctx.rank, self.ctx.embedder.as_ref());
        let mut subsection_analysis = Vec::new();
        for entry in ranked.iter().take(self.ctx.rank.top_subsections) {
            if let Some(refined_text) = summarizer.refine(&entry.section.text, &query)? {
                subsection_analysis.push(SubsectionAnalysis {
                    document: entry.section.document.clone(),
                    refined_text,
                    page_number: entry.section.page,
                });
            }
        }

        Ok(CollectionResult {
            metadata: RunMetadata {
                input_documents: collection
                    .spec
                    .documents
                    .iter()
                    .map(|d| d.filename.clone())
                    .collect(),
                persona: collection.spec.persona.role.clone(),
                job_to_be_done: collection.spec.job_to_be_done.task.clone(),
                processing_timestamp: Utc::now(),
                failed_documents: failed,
            },
            extracted_sections,
            subsection_analysis,
        })
    }

    /// Structural pass for one document.
    fn document_sections(&self, path: &Path) -> Result<Vec<Section>> {
        let source = PdfSpanSource::open(path)?;
        let (outline, sections) =
            OutlineExtractor::new(&self.ctx.outline).document_sections(&source)?;
        log::debug!(
            "{}: {} headings, {} sections",
            path.display(),
            outline.len(),
            sections.len()
        );
        Ok(sections)
    }
}

/// Truncate to a character budget on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
