//! Structural outline extraction: spans → blocks → heading hierarchy →
//! sections.

mod blocks;
mod body_style;
mod heading;
mod hierarchy;
mod sectionize;

pub use blocks::BlockReconstructor;
pub use body_style::detect_body_style;
pub use heading::{HeadingCandidate, HeadingClassifier};
pub use hierarchy::HierarchyAssigner;
pub use sectionize::sectionize;

use crate::config::OutlineConfig;
use crate::error::Result;
use crate::extract::SpanSource;
use crate::model::{DocumentOutline, Heading, HeadingLevel, LogicalBlock, Section, TextSpan};

/// Extracts the outline and finest-granularity sections of one document.
pub struct OutlineExtractor<'a> {
    config: &'a OutlineConfig,
}

impl<'a> OutlineExtractor<'a> {
    /// Create an extractor with the given tuning options.
    pub fn new(config: &'a OutlineConfig) -> Self {
        Self { config }
    }

    /// Run the full structural pass over a span source.
    pub fn document_sections(
        &self,
        source: &dyn SpanSource,
    ) -> Result<(DocumentOutline, Vec<Section>)> {
        let mut pages: Vec<Vec<TextSpan>> = Vec::new();
        for page in 1..=source.page_count() {
            pages.push(source.page_spans(page)?);
        }

        let blocks = BlockReconstructor::new(self.config).reconstruct(&pages);
        let outline = self.extract_outline(source, &blocks);
        let sections = sectionize(&outline, &blocks);
        Ok((outline, sections))
    }

    /// Build the outline for already-reconstructed blocks.
    ///
    /// An embedded bookmark outline, when present, beats the typographic
    /// heuristics; authored structure is strictly more reliable.
    pub fn extract_outline(
        &self,
        source: &dyn SpanSource,
        blocks: &[LogicalBlock],
    ) -> DocumentOutline {
        let assigner = HierarchyAssigner::new();
        let metadata_title = source.metadata_title();

        let heuristic = match detect_body_style(blocks) {
            Some(body) => {
                let classifier = HeadingClassifier::new(body, self.config);
                let candidates = classifier.classify(blocks);
                assigner.assign(&candidates, metadata_title.as_deref())
            }
            // No extractable body text: empty outline, not an error.
            None => DocumentOutline::from_headings(
                metadata_title.clone().unwrap_or_default(),
                Vec::new(),
            ),
        };

        let bookmarks = source.bookmarks();
        if bookmarks.is_empty() {
            return heuristic;
        }

        let headings: Vec<Heading> = bookmarks
            .iter()
            .filter(|b| b.text.chars().any(|c| c.is_alphabetic()))
            .filter_map(|b| {
                let page = b.page?;
                Some(Heading {
                    level: HeadingLevel::from_depth((b.depth as usize + 1).min(4)),
                    text: b.text.clone(),
                    page,
                    // Anchor at the top of the destination page; entries on
                    // one page keep their authored order under the stable
                    // position sort.
                    y: source.page_height(page),
                })
            })
            .collect();

        if headings.is_empty() {
            return heuristic;
        }

        log::debug!(
            "using embedded bookmark outline ({} entries)",
            headings.len()
        );
        DocumentOutline::from_headings(heuristic.title, headings)
    }
}
