//! Positioned-text span extraction.
//!
//! The outline pipeline consumes [`TextSpan`]s through the [`SpanSource`]
//! trait; the byte-level PDF work lives behind it. [`PdfSpanSource`] is
//! the lopdf-backed implementation.

mod pdf;

pub use pdf::PdfSpanSource;

use crate::error::Result;
use crate::model::TextSpan;

/// An embedded bookmark entry, flattened with its nesting depth.
#[derive(Debug, Clone)]
pub struct Bookmark {
    /// Bookmark title
    pub text: String,
    /// Destination page (1-indexed), when resolvable
    pub page: Option<u32>,
    /// Nesting depth (0 = top level)
    pub depth: u8,
}

/// A source of positioned text spans for one document.
pub trait SpanSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Ordered spans of one page (1-indexed). An empty page yields an
    /// empty list, not an error.
    fn page_spans(&self, page: u32) -> Result<Vec<TextSpan>>;

    /// Height of a page in points.
    fn page_height(&self, page: u32) -> f32;

    /// Title from document metadata, if any.
    fn metadata_title(&self) -> Option<String>;

    /// Embedded bookmark outline, flattened in document order. Empty when
    /// the document carries none.
    fn bookmarks(&self) -> Vec<Bookmark>;
}
