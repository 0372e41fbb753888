//! Logical text blocks reconstructed from spans.

use serde::{Deserialize, Serialize};

use super::{BoundingBox, FontStyleProfile};

/// A logical block: consecutive spans merged under style and proximity
/// continuity. Immutable once built; the `repeated` flag is the only field
/// stamped after construction, during the cross-page repetition pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalBlock {
    /// Concatenated block text
    pub text: String,
    /// Dominant style profile (char-weighted across spans)
    pub style: FontStyleProfile,
    /// Bounding box covering all spans
    pub bbox: BoundingBox,
    /// Page number (1-indexed)
    pub page: u32,
    /// Number of lines merged into the block
    pub line_count: usize,
    /// Number of whitespace-separated words
    pub word_count: usize,
    /// Whether the block text recurs verbatim on several pages (running
    /// header/footer)
    pub repeated: bool,
}

impl LogicalBlock {
    /// Whether the block is a single line of text.
    pub fn is_single_line(&self) -> bool {
        self.line_count == 1
    }

    /// Top edge of the block (reading order key within a page).
    pub fn top(&self) -> f32 {
        self.bbox.top()
    }

    /// Normalized text used for cross-page repetition matching.
    pub fn repetition_key(&self) -> String {
        self.text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Whether the block contains any alphabetic content. Pure page
    /// furniture (page numbers, rules) does not.
    pub fn has_letters(&self) -> bool {
        self.text.chars().any(|c| c.is_alphabetic())
    }
}
