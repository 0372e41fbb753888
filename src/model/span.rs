//! Positioned text spans and font style profiles.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in PDF user space (y grows upward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Bottom edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Top edge (reading order starts here; PDF y grows upward).
    pub fn top(&self) -> f32 {
        self.y1
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y0
    }

    /// Extend this box to cover `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A text span with position and style information.
///
/// Spans are produced by a [`SpanSource`](crate::extract::SpanSource) and
/// are immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Whether the font appears to be bold
    pub is_bold: bool,
    /// Whether the font appears to be italic
    pub is_italic: bool,
    /// Page number (1-indexed)
    pub page: u32,
    /// Bounding box in page coordinates
    pub bbox: BoundingBox,
}

impl TextSpan {
    /// Create a new text span, deriving style flags from the font name.
    pub fn new(
        text: impl Into<String>,
        font_name: impl Into<String>,
        font_size: f32,
        page: u32,
        bbox: BoundingBox,
    ) -> Self {
        let font_name = font_name.into();
        let lower = font_name.to_lowercase();
        let is_bold = lower.contains("bold")
            || lower.contains("black")
            || lower.contains("heavy")
            || lower.contains("condb");
        let is_italic = lower.contains("italic") || lower.contains("oblique");

        Self {
            text: text.into(),
            font_name,
            font_size,
            is_bold,
            is_italic,
            page,
            bbox,
        }
    }

    /// Number of whitespace-separated words in the span.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Whether the span is whitespace only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The style profile of this span.
    pub fn style(&self) -> FontStyleProfile {
        FontStyleProfile::of(self)
    }
}

/// A font style identity usable as an aggregation key.
///
/// Value type with structural equality: two spans set in the same family
/// at the same size with the same weight flags share a profile regardless
/// of which page or object they came from. Font size is kept in tenths of
/// a point so the key hashes exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontStyleProfile {
    /// Font family / base font name
    pub family: String,
    /// Font size in tenths of a point
    pub size_decis: i32,
    /// Bold flag
    pub bold: bool,
    /// Italic flag
    pub italic: bool,
}

impl FontStyleProfile {
    /// Build the profile of a span.
    pub fn of(span: &TextSpan) -> Self {
        Self {
            family: span.font_name.clone(),
            size_decis: (span.font_size * 10.0).round() as i32,
            bold: span.is_bold,
            italic: span.is_italic,
        }
    }

    /// Font size in points.
    pub fn size(&self) -> f32 {
        self.size_decis as f32 / 10.0
    }

    /// Whether this profile differs from `other` only in family, not in
    /// size or weight. Such differences are trivial for block merging.
    pub fn same_shape(&self, other: &FontStyleProfile) -> bool {
        self.size_decis == other.size_decis
            && self.bold == other.bold
            && self.italic == other.italic
    }
}
