//! Core data model: spans, style profiles, blocks, outline, sections.

mod block;
mod outline;
mod section;
mod span;

pub use block::LogicalBlock;
pub use outline::{DocumentOutline, Heading, HeadingLevel, OutlineNode};
pub use section::{RankedSection, ScoredSentence, Section};
pub use span::{BoundingBox, FontStyleProfile, TextSpan};
