//! Body style detection.

use std::collections::HashMap;

use crate::model::{FontStyleProfile, LogicalBlock};

/// Pick the document's body style: the profile carrying the most total
/// words across all blocks sharing it.
///
/// Word mass, not block count — a handful of large headings can outnumber
/// paragraphs as blocks but never carries comparable word totals. Ties go
/// to the smaller font size. No blocks means no body profile and the
/// caller degrades to a single whole-document section.
pub fn detect_body_style(blocks: &[LogicalBlock]) -> Option<FontStyleProfile> {
    let mut word_mass: HashMap<FontStyleProfile, usize> = HashMap::new();
    for block in blocks {
        *word_mass.entry(block.style.clone()).or_insert(0) += block.word_count;
    }

    let mut entries: Vec<(FontStyleProfile, usize)> = word_mass.into_iter().collect();
    entries.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then(a.0.size_decis.cmp(&b.0.size_decis))
            .then(a.0.family.cmp(&b.0.family))
    });
    entries.into_iter().next().map(|(profile, _)| profile)
}
