//! Hierarchy level assignment for heading candidates.

use std::collections::HashMap;

use regex::Regex;

use crate::model::{DocumentOutline, Heading, HeadingLevel};

use super::heading::HeadingCandidate;

/// Assigns Title/H1–H4 levels to heading candidates.
///
/// Distinct candidate font sizes are bucketed in descending order and
/// mapped to H1..H4; further distinct sizes collapse into H4. A leading
/// numbering token ("2.1", "3.2.1") overrides the size level with its
/// depth — numbering is the stronger structural signal.
pub struct HierarchyAssigner {
    numbering: Regex,
    filename_suffix: Regex,
}

impl Default for HierarchyAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyAssigner {
    /// Create an assigner.
    pub fn new() -> Self {
        Self {
            numbering: Regex::new(r"^\s*(\d+(?:\.\d+)*)[.)]?\s+").unwrap(),
            filename_suffix: Regex::new(r"(?i)\.(pdf|docx?|pptx?|xlsx?|cdr)$").unwrap(),
        }
    }

    /// Build the document outline from candidates in document order.
    ///
    /// The title is the metadata title when plausible, otherwise the
    /// highest-scoring non-numbered candidate on page 1. A page-1 heading
    /// repeating the title verbatim is dropped from the outline.
    pub fn assign(
        &self,
        candidates: &[HeadingCandidate],
        metadata_title: Option<&str>,
    ) -> DocumentOutline {
        let title = self
            .plausible_metadata_title(metadata_title)
            .or_else(|| self.title_from_candidates(candidates))
            .unwrap_or_default();

        let size_levels = self.size_level_map(candidates);

        let mut headings = Vec::new();
        for candidate in candidates {
            let text = normalize_text(&candidate.block.text);
            let mut level = size_levels
                .get(&candidate.block.style.size_decis)
                .copied()
                .unwrap_or(HeadingLevel::H4);

            if let Some(depth) = self.numbering_depth(&text) {
                level = HeadingLevel::from_depth(depth);
            }

            if candidate.block.page == 1 && text == title {
                continue;
            }

            headings.push(Heading {
                level,
                text,
                page: candidate.block.page,
                y: candidate.block.top(),
            });
        }

        DocumentOutline::from_headings(title, headings)
    }

    /// Map each distinct candidate size to a level, largest size first.
    fn size_level_map(&self, candidates: &[HeadingCandidate]) -> HashMap<i32, HeadingLevel> {
        let mut sizes: Vec<i32> = candidates
            .iter()
            .map(|c| c.block.style.size_decis)
            .collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes.dedup();

        sizes
            .into_iter()
            .enumerate()
            .map(|(i, size)| (size, HeadingLevel::from_depth((i + 1).min(4))))
            .collect()
    }

    /// Depth of a leading dot-separated numbering token: "2" is depth 1,
    /// "2.1" depth 2, "3.2.1" depth 3.
    fn numbering_depth(&self, text: &str) -> Option<usize> {
        let caps = self.numbering.captures(text)?;
        let token = caps.get(1)?.as_str();
        Some(token.split('.').count())
    }

    /// A metadata title is usable when it is more than a filename or an
    /// authoring-tool artifact.
    fn plausible_metadata_title(&self, title: Option<&str>) -> Option<String> {
        let title = title?.trim();
        if title.len() <= 4
            || self.filename_suffix.is_match(title)
            || title.contains("Microsoft Word")
        {
            return None;
        }
        Some(title.to_string())
    }

    /// Highest-scoring non-numbered candidate on the first page.
    fn title_from_candidates(&self, candidates: &[HeadingCandidate]) -> Option<String> {
        candidates
            .iter()
            .filter(|c| c.block.page == 1)
            .filter(|c| self.numbering_depth(&c.block.text).is_none())
            .max_by(|a, b| {
                a.score
                    .partial_cmp(&b.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|c| normalize_text(&c.block.text))
    }
}

/// Collapse internal whitespace runs.
fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, LogicalBlock, TextSpan};

    fn candidate(text: &str, size: f32, page: u32, y: f32, score: f32) -> HeadingCandidate {
        let span = TextSpan::new(
            text,
            "Helvetica-Bold",
            size,
            page,
            BoundingBox::new(72.0, y - size, 300.0, y),
        );
        HeadingCandidate {
            block: LogicalBlock {
                text: text.to_string(),
                style: span.style(),
                bbox: span.bbox,
                page,
                line_count: 1,
                word_count: text.split_whitespace().count(),
                repeated: false,
            },
            score,
        }
    }

    #[test]
    fn test_sizes_bucket_descending() {
        let assigner = HierarchyAssigner::new();
        let candidates = vec![
            candidate("Main Title Level", 20.0, 1, 700.0, 2.0),
            candidate("Mid Level", 16.0, 2, 700.0, 1.5),
            candidate("Low Level", 13.0, 3, 700.0, 1.2),
        ];

        let outline = assigner.assign(&candidates, None);
        let flat = outline.flatten();
        // The 20pt candidate became the title and left the outline.
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].level, HeadingLevel::H2);
        assert_eq!(flat[1].level, HeadingLevel::H3);
    }

    #[test]
    fn test_numbering_overrides_size() {
        let assigner = HierarchyAssigner::new();
        // "1.1 Background" set LARGER than its parent "1 Intro": numbering
        // must still place it one level deeper.
        let candidates = vec![
            candidate("1 Intro", 14.0, 2, 700.0, 1.3),
            candidate("1.1 Background", 18.0, 2, 600.0, 1.6),
        ];

        let outline = assigner.assign(&candidates, Some("Sample Document"));
        let flat = outline.flatten();
        assert_eq!(flat[0].level, HeadingLevel::H1);
        assert_eq!(flat[1].level, HeadingLevel::H2);
    }

    #[test]
    fn test_deep_numbering_collapses_to_h4() {
        let assigner = HierarchyAssigner::new();
        let candidates = vec![candidate("1.2.3.4.5 Deep", 12.0, 2, 700.0, 1.1)];
        let outline = assigner.assign(&candidates, Some("Sample Document"));
        assert_eq!(outline.flatten()[0].level, HeadingLevel::H4);
    }

    #[test]
    fn test_title_is_best_page_one_candidate() {
        let assigner = HierarchyAssigner::new();
        let candidates = vec![
            candidate("Report on Flooding", 22.0, 1, 720.0, 2.2),
            candidate("Introduction", 16.0, 1, 600.0, 1.5),
            candidate("2 Methods", 16.0, 2, 700.0, 1.5),
        ];

        let outline = assigner.assign(&candidates, None);
        assert_eq!(outline.title, "Report on Flooding");
        // Title text no longer appears as a heading.
        assert!(outline.flatten().iter().all(|h| h.text != "Report on Flooding"));
    }

    #[test]
    fn test_metadata_title_preferred_when_plausible() {
        let assigner = HierarchyAssigner::new();
        let candidates = vec![candidate("Overview", 18.0, 1, 700.0, 1.8)];

        let outline = assigner.assign(&candidates, Some("Coastal Risk Assessment"));
        assert_eq!(outline.title, "Coastal Risk Assessment");

        let outline = assigner.assign(&candidates, Some("report.pdf"));
        assert_eq!(outline.title, "Overview");

        let outline = assigner.assign(&candidates, Some("Microsoft Word - final2"));
        assert_eq!(outline.title, "Overview");
    }

    #[test]
    fn test_numbered_candidate_never_becomes_title() {
        let assigner = HierarchyAssigner::new();
        let candidates = vec![
            candidate("1 Introduction", 22.0, 1, 720.0, 2.2),
            candidate("Flood Defence Handbook", 18.0, 1, 680.0, 1.8),
        ];
        let outline = assigner.assign(&candidates, None);
        assert_eq!(outline.title, "Flood Defence Handbook");
    }
}
