//! Logical block reconstruction from positioned spans.

use std::collections::HashMap;

use crate::config::OutlineConfig;
use crate::model::{FontStyleProfile, LogicalBlock, TextSpan};

/// Reconstructs reading-ordered logical blocks from per-page span lists.
///
/// Spans group into lines by baseline proximity; consecutive lines merge
/// into one block while the vertical gap stays under the line-height
/// threshold and the dominant style shape is unchanged. A single styled
/// word inside a line does not flip the line's dominant profile, so
/// justified text with inline emphasis stays in one block.
pub struct BlockReconstructor<'a> {
    config: &'a OutlineConfig,
}

/// A line of spans sharing a baseline.
struct Line {
    spans: Vec<TextSpan>,
    y: f32,
    font_size: f32,
    style: FontStyleProfile,
}

impl Line {
    fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| {
            a.bbox
                .x0
                .partial_cmp(&b.bbox.x0)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let y = spans[0].bbox.top();
        let font_size = dominant_size(&spans);
        let style = dominant_style(&spans);
        Self {
            spans,
            y,
            font_size,
            style,
        }
    }

    /// Joined text with spaces restored at visual gaps.
    fn text(&self) -> String {
        let mut result = String::new();
        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                let gap = span.bbox.x0 - prev.bbox.x1;
                let char_width = span.font_size * 0.5;
                let needs_space = gap > char_width * 0.2
                    && !result.ends_with(' ')
                    && !span.text.starts_with(' ');
                if needs_space {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
        }
        result
    }

}

impl<'a> BlockReconstructor<'a> {
    /// Create a reconstructor with the given tuning options.
    pub fn new(config: &'a OutlineConfig) -> Self {
        Self { config }
    }

    /// Reconstruct blocks for a whole document. `pages[i]` holds the spans
    /// of page `i + 1`; empty pages contribute nothing.
    pub fn reconstruct(&self, pages: &[Vec<TextSpan>]) -> Vec<LogicalBlock> {
        let mut blocks = Vec::new();
        for spans in pages {
            let lines = self.group_lines(spans);
            self.merge_lines(lines, &mut blocks);
        }
        self.flag_repeated(&mut blocks);
        blocks
    }

    /// Group one page's spans into baseline lines, top to bottom.
    fn group_lines(&self, spans: &[TextSpan]) -> Vec<Line> {
        let mut spans: Vec<TextSpan> = spans.iter().filter(|s| !s.is_blank()).cloned().collect();
        if spans.is_empty() {
            return Vec::new();
        }

        // PDF y grows upward: descending y is top-to-bottom reading order.
        spans.sort_by(|a, b| {
            b.bbox
                .y1
                .partial_cmp(&a.bbox.y1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    a.bbox
                        .x0
                        .partial_cmp(&b.bbox.x0)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        });

        let mut lines = Vec::new();
        let mut current: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in spans {
            let tolerance = span.font_size * self.config.baseline_tolerance;
            match current_y {
                Some(y) if (span.bbox.y1 - y).abs() <= tolerance => current.push(span),
                _ => {
                    if !current.is_empty() {
                        lines.push(Line::from_spans(std::mem::take(&mut current)));
                    }
                    current_y = Some(span.bbox.y1);
                    current.push(span);
                }
            }
        }
        if !current.is_empty() {
            lines.push(Line::from_spans(current));
        }
        lines
    }

    /// Merge one page's lines into blocks, appending to `blocks`.
    fn merge_lines(&self, lines: Vec<Line>, blocks: &mut Vec<LogicalBlock>) {
        let mut run: Vec<Line> = Vec::new();
        for line in lines {
            let breaks = match run.last() {
                None => false,
                Some(prev) => {
                    let gap = prev.y - line.y;
                    gap > line.font_size * self.config.line_gap_factor
                        || !prev.style.same_shape(&line.style)
                }
            };
            if breaks {
                blocks.push(build_block(std::mem::take(&mut run)));
            }
            run.push(line);
        }
        if !run.is_empty() {
            blocks.push(build_block(run));
        }
    }

    /// Flag blocks whose normalized text recurs on several pages.
    fn flag_repeated(&self, blocks: &mut [LogicalBlock]) {
        let mut pages_by_key: HashMap<String, Vec<u32>> = HashMap::new();
        for block in blocks.iter() {
            pages_by_key
                .entry(block.repetition_key())
                .or_default()
                .push(block.page);
        }
        for pages in pages_by_key.values_mut() {
            pages.sort_unstable();
            pages.dedup();
        }
        for block in blocks.iter_mut() {
            if let Some(pages) = pages_by_key.get(&block.repetition_key()) {
                if pages.len() >= self.config.repeat_page_threshold {
                    block.repeated = true;
                }
            }
        }
    }
}

fn build_block(lines: Vec<Line>) -> LogicalBlock {
    let all_spans: Vec<&TextSpan> = lines.iter().flat_map(|l| l.spans.iter()).collect();
    let text = lines
        .iter()
        .map(|l| l.text())
        .collect::<Vec<_>>()
        .join(" ");
    let bbox = all_spans
        .iter()
        .skip(1)
        .fold(all_spans[0].bbox, |acc, s| acc.union(&s.bbox));
    let style = dominant_style_refs(&all_spans);
    let word_count = text.split_whitespace().count();

    LogicalBlock {
        text,
        style,
        bbox,
        page: all_spans[0].page,
        line_count: lines.len(),
        word_count,
        repeated: false,
    }
}

/// Char-weighted dominant font size of a span run.
fn dominant_size(spans: &[TextSpan]) -> f32 {
    let total: usize = spans.iter().map(|s| s.text.len()).sum();
    if total == 0 {
        return spans[0].font_size;
    }
    let weighted: f32 = spans
        .iter()
        .map(|s| s.font_size * s.text.len() as f32)
        .sum();
    weighted / total as f32
}

/// Char-weighted dominant style profile, deterministic under ties.
fn dominant_style(spans: &[TextSpan]) -> FontStyleProfile {
    let refs: Vec<&TextSpan> = spans.iter().collect();
    dominant_style_refs(&refs)
}

fn dominant_style_refs(spans: &[&TextSpan]) -> FontStyleProfile {
    let mut counts: HashMap<FontStyleProfile, usize> = HashMap::new();
    for span in spans {
        *counts.entry(span.style()).or_insert(0) += span.text.len();
    }
    let mut entries: Vec<(FontStyleProfile, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then(a.0.size_decis.cmp(&b.0.size_decis))
            .then(a.0.family.cmp(&b.0.family))
    });
    entries.remove(0).0
}
