//! Heading candidate detection.
//!
//! Classification runs an ordered list of named predicate rules; a block
//! qualifies only when every rule accepts it. Each rule is a standalone
//! function over the block and a shared context, testable on its own.

use regex::Regex;

use crate::config::OutlineConfig;
use crate::model::{FontStyleProfile, LogicalBlock};

/// A block that passed every heading rule, with its raw score.
#[derive(Debug, Clone)]
pub struct HeadingCandidate {
    /// The candidate block
    pub block: LogicalBlock,
    /// Raw heading score: monotonic in size ratio to body and boldness
    pub score: f32,
}

/// Shared inputs of the heading rules.
struct RuleContext<'a> {
    body: FontStyleProfile,
    config: &'a OutlineConfig,
    dot_leader: Regex,
    list_marker: Regex,
}

/// One named predicate in the rule chain.
struct Rule {
    name: &'static str,
    accepts: fn(&LogicalBlock, &RuleContext) -> bool,
}

/// Heading classifier over reconstructed blocks.
pub struct HeadingClassifier<'a> {
    ctx: RuleContext<'a>,
    rules: Vec<Rule>,
}

impl<'a> HeadingClassifier<'a> {
    /// Create a classifier for a document whose body style is `body`.
    pub fn new(body: FontStyleProfile, config: &'a OutlineConfig) -> Self {
        let ctx = RuleContext {
            body,
            config,
            dot_leader: Regex::new(r"\.{4,}").unwrap(),
            list_marker: Regex::new(r"^\s*([•▪◦*\-–]|[a-zA-Z\d]{1,3}\))\s+").unwrap(),
        };
        let rules = vec![
            Rule {
                name: "style-diverges-from-body",
                accepts: style_diverges,
            },
            Rule {
                name: "short-single-line",
                accepts: short_single_line,
            },
            Rule {
                name: "not-running-furniture",
                accepts: not_repeated,
            },
            Rule {
                name: "has-letters",
                accepts: has_letters,
            },
            Rule {
                name: "no-dot-leader",
                accepts: no_dot_leader,
            },
            Rule {
                name: "no-sentence-punctuation",
                accepts: no_sentence_punctuation,
            },
            Rule {
                name: "not-list-item",
                accepts: not_list_item,
            },
        ];
        Self { ctx, rules }
    }

    /// Evaluate the rule chain for one block. Returns the heading score
    /// when every rule accepts.
    pub fn evaluate(&self, block: &LogicalBlock) -> Option<f32> {
        for rule in &self.rules {
            if !(rule.accepts)(block, &self.ctx) {
                log::trace!("block {:?} rejected by rule {}", block.text, rule.name);
                return None;
            }
        }
        Some(self.score(block))
    }

    /// Classify all blocks, in document order.
    pub fn classify(&self, blocks: &[LogicalBlock]) -> Vec<HeadingCandidate> {
        blocks
            .iter()
            .filter_map(|block| {
                self.evaluate(block).map(|score| HeadingCandidate {
                    block: block.clone(),
                    score,
                })
            })
            .collect()
    }

    /// Heading score: size ratio to the body style plus a bold bonus.
    /// Strictly monotonic in both signals.
    fn score(&self, block: &LogicalBlock) -> f32 {
        let ratio = block.style.size() / self.ctx.body.size().max(1.0);
        let bold_bonus = if block.style.bold { 0.2 } else { 0.0 };
        ratio + bold_bonus
    }
}

/// Rule: the style must diverge from the body by size or by a weight flag
/// the body lacks.
fn style_diverges(block: &LogicalBlock, ctx: &RuleContext) -> bool {
    let style = &block.style;
    style.size() >= ctx.body.size() + ctx.config.min_size_delta
        || (style.bold && !ctx.body.bold)
        || (style.italic && !ctx.body.italic)
}

/// Rule: headings are short and occupy one line.
fn short_single_line(block: &LogicalBlock, ctx: &RuleContext) -> bool {
    block.word_count > 0
        && block.word_count <= ctx.config.max_heading_words
        && block.is_single_line()
}

/// Rule: running headers/footers recur across pages and never head a
/// section.
fn not_repeated(block: &LogicalBlock, _ctx: &RuleContext) -> bool {
    !block.repeated
}

/// Rule: page furniture without alphabetic content is not a heading.
fn has_letters(block: &LogicalBlock, _ctx: &RuleContext) -> bool {
    block.has_letters()
}

/// Rule: dot leaders mark table-of-contents lines.
fn no_dot_leader(block: &LogicalBlock, ctx: &RuleContext) -> bool {
    !ctx.dot_leader.is_match(&block.text)
}

/// Rule: trailing sentence punctuation marks prose, not a heading.
fn no_sentence_punctuation(block: &LogicalBlock, _ctx: &RuleContext) -> bool {
    let trimmed = block.text.trim_end();
    !trimmed.ends_with(['.', ',', ';', ':'])
}

/// Rule: bullet and enumerated list markers disqualify a block.
fn not_list_item(block: &LogicalBlock, ctx: &RuleContext) -> bool {
    !ctx.list_marker.is_match(&block.text)
}
