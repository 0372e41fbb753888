//! Tuning-parameter configuration.
//!
//! The outline heuristics and the hybrid ranker are governed by a handful
//! of policy parameters (gap multipliers, word-count cutoffs, the hybrid
//! weight). They are deliberately configuration rather than hard-coded
//! constants; the defaults here are the values validated by the scenario
//! tests in `tests/`.

/// Options governing structural-outline extraction.
#[derive(Debug, Clone)]
pub struct OutlineConfig {
    /// Vertical gap threshold between lines of one block, as a multiple of
    /// the current font size.
    pub line_gap_factor: f32,

    /// Baseline tolerance when grouping spans into a line, as a multiple
    /// of the span font size.
    pub baseline_tolerance: f32,

    /// Minimum font-size delta (points) over the body style for a block to
    /// diverge by size alone.
    pub min_size_delta: f32,

    /// Maximum word count for a heading candidate.
    pub max_heading_words: usize,

    /// A block whose text recurs verbatim on at least this many pages is a
    /// running header or footer, never a heading.
    pub repeat_page_threshold: usize,
}

impl OutlineConfig {
    /// Create new outline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line gap factor.
    pub fn with_line_gap_factor(mut self, factor: f32) -> Self {
        self.line_gap_factor = factor;
        self
    }

    /// Set the minimum heading size delta in points.
    pub fn with_min_size_delta(mut self, delta: f32) -> Self {
        self.min_size_delta = delta;
        self
    }

    /// Set the maximum heading word count.
    pub fn with_max_heading_words(mut self, words: usize) -> Self {
        self.max_heading_words = words;
        self
    }

    /// Set the running-header repetition threshold.
    pub fn with_repeat_page_threshold(mut self, pages: usize) -> Self {
        self.repeat_page_threshold = pages;
        self
    }
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            line_gap_factor: 1.6,
            baseline_tolerance: 0.3,
            min_size_delta: 0.5,
            max_heading_words: 30,
            repeat_page_threshold: 3,
        }
    }
}

/// Options governing hybrid ranking and subsection refinement.
#[derive(Debug, Clone)]
pub struct RankConfig {
    /// Weight of the semantic axis in the hybrid score (the lexical axis
    /// gets `1 - semantic_weight`).
    pub semantic_weight: f32,

    /// Number of ranked sections reported in `extracted_sections`.
    pub top_sections: usize,

    /// Number of top sections refined into `subsection_analysis`.
    pub top_subsections: usize,

    /// Character budget for a refined text.
    pub max_summary_chars: usize,

    /// Sentence budget for a refined text.
    pub max_summary_sentences: usize,

    /// Minimum hybrid score for a sentence to be selected; the single best
    /// sentence is kept regardless so refinement stays total.
    pub min_sentence_score: f32,

    /// Character truncation applied to section text before embedding, as a
    /// guard in front of the embedder's own token limit.
    pub embed_char_limit: usize,
}

impl RankConfig {
    /// Create new ranking options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the semantic weight (clamped to [0, 1]).
    pub fn with_semantic_weight(mut self, alpha: f32) -> Self {
        self.semantic_weight = alpha.clamp(0.0, 1.0);
        self
    }

    /// Set the number of reported sections.
    pub fn with_top_sections(mut self, n: usize) -> Self {
        self.top_sections = n;
        self
    }

    /// Set the number of refined sections.
    pub fn with_top_subsections(mut self, n: usize) -> Self {
        self.top_subsections = n;
        self
    }

    /// Set the refined-text character budget.
    pub fn with_max_summary_chars(mut self, chars: usize) -> Self {
        self.max_summary_chars = chars;
        self
    }
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            semantic_weight: 0.7,
            top_sections: 10,
            top_subsections: 5,
            max_summary_chars: 900,
            max_summary_sentences: 6,
            min_sentence_score: 0.15,
            embed_char_limit: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_config_builder() {
        let config = OutlineConfig::new()
            .with_min_size_delta(1.0)
            .with_max_heading_words(20)
            .with_repeat_page_threshold(2);

        assert_eq!(config.min_size_delta, 1.0);
        assert_eq!(config.max_heading_words, 20);
        assert_eq!(config.repeat_page_threshold, 2);
    }

    #[test]
    fn test_rank_config_defaults() {
        let config = RankConfig::default();
        assert!((config.semantic_weight - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.top_sections, 10);
        assert_eq!(config.top_subsections, 5);
    }

    #[test]
    fn test_semantic_weight_clamped() {
        let config = RankConfig::new().with_semantic_weight(1.5);
        assert_eq!(config.semantic_weight, 1.0);
        let config = RankConfig::new().with_semantic_weight(-0.2);
        assert_eq!(config.semantic_weight, 0.0);
    }
}
