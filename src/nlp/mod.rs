//! Word tokenization and sentence splitting.
//!
//! Tokenization is deliberately plain: NFKC normalization, lower-casing,
//! alphanumeric runs. Anything smarter (stemming, lemmas) would leak into
//! ranking semantics and belongs to a different layer.

mod stopwords;

pub use stopwords::StopwordFilter;

use unicode_normalization::UnicodeNormalization;

/// Split text into normalized word tokens: NFKC-folded, lower-cased
/// alphanumeric runs in input order.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text.nfkc().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in normalized.chars() {
        if c.is_alphanumeric() {
            for lower in c.to_lowercase() {
                current.push(lower);
            }
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Split text into sentences.
///
/// Boundaries are terminal punctuation followed by whitespace, and
/// newlines (section text joins blocks with newlines, so a newline is a
/// paragraph boundary). Fragments without alphabetic content are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' || c == '\r' {
            flush(&mut current, &mut sentences);
            continue;
        }
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |next| next.is_whitespace());
            if at_boundary {
                flush(&mut current, &mut sentences);
            }
        }
    }
    flush(&mut current, &mut sentences);
    sentences
}

fn flush(current: &mut String, sentences: &mut Vec<String>) {
    let trimmed = current.trim();
    if trimmed.chars().any(|c| c.is_alphabetic()) {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        let tokens = tokenize("Mitigation Strategies, 2024 (draft)");
        assert_eq!(tokens, vec!["mitigation", "strategies", "2024", "draft"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("  ...  ").is_empty());
    }

    #[test]
    fn test_split_sentences_on_punctuation() {
        let sentences = split_sentences("First point. Second point! Third?");
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0], "First point.");
        assert_eq!(sentences[2], "Third?");
    }

    #[test]
    fn test_split_sentences_newline_is_boundary() {
        let sentences = split_sentences("Heading line\nBody continues here.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0], "Heading line");
    }

    #[test]
    fn test_split_sentences_drops_bare_numbers() {
        let sentences = split_sentences("42.\nReal sentence.");
        assert_eq!(sentences, vec!["Real sentence."]);
    }

    #[test]
    fn test_decimal_number_does_not_split() {
        let sentences = split_sentences("Growth was 3.5 percent overall.");
        assert_eq!(sentences.len(), 1);
    }
}
