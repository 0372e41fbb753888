//! Stopword filtering backed by the `stop-words` word lists.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// A stopword filter with a fixed, lower-cased word set.
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    stopwords: HashSet<String>,
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::new("en")
    }
}

impl StopwordFilter {
    /// Create a filter for the given language code. Unknown codes fall
    /// back to English.
    pub fn new(language: &str) -> Self {
        let lang = match language.to_lowercase().as_str() {
            "en" | "english" => LANGUAGE::English,
            "de" | "german" => LANGUAGE::German,
            "fr" | "french" => LANGUAGE::French,
            "es" | "spanish" => LANGUAGE::Spanish,
            "it" | "italian" => LANGUAGE::Italian,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            _ => LANGUAGE::English,
        };
        let stopwords = get(lang).iter().map(|w| w.to_lowercase()).collect();
        Self { stopwords }
    }

    /// Create a filter that removes nothing.
    pub fn empty() -> Self {
        Self {
            stopwords: HashSet::new(),
        }
    }

    /// Create a filter from a custom word list.
    pub fn from_list(words: &[&str]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Check whether a (lower-cased) token is a stopword.
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Remove stopwords from a token stream, preserving order.
    pub fn filter<'a, I>(&self, tokens: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        tokens
            .into_iter()
            .filter(|t| !self.is_stopword(t))
            .map(|t| t.to_string())
            .collect()
    }

    /// Number of stopwords in the filter.
    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    /// Whether the filter removes nothing.
    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
