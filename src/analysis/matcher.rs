//! Keyword presence matching against resume text

use crate::analysis::synonyms::SynonymTable;
use crate::config::MatchingConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strsim::normalized_levenshtein;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub percentage: f32,
}

/// Lowercased token index over a text body: unigrams plus joined bigrams
/// and trigrams so compound terms ("machine learning", "amazon web
/// services") match as single keywords.
pub struct TokenSet {
    tokens: HashSet<String>,
    unigrams: Vec<String>,
}

impl TokenSet {
    pub fn build(text: &str) -> Self {
        let lowered = text.to_lowercase();

        let mut unigrams: Vec<String> = lowered.unicode_words().map(String::from).collect();
        // unicode_words drops symbol-bearing tokens like "c++" and "c#";
        // recover them from a raw whitespace split.
        for raw in lowered.split_whitespace() {
            let cleaned: String = raw
                .chars()
                .filter(|c| c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '/'))
                .collect();
            let cleaned = cleaned.trim_matches('.').to_string();
            if !cleaned.is_empty() && !unigrams.contains(&cleaned) {
                unigrams.push(cleaned);
            }
        }

        let mut tokens: HashSet<String> = unigrams.iter().cloned().collect();
        let words: Vec<&str> = lowered.unicode_words().collect();
        for pair in words.windows(2) {
            tokens.insert(pair.join(" "));
        }
        for triple in words.windows(3) {
            tokens.insert(triple.join(" "));
        }

        Self { tokens, unigrams }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.tokens.contains(term)
    }
}

pub struct KeywordMatcher {
    synonyms: SynonymTable,
    config: MatchingConfig,
}

impl KeywordMatcher {
    pub fn new(synonyms: SynonymTable, config: MatchingConfig) -> Self {
        Self { synonyms, config }
    }

    /// True when `term` appears in `text` directly, through a synonym
    /// variant, or through the fuzzy fallback.
    pub fn matches(&self, term: &str, text: &str) -> bool {
        self.matches_tokens(term, &TokenSet::build(text))
    }

    pub fn matches_tokens(&self, term: &str, tokens: &TokenSet) -> bool {
        let term = term.to_lowercase();

        if tokens.contains(&term) {
            return true;
        }

        for variant in self.synonyms.variants_of(&term) {
            if tokens.contains(&variant) {
                return true;
            }
        }

        self.fuzzy_match(&term, tokens)
    }

    fn fuzzy_match(&self, term: &str, tokens: &TokenSet) -> bool {
        if term.chars().count() < 4 {
            // Short terms produce spurious high similarity scores.
            return false;
        }
        tokens
            .unigrams
            .iter()
            .filter(|t| t.chars().count() >= 3)
            .any(|t| normalized_levenshtein(term, t) as f32 >= self.config.fuzzy_threshold)
    }

    /// Match every keyword against `text` and report coverage.
    pub fn match_all<I, S>(&self, keywords: I, text: &str) -> MatchResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = TokenSet::build(text);
        let mut matched = Vec::new();
        let mut missing = Vec::new();

        for keyword in keywords {
            let keyword = keyword.as_ref().to_lowercase();
            if self.matches_tokens(&keyword, &tokens) {
                matched.push(keyword);
            } else {
                missing.push(keyword);
            }
        }

        matched.sort();
        matched.dedup();
        missing.sort();
        missing.dedup();

        let total = matched.len() + missing.len();
        let percentage = if total == 0 {
            100.0
        } else {
            100.0 * matched.len() as f32 / total as f32
        };

        MatchResult {
            matched,
            missing,
            percentage,
        }
    }
}
