//! Keyword extraction from job descriptions

use crate::config::MatchingConfig;
use crate::error::{Result, ResumeScorerError};
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Classified keyword sets extracted from a job description. Disjoint by
/// construction: a term is required or preferred, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordSet {
    pub required: BTreeSet<String>,
    pub preferred: BTreeSet<String>,
}

impl KeywordSet {
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.preferred.is_empty()
    }
}

const REQUIRED_INDICATORS: &[&str] = &[
    "required",
    "must have",
    "must-have",
    "essential",
    "minimum",
    "mandatory",
    "need to have",
];

const PREFERRED_INDICATORS: &[&str] = &[
    "preferred",
    "nice to have",
    "nice-to-have",
    "bonus",
    "a plus",
    "desirable",
];

/// Extracts classified keywords by scanning two static term dictionaries
/// against the job text. Classification precedence is a literal contract:
/// explicit required indicator, then explicit preferred indicator, then
/// occurrence frequency, then default-preferred.
pub struct KeywordExtractor {
    term_matcher: AhoCorasick,
    terms: Vec<String>,
    config: MatchingConfig,
}

impl KeywordExtractor {
    pub fn new(config: MatchingConfig) -> Result<Self> {
        Self::with_terms(config, Self::default_terms())
    }

    pub fn with_terms(config: MatchingConfig, terms: Vec<String>) -> Result<Self> {
        let mut terms: Vec<String> = terms.into_iter().map(|t| t.to_lowercase()).collect();
        terms.sort();
        terms.dedup();
        // Longest-first so "machine learning" beats "machine".
        terms.sort_by(|a, b| b.len().cmp(&a.len()));

        let term_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(aho_corasick::MatchKind::LeftmostLongest)
            .build(&terms)
            .map_err(|e| {
                ResumeScorerError::Processing(format!("Failed to build keyword matcher: {}", e))
            })?;

        Ok(Self {
            term_matcher,
            terms,
            config,
        })
    }

    /// Scan `job_text` and classify every dictionary term found in it.
    pub fn extract(&self, job_text: &str) -> KeywordSet {
        let lowered = job_text.to_lowercase();
        let mut set = KeywordSet::default();

        // Collect occurrences per term, word-boundary checked.
        let mut occurrences: std::collections::HashMap<usize, Vec<usize>> =
            std::collections::HashMap::new();
        for mat in self.term_matcher.find_iter(&lowered) {
            if !Self::on_word_boundary(&lowered, mat.start(), mat.end()) {
                continue;
            }
            occurrences
                .entry(mat.pattern().as_usize())
                .or_default()
                .push(mat.start());
        }

        for (pattern_id, positions) in &occurrences {
            let term = &self.terms[*pattern_id];
            let classification = self.classify(&lowered, term.len(), positions);
            match classification {
                Classification::Required => {
                    set.preferred.remove(term);
                    set.required.insert(term.clone());
                }
                Classification::Preferred => {
                    if !set.required.contains(term) {
                        set.preferred.insert(term.clone());
                    }
                }
            }
        }

        set
    }

    fn classify(&self, text: &str, term_len: usize, positions: &[usize]) -> Classification {
        // 1. Explicit required indicator anywhere in a context window.
        for &pos in positions {
            let window = Self::context_window(text, pos, term_len, self.config.context_window);
            if REQUIRED_INDICATORS.iter().any(|ind| window.contains(ind)) {
                return Classification::Required;
            }
        }
        // 2. Explicit preferred indicator.
        for &pos in positions {
            let window = Self::context_window(text, pos, term_len, self.config.context_window);
            if PREFERRED_INDICATORS.iter().any(|ind| window.contains(ind)) {
                return Classification::Preferred;
            }
        }
        // 3. Frequency fallback.
        if positions.len() >= self.config.required_frequency {
            Classification::Required
        } else {
            Classification::Preferred
        }
    }

    /// ±`radius` chars around the occurrence, clipped to the enclosing
    /// sentence so an indicator for one requirement list never bleeds into
    /// the next ("Required: Python. Nice to have: Terraform.").
    fn context_window(text: &str, pos: usize, term_len: usize, radius: usize) -> &str {
        let start = pos.saturating_sub(radius);
        let end = (pos + term_len + radius).min(text.len());
        // Snap to char boundaries.
        let mut start = (0..=start).rev().find(|i| text.is_char_boundary(*i)).unwrap_or(0);
        let mut end = (end..=text.len()).find(|i| text.is_char_boundary(*i)).unwrap_or(text.len());

        if let Some(boundary) = text[start..pos].rfind(['.', '!', '?', '\n', ';']) {
            start += boundary + 1;
        }
        let tail_from = pos + term_len;
        if end > tail_from {
            if let Some(boundary) = text[tail_from..end].find(['.', '!', '?', '\n', ';']) {
                end = tail_from + boundary + 1;
            }
        }
        &text[start..end]
    }

    fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
        let before_ok = start == 0
            || text[..start]
                .chars()
                .next_back()
                .map(|c| !c.is_alphanumeric())
                .unwrap_or(true);
        let after_ok = end == text.len()
            || text[end..]
                .chars()
                .next()
                .map(|c| !c.is_alphanumeric())
                .unwrap_or(true);
        before_ok && after_ok
    }

    /// Default technical-term dictionary.
    fn default_tech_terms() -> Vec<String> {
        vec![
            // Languages
            "rust", "python", "javascript", "typescript", "java", "c++", "c#", "go", "golang",
            "ruby", "php", "swift", "kotlin", "scala", "sql", "r",
            // Web
            "react", "vue", "angular", "svelte", "html", "css", "node.js", "express", "nextjs",
            "graphql", "rest",
            // Infrastructure
            "docker", "kubernetes", "aws", "azure", "gcp", "terraform", "ansible", "jenkins",
            "linux", "git", "cicd", "devops", "microservices", "nginx", "serverless",
            // Data
            "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "kafka", "spark",
            "hadoop", "airflow", "dynamodb", "sqlite", "snowflake",
            // ML
            "machine learning", "deep learning", "tensorflow", "pytorch", "pandas", "numpy",
            "nlp",
            // Practices
            "agile", "scrum", "kanban", "tdd", "unit testing", "selenium", "cypress",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// Default soft-skill dictionary.
    fn default_soft_terms() -> Vec<String> {
        vec![
            "leadership", "communication", "teamwork", "problem solving", "critical thinking",
            "collaboration", "mentoring", "time management", "project management",
            "stakeholder management", "presentation", "negotiation", "adaptability",
            "attention to detail", "analytical",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn default_terms() -> Vec<String> {
        let mut terms = Self::default_tech_terms();
        terms.extend(Self::default_soft_terms());
        terms
    }
}

enum Classification {
    Required,
    Preferred,
}
