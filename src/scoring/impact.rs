//! Achievement content scoring: CAR structure, clarity, specificity
//!
//! Band thresholds, verb-tier precedence, and the metric regex order are a
//! literal contract: they directly determine score outputs and must not be
//! reordered.

use crate::analysis::roles::Level;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Category sub-scores for a bullet set. Not independently meaningful
/// outside the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AchievementScore {
    /// CAR-structure strength, 0..=15.
    pub achievement_strength: f32,
    /// Sentence clarity, 0..=10.
    pub clarity: f32,
    /// Technology/metric/action concreteness, 0..=5.
    pub specificity: f32,
}

impl AchievementScore {
    pub fn zero() -> Self {
        Self {
            achievement_strength: 0.0,
            clarity: 0.0,
            specificity: 0.0,
        }
    }

    pub fn total(&self) -> f32 {
        self.achievement_strength + self.clarity + self.specificity
    }
}

pub const ACHIEVEMENT_CAP: f32 = 15.0;
pub const CLARITY_CAP: f32 = 10.0;
pub const SPECIFICITY_CAP: f32 = 5.0;
/// Full content budget; summaries rescale clarity/specificity to fill it.
pub const CONTENT_CAP: f32 = 30.0;

/// Word-count bands for the length-fit score, per section shape.
#[derive(Debug, Clone, Copy)]
pub enum SectionShape {
    ExperienceBullets,
    Summary,
}

impl SectionShape {
    /// (optimal, tolerance, outer) inclusive word-count bands.
    fn length_bands(&self) -> ((usize, usize), (usize, usize), (usize, usize)) {
        match self {
            SectionShape::ExperienceBullets => ((15, 25), (10, 35), (5, 45)),
            SectionShape::Summary => ((12, 30), (8, 40), (4, 55)),
        }
    }
}

// Leading two-word phrases that always classify as tier 0, checked before
// single-verb lookup.
const TIER0_PHRASES: &[&str] = &[
    "responsible for",
    "duties included",
    "tasked with",
    "accountable for",
    "in charge",
    "worked on",
];

const TIER1_VERBS: &[&str] = &[
    "supported", "maintained", "updated", "handled", "contributed", "coordinated", "prepared",
    "monitored", "documented", "assisted", "helped", "participated", "performed", "provided",
];

const TIER2_VERBS: &[&str] = &[
    "built", "developed", "implemented", "created", "designed", "wrote", "launched", "delivered",
    "automated", "migrated", "deployed", "integrated", "analyzed", "tested", "configured",
    "optimized", "refactored", "reduced", "improved", "increased", "shipped", "streamlined",
];

const TIER3_VERBS: &[&str] = &[
    "led", "managed", "directed", "drove", "owned", "spearheaded", "mentored", "coached",
    "oversaw", "orchestrated", "headed", "established", "championed",
];

const TIER4_VERBS: &[&str] = &[
    "transformed", "pioneered", "revolutionized", "founded", "architected", "scaled",
    "modernized", "reinvented", "overhauled",
];

const CONTEXT_CONNECTORS: &[&str] = &[
    "for", "across", "managing", "given", "within", "during", "spanning", "serving",
    "on behalf of", "in support of",
];

const CAUSALITY_CONNECTORS: &[&str] = &[
    "by", "through", "resulting in", "leading to", "which led to", "driving", "enabling",
    "thereby", "yielding",
];

const VAGUE_MAGNITUDE_WORDS: &[&str] = &[
    "significantly", "substantially", "greatly", "dramatically", "considerably", "massively",
    "vastly", "hugely",
];

const GENERIC_TECH_WORDS: &[&str] = &[
    "database", "databases", "programming", "framework", "frameworks", "tools", "tooling",
    "technologies", "software", "systems", "platforms", "scripting", "cloud",
];

const CONCRETE_TECH_WORDS: &[&str] = &[
    "rust", "python", "java", "javascript", "typescript", "go", "kotlin", "swift", "sql",
    "react", "angular", "vue", "django", "rails", "spring", "kubernetes", "docker",
    "terraform", "postgresql", "mysql", "mongodb", "redis", "kafka", "spark", "airflow",
    "aws", "azure", "gcp", "linux", "graphql", "grpc", "tensorflow", "pytorch",
];

const GENERIC_VERBS: &[&str] = &["did", "made", "used", "worked", "helped", "handled", "got"];

/// Weak-phrase categories for the clarity deduction, one point each.
const WEAK_PHRASE_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "responsibility",
        &["responsible for", "duties included", "tasked with", "accountable for"],
    ),
    (
        "vague-action",
        &["worked on", "helped with", "involved in", "assisted with", "participated in"],
    ),
    (
        "vague-quantifier",
        &["many", "several", "various", "numerous", "a lot of", "multiple"],
    ),
    (
        "filler",
        &["in order to", "as needed", "as required", "and so on", "etc."],
    ),
    (
        "hedged-skill",
        &["familiar with", "exposure to", "basic understanding", "some experience", "working knowledge"],
    ),
];

pub struct ImpactAnalyzer {
    // Ordered metric patterns; precedence is load-bearing (a "$2M" span
    // must count once as currency, not again as a bare number).
    metric_patterns: Vec<Regex>,
    passive_voice: Regex,
    word_splitter: Regex,
}

impl ImpactAnalyzer {
    pub fn new() -> Self {
        let metric_patterns = vec![
            // 1. Percentages: 40%, 3.5 percent
            Regex::new(r"\d+(?:\.\d+)?\s*(?:%|percent)").expect("Invalid percent regex"),
            // 2. Currency: $2M, €50k, $1,200
            Regex::new(r"(?i)[$\u{20AC}\u{00A3}]\s?\d[\d,.]*\s*(?:k|m|b|mm|million|billion|thousand)?\b")
                .expect("Invalid currency regex"),
            // 3. Multipliers: 3x, 2.5X
            Regex::new(r"(?i)\b\d+(?:\.\d+)?x\b").expect("Invalid multiplier regex"),
            // 4. Time spans: 6 months, 40 hours
            Regex::new(r"(?i)\b\d+\+?\s*(?:seconds?|minutes?|hours?|days?|weeks?|months?|years?|quarters?)\b")
                .expect("Invalid timespan regex"),
            // 5. Bare counts: team of 8, 120 services
            Regex::new(r"\b\d[\d,]*\+?\b").expect("Invalid count regex"),
        ];

        let passive_voice = Regex::new(
            r"(?i)\b(?:was|were|being|been|has\s+been|have\s+been|had\s+been)\s+[a-z]+(?:ed|en|wn)\b",
        )
        .expect("Invalid passive regex");

        let word_splitter = Regex::new(r"[^a-zA-Z0-9$%+./\u{20AC}\u{00A3}#-]+").expect("Invalid splitter");

        Self {
            metric_patterns,
            passive_voice,
            word_splitter,
        }
    }

    /// Score a set of achievement bullets for a claimed level.
    pub fn score_achievements(&self, bullets: &[String], level: Level) -> AchievementScore {
        if bullets.is_empty() {
            return AchievementScore::zero();
        }

        let strength_sum: f32 = bullets
            .iter()
            .map(|b| self.score_bullet(b, level))
            .sum();
        let achievement_strength = (strength_sum / bullets.len() as f32).min(ACHIEVEMENT_CAP);

        let clarity = self.clarity(bullets, SectionShape::ExperienceBullets);
        let specificity = self.specificity(&bullets.join(". "));

        AchievementScore {
            achievement_strength,
            clarity,
            specificity,
        }
    }

    /// Summary sections are narrative, not task bullets: skip achievement
    /// strength and rescale clarity/specificity over the full content
    /// budget (clarity ×1.8 + specificity ×2.4, capped at 30).
    pub fn score_summary(&self, text: &str) -> f32 {
        let sentences: Vec<String> = split_sentences(text);
        if sentences.is_empty() {
            return 0.0;
        }
        let clarity = self.clarity(&sentences, SectionShape::Summary);
        let specificity = self.specificity(text);
        (clarity * 1.8 + specificity * 2.4).min(CONTENT_CAP)
    }

    fn score_bullet(&self, bullet: &str, level: Level) -> f32 {
        let lowered = bullet.to_lowercase();
        let context = contains_phrase(&lowered, CONTEXT_CONNECTORS);
        let causality = contains_phrase(&lowered, CAUSALITY_CONNECTORS);
        let action = self.action_tier(&lowered);
        let metrics = self.count_metrics(bullet);

        // Bands: apply the highest one that matches.
        let band = if context && action >= 3 && metrics >= 2 && causality {
            14.5
        } else if action >= 3 && metrics >= 1 {
            12.0
        } else if action >= 2 && (metrics >= 1 || context) {
            9.0
        } else if action >= 1 {
            5.0
        } else {
            1.0
        };

        band * level_multiplier(level, action)
    }

    /// Classify the leading verb (or 2-word leading phrase) into tiers
    /// 0..=4. Unknown verbs default to tier 1.
    pub fn action_tier(&self, lowered_bullet: &str) -> u8 {
        let words: Vec<&str> = self
            .word_splitter
            .split(lowered_bullet.trim())
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return 0;
        }

        if words.len() >= 2 {
            let leading_pair = format!("{} {}", words[0], words[1]);
            if TIER0_PHRASES.contains(&leading_pair.as_str()) {
                return 0;
            }
        }

        let first = words[0];
        if TIER4_VERBS.contains(&first) {
            4
        } else if TIER3_VERBS.contains(&first) {
            3
        } else if TIER2_VERBS.contains(&first) {
            2
        } else if TIER1_VERBS.contains(&first) {
            1
        } else {
            1
        }
    }

    /// Count quantity mentions, honoring pattern precedence: a span claimed
    /// by an earlier pattern is invisible to later ones.
    pub fn count_metrics(&self, text: &str) -> usize {
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        for pattern in &self.metric_patterns {
            for m in pattern.find_iter(text) {
                let span = (m.start(), m.end());
                let overlaps = claimed
                    .iter()
                    .any(|(s, e)| span.0 < *e && *s < span.1);
                if !overlaps {
                    claimed.push(span);
                }
            }
        }
        claimed.len()
    }

    /// Clarity 0..=10: length fit (0-3) + weak-phrase budget (0-4) +
    /// active-voice score (0-3).
    fn clarity(&self, sentences: &[String], shape: SectionShape) -> f32 {
        let length = self.length_fit(sentences, shape);
        let weak = self.weak_phrase_score(&sentences.join(" "));
        let voice = self.active_voice_score(sentences);
        (length + weak + voice).min(CLARITY_CAP)
    }

    fn length_fit(&self, sentences: &[String], shape: SectionShape) -> f32 {
        if sentences.is_empty() {
            return 0.0;
        }
        let (optimal, tolerance, outer) = shape.length_bands();
        let total: f32 = sentences
            .iter()
            .map(|s| {
                let words = s.split_whitespace().count();
                if (optimal.0..=optimal.1).contains(&words) {
                    3.0
                } else if (tolerance.0..=tolerance.1).contains(&words) {
                    2.0
                } else if (outer.0..=outer.1).contains(&words) {
                    1.0
                } else {
                    0.0
                }
            })
            .sum();
        total / sentences.len() as f32
    }

    /// Start from 4 and deduct one point per weak-phrase category present.
    fn weak_phrase_score(&self, text: &str) -> f32 {
        let lowered = text.to_lowercase();
        let mut score: f32 = 4.0;
        for (_, phrases) in WEAK_PHRASE_CATEGORIES {
            if contains_phrase(&lowered, phrases) {
                score -= 1.0;
            }
        }
        score.max(0.0)
    }

    fn active_voice_score(&self, sentences: &[String]) -> f32 {
        if sentences.is_empty() {
            return 0.0;
        }
        let passive = sentences
            .iter()
            .filter(|s| self.passive_voice.is_match(s))
            .count();
        let active_ratio = 1.0 - passive as f32 / sentences.len() as f32;
        if active_ratio >= 0.90 {
            3.0
        } else if active_ratio >= 0.75 {
            2.0
        } else if active_ratio >= 0.60 {
            1.0
        } else {
            0.0
        }
    }

    /// Specificity 0..=5: technology (0-2) + metric (0-2) + action (0-1).
    fn specificity(&self, text: &str) -> f32 {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = self
            .word_splitter
            .split(&lowered)
            .filter(|w| !w.is_empty())
            .collect();

        let concrete_tech = words
            .iter()
            .filter(|w| CONCRETE_TECH_WORDS.contains(&w.trim_matches('.')))
            .count();
        let generic_tech = words
            .iter()
            .filter(|w| GENERIC_TECH_WORDS.contains(w))
            .count();

        let tech_score: f32 = if concrete_tech + generic_tech == 0 {
            1.0 // neutral when technology is never mentioned
        } else {
            let ratio = concrete_tech as f32 / (concrete_tech + generic_tech) as f32;
            if ratio >= 0.8 {
                2.0
            } else if ratio >= 0.5 {
                1.0
            } else {
                0.0
            }
        };

        let metrics = self.count_metrics(text);
        let vague = words
            .iter()
            .filter(|w| VAGUE_MAGNITUDE_WORDS.contains(w))
            .count();
        let metric_score = if metrics >= 3 && vague == 0 {
            2.0
        } else if metrics >= 1 && vague <= 1 {
            1.0
        } else {
            0.0
        };

        let concrete_verbs = words
            .iter()
            .filter(|w| {
                TIER2_VERBS.contains(w) || TIER3_VERBS.contains(w) || TIER4_VERBS.contains(w)
            })
            .count();
        let generic_verbs = words.iter().filter(|w| GENERIC_VERBS.contains(w)).count();
        let action_score = if concrete_verbs > 0 && concrete_verbs >= generic_verbs {
            1.0
        } else {
            0.0
        };

        (tech_score + metric_score + action_score).min(SPECIFICITY_CAP)
    }
}

impl Default for ImpactAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Level-adjustment multiplier for a bullet's action tier.
fn level_multiplier(level: Level, tier: u8) -> f32 {
    match level {
        Level::Entry => {
            if tier >= 1 {
                1.0
            } else {
                0.8
            }
        }
        Level::Mid => {
            if tier >= 2 {
                1.0
            } else {
                0.85
            }
        }
        Level::Senior | Level::Lead => {
            if tier >= 3 {
                1.0
            } else if tier == 2 {
                0.9
            } else {
                0.6
            }
        }
    }
}

fn contains_phrase(lowered: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| {
        lowered
            .match_indices(p)
            .any(|(idx, _)| on_word_edges(lowered, idx, idx + p.len()))
    })
}

fn on_word_edges(text: &str, start: usize, end: usize) -> bool {
    let before = start == 0
        || text[..start]
            .chars()
            .next_back()
            .map(|c| !c.is_alphanumeric())
            .unwrap_or(true);
    let after = end == text.len()
        || text[end..]
            .chars()
            .next()
            .map(|c| !c.is_alphanumeric())
            .unwrap_or(true);
    before && after
}

pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| s.split_whitespace().count() >= 2)
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> ImpactAnalyzer {
        ImpactAnalyzer::new()
    }

    #[test]
    fn test_strong_leadership_bullet_hits_high_band() {
        let bullet =
            "Led team of 8 engineers to deliver $2M project ahead of schedule".to_string();
        let score = analyzer().score_achievements(&[bullet], Level::Senior);
        assert!(
            score.achievement_strength >= 12.0,
            "got {}",
            score.achievement_strength
        );
    }

    #[test]
    fn test_duty_phrase_bullet_scores_bottom_band() {
        let bullet = "Responsible for product management".to_string();
        let score = analyzer().score_achievements(&[bullet], Level::Mid);
        assert!(
            score.achievement_strength <= 2.0,
            "got {}",
            score.achievement_strength
        );
    }

    #[test]
    fn test_full_car_bullet_hits_top_band() {
        let a = analyzer();
        let bullet = "Led replatforming for 40 product teams, cutting costs 35% and saving $1.2M by consolidating infrastructure";
        let lowered = bullet.to_lowercase();
        assert!(a.action_tier(&lowered) >= 3);
        assert!(a.count_metrics(bullet) >= 2);
        let score = a.score_bullet(bullet, Level::Senior);
        assert!((score - 14.5).abs() < 1e-6, "got {}", score);
    }

    #[test]
    fn test_unknown_verb_defaults_to_tier_one() {
        assert_eq!(analyzer().action_tier("defenestrated the legacy stack"), 1);
    }

    #[test]
    fn test_tier_phrases_beat_single_verbs() {
        // "worked" alone would be unknown; the two-word phrase pins tier 0.
        assert_eq!(analyzer().action_tier("worked on internal tooling"), 0);
        assert_eq!(analyzer().action_tier("led the platform group"), 3);
        assert_eq!(analyzer().action_tier("architected the event bus"), 4);
    }

    #[test]
    fn test_metric_counting_no_double_claim() {
        let a = analyzer();
        // "$2M" is currency only; "40%" is a percentage only.
        assert_eq!(a.count_metrics("Saved $2M, a 40% reduction"), 2);
        assert_eq!(a.count_metrics("Handled things smoothly"), 0);
        assert_eq!(a.count_metrics("Cut build time from 45 minutes to 9 minutes"), 2);
    }

    #[test]
    fn test_level_multipliers() {
        assert_eq!(level_multiplier(Level::Entry, 0), 0.8);
        assert_eq!(level_multiplier(Level::Entry, 1), 1.0);
        assert_eq!(level_multiplier(Level::Mid, 1), 0.85);
        assert_eq!(level_multiplier(Level::Senior, 2), 0.9);
        assert_eq!(level_multiplier(Level::Senior, 1), 0.6);
        assert_eq!(level_multiplier(Level::Lead, 4), 1.0);
    }

    #[test]
    fn test_achievement_strength_capped() {
        let bullets: Vec<String> = (0..4)
            .map(|_| {
                "Led migration for 12 teams, raising uptime 99.9% and saving $3M by retiring legacy clusters".to_string()
            })
            .collect();
        let score = analyzer().score_achievements(&bullets, Level::Senior);
        assert!(score.achievement_strength <= ACHIEVEMENT_CAP);
        assert!(score.clarity <= CLARITY_CAP);
        assert!(score.specificity <= SPECIFICITY_CAP);
    }

    #[test]
    fn test_weak_phrases_drain_clarity_budget() {
        let a = analyzer();
        assert_eq!(a.weak_phrase_score("shipped the payments rewrite"), 4.0);
        let weak = "Responsible for various tasks, worked on many things as needed, familiar with testing";
        assert!(a.weak_phrase_score(weak) <= 1.0);
    }

    #[test]
    fn test_passive_voice_detection() {
        let a = analyzer();
        let passive = vec!["The service was deployed by the team".to_string()];
        let active = vec!["Deployed the service to production".to_string()];
        assert_eq!(a.active_voice_score(&passive), 0.0);
        assert_eq!(a.active_voice_score(&active), 3.0);
    }

    #[test]
    fn test_summary_scoring_skips_achievement_strength() {
        let a = analyzer();
        let summary = "Backend engineer with eight years building Rust and Python services. \
                       Shipped three order-of-magnitude scaling efforts across Kubernetes platforms. \
                       Focused on reliability, 99.95% uptime, and measurable cost reduction.";
        let score = a.score_summary(summary);
        assert!(score > 10.0, "got {}", score);
        assert!(score <= CONTENT_CAP);
    }

    #[test]
    fn test_empty_bullets_score_zero() {
        let score = analyzer().score_achievements(&[], Level::Mid);
        assert_eq!(score.total(), 0.0);
    }
}
