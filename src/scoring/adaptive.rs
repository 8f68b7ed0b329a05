//! Adaptive scoring: ATS simulation vs quality coaching
//!
//! The mode is a sealed enum selected exactly once per scoring call, at the
//! orchestration boundary, and never transitioned mid-call. Each mode is a
//! near-disjoint weighting over the shared sub-scores.

use crate::analysis::facts::ResumeFacts;
use crate::analysis::keywords::KeywordSet;
use crate::analysis::matcher::{KeywordMatcher, MatchResult};
use crate::analysis::roles::{Level, RoleProfile};
use crate::config::ScoringConfig;
use crate::scoring::impact::{ImpactAnalyzer, CONTENT_CAP};
use crate::scoring::red_flags::{Issue, RedFlagsValidator, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    AtsSimulation,
    QualityCoach,
}

impl std::fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringMode::AtsSimulation => write!(f, "ats_simulation"),
            ScoringMode::QualityCoach => write!(f, "quality_coach"),
        }
    }
}

/// Caller-facing mode request. `Auto` always resolves by job-description
/// presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeSelection {
    Auto,
    Ats,
    Quality,
}

impl ModeSelection {
    pub fn resolve(&self, has_job_description: bool) -> ScoringMode {
        match self {
            ModeSelection::Ats => ScoringMode::AtsSimulation,
            ModeSelection::Quality => ScoringMode::QualityCoach,
            ModeSelection::Auto => {
                if has_job_description {
                    ScoringMode::AtsSimulation
                } else {
                    ScoringMode::QualityCoach
                }
            }
        }
    }
}

impl std::str::FromStr for ModeSelection {
    type Err = crate::error::ResumeScorerError;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ModeSelection::Auto),
            "ats" | "ats_simulation" => Ok(ModeSelection::Ats),
            "quality" | "quality_coach" => Ok(ModeSelection::Quality),
            other => Err(crate::error::ResumeScorerError::InvalidInput(format!(
                "Unknown mode '{}'. Supported: auto, ats, quality",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Normalized sub-score in [0, 1].
    pub score: f32,
    /// Weight of this category in the overall score.
    pub weight: f32,
    /// Category contribution in overall points.
    pub points: f32,
}

impl CategoryScore {
    fn new(score: f32, weight: f32) -> Self {
        let score = score.clamp(0.0, 1.0);
        Self {
            score,
            weight,
            points: score * weight * 100.0,
        }
    }
}

/// Issues grouped by severity, in detection order within each group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueReport {
    pub critical: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl IssueReport {
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        let mut report = Self::default();
        for issue in issues {
            match issue.severity {
                Severity::Critical => report.critical.push(issue.message),
                Severity::Warning => report.warnings.push(issue.message),
                Severity::Suggestion => report.suggestions.push(issue.message),
            }
        }
        report
    }

    pub fn is_empty(&self) -> bool {
        self.critical.is_empty() && self.warnings.is_empty() && self.suggestions.is_empty()
    }
}

/// Final scoring output. Created fresh on every call and never mutated;
/// rescoring produces a new result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub overall_score: u8,
    pub mode: ScoringMode,
    /// ATS mode only: the resume would likely be filtered before review.
    pub auto_reject: bool,
    pub breakdown: BTreeMap<String, CategoryScore>,
    pub issues: IssueReport,
    pub strengths: Vec<String>,
}

impl ScoreResult {
    /// Minimal result for documents too short to score meaningfully.
    pub fn minimal(mode: ScoringMode, critical: impl Into<String>) -> Self {
        Self {
            overall_score: 0,
            mode,
            auto_reject: matches!(mode, ScoringMode::AtsSimulation),
            breakdown: BTreeMap::new(),
            issues: IssueReport {
                critical: vec![critical.into()],
                warnings: Vec::new(),
                suggestions: Vec::new(),
            },
            strengths: Vec::new(),
        }
    }
}

/// Everything one scoring call needs, assembled by the engine.
pub struct ScoringContext<'a> {
    pub facts: &'a ResumeFacts,
    pub profile: &'a RoleProfile,
    pub level: Level,
    pub mode: ScoringMode,
    pub job_keywords: Option<&'a KeywordSet>,
}

pub struct AdaptiveScorer {
    config: ScoringConfig,
    impact: ImpactAnalyzer,
    validator: RedFlagsValidator,
}

impl AdaptiveScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            impact: ImpactAnalyzer::new(),
            validator: RedFlagsValidator::new(),
        }
    }

    /// Pin the validator's "today" for deterministic output.
    pub fn with_validator(mut self, validator: RedFlagsValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn score(&self, matcher: &KeywordMatcher, ctx: &ScoringContext) -> ScoreResult {
        match ctx.mode {
            ScoringMode::AtsSimulation => self.score_ats(matcher, ctx),
            ScoringMode::QualityCoach => self.score_quality(matcher, ctx),
        }
    }

    fn score_ats(&self, matcher: &KeywordMatcher, ctx: &ScoringContext) -> ScoreResult {
        let weights = &self.config.ats;
        let text = searchable_text(ctx.facts);
        let empty = KeywordSet::default();
        let keywords = ctx.job_keywords.unwrap_or(&empty);

        let required = matcher.match_all(keywords.required.iter(), &text);
        let preferred = matcher.match_all(keywords.preferred.iter(), &text);
        let format = format_compliance(ctx.facts);
        let structure = structural_completeness(ctx.facts);

        let mut breakdown = BTreeMap::new();
        breakdown.insert(
            "required_keywords".to_string(),
            CategoryScore::new(required.percentage / 100.0, weights.required_keywords),
        );
        breakdown.insert(
            "preferred_keywords".to_string(),
            CategoryScore::new(preferred.percentage / 100.0, weights.preferred_keywords),
        );
        breakdown.insert(
            "format_compliance".to_string(),
            CategoryScore::new(format, weights.format_compliance),
        );
        breakdown.insert(
            "structural_completeness".to_string(),
            CategoryScore::new(structure, weights.structural_completeness),
        );

        let auto_reject = required.percentage < self.config.auto_reject_threshold;

        let mut issues = self.validator.validate(ctx.facts, ctx.level);
        self.keyword_issues(&required, &preferred, auto_reject, &mut issues);
        self.format_issues(format, structure, &mut issues);

        let strengths = Self::ats_strengths(&required, &preferred, format);

        self.finish(ctx.mode, auto_reject, breakdown, issues, strengths)
    }

    fn score_quality(&self, matcher: &KeywordMatcher, ctx: &ScoringContext) -> ScoreResult {
        let weights = &self.config.quality;
        let text = searchable_text(ctx.facts);

        let role_keywords = ctx.profile.keywords_for(ctx.level);
        let role_match = matcher.match_all(role_keywords.iter(), &text);

        let bullets: Vec<String> = ctx
            .facts
            .experience
            .iter()
            .flat_map(|e| e.bullets.iter().cloned())
            .collect();
        let achievement = self.impact.score_achievements(&bullets, ctx.level);
        let summary_score = ctx
            .facts
            .summary
            .as_deref()
            .map(|s| self.impact.score_summary(s));

        // Bullet content and summary content each normalize over the full
        // 30-point budget; a resume carrying both gets their mean.
        let content = match (bullets.is_empty(), summary_score) {
            (false, Some(s)) => (achievement.total() / CONTENT_CAP + s / CONTENT_CAP) / 2.0,
            (false, None) => achievement.total() / CONTENT_CAP,
            (true, Some(s)) => s / CONTENT_CAP,
            (true, None) => 0.0,
        };

        let format = format_compliance(ctx.facts);

        let mut issues = self.validator.validate(ctx.facts, ctx.level);
        let polish = professional_polish(&issues);

        let mut breakdown = BTreeMap::new();
        breakdown.insert(
            "role_keywords".to_string(),
            CategoryScore::new(role_match.percentage / 100.0, weights.role_keywords),
        );
        breakdown.insert(
            "content_quality".to_string(),
            CategoryScore::new(content, weights.content_quality),
        );
        breakdown.insert(
            "format_compliance".to_string(),
            CategoryScore::new(format, weights.format_compliance),
        );
        breakdown.insert(
            "professional_polish".to_string(),
            CategoryScore::new(polish, weights.professional_polish),
        );

        self.content_issues(&achievement, &bullets, &role_match, &mut issues);
        self.format_issues(format, structural_completeness(ctx.facts), &mut issues);

        let strengths = Self::quality_strengths(&achievement, &role_match, format, &bullets);

        self.finish(ctx.mode, false, breakdown, issues, strengths)
    }

    fn keyword_issues(
        &self,
        required: &MatchResult,
        preferred: &MatchResult,
        auto_reject: bool,
        issues: &mut Vec<Issue>,
    ) {
        if !required.missing.is_empty() {
            let message = format!(
                "Missing required keywords: {}",
                required.missing.join(", ")
            );
            if auto_reject {
                issues.push(Issue::critical(format!(
                    "{}. Below {:.0}% required-keyword coverage, ATS filters would likely reject this resume",
                    message, self.config.auto_reject_threshold
                )));
            } else {
                issues.push(Issue::warning(message));
            }
        }
        if !preferred.missing.is_empty() {
            issues.push(Issue::suggestion(format!(
                "Consider adding preferred keywords: {}",
                preferred.missing.join(", ")
            )));
        }
    }

    fn content_issues(
        &self,
        achievement: &crate::scoring::impact::AchievementScore,
        bullets: &[String],
        role_match: &MatchResult,
        issues: &mut Vec<Issue>,
    ) {
        if bullets.is_empty() {
            issues.push(Issue::warning(
                "No achievement bullets found under experience entries",
            ));
        } else if achievement.achievement_strength < 8.0 {
            issues.push(Issue::suggestion(
                "Strengthen bullets with concrete actions and measurable results \
                 (who/what changed, by how much)",
            ));
        }
        if !bullets.is_empty() && achievement.clarity < 5.0 {
            issues.push(Issue::suggestion(
                "Tighten sentence length, drop weak phrases, and prefer active voice",
            ));
        }
        if !role_match.missing.is_empty() {
            let preview: Vec<_> = role_match.missing.iter().take(5).cloned().collect();
            issues.push(Issue::suggestion(format!(
                "Role-typical keywords not found: {}",
                preview.join(", ")
            )));
        }
    }

    fn format_issues(&self, format: f32, structure: f32, issues: &mut Vec<Issue>) {
        if format < 0.5 {
            issues.push(Issue::warning(
                "Resume structure is hard for ATS software to read \
                 (missing contact details, dates, or bullet lists)",
            ));
        }
        if structure < 0.6 {
            issues.push(Issue::warning(
                "Core sections are missing; recruiters expect experience, \
                 education, and skills at minimum",
            ));
        }
    }

    fn ats_strengths(required: &MatchResult, preferred: &MatchResult, format: f32) -> Vec<String> {
        let mut strengths = Vec::new();
        if required.percentage >= 80.0 && !required.matched.is_empty() {
            strengths.push(format!(
                "Strong required-keyword coverage ({:.0}%)",
                required.percentage
            ));
        }
        if preferred.percentage >= 80.0 && !preferred.matched.is_empty() {
            strengths.push("Covers most preferred qualifications".to_string());
        }
        if format >= 0.8 {
            strengths.push("Clean, ATS-friendly structure".to_string());
        }
        strengths
    }

    fn quality_strengths(
        achievement: &crate::scoring::impact::AchievementScore,
        role_match: &MatchResult,
        format: f32,
        bullets: &[String],
    ) -> Vec<String> {
        let mut strengths = Vec::new();
        if !bullets.is_empty() && achievement.achievement_strength >= 10.0 {
            strengths.push("Achievement bullets show strong context-action-result structure".to_string());
        }
        if achievement.clarity >= 8.0 && !bullets.is_empty() {
            strengths.push("Writing is clear, concise, and active".to_string());
        }
        if role_match.percentage >= 70.0 && !role_match.matched.is_empty() {
            strengths.push("Good coverage of role-typical keywords".to_string());
        }
        if format >= 0.8 {
            strengths.push("Clean, ATS-friendly structure".to_string());
        }
        strengths
    }

    fn finish(
        &self,
        mode: ScoringMode,
        auto_reject: bool,
        breakdown: BTreeMap<String, CategoryScore>,
        issues: Vec<Issue>,
        strengths: Vec<String>,
    ) -> ScoreResult {
        let total: f32 = breakdown.values().map(|c| c.points).sum();
        let overall_score = total.round().clamp(0.0, 100.0) as u8;

        let mut sorted = issues;
        sorted.sort_by_key(|i| i.severity);

        ScoreResult {
            overall_score,
            mode,
            auto_reject,
            breakdown,
            issues: IssueReport::from_issues(sorted),
            strengths,
        }
    }
}

/// The text body keyword matching runs against: skills, titles, bullets,
/// summary, certifications.
pub fn searchable_text(facts: &ResumeFacts) -> String {
    let mut parts: Vec<String> = Vec::new();
    parts.extend(facts.skills.iter().cloned());
    if let Some(summary) = &facts.summary {
        parts.push(summary.clone());
    }
    for entry in &facts.experience {
        parts.push(entry.title.clone());
        parts.push(entry.company.clone());
        parts.extend(entry.bullets.iter().cloned());
    }
    parts.extend(facts.certifications.iter().cloned());
    for edu in &facts.education {
        parts.push(edu.institution.clone());
    }
    parts.join("\n")
}

/// ATS format compliance in [0, 1], computable from facts alone so upload
/// and rescore share one formula.
pub fn format_compliance(facts: &ResumeFacts) -> f32 {
    let mut score = 0.0;
    if facts.contact.email.is_some() {
        score += 0.25;
    }
    if facts.contact.phone.is_some() {
        score += 0.15;
    }
    if !facts.experience.is_empty() {
        score += 0.20;
    }
    let dated = !facts.experience.is_empty()
        && facts
            .experience
            .iter()
            .all(|e| e.start.is_some() && e.end.is_some());
    if dated {
        score += 0.20;
    }
    if facts.experience.iter().any(|e| !e.bullets.is_empty()) {
        score += 0.20;
    }
    score
}

/// Structural completeness in [0, 1]: fraction of the five expected
/// building blocks present.
pub fn structural_completeness(facts: &ResumeFacts) -> f32 {
    let checks = [
        facts.contact.email.is_some() || facts.contact.phone.is_some(),
        !facts.experience.is_empty(),
        !facts.education.is_empty(),
        !facts.skills.is_empty(),
        facts.summary.is_some(),
    ];
    checks.iter().filter(|c| **c).count() as f32 / checks.len() as f32
}

/// Professional polish in [0, 1], derived from red-flag pressure.
fn professional_polish(issues: &[Issue]) -> f32 {
    let critical = issues.iter().filter(|i| i.severity == Severity::Critical).count();
    let warnings = issues.iter().filter(|i| i.severity == Severity::Warning).count();
    (1.0 - 0.25 * critical as f32 - 0.10 * warnings as f32).max(0.0)
}
