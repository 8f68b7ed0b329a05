//! Scoring engine facade
//!
//! Wires the pipeline together: parse -> detect sections -> extract facts
//! -> score. Exposes the two operations collaborators call: the
//! upload-time `parse_and_score` and the edit-time `rescore`. Scoring is a
//! pure synchronous computation; the only shared state is the read-only
//! tables built at startup.

use crate::analysis::facts::{FactsExtractor, ResumeFacts};
use crate::analysis::keywords::{KeywordExtractor, KeywordSet};
use crate::analysis::matcher::KeywordMatcher;
use crate::analysis::roles::{Level, RoleKeywordStore};
use crate::analysis::sections::SectionDetector;
use crate::analysis::synonyms::SynonymTable;
use crate::config::Config;
use crate::error::{Result, ResumeScorerError};
use crate::input::file_detector::DocumentFormat;
use crate::parser::{DocumentParser, ParsedDocument};
use crate::scoring::adaptive::{
    AdaptiveScorer, ModeSelection, ScoreResult, ScoringContext, ScoringMode,
};
use log::{info, warn};
use std::time::Instant;

/// One scoring request: who the resume is for and what to judge it against.
#[derive(Debug, Clone)]
pub struct ScoreRequest {
    pub role: String,
    pub level: Level,
    pub job_description: Option<String>,
    pub mode: ModeSelection,
}

impl ScoreRequest {
    pub fn new(role: impl Into<String>, level: Level) -> Self {
        Self {
            role: role.into(),
            level,
            job_description: None,
            mode: ModeSelection::Auto,
        }
    }

    pub fn with_job_description(mut self, job: impl Into<String>) -> Self {
        self.job_description = Some(job.into());
        self
    }

    pub fn with_mode(mut self, mode: ModeSelection) -> Self {
        self.mode = mode;
        self
    }
}

pub struct ScoringEngine {
    config: Config,
    parser: DocumentParser,
    detector: SectionDetector,
    facts: FactsExtractor,
    keywords: KeywordExtractor,
    matcher: KeywordMatcher,
    roles: RoleKeywordStore,
    scorer: AdaptiveScorer,
}

impl ScoringEngine {
    /// Engine with the built-in synonym and role tables.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_tables(config, SynonymTable::builtin(), RoleKeywordStore::builtin())
    }

    /// Engine with injected tables, for fixtures and alternate taxonomies.
    pub fn with_tables(
        config: Config,
        synonyms: SynonymTable,
        roles: RoleKeywordStore,
    ) -> Result<Self> {
        let keywords = KeywordExtractor::new(config.matching.clone())?;
        let matcher = KeywordMatcher::new(synonyms, config.matching.clone());
        let parser = DocumentParser::new(config.parsing.clone());
        let scorer = AdaptiveScorer::new(config.scoring.clone());

        Ok(Self {
            parser,
            detector: SectionDetector::new(),
            facts: FactsExtractor::new(),
            keywords,
            matcher,
            roles,
            scorer,
            config,
        })
    }

    /// Upload-time entry point: bytes in, structured facts and score out.
    pub fn parse_and_score(
        &self,
        bytes: &[u8],
        format: DocumentFormat,
        request: &ScoreRequest,
    ) -> Result<(ResumeFacts, ScoreResult)> {
        let started = Instant::now();

        // Fail fast on unknown role before any parsing work.
        self.roles.profile(&request.role)?;

        let document = self.parser.parse(bytes, format)?;
        info!(
            "parsed document via '{}' with confidence {:.2}",
            document.strategy, document.confidence
        );

        let facts = self.extract_facts(&document);

        let word_count = document.word_count();
        if word_count < self.config.parsing.min_word_count {
            warn!(
                "document has only {} words; returning minimal score",
                word_count
            );
            let mode = request.mode.resolve(request.job_description.is_some());
            let result = ScoreResult::minimal(
                mode,
                format!(
                    "Document contains only {} words; too short to score meaningfully",
                    word_count
                ),
            );
            return Ok((facts, result));
        }

        let result = self.score_facts(&facts, request)?;
        info!(
            "scored resume in {}ms: {} ({})",
            started.elapsed().as_millis(),
            result.overall_score,
            result.mode
        );
        Ok((facts, result))
    }

    /// Edit-time entry point: already-structured facts, no byte parsing.
    pub fn rescore(&self, facts: &ResumeFacts, request: &ScoreRequest) -> Result<ScoreResult> {
        if facts.word_count < self.config.parsing.min_word_count {
            let mode = request.mode.resolve(request.job_description.is_some());
            return Ok(ScoreResult::minimal(
                mode,
                format!(
                    "Document contains only {} words; too short to score meaningfully",
                    facts.word_count
                ),
            ));
        }
        self.score_facts(facts, request)
    }

    /// Extract job-description keywords, if a description was supplied.
    pub fn extract_job_keywords(&self, job_description: &str) -> KeywordSet {
        self.keywords.extract(job_description)
    }

    pub fn roles(&self) -> &RoleKeywordStore {
        &self.roles
    }

    fn extract_facts(&self, document: &ParsedDocument) -> ResumeFacts {
        let sections = self.detector.detect(document);
        info!("detected {} sections", sections.len());
        self.facts.extract(document, &sections)
    }

    fn score_facts(&self, facts: &ResumeFacts, request: &ScoreRequest) -> Result<ScoreResult> {
        let profile = self.roles.profile(&request.role)?;

        let job_keywords = request
            .job_description
            .as_deref()
            .map(|jd| self.keywords.extract(jd));
        if let Some(ks) = &job_keywords {
            if ks.is_empty() {
                warn!("job description yielded no known keywords");
            }
        }

        // Mode is fixed here, once, and never changes mid-call.
        let mode: ScoringMode = request.mode.resolve(request.job_description.is_some());

        let ctx = ScoringContext {
            facts,
            profile,
            level: request.level,
            mode,
            job_keywords: job_keywords.as_ref(),
        };
        Ok(self.scorer.score(&self.matcher, &ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESUME: &str = "\
JANE SMITH
jane.smith@example.com | (555) 123-4567 | Portland, OR

SUMMARY
Senior backend engineer with eight years building Python services on Kubernetes.

EXPERIENCE
Senior Engineer at Acme Corp | Jan 2020 - Present
- Led team of 8 engineers to deliver $2M project ahead of schedule
- Reduced deploy time 60% by automating the release pipeline with Docker
Engineer at Widgets Inc | Jun 2016 - Dec 2019
- Built the billing service handling 50,000 transactions daily
- Migrated 40 services from bare metal to Kubernetes

EDUCATION
BS Computer Science, State University, 2016

SKILLS
Python, Kubernetes, Docker, PostgreSQL, Terraform, AWS
";

    fn engine() -> ScoringEngine {
        ScoringEngine::new(Config::default()).unwrap()
    }

    #[test]
    fn test_parse_and_score_quality_mode() {
        let request = ScoreRequest::new("software-engineer", Level::Senior);
        let (facts, result) = engine()
            .parse_and_score(SAMPLE_RESUME.as_bytes(), DocumentFormat::Text, &request)
            .unwrap();

        assert_eq!(result.mode, ScoringMode::QualityCoach);
        assert_eq!(facts.experience.len(), 2);
        assert!(facts.contact.email.is_some());
        assert!(result.overall_score > 40, "got {}", result.overall_score);
    }

    #[test]
    fn test_parse_and_score_ats_mode_with_job() {
        let request = ScoreRequest::new("software-engineer", Level::Senior)
            .with_job_description("Required: Python, Kubernetes. Nice to have: Terraform.");
        let (_, result) = engine()
            .parse_and_score(SAMPLE_RESUME.as_bytes(), DocumentFormat::Text, &request)
            .unwrap();

        assert_eq!(result.mode, ScoringMode::AtsSimulation);
        assert!(!result.auto_reject);
    }

    #[test]
    fn test_unknown_role_fails_fast() {
        let request = ScoreRequest::new("zeppelin-pilot", Level::Mid);
        let err = engine()
            .parse_and_score(SAMPLE_RESUME.as_bytes(), DocumentFormat::Text, &request)
            .unwrap_err();
        assert!(matches!(err, ResumeScorerError::InvalidRoleOrLevel(_)));
    }

    #[test]
    fn test_short_document_minimal_result() {
        let request = ScoreRequest::new("software-engineer", Level::Mid);
        let (_, result) = engine()
            .parse_and_score(b"Jane Smith, engineer.", DocumentFormat::Text, &request)
            .unwrap();
        assert_eq!(result.overall_score, 0);
        assert!(result.issues.critical[0].contains("too short"));
    }

    #[test]
    fn test_empty_document_errors() {
        let request = ScoreRequest::new("software-engineer", Level::Mid);
        let err = engine()
            .parse_and_score(b"", DocumentFormat::Text, &request)
            .unwrap_err();
        assert!(matches!(err, ResumeScorerError::EmptyDocument));
    }

    #[test]
    fn test_rescore_matches_parse_and_score() {
        let e = engine();
        let request = ScoreRequest::new("software-engineer", Level::Senior);
        let (facts, first) = e
            .parse_and_score(SAMPLE_RESUME.as_bytes(), DocumentFormat::Text, &request)
            .unwrap();
        let second = e.rescore(&facts, &request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rescore_idempotent() {
        let e = engine();
        let request = ScoreRequest::new("software-engineer", Level::Senior);
        let (facts, _) = e
            .parse_and_score(SAMPLE_RESUME.as_bytes(), DocumentFormat::Text, &request)
            .unwrap();
        let a = e.rescore(&facts, &request).unwrap();
        let b = e.rescore(&facts, &request).unwrap();
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }
}
