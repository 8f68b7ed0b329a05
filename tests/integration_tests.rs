//! Integration tests for the resume scorer

use resume_scorer::analysis::roles::Level;
use resume_scorer::engine::{ScoreRequest, ScoringEngine};
use resume_scorer::input::file_detector::DocumentFormat;
use resume_scorer::input::manager::InputManager;
use resume_scorer::scoring::adaptive::{ModeSelection, ScoringMode};
use resume_scorer::{Config, ResumeScorerError};
use std::path::Path;

fn engine() -> ScoringEngine {
    ScoringEngine::new(Config::default()).unwrap()
}

async fn load_fixture(name: &str) -> (Vec<u8>, DocumentFormat) {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures").join(name);
    manager.load(&path).await.unwrap()
}

#[tokio::test]
async fn test_quality_mode_selected_without_job_description() {
    let (bytes, format) = load_fixture("sample_resume.txt").await;
    let request = ScoreRequest::new("software-engineer", Level::Senior);

    let (facts, result) = engine().parse_and_score(&bytes, format, &request).unwrap();

    assert_eq!(result.mode, ScoringMode::QualityCoach);
    assert!(!result.auto_reject);
    assert_eq!(facts.experience.len(), 2);
    assert_eq!(facts.contact.email.as_deref(), Some("jane.smith@example.com"));
    assert!(facts.skills.iter().any(|s| s == "Python"));
    assert!(result.overall_score > 40, "score {}", result.overall_score);
    assert!(result.overall_score <= 100);
}

#[tokio::test]
async fn test_ats_mode_selected_with_job_description() {
    let (bytes, format) = load_fixture("sample_resume.txt").await;
    let (job_bytes, _) = load_fixture("sample_job.txt").await;
    let job = String::from_utf8(job_bytes).unwrap();

    let request = ScoreRequest::new("software-engineer", Level::Senior).with_job_description(job);
    let (_, result) = engine().parse_and_score(&bytes, format, &request).unwrap();

    assert_eq!(result.mode, ScoringMode::AtsSimulation);
    // The fixture resume covers python/kubernetes/postgresql/docker.
    assert!(!result.auto_reject);
    assert!(result.overall_score >= 60, "score {}", result.overall_score);
}

#[tokio::test]
async fn test_explicit_mode_override_beats_job_presence() {
    let (bytes, format) = load_fixture("sample_resume.txt").await;
    let request = ScoreRequest::new("software-engineer", Level::Senior)
        .with_job_description("Required: Python.")
        .with_mode(ModeSelection::Quality);

    let (_, result) = engine().parse_and_score(&bytes, format, &request).unwrap();
    assert_eq!(result.mode, ScoringMode::QualityCoach);
}

#[tokio::test]
async fn test_markdown_resume_parses_with_style_hints() {
    let (bytes, format) = load_fixture("sample_resume.md").await;
    assert_eq!(format, DocumentFormat::Markdown);

    let request = ScoreRequest::new("frontend-engineer", Level::Mid);
    let (facts, result) = engine().parse_and_score(&bytes, format, &request).unwrap();

    assert_eq!(facts.experience.len(), 2);
    assert_eq!(facts.contact.email.as_deref(), Some("john.doe@example.com"));
    assert!(facts.summary.is_some());
    assert!(result.overall_score > 40, "score {}", result.overall_score);
}

#[tokio::test]
async fn test_job_keyword_classification_scenario() {
    let e = engine();
    let set = e.extract_job_keywords("Required: Python, AWS. Nice to have: Terraform.");

    assert!(set.required.contains("python"));
    assert!(set.required.contains("aws"));
    assert!(set.preferred.contains("terraform"));
    assert!(!set.preferred.contains("python"));
    assert!(!set.required.contains("terraform"));
}

#[tokio::test]
async fn test_rescore_is_idempotent() {
    let (bytes, format) = load_fixture("sample_resume.txt").await;
    let e = engine();
    let request = ScoreRequest::new("software-engineer", Level::Senior);

    let (facts, _) = e.parse_and_score(&bytes, format, &request).unwrap();
    let first = e.rescore(&facts, &request).unwrap();
    let second = e.rescore(&facts, &request).unwrap();

    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[tokio::test]
async fn test_empty_document_is_an_error_not_a_score() {
    let request = ScoreRequest::new("software-engineer", Level::Mid);
    let err = engine()
        .parse_and_score(b"", DocumentFormat::Text, &request)
        .unwrap_err();
    assert!(matches!(err, ResumeScorerError::EmptyDocument));
}

#[tokio::test]
async fn test_short_document_short_circuits_with_critical_issue() {
    let request = ScoreRequest::new("software-engineer", Level::Mid);
    let (_, result) = engine()
        .parse_and_score(
            b"Jane Smith, engineer, ten words is not a resume yet.",
            DocumentFormat::Text,
            &request,
        )
        .unwrap();

    assert_eq!(result.overall_score, 0);
    assert_eq!(result.issues.critical.len(), 1);
    assert!(result.issues.critical[0].contains("too short"));
}

#[tokio::test]
async fn test_unknown_role_rejected_before_parsing() {
    let request = ScoreRequest::new("basket-weaver", Level::Mid);
    let err = engine()
        .parse_and_score(b"whatever", DocumentFormat::Text, &request)
        .unwrap_err();
    assert!(matches!(err, ResumeScorerError::InvalidRoleOrLevel(_)));
}

#[tokio::test]
async fn test_unsupported_extension_rejected() {
    let mut manager = InputManager::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.xyz");
    std::fs::write(&path, b"content").unwrap();

    let err = manager.load(&path).await.unwrap_err();
    assert!(matches!(err, ResumeScorerError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn test_nonexistent_file_rejected() {
    let mut manager = InputManager::new();
    let err = manager
        .load(Path::new("tests/fixtures/nonexistent.txt"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResumeScorerError::InvalidInput(_)));
}

#[tokio::test]
async fn test_input_caching() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let (first, _) = manager.load(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);
    let (second, _) = manager.load(path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);
}

#[test]
fn test_synonym_symmetry_property() {
    use resume_scorer::analysis::matcher::KeywordMatcher;
    use resume_scorer::analysis::synonyms::SynonymTable;

    let config = Config::default().matching;
    let matcher = KeywordMatcher::new(SynonymTable::builtin(), config);

    // For canonical T with variant V: match(T, "...V...") and match(V, "...T...").
    let pairs = [
        ("kubernetes", "k8s"),
        ("machine learning", "ml"),
        ("amazon web services", "aws"),
        ("javascript", "js"),
    ];
    for (canonical, variant) in pairs {
        let text_with_variant = format!("Experience with {} in production", variant);
        let text_with_canonical = format!("Experience with {} in production", canonical);
        assert!(
            matcher.matches(canonical, &text_with_variant),
            "{} should match via variant {}",
            canonical,
            variant
        );
        assert!(
            matcher.matches(variant, &text_with_canonical),
            "{} should match via canonical {}",
            variant,
            canonical
        );
    }
}

#[test]
fn test_match_percentage_invariant() {
    use resume_scorer::analysis::matcher::KeywordMatcher;
    use resume_scorer::analysis::synonyms::SynonymTable;

    let matcher = KeywordMatcher::new(SynonymTable::builtin(), Config::default().matching);
    let text = "Python and Kubernetes in production";

    for keywords in [
        vec![],
        vec!["python".to_string()],
        vec!["python".to_string(), "fortran".to_string()],
        vec!["cobol".to_string(), "fortran".to_string(), "ada".to_string()],
    ] {
        let result = matcher.match_all(keywords.iter(), text);
        let total = result.matched.len() + result.missing.len();
        let expected = if total == 0 {
            100.0
        } else {
            100.0 * result.matched.len() as f32 / total as f32
        };
        assert!((result.percentage - expected).abs() < 1e-4);
    }
}

#[tokio::test]
async fn test_edit_session_cycle() {
    use resume_scorer::storage::{LockStatus, SessionStore};

    let (bytes, format) = load_fixture("sample_resume.txt").await;
    let e = engine();
    let request = ScoreRequest::new("software-engineer", Level::Senior);

    let store = SessionStore::new();
    assert_eq!(store.acquire_lock("session-1", "tab-a"), LockStatus::Acquired);
    store.put("session-1", bytes);

    // First score from the working copy.
    let working = store.get("session-1").unwrap();
    let (_, before) = e.parse_and_score(&working, format, &request).unwrap();

    // An edit replaces the working copy wholesale; last write wins.
    let edited = String::from_utf8(working).unwrap().replace(
        "- Mentored four engineers through promotion to senior roles",
        "- Mentored four engineers through promotion to senior roles\n- Led cost reduction effort cutting infrastructure spend 30% across four product groups",
    );
    store.put("session-1", edited.into_bytes());

    let (_, after) = e
        .parse_and_score(&store.get("session-1").unwrap(), format, &request)
        .unwrap();

    // A second tab is warned, not blocked.
    assert_eq!(
        store.acquire_lock("session-1", "tab-b"),
        LockStatus::HeldBy("tab-a".to_string())
    );

    assert!(after.overall_score >= before.overall_score);
    store.release_lock("session-1", "tab-a");
}

#[tokio::test]
async fn test_report_saving() {
    use resume_scorer::config::OutputFormat;
    use resume_scorer::output::formatter::ReportGenerator;

    let (bytes, format) = load_fixture("sample_resume.txt").await;
    let request = ScoreRequest::new("software-engineer", Level::Senior);
    let (_, result) = engine().parse_and_score(&bytes, format, &request).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.md");
    ReportGenerator::new(false, false)
        .save(&result, &OutputFormat::Markdown, &path)
        .unwrap();

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("# Resume Score Report"));
}
