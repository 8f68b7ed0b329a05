//! Role and level taxonomy
//!
//! Read-only lookup of role-typical keywords and expectations, keyed by a
//! role identifier. Built once at startup; scoring fails fast on unknown
//! role or level keys instead of substituting a default.

use crate::error::{Result, ResumeScorerError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Entry,
    Mid,
    Senior,
    Lead,
}

impl Level {
    /// Minimum expected total experience in years for a claimed level.
    pub fn min_expected_years(&self) -> f32 {
        match self {
            Level::Entry => 0.0,
            Level::Mid => 2.0,
            Level::Senior => 5.0,
            Level::Lead => 8.0,
        }
    }

    pub fn all() -> &'static [Level] {
        &[Level::Entry, Level::Mid, Level::Senior, Level::Lead]
    }
}

impl FromStr for Level {
    type Err = ResumeScorerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "entry" | "junior" => Ok(Level::Entry),
            "mid" | "intermediate" => Ok(Level::Mid),
            "senior" => Ok(Level::Senior),
            "lead" | "principal" | "staff" => Ok(Level::Lead),
            other => Err(ResumeScorerError::InvalidRoleOrLevel(format!(
                "level '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Entry => write!(f, "entry"),
            Level::Mid => write!(f, "mid"),
            Level::Senior => write!(f, "senior"),
            Level::Lead => write!(f, "lead"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleProfile {
    pub id: String,
    pub display_name: String,
    /// Keywords a resume for this role typically shows, per level.
    pub typical_keywords: BTreeMap<Level, Vec<String>>,
}

impl RoleProfile {
    /// Keywords expected at `level`: the union of every level up to and
    /// including the claimed one.
    pub fn keywords_for(&self, level: Level) -> Vec<String> {
        let mut keywords: Vec<String> = self
            .typical_keywords
            .iter()
            .filter(|(l, _)| **l <= level)
            .flat_map(|(_, ks)| ks.iter().cloned())
            .collect();
        keywords.sort();
        keywords.dedup();
        keywords
    }
}

#[derive(Debug, Clone)]
pub struct RoleKeywordStore {
    profiles: BTreeMap<String, RoleProfile>,
}

impl RoleKeywordStore {
    pub fn from_profiles(profiles: Vec<RoleProfile>) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn profile(&self, role: &str) -> Result<&RoleProfile> {
        self.profiles
            .get(&role.to_lowercase())
            .ok_or_else(|| ResumeScorerError::InvalidRoleOrLevel(format!("role '{}'", role)))
    }

    pub fn role_ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn builtin() -> Self {
        fn profile(
            id: &str,
            display_name: &str,
            levels: Vec<(Level, Vec<&str>)>,
        ) -> RoleProfile {
            RoleProfile {
                id: id.to_string(),
                display_name: display_name.to_string(),
                typical_keywords: levels
                    .into_iter()
                    .map(|(l, ks)| (l, ks.into_iter().map(String::from).collect()))
                    .collect(),
            }
        }

        Self::from_profiles(vec![
            profile(
                "software-engineer",
                "Software Engineer",
                vec![
                    (Level::Entry, vec!["git", "sql", "unit testing", "agile", "rest"]),
                    (Level::Mid, vec!["docker", "cicd", "microservices", "code review"]),
                    (Level::Senior, vec!["system design", "mentoring", "kubernetes", "architecture"]),
                    (Level::Lead, vec!["technical leadership", "roadmap", "cross-functional"]),
                ],
            ),
            profile(
                "frontend-engineer",
                "Frontend Engineer",
                vec![
                    (Level::Entry, vec!["html", "css", "javascript", "git"]),
                    (Level::Mid, vec!["react", "typescript", "accessibility", "testing"]),
                    (Level::Senior, vec!["performance", "design systems", "architecture", "mentoring"]),
                    (Level::Lead, vec!["technical leadership", "roadmap"]),
                ],
            ),
            profile(
                "data-scientist",
                "Data Scientist",
                vec![
                    (Level::Entry, vec!["python", "sql", "pandas", "statistics"]),
                    (Level::Mid, vec!["machine learning", "experimentation", "visualization"]),
                    (Level::Senior, vec!["deep learning", "pipelines", "mentoring", "mlops"]),
                    (Level::Lead, vec!["strategy", "stakeholder management"]),
                ],
            ),
            profile(
                "devops-engineer",
                "DevOps Engineer",
                vec![
                    (Level::Entry, vec!["linux", "git", "scripting", "docker"]),
                    (Level::Mid, vec!["kubernetes", "terraform", "cicd", "monitoring"]),
                    (Level::Senior, vec!["aws", "incident response", "capacity planning", "mentoring"]),
                    (Level::Lead, vec!["platform strategy", "cost optimization"]),
                ],
            ),
            profile(
                "product-manager",
                "Product Manager",
                vec![
                    (Level::Entry, vec!["roadmap", "user research", "agile", "analytics"]),
                    (Level::Mid, vec!["stakeholder management", "prioritization", "experimentation"]),
                    (Level::Senior, vec!["strategy", "go-to-market", "mentoring"]),
                    (Level::Lead, vec!["vision", "portfolio management"]),
                ],
            ),
        ])
    }
}
