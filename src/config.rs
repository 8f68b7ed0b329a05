//! Configuration management for the resume scorer

use crate::error::{Result, ResumeScorerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub parsing: ParsingConfig,
    pub matching: MatchingConfig,
    pub scoring: ScoringConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsingConfig {
    /// Quality score at which a strategy's output is accepted outright.
    pub accept_confidence: f32,
    /// Best-effort results below this floor fail as unreadable.
    pub floor_confidence: f32,
    /// Documents with fewer words short-circuit to a minimal score.
    pub min_word_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Jaro-Winkler similarity required for a fuzzy keyword match.
    pub fuzzy_threshold: f32,
    /// Occurrences at which an unindicated term classifies as required.
    pub required_frequency: usize,
    /// Context window (chars each side) for indicator-phrase lookup.
    pub context_window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub ats: AtsWeights,
    pub quality: QualityWeights,
    /// Required-keyword match percentage below which ATS mode flags auto-reject.
    pub auto_reject_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsWeights {
    pub required_keywords: f32,
    pub preferred_keywords: f32,
    pub format_compliance: f32,
    pub structural_completeness: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityWeights {
    pub role_keywords: f32,
    pub content_quality: f32,
    pub format_compliance: f32,
    pub professional_polish: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

/// Advisory-lock timeout for edit sessions, in seconds.
pub const SESSION_LOCK_TIMEOUT_SECS: u64 = 300;

impl Default for Config {
    fn default() -> Self {
        Self {
            parsing: ParsingConfig {
                accept_confidence: 0.7,
                floor_confidence: 0.3,
                min_word_count: 50,
            },
            matching: MatchingConfig {
                fuzzy_threshold: 0.8,
                required_frequency: 3,
                context_window: 50,
            },
            scoring: ScoringConfig {
                ats: AtsWeights {
                    required_keywords: 0.5,
                    preferred_keywords: 0.2,
                    format_compliance: 0.2,
                    structural_completeness: 0.1,
                },
                quality: QualityWeights {
                    role_keywords: 0.25,
                    content_quality: 0.30,
                    format_compliance: 0.25,
                    professional_polish: 0.20,
                },
                auto_reject_threshold: 60.0,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeScorerError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeScorerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-scorer")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let config = Config::default();
        let ats = &config.scoring.ats;
        let ats_total = ats.required_keywords
            + ats.preferred_keywords
            + ats.format_compliance
            + ats.structural_completeness;
        assert!((ats_total - 1.0).abs() < 1e-6);

        let q = &config.scoring.quality;
        let q_total =
            q.role_keywords + q.content_quality + q.format_compliance + q.professional_polish;
        assert!((q_total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.matching.required_frequency, 3);
        assert!((parsed.matching.fuzzy_threshold - 0.8).abs() < 1e-6);
    }
}
