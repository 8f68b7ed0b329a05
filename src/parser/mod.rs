//! Multi-strategy document parsing with a confidence gate
//!
//! Parsing resume uploads is inherently uncertain: mixed fonts, tables,
//! scanned pages, encryption. No single extraction library is trusted
//! unconditionally. Each format carries an ordered list of strategies; the
//! first whose output clears the acceptance confidence wins, otherwise the
//! best-scoring attempt is returned with its lower confidence annotated.

pub mod quality;
pub mod strategies;

use crate::config::ParsingConfig;
use crate::error::{Result, ResumeScorerError};
use crate::input::file_detector::DocumentFormat;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleHint {
    None,
    Heading,
}

/// A logical paragraph with the structural hints the extractor could recover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub is_bold: bool,
    pub font_size_pt: Option<f32>,
    pub style_hint: StyleHint,
}

impl Paragraph {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_bold: false,
            font_size_pt: None,
            style_hint: StyleHint::None,
        }
    }

    pub fn heading(text: impl Into<String>, font_size_pt: Option<f32>) -> Self {
        Self {
            text: text.into(),
            is_bold: true,
            font_size_pt,
            style_hint: StyleHint::Heading,
        }
    }
}

/// Immutable result of a successful extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub paragraphs: Vec<Paragraph>,
    /// Quality confidence in [0, 1] reported by the accepting strategy.
    pub confidence: f32,
    /// Name of the strategy that produced this result.
    pub strategy: String,
}

impl ParsedDocument {
    pub fn word_count(&self) -> usize {
        self.paragraphs
            .iter()
            .map(|p| p.text.split_whitespace().count())
            .sum()
    }

    pub fn full_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct DocumentParser {
    config: ParsingConfig,
}

impl DocumentParser {
    pub fn new(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Run the strategy chain for `format` over `bytes`.
    pub fn parse(&self, bytes: &[u8], format: DocumentFormat) -> Result<ParsedDocument> {
        if format == DocumentFormat::Pdf && strategies::is_encrypted_pdf(bytes) {
            return Err(ResumeScorerError::ProtectedDocument(
                "PDF carries an /Encrypt dictionary".to_string(),
            ));
        }

        let chain = strategies::for_format(format);
        if chain.is_empty() {
            return Err(ResumeScorerError::UnsupportedFormat(format.to_string()));
        }

        let mut best: Option<(Vec<Paragraph>, f32, &'static str)> = None;
        let mut last_error: Option<String> = None;

        for strategy in &chain {
            match strategy.extract(bytes) {
                Ok(paragraphs) => {
                    let score = quality::evaluate(&paragraphs);
                    debug!(
                        "strategy '{}' extracted {} paragraphs, quality {:.2}",
                        strategy.name(),
                        paragraphs.len(),
                        score
                    );

                    if score >= self.config.accept_confidence {
                        return Ok(ParsedDocument {
                            paragraphs,
                            confidence: score,
                            strategy: strategy.name().to_string(),
                        });
                    }

                    let better = best.as_ref().map(|(_, s, _)| score > *s).unwrap_or(true);
                    if better {
                        best = Some((paragraphs, score, strategy.name()));
                    }
                }
                Err(e) => {
                    debug!("strategy '{}' failed: {}", strategy.name(), e);
                    last_error = Some(format!("{}: {}", strategy.name(), e));
                }
            }
        }

        match best {
            Some((paragraphs, score, name)) => {
                let doc = ParsedDocument {
                    paragraphs,
                    confidence: score,
                    strategy: name.to_string(),
                };
                if doc.word_count() == 0 {
                    return Err(ResumeScorerError::EmptyDocument);
                }
                if score < self.config.floor_confidence {
                    return Err(ResumeScorerError::UnreadableDocument(format!(
                        "best strategy '{}' scored {:.2}, below the confidence floor {:.2}",
                        name, score, self.config.floor_confidence
                    )));
                }
                warn!(
                    "accepting low-confidence extraction from '{}' ({:.2})",
                    name, score
                );
                Ok(doc)
            }
            None => Err(ResumeScorerError::UnreadableDocument(
                last_error.unwrap_or_else(|| "all extraction strategies failed".to_string()),
            )),
        }
    }
}
