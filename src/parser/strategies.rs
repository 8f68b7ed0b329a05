//! Extraction strategies for each supported document format

use crate::error::{Result, ResumeScorerError};
use crate::input::file_detector::DocumentFormat;
use crate::parser::Paragraph;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};

pub trait ExtractionStrategy {
    fn name(&self) -> &'static str;
    fn extract(&self, bytes: &[u8]) -> Result<Vec<Paragraph>>;
}

/// Ordered strategy chain for a declared format. Order is part of the
/// parser contract: earlier strategies are preferred when they clear the
/// acceptance confidence.
pub fn for_format(format: DocumentFormat) -> Vec<Box<dyn ExtractionStrategy>> {
    match format {
        DocumentFormat::Pdf => vec![
            Box::new(PdfExtractStrategy),
            Box::new(LopdfStrategy),
            Box::new(TableReflowStrategy),
        ],
        DocumentFormat::Markdown => vec![Box::new(MarkdownStrategy)],
        DocumentFormat::Text => vec![Box::new(PlainTextStrategy)],
        DocumentFormat::Unknown => Vec::new(),
    }
}

/// Cheap pre-flight check for password protection. An /Encrypt entry in the
/// trailer means the content streams are ciphered and no text strategy can
/// succeed.
pub fn is_encrypted_pdf(bytes: &[u8]) -> bool {
    bytes.windows(8).any(|w| w == b"/Encrypt")
}

fn lines_to_paragraphs(text: &str) -> Vec<Paragraph> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(Paragraph::plain)
        .collect()
}

/// Primary PDF extraction via `pdf-extract`.
pub struct PdfExtractStrategy;

impl ExtractionStrategy for PdfExtractStrategy {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract(&self, bytes: &[u8]) -> Result<Vec<Paragraph>> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ResumeScorerError::Processing(format!("pdf-extract failed: {}", e)))?;

        // pdf-extract inserts form feeds between pages; flatten them into
        // ordinary line breaks before splitting.
        Ok(lines_to_paragraphs(&text.replace('\x0C', "\n")))
    }
}

/// Secondary PDF extraction via `lopdf` content streams.
pub struct LopdfStrategy;

impl LopdfStrategy {
    fn page_text(bytes: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| ResumeScorerError::Processing(format!("lopdf load failed: {}", e)))?;

        let mut out = String::new();
        for page_number in doc.get_pages().keys() {
            let text = doc
                .extract_text(&[*page_number])
                .map_err(|e| ResumeScorerError::Processing(format!("lopdf page {}: {}", page_number, e)))?;
            out.push_str(&text);
            out.push('\n');
        }
        Ok(out)
    }
}

impl ExtractionStrategy for LopdfStrategy {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract(&self, bytes: &[u8]) -> Result<Vec<Paragraph>> {
        Ok(lines_to_paragraphs(&Self::page_text(bytes)?))
    }
}

/// Tertiary PDF extraction: lopdf text with table-aware reflow.
///
/// Multi-column layouts and skill tables come out of content-stream
/// extraction as runs of short fragments, one cell per line. Re-knitting
/// consecutive fragments into a single paragraph keeps compound terms
/// ("machine learning", "data engineering") intact for keyword matching.
pub struct TableReflowStrategy;

const FRAGMENT_MAX_CHARS: usize = 30;

impl TableReflowStrategy {
    fn reflow(text: &str) -> Vec<Paragraph> {
        let mut paragraphs = Vec::new();
        let mut row: Vec<&str> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                Self::flush(&mut row, &mut paragraphs);
                continue;
            }
            if line.chars().count() <= FRAGMENT_MAX_CHARS && !line.ends_with('.') {
                row.push(line);
            } else {
                Self::flush(&mut row, &mut paragraphs);
                paragraphs.push(Paragraph::plain(line));
            }
        }
        Self::flush(&mut row, &mut paragraphs);
        paragraphs
    }

    fn flush(row: &mut Vec<&str>, paragraphs: &mut Vec<Paragraph>) {
        match row.len() {
            0 => {}
            1 => paragraphs.push(Paragraph::plain(row[0])),
            _ => paragraphs.push(Paragraph::plain(row.join(" "))),
        }
        row.clear();
    }
}

impl ExtractionStrategy for TableReflowStrategy {
    fn name(&self) -> &'static str {
        "lopdf-table-reflow"
    }

    fn extract(&self, bytes: &[u8]) -> Result<Vec<Paragraph>> {
        Ok(Self::reflow(&LopdfStrategy::page_text(bytes)?))
    }
}

/// Markdown extraction via `pulldown-cmark` events.
///
/// Block structure maps directly onto structural hints: headings become
/// `StyleHint::Heading` with a synthetic point size per level, and
/// paragraphs dominated by strong runs are marked bold.
pub struct MarkdownStrategy;

fn heading_size(level: HeadingLevel) -> f32 {
    match level {
        HeadingLevel::H1 => 18.0,
        HeadingLevel::H2 => 16.0,
        HeadingLevel::H3 => 14.0,
        _ => 12.0,
    }
}

impl ExtractionStrategy for MarkdownStrategy {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn extract(&self, bytes: &[u8]) -> Result<Vec<Paragraph>> {
        let source = String::from_utf8_lossy(bytes);
        let mut paragraphs = Vec::new();

        let mut buffer = String::new();
        let mut bold_chars = 0usize;
        let mut bold_depth = 0usize;
        let mut heading: Option<HeadingLevel> = None;

        for event in Parser::new(&source) {
            match event {
                Event::Start(Tag::Heading(level, ..)) => {
                    buffer.clear();
                    bold_chars = 0;
                    heading = Some(level);
                }
                Event::Start(Tag::Paragraph) | Event::Start(Tag::Item) => {
                    buffer.clear();
                    bold_chars = 0;
                }
                Event::Start(Tag::Strong) => bold_depth += 1,
                Event::End(Tag::Strong) => bold_depth = bold_depth.saturating_sub(1),
                Event::Text(text) | Event::Code(text) => {
                    if bold_depth > 0 {
                        bold_chars += text.chars().count();
                    }
                    buffer.push_str(&text);
                }
                Event::SoftBreak | Event::HardBreak => buffer.push(' '),
                Event::End(Tag::Heading(level, ..)) => {
                    let text = buffer.trim().to_string();
                    if !text.is_empty() {
                        paragraphs.push(Paragraph::heading(text, Some(heading_size(level))));
                    }
                    buffer.clear();
                    heading = None;
                }
                Event::End(Tag::Paragraph) | Event::End(Tag::Item) => {
                    let text = buffer.trim().to_string();
                    if !text.is_empty() {
                        let total = text.chars().count();
                        paragraphs.push(Paragraph {
                            is_bold: total > 0 && bold_chars * 2 >= total,
                            font_size_pt: None,
                            style_hint: crate::parser::StyleHint::None,
                            text,
                        });
                    }
                    buffer.clear();
                    bold_chars = 0;
                }
                _ => {}
            }
        }

        // Trailing text outside any closed block (rare, but keep it).
        let tail = buffer.trim();
        if !tail.is_empty() {
            if let Some(level) = heading {
                paragraphs.push(Paragraph::heading(tail, Some(heading_size(level))));
            } else {
                paragraphs.push(Paragraph::plain(tail));
            }
        }

        Ok(paragraphs)
    }
}

/// Plain text extraction: lossy UTF-8 decode, one paragraph per line.
pub struct PlainTextStrategy;

impl ExtractionStrategy for PlainTextStrategy {
    fn name(&self) -> &'static str {
        "plain-text"
    }

    fn extract(&self, bytes: &[u8]) -> Result<Vec<Paragraph>> {
        Ok(lines_to_paragraphs(&String::from_utf8_lossy(bytes)))
    }
}
