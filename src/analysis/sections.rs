//! Section detection over parsed paragraphs
//!
//! Headings are recognized by shape, not by a fixed vocabulary: a style
//! hint from the extractor, a bold run at a large-enough size, or an
//! all-caps line. Known limitation: a short bolded achievement line on an
//! unusual template can be taken for a heading; the heuristics are kept
//! as-is rather than papered over with extra rules.

use crate::parser::{ParsedDocument, Paragraph, StyleHint};
use serde::{Deserialize, Serialize};

/// Bold paragraphs at or above this size count as headings.
const HEADING_FONT_SIZE_PT: f32 = 12.0;

/// Name given to the implicit leading section.
pub const CONTACT_SECTION: &str = "Contact";

/// A contiguous span of paragraphs under one heading.
///
/// `start_index` (inclusive) and `end_index` (exclusive) reference
/// paragraph positions in the owning [`ParsedDocument`]; sections are
/// non-overlapping and ordered by `start_index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub start_index: usize,
    pub end_index: usize,
    pub text: String,
}

/// Semantic classification of a section name. Used downstream for fact
/// extraction and display labels only; detection itself never gates on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Other,
}

const KIND_HINTS: &[(SectionKind, &[&str])] = &[
    (SectionKind::Contact, &["contact"]),
    (
        SectionKind::Summary,
        &["summary", "profile", "objective", "about", "overview"],
    ),
    (
        SectionKind::Experience,
        &["experience", "employment", "work history", "career"],
    ),
    (
        SectionKind::Education,
        &["education", "academic", "qualifications"],
    ),
    (
        SectionKind::Skills,
        &["skills", "competencies", "technologies", "expertise"],
    ),
    (SectionKind::Projects, &["projects", "portfolio"]),
    (
        SectionKind::Certifications,
        &["certifications", "certificates", "licenses"],
    ),
];

impl SectionKind {
    pub fn classify(name: &str) -> Self {
        let lowered = name.to_lowercase();
        for (kind, hints) in KIND_HINTS {
            if hints.iter().any(|h| lowered.contains(h)) {
                return *kind;
            }
        }
        SectionKind::Other
    }
}

pub struct SectionDetector;

impl SectionDetector {
    pub fn new() -> Self {
        Self
    }

    /// Split a document into sections. Never fails: with no recognizable
    /// heading the whole document becomes a single Contact-labeled span.
    pub fn detect(&self, document: &ParsedDocument) -> Vec<Section> {
        let paragraphs = &document.paragraphs;
        let mut sections = Vec::new();

        let first_heading = paragraphs.iter().position(|p| Self::is_heading_candidate(p));

        // Everything before the first heading is the implicit contact block.
        let lead_end = first_heading.unwrap_or(paragraphs.len());
        if lead_end > 0 || first_heading.is_none() {
            sections.push(Self::build(CONTACT_SECTION, 0, lead_end, paragraphs));
        }

        let mut idx = match first_heading {
            Some(i) => i,
            None => return sections,
        };

        while idx < paragraphs.len() {
            let heading = &paragraphs[idx];
            let body_start = idx + 1;
            let mut body_end = body_start;
            while body_end < paragraphs.len()
                && !Self::is_heading_candidate(&paragraphs[body_end])
            {
                body_end += 1;
            }
            sections.push(Self::build(heading.text.trim(), idx, body_end, paragraphs));
            idx = body_end;
        }

        sections
    }

    /// The three heading heuristics of the detector contract.
    pub fn is_heading_candidate(paragraph: &Paragraph) -> bool {
        if paragraph.style_hint == StyleHint::Heading {
            return true;
        }
        if paragraph.is_bold
            && paragraph
                .font_size_pt
                .map(|s| s >= HEADING_FONT_SIZE_PT)
                .unwrap_or(false)
        {
            return true;
        }
        let text = paragraph.text.trim();
        let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
        text.chars().count() > 2
            && !letters.is_empty()
            && letters.iter().all(|c| c.is_uppercase())
    }

    fn build(name: &str, start: usize, end: usize, paragraphs: &[Paragraph]) -> Section {
        let body_start = if start < end && name != CONTACT_SECTION {
            start + 1
        } else {
            start
        };
        let text = paragraphs[body_start.min(end)..end]
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Section {
            name: name.to_string(),
            start_index: start,
            end_index: end,
            text,
        }
    }
}

impl Default for SectionDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(paragraphs: Vec<Paragraph>) -> ParsedDocument {
        ParsedDocument {
            paragraphs,
            confidence: 1.0,
            strategy: "test".to_string(),
        }
    }

    #[test]
    fn test_all_caps_headings() {
        let document = doc(vec![
            Paragraph::plain("Jane Smith"),
            Paragraph::plain("jane@example.com"),
            Paragraph::plain("EXPERIENCE"),
            Paragraph::plain("Engineer at Acme"),
            Paragraph::plain("EDUCATION"),
            Paragraph::plain("BS, State University"),
        ]);
        let sections = SectionDetector::new().detect(&document);

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].name, CONTACT_SECTION);
        assert_eq!(sections[1].name, "EXPERIENCE");
        assert_eq!(sections[1].text, "Engineer at Acme");
        assert_eq!(sections[2].name, "EDUCATION");
    }

    #[test]
    fn test_sections_ordered_and_disjoint() {
        let document = doc(vec![
            Paragraph::plain("Jane Smith"),
            Paragraph::heading("Experience", Some(16.0)),
            Paragraph::plain("Engineer"),
            Paragraph::heading("Skills", Some(16.0)),
            Paragraph::plain("Rust"),
        ]);
        let sections = SectionDetector::new().detect(&document);

        for pair in sections.windows(2) {
            assert!(pair[0].end_index <= pair[1].start_index);
            assert!(pair[0].start_index <= pair[1].start_index);
        }
    }

    #[test]
    fn test_no_headings_yields_single_contact_section() {
        let document = doc(vec![
            Paragraph::plain("just some text"),
            Paragraph::plain("more text"),
        ]);
        let sections = SectionDetector::new().detect(&document);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, CONTACT_SECTION);
        assert_eq!(sections[0].start_index, 0);
        assert_eq!(sections[0].end_index, 2);
    }

    #[test]
    fn test_bold_large_font_is_heading() {
        let para = Paragraph {
            text: "Work History".to_string(),
            is_bold: true,
            font_size_pt: Some(14.0),
            style_hint: StyleHint::None,
        };
        assert!(SectionDetector::is_heading_candidate(&para));

        let small = Paragraph {
            font_size_pt: Some(10.0),
            ..para
        };
        assert!(!SectionDetector::is_heading_candidate(&small));
    }

    #[test]
    fn test_short_caps_not_heading() {
        assert!(!SectionDetector::is_heading_candidate(&Paragraph::plain("AI")));
        assert!(SectionDetector::is_heading_candidate(&Paragraph::plain("SKILLS")));
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(SectionKind::classify("WORK HISTORY"), SectionKind::Experience);
        assert_eq!(SectionKind::classify("Professional Summary"), SectionKind::Summary);
        assert_eq!(SectionKind::classify("Hobbies"), SectionKind::Other);
    }
}
