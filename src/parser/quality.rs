//! Extraction quality scoring
//!
//! Each strategy's output is scored on three signals: enough words to be a
//! plausible resume, a sprinkling of paragraphs shaped like section
//! headings, and a high printable-to-garbled character ratio. The combined
//! score drives the parser's confidence gate.

use crate::parser::Paragraph;

/// Words at which the word-count signal saturates.
const WORD_TARGET: usize = 150;

/// Expected heading density; a resume with ~5% heading-like paragraphs
/// saturates the heading signal.
const HEADING_FRACTION_TARGET: f32 = 0.05;

const WORD_WEIGHT: f32 = 0.45;
const HEADING_WEIGHT: f32 = 0.20;
const PRINTABLE_WEIGHT: f32 = 0.35;

/// Paragraph texts that suggest a recognizable section boundary.
const HEADING_WORDS: &[&str] = &[
    "experience",
    "employment",
    "education",
    "skills",
    "summary",
    "profile",
    "objective",
    "projects",
    "certifications",
    "contact",
];

pub fn evaluate(paragraphs: &[Paragraph]) -> f32 {
    let word_count: usize = paragraphs
        .iter()
        .map(|p| p.text.split_whitespace().count())
        .sum();
    if word_count == 0 {
        return 0.0;
    }

    let word_signal = (word_count as f32 / WORD_TARGET as f32).min(1.0);

    let heading_like = paragraphs.iter().filter(|p| looks_like_heading(p)).count();
    let heading_fraction = heading_like as f32 / paragraphs.len() as f32;
    let heading_signal = (heading_fraction / HEADING_FRACTION_TARGET).min(1.0);

    let printable_signal = printable_ratio(paragraphs);

    WORD_WEIGHT * word_signal + HEADING_WEIGHT * heading_signal + PRINTABLE_WEIGHT * printable_signal
}

fn looks_like_heading(paragraph: &Paragraph) -> bool {
    if paragraph.style_hint == crate::parser::StyleHint::Heading {
        return true;
    }
    let trimmed = paragraph.text.trim().trim_end_matches(':').to_lowercase();
    if trimmed.split_whitespace().count() > 4 {
        return false;
    }
    HEADING_WORDS.iter().any(|w| trimmed.contains(w))
}

fn printable_ratio(paragraphs: &[Paragraph]) -> f32 {
    let mut total = 0usize;
    let mut printable = 0usize;
    for p in paragraphs {
        for c in p.text.chars() {
            total += 1;
            if !c.is_control() && c != char::REPLACEMENT_CHARACTER {
                printable += 1;
            }
        }
    }
    if total == 0 {
        0.0
    } else {
        printable as f32 / total as f32
    }
}
