//! Structured fact extraction from detected sections

use crate::analysis::dates::{DateParser, DatePoint};
use crate::analysis::sections::{Section, SectionKind};
use crate::parser::ParsedDocument;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub links: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub start: Option<DatePoint>,
    pub end: Option<DatePoint>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: Option<String>,
    pub year: Option<i32>,
}

/// Structured extraction of a resume, produced once per upload or
/// edit-and-rescore cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeFacts {
    pub contact: Contact,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub certifications: Vec<String>,
    pub summary: Option<String>,
    /// Names of the sections the facts were drawn from.
    pub section_names: Vec<String>,
    /// Word count of the source document, carried for rescoring.
    pub word_count: usize,
}

pub struct FactsExtractor {
    dates: DateParser,
    email_regex: Regex,
    phone_regex: Regex,
    url_regex: Regex,
    location_regex: Regex,
    degree_regex: Regex,
}

const BULLET_PREFIXES: &[char] = &['-', '*', '\u{2022}', '\u{25E6}', '\u{2023}', '>'];

impl FactsExtractor {
    pub fn new() -> Self {
        let email_regex = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
            .expect("Invalid email regex");
        let phone_regex =
            Regex::new(r"\b(?:\+?1[-. ]?)?\(?[0-9]{3}\)?[-. ]?[0-9]{3}[-. ]?[0-9]{4}\b")
                .expect("Invalid phone regex");
        let url_regex = Regex::new(r"(?:https?://|www\.|linkedin\.com/|github\.com/)[^\s|,]+")
            .expect("Invalid URL regex");
        let location_regex = Regex::new(r"\b[A-Z][a-zA-Z .]+,\s*(?:[A-Z]{2}|[A-Z][a-z]+)\b")
            .expect("Invalid location regex");
        let degree_regex = Regex::new(
            r"(?i)\b(b\.?s\.?c?|m\.?s\.?c?|b\.?a\.?|m\.?a\.?|ph\.?d|mba|bachelor|master|doctor|associate)\b",
        )
        .expect("Invalid degree regex");

        Self {
            dates: DateParser::new(),
            email_regex,
            phone_regex,
            url_regex,
            location_regex,
            degree_regex,
        }
    }

    pub fn extract(&self, document: &ParsedDocument, sections: &[Section]) -> ResumeFacts {
        let mut facts = ResumeFacts {
            section_names: sections.iter().map(|s| s.name.clone()).collect(),
            word_count: document.word_count(),
            ..Default::default()
        };

        for section in sections {
            match SectionKind::classify(&section.name) {
                SectionKind::Contact => facts.contact = self.extract_contact(&section.text),
                SectionKind::Summary => {
                    let text = section.text.trim();
                    if !text.is_empty() {
                        facts.summary = Some(text.to_string());
                    }
                }
                SectionKind::Experience | SectionKind::Projects => {
                    facts
                        .experience
                        .extend(self.extract_experience(&section.text));
                }
                SectionKind::Education => {
                    facts.education.extend(self.extract_education(&section.text));
                }
                SectionKind::Skills => facts.skills.extend(Self::split_skills(&section.text)),
                SectionKind::Certifications => facts
                    .certifications
                    .extend(section.text.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from)),
                SectionKind::Other => {
                    // Unclassified sections still contribute experience
                    // entries when they carry date ranges.
                    facts
                        .experience
                        .extend(self.extract_experience(&section.text));
                }
            }
        }

        // An all-caps name line is itself detected as a heading, leaving no
        // Contact-classified section. Fall back to scanning the document
        // head for whatever contact fields are still missing.
        if facts.contact.email.is_none() && facts.contact.phone.is_none() {
            let head = document
                .paragraphs
                .iter()
                .take(8)
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            let fallback = self.extract_contact(&head);
            let contact = &mut facts.contact;
            contact.email = contact.email.take().or(fallback.email);
            contact.phone = contact.phone.take().or(fallback.phone);
            contact.name = contact.name.take().or(fallback.name);
            contact.location = contact.location.take().or(fallback.location);
            if contact.links.is_empty() {
                contact.links = fallback.links;
            }
        }

        facts.skills.dedup();
        facts
    }

    fn extract_contact(&self, text: &str) -> Contact {
        let mut contact = Contact::default();

        if let Some(m) = self.email_regex.find(text) {
            contact.email = Some(m.as_str().to_string());
        }
        if let Some(m) = self.phone_regex.find(text) {
            contact.phone = Some(m.as_str().to_string());
        }
        contact.links = self
            .url_regex
            .find_iter(text)
            .map(|m| m.as_str().trim_end_matches(['.', ',']).to_string())
            .collect();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if contact.location.is_none() {
                if let Some(m) = self.location_regex.find(line) {
                    contact.location = Some(m.as_str().to_string());
                }
            }
            // Lines carrying contact handles are never the person's name.
            if self.email_regex.is_match(line)
                || self.phone_regex.is_match(line)
                || self.url_regex.is_match(line)
            {
                continue;
            }
            if contact.name.is_none() {
                let words = line.split_whitespace().count();
                if (2..=4).contains(&words)
                    && line.chars().all(|c| c.is_alphabetic() || c.is_whitespace() || c == '.')
                {
                    contact.name = Some(line.to_string());
                }
            }
        }

        contact
    }

    /// Entries are anchored on lines carrying a date range; following lines
    /// accumulate as that entry's bullets until the next anchor.
    fn extract_experience(&self, text: &str) -> Vec<ExperienceEntry> {
        let mut entries: Vec<ExperienceEntry> = Vec::new();

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            if self.dates.looks_like_range(line) {
                let (start, end) = match self.dates.parse_range(line) {
                    Some((s, e)) => (Some(s), e),
                    None => (None, None),
                };
                let header = self.dates.strip_dates(line);
                let (title, company) = Self::split_header(&header);
                entries.push(ExperienceEntry {
                    title,
                    company,
                    start,
                    end,
                    bullets: Vec::new(),
                });
            } else if let Some(entry) = entries.last_mut() {
                entry.bullets.push(Self::strip_bullet(line));
            }
        }

        entries
    }

    fn split_header(header: &str) -> (String, String) {
        for separator in [" at ", " @ ", " | ", " - ", ", "] {
            if let Some((title, company)) = header.split_once(separator) {
                let title = title.trim();
                let company = company.trim();
                if !title.is_empty() && !company.is_empty() {
                    return (title.to_string(), company.to_string());
                }
            }
        }
        (header.trim().to_string(), String::new())
    }

    fn strip_bullet(line: &str) -> String {
        line.trim_start_matches(|c: char| BULLET_PREFIXES.contains(&c) || c.is_whitespace())
            .to_string()
    }

    fn extract_education(&self, text: &str) -> Vec<EducationEntry> {
        let mut entries = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let year = self
                .dates
                .parse(line)
                .and_then(|d| match d.value {
                    crate::analysis::dates::DateValue::YearMonth(ym) => Some(ym.year),
                    _ => None,
                });
            let degree = self
                .degree_regex
                .find(line)
                .map(|m| m.as_str().to_string());
            entries.push(EducationEntry {
                institution: self.dates.strip_dates(line),
                degree,
                year,
            });
        }
        entries
    }

    fn split_skills(text: &str) -> Vec<String> {
        text.split(|c: char| c == ',' || c == ';' || c == '|' || c == '/' || c == '\n' || c == '\u{2022}')
            .map(|s| s.trim().trim_start_matches(|c: char| BULLET_PREFIXES.contains(&c)).trim())
            .filter(|s| !s.is_empty() && s.len() < 50)
            .map(String::from)
            .collect()
    }
}

impl Default for FactsExtractor {
    fn default() -> Self {
        Self::new()
    }
}
