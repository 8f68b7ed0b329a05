//! Semantic date handling for resume entries
//!
//! Raw date strings ("Jan 2020", "03/2021", "2019", "Present") are parsed
//! into normalized year-month values. Malformed dates never fail the
//! pipeline; they surface later as issues.

use chrono::Datelike;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Normalized year-month. Field order gives derived lexicographic ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Whole months from `self` to `other` (negative when `other` precedes).
    pub fn months_until(&self, other: &YearMonth) -> i32 {
        (other.year - self.year) * 12 + (other.month as i32 - self.month as i32)
    }

    pub fn today() -> Self {
        let now = chrono::Local::now();
        Self::new(now.year(), now.month())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateValue {
    YearMonth(YearMonth),
    Present,
}

impl DateValue {
    /// Resolve to a concrete month, mapping `Present` to `today`.
    pub fn resolve(&self, today: YearMonth) -> YearMonth {
        match self {
            DateValue::YearMonth(ym) => *ym,
            DateValue::Present => today,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, DateValue::Present)
    }
}

/// Surface form of a parsed date, used for format-consistency checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateStyle {
    MonthNameYear,
    NumericSlash,
    YearOnly,
    Word,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatePoint {
    pub value: DateValue,
    pub raw: String,
    pub style: DateStyle,
}

const MONTHS: &[(&str, u32)] = &[
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

pub struct DateParser {
    month_name: Regex,
    numeric: Regex,
    year_only: Regex,
    present: Regex,
    range_separator: Regex,
}

impl DateParser {
    pub fn new() -> Self {
        let month_name = Regex::new(
            r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+(\d{4})\b",
        )
        .expect("Invalid month-name regex");
        let numeric =
            Regex::new(r"\b(0?[1-9]|1[0-2])\s*/\s*((?:19|20)\d{2})\b").expect("Invalid numeric regex");
        let year_only = Regex::new(r"\b((?:19|20)\d{2})\b").expect("Invalid year regex");
        let present =
            Regex::new(r"(?i)\b(present|current|now|ongoing|today)\b").expect("Invalid present regex");
        let range_separator =
            Regex::new(r"\s*(?:\u{2013}|\u{2014}|-|to|until|through)\s*").expect("Invalid separator regex");

        Self {
            month_name,
            numeric,
            year_only,
            present,
            range_separator,
        }
    }

    /// Parse a single date expression from `raw`.
    pub fn parse(&self, raw: &str) -> Option<DatePoint> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if self.present.is_match(trimmed) {
            return Some(DatePoint {
                value: DateValue::Present,
                raw: trimmed.to_string(),
                style: DateStyle::Word,
            });
        }

        if let Some(cap) = self.month_name.captures(trimmed) {
            let name = cap[1].to_lowercase();
            let month = MONTHS.iter().find(|(m, _)| *m == name).map(|(_, n)| *n)?;
            let year: i32 = cap[2].parse().ok()?;
            return Some(DatePoint {
                value: DateValue::YearMonth(YearMonth::new(year, month)),
                raw: trimmed.to_string(),
                style: DateStyle::MonthNameYear,
            });
        }

        if let Some(cap) = self.numeric.captures(trimmed) {
            let month: u32 = cap[1].parse().ok()?;
            let year: i32 = cap[2].parse().ok()?;
            return Some(DatePoint {
                value: DateValue::YearMonth(YearMonth::new(year, month)),
                raw: trimmed.to_string(),
                style: DateStyle::NumericSlash,
            });
        }

        if let Some(cap) = self.year_only.captures(trimmed) {
            let year: i32 = cap[1].parse().ok()?;
            // Year-only dates resolve to January; tenure math stays coarse
            // but monotone.
            return Some(DatePoint {
                value: DateValue::YearMonth(YearMonth::new(year, 1)),
                raw: trimmed.to_string(),
                style: DateStyle::YearOnly,
            });
        }

        None
    }

    /// Extract a start/end date range from a free-text line, e.g.
    /// "Jan 2020 - Mar 2022" or "2019 – Present".
    pub fn parse_range(&self, text: &str) -> Option<(DatePoint, Option<DatePoint>)> {
        let (start_raw, rest) = self.split_first_date(text)?;
        let start = self.parse(&start_raw)?;

        let end = rest.and_then(|r| {
            let after = self.range_separator.replace(&r, " ");
            self.first_date_token(&after).and_then(|tok| self.parse(&tok))
        });

        Some((start, end))
    }

    /// True when the line contains something that reads as a date range
    /// (a date followed by a separator and another date or "present").
    pub fn looks_like_range(&self, text: &str) -> bool {
        match self.parse_range(text) {
            Some((_, Some(_))) => true,
            Some((start, None)) => {
                // An open range like "Jan 2024 -" still anchors an entry.
                let idx = text.find(&start.raw).map(|i| i + start.raw.len());
                idx.map(|i| self.range_separator.is_match(&text[i..])).unwrap_or(false)
            }
            None => false,
        }
    }

    /// Remove all date tokens and separators from a header line.
    pub fn strip_dates(&self, text: &str) -> String {
        let mut out = self.month_name.replace_all(text, "").to_string();
        out = self.numeric.replace_all(&out, "").to_string();
        out = self.year_only.replace_all(&out, "").to_string();
        out = self.present.replace_all(&out, "").to_string();
        out.trim_matches(|c: char| c.is_whitespace() || "-–—(),|".contains(c))
            .to_string()
    }

    fn first_date_token(&self, text: &str) -> Option<String> {
        let mut earliest: Option<(usize, usize)> = None;
        for re in [&self.month_name, &self.numeric, &self.present, &self.year_only] {
            if let Some(m) = re.find(text) {
                let candidate = (m.start(), m.end());
                if earliest.map(|(s, _)| candidate.0 < s).unwrap_or(true) {
                    earliest = Some(candidate);
                }
            }
        }
        earliest.map(|(s, e)| text[s..e].to_string())
    }

    fn split_first_date(&self, text: &str) -> Option<(String, Option<String>)> {
        let token = self.first_date_token(text)?;
        let idx = text.find(&token)?;
        let rest = &text[idx + token.len()..];
        let rest = if rest.trim().is_empty() {
            None
        } else {
            Some(rest.to_string())
        };
        Some((token, rest))
    }
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_name_parse() {
        let parser = DateParser::new();
        let date = parser.parse("March 2021").unwrap();
        assert_eq!(date.value, DateValue::YearMonth(YearMonth::new(2021, 3)));
        assert_eq!(date.style, DateStyle::MonthNameYear);
    }

    #[test]
    fn test_numeric_parse() {
        let parser = DateParser::new();
        let date = parser.parse("03/2021").unwrap();
        assert_eq!(date.value, DateValue::YearMonth(YearMonth::new(2021, 3)));
        assert_eq!(date.style, DateStyle::NumericSlash);
    }

    #[test]
    fn test_present_parse() {
        let parser = DateParser::new();
        assert!(parser.parse("Present").unwrap().value.is_present());
        assert!(parser.parse("current").unwrap().value.is_present());
    }

    #[test]
    fn test_range_parse() {
        let parser = DateParser::new();
        let (start, end) = parser.parse_range("Jan 2020 - Mar 2022").unwrap();
        assert_eq!(start.value, DateValue::YearMonth(YearMonth::new(2020, 1)));
        assert_eq!(
            end.unwrap().value,
            DateValue::YearMonth(YearMonth::new(2022, 3))
        );
    }

    #[test]
    fn test_range_to_present() {
        let parser = DateParser::new();
        let (start, end) = parser.parse_range("2019 \u{2013} Present").unwrap();
        assert_eq!(start.value, DateValue::YearMonth(YearMonth::new(2019, 1)));
        assert!(end.unwrap().value.is_present());
    }

    #[test]
    fn test_months_until() {
        let a = YearMonth::new(2020, 1);
        let b = YearMonth::new(2021, 8);
        assert_eq!(a.months_until(&b), 19);
        assert_eq!(b.months_until(&a), -19);
    }

    #[test]
    fn test_ordering() {
        assert!(YearMonth::new(2020, 12) < YearMonth::new(2021, 1));
        assert!(YearMonth::new(2021, 2) > YearMonth::new(2021, 1));
    }

    #[test]
    fn test_looks_like_range() {
        let parser = DateParser::new();
        assert!(parser.looks_like_range("Software Engineer | Acme | Jan 2020 - Present"));
        assert!(!parser.looks_like_range("Improved throughput by 40%"));
    }

    #[test]
    fn test_strip_dates() {
        let parser = DateParser::new();
        let stripped = parser.strip_dates("Software Engineer, Acme Corp (Jan 2020 - Mar 2022)");
        assert!(stripped.contains("Software Engineer"));
        assert!(!stripped.contains("2020"));
    }
}
