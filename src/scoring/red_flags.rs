//! Red-flag validation over structured resume facts
//!
//! Date problems and suspicious employment patterns become issues, never
//! errors: a partially broken resume still gets a usable, if harsh, score.

use crate::analysis::dates::{DateStyle, YearMonth};
use crate::analysis::facts::{ExperienceEntry, ResumeFacts};
use crate::analysis::roles::Level;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Suggestion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Critical,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn suggestion(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Suggestion,
            message: message.into(),
        }
    }
}

/// Gap length at which an employment gap turns critical.
const GAP_CRITICAL_MONTHS: i32 = 18;
/// Gap length at which an employment gap warrants a warning.
const GAP_WARNING_MONTHS: i32 = 9;
/// Tenure below this counts toward the job-hopping pattern.
const SHORT_TENURE_MONTHS: i32 = 12;
/// Short stints (excluding the current role) that trigger the warning.
const JOB_HOP_THRESHOLD: usize = 2;
/// Years short of the claimed level's minimum that escalate to critical.
const LEVEL_SHORTFALL_CRITICAL_YEARS: f32 = 1.0;

pub struct RedFlagsValidator {
    today: YearMonth,
}

impl RedFlagsValidator {
    pub fn new() -> Self {
        Self {
            today: YearMonth::today(),
        }
    }

    /// Pin "today" for deterministic validation.
    pub fn with_today(today: YearMonth) -> Self {
        Self { today }
    }

    pub fn validate(&self, facts: &ResumeFacts, level: Level) -> Vec<Issue> {
        let mut issues = Vec::new();

        self.check_missing_dates(&facts.experience, &mut issues);
        self.check_date_order(&facts.experience, &mut issues);
        self.check_gaps(&facts.experience, &mut issues);
        self.check_date_style_consistency(&facts.experience, &mut issues);
        self.check_job_hopping(&facts.experience, &mut issues);
        self.check_claimed_level(&facts.experience, level, &mut issues);

        issues
    }

    fn check_missing_dates(&self, entries: &[ExperienceEntry], issues: &mut Vec<Issue>) {
        for entry in entries {
            if entry.start.is_none() || entry.end.is_none() {
                issues.push(Issue::critical(format!(
                    "Missing start or end date for '{}'",
                    entry_label(entry)
                )));
            }
        }
    }

    fn check_date_order(&self, entries: &[ExperienceEntry], issues: &mut Vec<Issue>) {
        for entry in entries {
            let (Some(start), Some(end)) = (&entry.start, &entry.end) else {
                continue;
            };
            let start_ym = start.value.resolve(self.today);
            let end_ym = end.value.resolve(self.today);
            if end_ym < start_ym {
                issues.push(Issue::critical(format!(
                    "End date precedes start date for '{}' ({} before {})",
                    entry_label(entry),
                    end.raw,
                    start.raw
                )));
            }
            if !start.value.is_present() && start_ym > self.today {
                issues.push(Issue::critical(format!(
                    "Start date for '{}' is in the future ({})",
                    entry_label(entry),
                    start.raw
                )));
            }
        }
    }

    fn check_gaps(&self, entries: &[ExperienceEntry], issues: &mut Vec<Issue>) {
        let mut dated: Vec<(&ExperienceEntry, YearMonth, YearMonth)> = entries
            .iter()
            .filter_map(|e| {
                let start = e.start.as_ref()?.value.resolve(self.today);
                let end = e.end.as_ref()?.value.resolve(self.today);
                Some((e, start, end))
            })
            .collect();
        dated.sort_by_key(|(_, start, _)| *start);

        for window in dated.windows(2) {
            let (earlier, _, earlier_end) = &window[0];
            let (later, later_start, _) = &window[1];
            let gap = earlier_end.months_until(later_start);
            if gap >= GAP_CRITICAL_MONTHS {
                issues.push(Issue::critical(format!(
                    "Employment gap of {} months between '{}' and '{}'",
                    gap,
                    entry_label(earlier),
                    entry_label(later)
                )));
            } else if gap >= GAP_WARNING_MONTHS {
                issues.push(Issue::warning(format!(
                    "Employment gap of {} months between '{}' and '{}'",
                    gap,
                    entry_label(earlier),
                    entry_label(later)
                )));
            }
        }
    }

    fn check_date_style_consistency(&self, entries: &[ExperienceEntry], issues: &mut Vec<Issue>) {
        let mut styles: Vec<DateStyle> = entries
            .iter()
            .flat_map(|e| [e.start.as_ref(), e.end.as_ref()])
            .flatten()
            .filter(|d| d.style != DateStyle::Word)
            .map(|d| d.style)
            .collect();
        styles.dedup();
        styles.sort_by_key(|s| *s as u8);
        styles.dedup();

        if styles.len() > 1 {
            issues.push(Issue::warning(
                "Date formats are inconsistent across experience entries; \
                 pick one style (e.g. 'Jan 2020') and use it throughout",
            ));
        }
    }

    fn check_job_hopping(&self, entries: &[ExperienceEntry], issues: &mut Vec<Issue>) {
        let short_stints = entries
            .iter()
            .filter(|e| {
                let (Some(start), Some(end)) = (&e.start, &e.end) else {
                    return false;
                };
                if end.value.is_present() {
                    return false; // the current role is still running
                }
                let tenure = start
                    .value
                    .resolve(self.today)
                    .months_until(&end.value.resolve(self.today));
                (0..SHORT_TENURE_MONTHS).contains(&tenure)
            })
            .count();

        if short_stints >= JOB_HOP_THRESHOLD {
            issues.push(Issue::warning(format!(
                "{} roles shorter than a year suggest a job-hopping pattern",
                short_stints
            )));
        }
    }

    fn check_claimed_level(
        &self,
        entries: &[ExperienceEntry],
        level: Level,
        issues: &mut Vec<Issue>,
    ) {
        let total_months: i32 = entries
            .iter()
            .filter_map(|e| {
                let start = e.start.as_ref()?.value.resolve(self.today);
                let end = e.end.as_ref()?.value.resolve(self.today);
                Some(start.months_until(&end).max(0))
            })
            .sum();
        let total_years = total_months as f32 / 12.0;
        let expected = level.min_expected_years();

        if total_years < expected {
            let shortfall = expected - total_years;
            let message = format!(
                "Resume shows {:.1} years of experience; '{}' level typically expects at least {:.0}",
                total_years, level, expected
            );
            if shortfall > LEVEL_SHORTFALL_CRITICAL_YEARS {
                issues.push(Issue::critical(message));
            } else {
                issues.push(Issue::warning(message));
            }
        }
    }
}

impl Default for RedFlagsValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn entry_label(entry: &ExperienceEntry) -> String {
    if entry.company.is_empty() {
        entry.title.clone()
    } else {
        format!("{} at {}", entry.title, entry.company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dates::{DatePoint, DateValue};

    fn point(year: i32, month: u32) -> DatePoint {
        DatePoint {
            value: DateValue::YearMonth(YearMonth::new(year, month)),
            raw: format!("{:02}/{}", month, year),
            style: DateStyle::NumericSlash,
        }
    }

    fn present() -> DatePoint {
        DatePoint {
            value: DateValue::Present,
            raw: "Present".to_string(),
            style: DateStyle::Word,
        }
    }

    fn entry(title: &str, start: Option<DatePoint>, end: Option<DatePoint>) -> ExperienceEntry {
        ExperienceEntry {
            title: title.to_string(),
            company: "Acme".to_string(),
            start,
            end,
            bullets: vec![],
        }
    }

    fn facts(experience: Vec<ExperienceEntry>) -> ResumeFacts {
        ResumeFacts {
            experience,
            ..Default::default()
        }
    }

    fn validator() -> RedFlagsValidator {
        RedFlagsValidator::with_today(YearMonth::new(2026, 8))
    }

    #[test]
    fn test_twenty_month_gap_is_exactly_one_critical() {
        let f = facts(vec![
            entry("Engineer", Some(point(2016, 1)), Some(point(2020, 1))),
            entry("Senior Engineer", Some(point(2021, 9)), Some(present())),
        ]);
        let issues = validator().validate(&f, Level::Entry);

        let criticals: Vec<_> = issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .collect();
        assert_eq!(criticals.len(), 1, "issues: {:?}", issues);
        assert!(criticals[0].message.contains("20"));
        assert!(criticals[0].message.contains("months"));
    }

    #[test]
    fn test_moderate_gap_is_warning() {
        let f = facts(vec![
            entry("Engineer", Some(point(2018, 1)), Some(point(2020, 1))),
            entry("Engineer II", Some(point(2020, 11)), Some(present())),
        ]);
        let issues = validator().validate(&f, Level::Entry);
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Warning && i.message.contains("gap")));
        assert!(!issues.iter().any(|i| i.severity == Severity::Critical));
    }

    #[test]
    fn test_end_before_start_is_critical() {
        let f = facts(vec![entry(
            "Engineer",
            Some(point(2022, 6)),
            Some(point(2021, 6)),
        )]);
        let issues = validator().validate(&f, Level::Entry);
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Critical && i.message.contains("precedes")));
    }

    #[test]
    fn test_future_start_is_critical() {
        let f = facts(vec![entry("Engineer", Some(point(2030, 1)), Some(present()))]);
        let issues = validator().validate(&f, Level::Entry);
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Critical && i.message.contains("future")));
    }

    #[test]
    fn test_missing_dates_are_critical() {
        let f = facts(vec![entry("Engineer", None, Some(present()))]);
        let issues = validator().validate(&f, Level::Entry);
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Critical && i.message.contains("Missing")));
    }

    #[test]
    fn test_mixed_date_styles_warn() {
        let mut e1 = entry("Engineer", Some(point(2018, 1)), Some(point(2020, 1)));
        e1.start.as_mut().unwrap().style = DateStyle::MonthNameYear;
        let e2 = entry("Engineer II", Some(point(2020, 2)), Some(present()));
        let issues = validator().validate(&facts(vec![e1, e2]), Level::Entry);
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Warning && i.message.contains("inconsistent")));
    }

    #[test]
    fn test_job_hopping_excludes_current_role() {
        let f = facts(vec![
            entry("Eng A", Some(point(2020, 1)), Some(point(2020, 8))),
            entry("Eng B", Some(point(2020, 9)), Some(point(2021, 4))),
            entry("Eng C", Some(point(2021, 5)), Some(present())),
        ]);
        let issues = validator().validate(&f, Level::Entry);
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Warning && i.message.contains("job-hopping")));
    }

    #[test]
    fn test_level_shortfall_escalates() {
        // ~1 year of experience claiming senior (expects 5): critical.
        let f = facts(vec![entry(
            "Engineer",
            Some(point(2025, 1)),
            Some(point(2026, 1)),
        )]);
        let issues = validator().validate(&f, Level::Senior);
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Critical && i.message.contains("senior")));

        // 4.5 years claiming senior: within a year, warning only.
        let f = facts(vec![entry(
            "Engineer",
            Some(point(2022, 2)),
            Some(point(2026, 8)),
        )]);
        let issues = validator().validate(&f, Level::Senior);
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Warning && i.message.contains("senior")));
        assert!(!issues.iter().any(|i| i.severity == Severity::Critical));
    }

    #[test]
    fn test_clean_history_no_issues() {
        let f = facts(vec![
            entry("Engineer", Some(point(2018, 1)), Some(point(2021, 6))),
            entry("Senior Engineer", Some(point(2021, 7)), Some(present())),
        ]);
        let issues = validator().validate(&f, Level::Senior);
        assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    }
}
