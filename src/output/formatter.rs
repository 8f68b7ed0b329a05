//! Output formatters for score results

use crate::config::OutputFormat;
use crate::error::{Result, ResumeScorerError};
use crate::scoring::adaptive::{ScoreResult, ScoringMode};
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering a score result in one output format.
pub trait OutputFormatter {
    fn format_result(&self, result: &ScoreResult) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and score badges.
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for API integration and structured consumers.
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for sharable reports.
pub struct MarkdownFormatter;

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            use_colors,
            detailed,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match score {
            90..=100 => ("EXCELLENT", Color::Green),
            80..=89 => ("VERY GOOD", Color::BrightGreen),
            70..=79 => ("GOOD", Color::Yellow),
            60..=69 => ("FAIR", Color::BrightYellow),
            50..=59 => ("BELOW AVG", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn mode_label(mode: ScoringMode) -> &'static str {
        match mode {
            ScoringMode::AtsSimulation => "ATS simulation",
            ScoringMode::QualityCoach => "Quality coaching",
        }
    }

    fn category_label(key: &str) -> String {
        let mut label = key.replace('_', " ");
        if let Some(first) = label.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        label
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_result(&self, result: &ScoreResult) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n",
            self.colorize("RESUME SCORE", Color::Blue),
            Self::mode_label(result.mode)
        ));
        output.push_str(&format!(
            "Overall: {}/100 {}\n",
            result.overall_score,
            self.format_score_badge(result.overall_score)
        ));

        if result.mode == ScoringMode::AtsSimulation && result.auto_reject {
            output.push_str(&format!(
                "{}\n",
                self.colorize(
                    "Likely auto-rejected: required-keyword coverage is below the ATS filter line",
                    Color::Red
                )
            ));
        }

        if !result.breakdown.is_empty() {
            output.push_str("\nBreakdown:\n");
            for (key, category) in &result.breakdown {
                output.push_str(&format!(
                    "  {:<26} {:>5.1} pts (weight {:.0}%)\n",
                    Self::category_label(key),
                    category.points,
                    category.weight * 100.0
                ));
                if self.detailed {
                    output.push_str(&format!(
                        "  {:<26} {:>5.0}%\n",
                        "", category.score * 100.0
                    ));
                }
            }
        }

        if !result.strengths.is_empty() {
            output.push_str(&format!("\n{}\n", self.colorize("Strengths", Color::Green)));
            for strength in &result.strengths {
                output.push_str(&format!("  + {}\n", self.colorize(strength, Color::Green)));
            }
        }

        if !result.issues.is_empty() {
            output.push_str("\nIssues:\n");
            for issue in &result.issues.critical {
                output.push_str(&format!("  {} {}\n", self.colorize("[!]", Color::Red), issue));
            }
            for issue in &result.issues.warnings {
                output.push_str(&format!(
                    "  {} {}\n",
                    self.colorize("[*]", Color::Yellow),
                    issue
                ));
            }
            for issue in &result.issues.suggestions {
                output.push_str(&format!(
                    "  {} {}\n",
                    self.colorize("[-]", Color::Cyan),
                    issue
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_result(&self, result: &ScoreResult) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(result)?
        } else {
            serde_json::to_string(result)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_result(&self, result: &ScoreResult) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Resume Score Report\n\n");
        output.push_str(&format!(
            "**Overall: {}/100** ({})\n\n",
            result.overall_score,
            ConsoleFormatter::mode_label(result.mode)
        ));
        if result.mode == ScoringMode::AtsSimulation && result.auto_reject {
            output.push_str("> **Warning:** required-keyword coverage is below the ATS filter line; this resume would likely be auto-rejected.\n\n");
        }

        if !result.breakdown.is_empty() {
            output.push_str("## Breakdown\n\n");
            output.push_str("| Category | Points | Weight |\n|---|---|---|\n");
            for (key, category) in &result.breakdown {
                output.push_str(&format!(
                    "| {} | {:.1} | {:.0}% |\n",
                    ConsoleFormatter::category_label(key),
                    category.points,
                    category.weight * 100.0
                ));
            }
            output.push('\n');
        }

        if !result.strengths.is_empty() {
            output.push_str("## Strengths\n\n");
            for strength in &result.strengths {
                output.push_str(&format!("- {}\n", strength));
            }
            output.push('\n');
        }

        if !result.issues.is_empty() {
            output.push_str("## Issues\n\n");
            for issue in &result.issues.critical {
                output.push_str(&format!("- **Critical:** {}\n", issue));
            }
            for issue in &result.issues.warnings {
                output.push_str(&format!("- **Warning:** {}\n", issue));
            }
            for issue in &result.issues.suggestions {
                output.push_str(&format!("- Suggestion: {}\n", issue));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

/// Coordinates the formatters and optional save-to-file.
pub struct ReportGenerator {
    console: ConsoleFormatter,
    json: JsonFormatter,
    markdown: MarkdownFormatter,
}

impl ReportGenerator {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            console: ConsoleFormatter::new(use_colors, detailed),
            json: JsonFormatter::new(true),
            markdown: MarkdownFormatter,
        }
    }

    pub fn format(&self, result: &ScoreResult, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console.format_result(result),
            OutputFormat::Json => self.json.format_result(result),
            OutputFormat::Markdown => self.markdown.format_result(result),
        }
    }

    pub fn save(&self, result: &ScoreResult, format: &OutputFormat, path: &Path) -> Result<()> {
        // Never colorize when writing to a file.
        let rendered = match format {
            OutputFormat::Console => ConsoleFormatter::new(false, self.console.detailed)
                .format_result(result)?,
            other => self.format(result, other)?,
        };
        std::fs::write(path, rendered).map_err(|e| {
            ResumeScorerError::OutputFormatting(format!(
                "Failed to write report to {}: {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::adaptive::ScoreResult;

    fn sample_result() -> ScoreResult {
        ScoreResult::minimal(ScoringMode::QualityCoach, "Document too short to score")
    }

    #[test]
    fn test_console_output_plain() {
        let formatter = ConsoleFormatter::new(false, false);
        let output = formatter.format_result(&sample_result()).unwrap();
        assert!(output.contains("0/100"));
        assert!(output.contains("[POOR]"));
        assert!(output.contains("too short"));
    }

    #[test]
    fn test_json_round_trips() {
        let formatter = JsonFormatter::new(false);
        let rendered = formatter.format_result(&sample_result()).unwrap();
        let parsed: ScoreResult = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, sample_result());
    }

    #[test]
    fn test_markdown_has_sections() {
        let output = MarkdownFormatter.format_result(&sample_result()).unwrap();
        assert!(output.starts_with("# Resume Score Report"));
        assert!(output.contains("**Critical:**"));
    }
}
