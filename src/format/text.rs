//! Console summaries.
//!
//! Plain text with optional ANSI color (via `crossterm`); callers decide on
//! color from `--json`/TTY state.

use crate::aggregate::{AggregateSummary, SuiteRollup};
use crate::model::{CaseStatus, SuiteStatus};
use crate::sa::SaSummary;
use crate::util::time::format_timestamp;
use crossterm::style::Stylize;

/// Formatting options for text output.
#[derive(Debug, Clone, Copy)]
pub struct TextFormatOptions<'a> {
    pub use_color: bool,
    pub timestamp_format: &'a str,
}

/// Status label with optional color.
#[must_use]
pub fn format_status_label(status: CaseStatus, use_color: bool) -> String {
    let label = status.as_str();
    if !use_color {
        return label.to_string();
    }
    match status {
        CaseStatus::Success => label.green().to_string(),
        CaseStatus::Failed => label.red().bold().to_string(),
        CaseStatus::Skipped => label.dark_grey().to_string(),
    }
}

fn count_line(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {label:<38} {value}\n")
}

/// Aggregate numbers as aligned lines.
#[must_use]
pub fn format_summary(summary: &AggregateSummary, options: TextFormatOptions<'_>) -> String {
    let failures = if options.use_color && summary.failures > 0 {
        summary.failures.to_string().red().bold().to_string()
    } else {
        summary.failures.to_string()
    };
    let earliest = format_timestamp(summary.earliest_timestamp, options.timestamp_format);

    let mut out = String::from("Test Summary\n");
    out.push_str(&count_line("Files", summary.file_count));
    out.push_str(&count_line("Total tests", summary.total));
    out.push_str(&count_line("Executed", summary.executed));
    out.push_str(&count_line("Passed", summary.passed));
    out.push_str(&count_line("Failed", failures));
    out.push_str(&count_line("Skipped (no reason)", summary.skip_without_reason));
    out.push_str(&count_line("Skipped (with reason)", summary.skip_with_reason));
    out.push_str(&count_line(
        "Execution rate (%)",
        summary.accounted_execution_rate().display_or("N/A"),
    ));
    out.push_str(&count_line(
        "Execution rate without skipped (%)",
        summary.execution_rate().display_or("N/A"),
    ));
    out.push_str(&count_line("Pass rate (%)", summary.pass_rate().display_or("N/A")));
    out.push_str(&count_line(
        "Earliest timestamp",
        if earliest.is_empty() { "-" } else { earliest.as_str() },
    ));
    out
}

/// Suite totals plus one line per suite.
#[must_use]
pub fn format_suite_rollup(rollup: &SuiteRollup, use_color: bool) -> String {
    let mut out = format!(
        "Suites: {} total, {} passed, {} failed, {} skipped\n",
        rollup.suite_total,
        rollup.suite_passed(),
        rollup.suite_failures,
        rollup.suite_skipped
    );
    for suite in &rollup.suites {
        let label = format_status_label(suite.status.as_case_status(), use_color);
        let name = if suite.name.is_empty() { "(no suite)" } else { suite.name.as_str() };
        out.push_str(&format!(
            "  {label:<8} {name} ({} cases, {} failed, {} skipped)\n",
            suite.case_count, suite.failed_count, suite.skipped_count
        ));
    }
    out
}

/// Static-analysis totals plus per-component counts.
#[must_use]
pub fn format_sa_summary(summary: &SaSummary) -> String {
    let mut out = String::from("Static Analysis Summary\n");
    out.push_str(&count_line("Components", summary.total_components));
    out.push_str(&count_line("Files", summary.total_files));
    out.push_str(&count_line("Violations", summary.total_violations));
    out.push_str("By component:\n");
    for (component, count) in &summary.comp_counts {
        let files = summary.comp_files_count.get(component).copied().unwrap_or(0);
        out.push_str(&format!("  {component:<24} {count:>6} ({files} files)\n"));
    }
    out.push_str("By severity:\n");
    for (severity, count) in &summary.severity_counts {
        out.push_str(&format!("  {severity:<24} {count:>6}\n"));
    }
    out
}

/// Whether every suite passed; used for a one-word verdict.
#[must_use]
pub fn verdict(rollup: &SuiteRollup) -> SuiteStatus {
    if rollup.suite_failures > 0 {
        SuiteStatus::Failed
    } else if rollup.suite_total > 0 && rollup.suite_skipped == rollup.suite_total {
        SuiteStatus::Skipped
    } else {
        SuiteStatus::Passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate, suite_rollup};
    use crate::parser::parse_str;

    const PLAIN: TextFormatOptions<'static> = TextFormatOptions {
        use_color: false,
        timestamp_format: "%Y-%m-%d %H:%M:%S",
    };

    fn batch() -> crate::aggregate::BatchResult {
        let xml = r#"<testsuite failures="1">
            <testcase classname="A" name="a"/>
            <testcase classname="A" name="b"><failure/></testcase>
            <testcase classname="B" name="c"><skipped/></testcase>
        </testsuite>"#;
        aggregate(vec![parse_str("t.xml", xml).unwrap()])
    }

    #[test]
    fn test_status_label_plain() {
        assert_eq!(format_status_label(CaseStatus::Failed, false), "failed");
        assert!(format_status_label(CaseStatus::Failed, true).contains("failed"));
    }

    #[test]
    fn test_format_summary_plain() {
        let text = format_summary(&batch().summary(), PLAIN);
        assert!(text.starts_with("Test Summary\n"));
        assert!(text.contains("Total tests"));
        assert!(text.contains(" 3\n"));
        assert!(text.contains("Pass rate (%)"));
        assert!(text.contains("33.3"));
        assert!(text.contains("Earliest timestamp"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_format_suite_rollup() {
        let rollup = suite_rollup(&batch().records);
        let text = format_suite_rollup(&rollup, false);
        assert!(text.starts_with("Suites: 2 total, 0 passed, 1 failed, 1 skipped\n"));
        assert!(text.contains("failed   A (2 cases, 1 failed, 0 skipped)"));
        assert_eq!(verdict(&rollup), SuiteStatus::Failed);
    }

    #[test]
    fn test_format_sa_summary() {
        let summary = SaSummary {
            total_components: 1,
            total_files: 1,
            total_violations: 2,
            comp_counts: [("net".to_string(), 2)].into_iter().collect(),
            comp_files_count: [("net".to_string(), 1)].into_iter().collect(),
            ..SaSummary::default()
        };
        let text = format_sa_summary(&summary);
        assert!(text.contains("net"));
        assert!(text.contains("(1 files)"));
    }
}
