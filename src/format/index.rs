//! The `index.html` overview across report categories.

use super::html::{
    PAGE_TAIL, RenderOptions, failure_count_html, header_row, html_escape, page_head, row_html,
};
use crate::aggregate::{AggregateSummary, Rate};
use crate::config::CategoryConfig;
use crate::util::time::format_timestamp;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Placeholder for a stage without input files.
pub const NOT_TESTED: &str = "NT";
/// Placeholder for a stage whose inputs failed to parse.
pub const UNAVAILABLE: &str = "N/A";

/// Build metadata shown at the top of the index.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildInfo {
    pub project: String,
    pub branch: Option<String>,
    pub tag: Option<String>,
    pub commit: Option<String>,
    pub build: Option<String>,
    pub report_date: Option<NaiveDateTime>,
}

/// What happened for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StageOutcome {
    /// No input files for the stage.
    NotTested,
    /// Input files existed but the batch failed; carries the error message.
    Unavailable { error: String },
    Summary(AggregateSummary),
}

#[derive(Debug, Clone, Serialize)]
pub struct StageRow {
    pub category: CategoryConfig,
    pub outcome: StageOutcome,
}

impl StageRow {
    /// The nine "Summary by Test Stage" cells, already HTML-formatted.
    #[must_use]
    pub fn summary_cells(&self, options: &RenderOptions<'_>) -> Vec<String> {
        let name = html_escape(&self.category.display_name);
        match &self.outcome {
            StageOutcome::NotTested => placeholder_cells(name, NOT_TESTED, 8),
            StageOutcome::Unavailable { error } => {
                let mut cells = placeholder_cells(name, UNAVAILABLE, 7);
                cells.push(format!(
                    r#"<span class="failed" title="{}">{UNAVAILABLE}</span>"#,
                    html_escape(error)
                ));
                cells
            }
            StageOutcome::Summary(summary) => vec![
                name,
                summary.total.to_string(),
                summary.executed.to_string(),
                summary.passed.to_string(),
                failure_count_html(summary.failures),
                summary.skip_without_reason.to_string(),
                summary.skip_with_reason.to_string(),
                format_timestamp(summary.earliest_timestamp, options.timestamp_format),
                format!(
                    r#"<a href="{}">View</a>"#,
                    html_escape(&self.category.report_file_name())
                ),
            ],
        }
    }

    /// Stage name plus execution rate, execution rate without skipped and pass rate.
    #[must_use]
    pub fn coverage_cells(&self) -> Vec<String> {
        let name = html_escape(&self.category.display_name);
        match &self.outcome {
            StageOutcome::NotTested => placeholder_cells(name, NOT_TESTED, 3),
            StageOutcome::Unavailable { .. } => placeholder_cells(name, UNAVAILABLE, 3),
            StageOutcome::Summary(summary) => vec![
                name,
                coverage_rate(summary.accounted_execution_rate()),
                coverage_rate(summary.execution_rate()),
                coverage_rate(summary.pass_rate()),
            ],
        }
    }
}

// A stage with files but zero cases shows 0.0 rather than NT.
fn coverage_rate(rate: Rate) -> String {
    match rate {
        Rate::NotApplicable => "0.0".to_string(),
        Rate::Ratio(_) => rate.display_or(NOT_TESTED),
    }
}

fn placeholder_cells(name: String, placeholder: &str, count: usize) -> Vec<String> {
    let mut cells = Vec::with_capacity(count + 1);
    cells.push(name);
    cells.extend(std::iter::repeat_n(placeholder.to_string(), count));
    cells
}

fn optional(value: Option<&String>) -> String {
    value.map_or_else(|| "-".to_string(), |v| html_escape(v))
}

/// Render `index.html`.
#[must_use]
pub fn render_index(build: &BuildInfo, stages: &[StageRow], options: &RenderOptions<'_>) -> String {
    let title = format!("{} Test Report", build.project);
    let mut html = page_head(&title, options.resource_prefix, false);

    html.push_str("<h2>Build Information</h2>\n<table class=\"build-info\">\n");
    let report_date = build
        .report_date
        .map_or_else(|| "-".to_string(), |d| d.format(options.timestamp_format).to_string());
    for (label, value) in [
        ("Project", html_escape(&build.project)),
        ("Branch", optional(build.branch.as_ref())),
        ("Release Tag", optional(build.tag.as_ref())),
        ("Commit ID", optional(build.commit.as_ref())),
        ("Build Number", optional(build.build.as_ref())),
        ("Report Date", html_escape(&report_date)),
    ] {
        html.push_str(&row_html(&[html_escape(label), value], false));
    }
    html.push_str("</table>\n");

    html.push_str("<h2>Overall Results</h2>\n");
    html.push_str("<h3>Summary by Test Stage</h3>\n<table class=\"stages\">\n");
    html.push_str(&header_row(&[
        "Test Stage",
        "Total",
        "Executed",
        "Passed",
        "Failed",
        "Skipped (No Reason)",
        "Skipped (With Reason)",
        "Earliest Timestamp",
        "Report",
    ]));
    for stage in stages {
        html.push_str(&row_html(&stage.summary_cells(options), false));
    }
    html.push_str("</table>\n");

    html.push_str("<h3>Test Coverage</h3>\n<table class=\"coverage\">\n");
    html.push_str(&header_row(&[
        "Test Stage",
        "Execution Rate (%)",
        "Execution Rate (without Skipped) (%)",
        "Pass Rate (%)",
    ]));
    for stage in stages {
        html.push_str(&row_html(&stage.coverage_cells(), false));
    }
    html.push_str("</table>\n");

    html.push_str(PAGE_TAIL);
    html
}
