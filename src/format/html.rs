//! Per-category HTML report pages.

use super::StatusIcons;
use super::chart::report_charts;
use crate::aggregate::{BatchResult, Rate, SuiteRollup, suite_rollup};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::model::{CaseStatus, TestCaseRecord, TestFileRecord};
use crate::util::time::format_timestamp;

/// Presentation settings shared by all pages.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    pub icons: &'a StatusIcons,
    pub resource_prefix: &'a str,
    pub timestamp_format: &'a str,
    /// Append the per-suite rollup section.
    pub suite_rollup: bool,
}

impl<'a> RenderOptions<'a> {
    #[must_use]
    pub fn from_config(config: &'a ReportConfig) -> Self {
        Self {
            icons: &config.icons,
            resource_prefix: &config.resource_prefix,
            timestamp_format: &config.timestamp_format,
            suite_rollup: false,
        }
    }

    #[must_use]
    pub const fn with_suite_rollup(mut self, enabled: bool) -> Self {
        self.suite_rollup = enabled;
        self
    }

    fn icon(&self, status: CaseStatus) -> String {
        self.icons.img_tag(status, self.resource_prefix)
    }

    fn timestamp(&self, ts: Option<chrono::NaiveDateTime>) -> String {
        format_timestamp(ts, self.timestamp_format)
    }
}

/// Title parts of a report page.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub project: String,
    pub report_name: String,
}

impl ReportContext {
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} {}", self.project, self.report_name)
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Anchor id: anything outside `[A-Za-z0-9_]` becomes `_`.
#[must_use]
pub fn sanitize_id(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// One table row from already-formatted cells.
#[must_use]
pub fn row_html(cells: &[String], header: bool) -> String {
    let tag = if header { "th" } else { "td" };
    let mut row = String::from("<tr>");
    for cell in cells {
        row.push_str(&format!("<{tag}>{cell}</{tag}>"));
    }
    row.push_str("</tr>\n");
    row
}

pub(crate) fn header_row(cells: &[&str]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| html_escape(c)).collect();
    row_html(&cells, true)
}

/// Red count when non-zero.
pub(crate) fn failure_count_html(count: usize) -> String {
    if count > 0 {
        format!(r#"<span class="failed">{count}</span>"#)
    } else {
        "0".to_string()
    }
}

fn percent_2dp(rate: Rate) -> String {
    rate.as_percent()
        .map_or_else(String::new, |p| format!("{p:.2}%"))
}

fn case_anchor(file: &TestFileRecord, case: &TestCaseRecord) -> String {
    format!("test_{}", sanitize_id(&format!("{}_{}", file.source_name, case.full_name)))
}

fn file_anchor(file: &TestFileRecord) -> String {
    format!("detail_{}", sanitize_id(&file.source_name))
}

const STYLE: &str = r"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            background: #f5f5f5;
        }
        h1 { color: #333; border-bottom: 2px solid #333; padding-bottom: 10px; }
        h2 { color: #555; margin-top: 30px; }
        table {
            width: 100%;
            border-collapse: collapse;
            background: white;
            margin: 15px 0;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        th, td { padding: 8px 12px; text-align: left; border-bottom: 1px solid #eee; }
        th { background: #f8f9fa; font-weight: 600; }
        .failed { color: red; font-weight: bold; }
        .charts { display: flex; gap: 20px; }
        .chart { position: relative; width: 300px; height: 300px; }
        pre.failure-detail {
            background: #fff0f0;
            border-left: 4px solid #ef4444;
            padding: 10px;
            margin: 0;
            white-space: pre-wrap;
        }
";

pub(crate) fn page_head(title: &str, resource_prefix: &str, with_charts: bool) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"UTF-8\">\n");
    html.push_str(&format!("    <title>{}</title>\n", html_escape(title)));
    html.push_str(&format!("    <style>{STYLE}    </style>\n"));
    if with_charts {
        let prefix = html_escape(resource_prefix);
        html.push_str(&format!(
            "    <script src=\"{prefix}/chart.min.js\"></script>\n    <script src=\"{prefix}/charts.js\"></script>\n"
        ));
    }
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(title)));
    html
}

pub(crate) const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Render one category report.
///
/// # Errors
///
/// Returns an error if a chart payload cannot be serialized.
pub fn render_report(
    ctx: &ReportContext,
    batch: &BatchResult,
    options: &RenderOptions<'_>,
) -> Result<String> {
    let summary = batch.summary();
    let mut html = page_head(&ctx.title(), options.resource_prefix, true);

    // Overall summary
    html.push_str("<h2>Overall Test Summary</h2>\n<table class=\"summary\">\n");
    let overall = [
        ("Total XML files", summary.file_count.to_string()),
        ("Total Tests", summary.total.to_string()),
        ("Executed Tests", summary.executed.to_string()),
        ("Execution Rate (%)", percent_2dp(summary.accounted_execution_rate())),
        (
            "Execution Rate (without Skipped) (%)",
            percent_2dp(summary.execution_rate()),
        ),
        ("Pass Rate (%)", percent_2dp(summary.pass_rate())),
        ("Failed Tests", failure_count_html(summary.failures)),
        (
            "Skipped (No Reason Specified)",
            summary.skip_without_reason.to_string(),
        ),
        ("Skipped (Reason Specified)", summary.skip_with_reason.to_string()),
        ("Earliest Timestamp", options.timestamp(summary.earliest_timestamp)),
    ];
    for (label, value) in overall {
        html.push_str(&row_html(&[html_escape(label), value], false));
    }
    html.push_str("</table>\n");

    // Charts
    html.push_str("<div class=\"charts\">\n");
    for (id, payload) in report_charts(&summary) {
        html.push_str(&format!(
            "<div class=\"chart\"><canvas id=\"{id}\" data-labels=\"{}\" data-values=\"{}\"></canvas></div>\n",
            html_escape(&payload.labels_json()?),
            html_escape(&payload.values_json()?)
        ));
    }
    html.push_str("</div>\n");

    // Failed test cases
    html.push_str("<h2>Failed Test Cases</h2>\n<table class=\"failed-cases\">\n");
    html.push_str(&header_row(&["Test File", "Test Suite", "Test Case", "Result"]));
    for file in &batch.records {
        for case in file.failed() {
            let link = format!(
                "<a href=\"#{}\">{}</a>",
                case_anchor(file, case),
                html_escape(case.case_name())
            );
            html.push_str(&row_html(
                &[
                    html_escape(&file.source_name),
                    html_escape(case.suite_name()),
                    link,
                    options.icon(case.status),
                ],
                false,
            ));
        }
    }
    html.push_str("</table>\n");

    // File summary
    html.push_str("<h2>Test File Summary</h2>\n<table class=\"files\">\n");
    html.push_str(&header_row(&[
        "Test File",
        "Total Tests",
        "Failed",
        "Skipped",
        "Duration (s)",
        "Timestamp",
    ]));
    for file in &batch.records {
        html.push_str(&row_html(
            &[
                format!(
                    "<a href=\"#{}\">{}</a>",
                    file_anchor(file),
                    html_escape(&file.source_name)
                ),
                file.total_cases.to_string(),
                failure_count_html(file.failed_cases),
                file.skipped_cases.to_string(),
                format!("{:.3}", file.total_duration_seconds),
                options.timestamp(file.earliest_timestamp),
            ],
            false,
        ));
    }
    html.push_str("</table>\n");

    if options.suite_rollup {
        html.push_str(&render_suite_rollup(&suite_rollup(&batch.records), options));
    }

    // Per-file details
    html.push_str("<h2>Detailed Test Results</h2>\n");
    for file in &batch.records {
        html.push_str(&render_file_detail(file, options));
    }

    html.push_str(PAGE_TAIL);
    Ok(html)
}

fn render_file_detail(file: &TestFileRecord, options: &RenderOptions<'_>) -> String {
    let mut html = format!(
        "<h3 id=\"{}\">{}</h3>\n<table class=\"utests\">\n",
        file_anchor(file),
        html_escape(&file.source_name)
    );
    html.push_str(
        "  <colgroup><col style=\"width:35%;\"><col style=\"width:35%;\"><col style=\"width:15%;\"><col style=\"width:15%;\"></colgroup>\n",
    );
    html.push_str(&header_row(&["Test Suite", "Test Case", "Time (s)", "Result"]));

    for case in &file.cases {
        html.push_str(&format!(
            "<tr id=\"{}\"><td>{}</td><td>{}</td><td>{:.3}</td><td>{}</td></tr>\n",
            case_anchor(file, case),
            html_escape(case.suite_name()),
            html_escape(case.case_name()),
            case.elapsed_seconds,
            options.icon(case.status)
        ));
        if !case.failure_detail.is_empty() {
            html.push_str(&format!(
                "<tr class=\"detail\"><td colspan=\"4\"><pre class=\"failure-detail\">{}</pre></td></tr>\n",
                html_escape(&case.failure_detail)
            ));
        }
    }
    html.push_str("</table><br/>\n");
    html
}

fn render_suite_rollup(rollup: &SuiteRollup, options: &RenderOptions<'_>) -> String {
    let mut html = String::from("<h2>Test Suite Summary</h2>\n<table class=\"suite-summary\">\n");
    for (label, value) in [
        ("Total Suites", rollup.suite_total.to_string()),
        ("Passed Suites", rollup.suite_passed().to_string()),
        ("Failed Suites", failure_count_html(rollup.suite_failures)),
        ("Skipped Suites", rollup.suite_skipped.to_string()),
        ("Suite Pass Rate (%)", percent_2dp(rollup.pass_rate())),
    ] {
        html.push_str(&row_html(&[html_escape(label), value], false));
    }
    html.push_str("</table>\n<table class=\"suites\">\n");
    html.push_str(&header_row(&[
        "Test File",
        "Test Suite",
        "Cases",
        "Failed",
        "Skipped",
        "Result",
    ]));
    for file in &rollup.suites_by_file {
        for suite in &file.suites {
            html.push_str(&row_html(
                &[
                    html_escape(&file.source_name),
                    html_escape(&suite.name),
                    suite.case_count.to_string(),
                    failure_count_html(suite.failed_count),
                    suite.skipped_count.to_string(),
                    options.icon(suite.status.as_case_status()),
                ],
                false,
            ));
        }
    }
    html.push_str("</table>\n");
    html
}
