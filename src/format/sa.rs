//! Static-analysis component pages (`SA_Report_<component>.html`).

use super::html::{PAGE_TAIL, header_row, html_escape, page_head, row_html};
use crate::sa::ComponentReport;
use std::collections::BTreeMap;

/// `SA_Report_<component>.html`
#[must_use]
pub fn component_file_name(component: &str) -> String {
    let safe: String = component
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();
    format!("SA_Report_{safe}.html")
}

fn counts_table(title: &str, key_header: &str, counts: &BTreeMap<String, usize>) -> String {
    let mut html = format!("<h2>{}</h2>\n<table>\n", html_escape(title));
    html.push_str(&header_row(&[key_header, "Count"]));
    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (key, count) in sorted {
        html.push_str(&row_html(&[html_escape(key), count.to_string()], false));
    }
    html.push_str("</table>\n");
    html
}

/// Render the page for one component.
#[must_use]
pub fn render_component(component: &str, report: &ComponentReport, resource_prefix: &str) -> String {
    let title = format!("Static Analysis Report - {component}");
    let mut html = page_head(&title, resource_prefix, false);

    html.push_str(&format!(
        "<p>Total violations: <strong>{}</strong></p>\n",
        report.violations
    ));
    html.push_str(&counts_table("Violations by Severity", "Severity", &report.severity_counts));
    html.push_str(&counts_table("Violations by Rule", "Rule ID", &report.ruleid_counts));
    html.push_str(&counts_table("Violations by File", "File", &report.file_counts));

    html.push_str("<h2>Violation Details</h2>\n");
    for (file, violations) in &report.file_violations {
        html.push_str(&format!("<h3>{}</h3>\n<table>\n", html_escape(file)));
        html.push_str(&header_row(&["Line", "Rule ID", "Severity", "Description"]));
        for v in violations {
            html.push_str(&row_html(
                &[
                    html_escape(&v.line),
                    html_escape(&v.rule_id),
                    html_escape(&v.severity),
                    html_escape(&v.description),
                ],
                false,
            ));
        }
        html.push_str("</table>\n");
    }

    html.push_str(PAGE_TAIL);
    html
}
