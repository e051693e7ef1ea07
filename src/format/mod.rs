//! Output formatting for `gtest_report`.
//!
//! Everything here consumes the parser/aggregator output and owns all
//! markup; nothing feeds back into parsing.
//!
//! - [`html`] - per-category report pages
//! - [`index`] - the `index.html` overview across categories
//! - [`chart`] - JSON payloads for the chart canvases
//! - [`sa`] - static-analysis component pages
//! - [`text`] - console summaries
//! - [`csv`] - case export with `--fields` selection

pub mod chart;
pub mod csv;
pub mod html;
pub mod index;
pub mod sa;
pub mod text;

pub use html::{RenderOptions, ReportContext, html_escape, render_report, sanitize_id};
pub use index::{BuildInfo, StageOutcome, StageRow, render_index};

use crate::model::CaseStatus;
use serde::{Deserialize, Serialize};

/// Icon file per case status.
///
/// Passed explicitly to the renderers; there is no global icon table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusIcons {
    pub success: String,
    pub failed: String,
    pub skipped: String,
}

impl Default for StatusIcons {
    fn default() -> Self {
        Self {
            success: "gtest_report_ok.png".to_string(),
            failed: "gtest_report_notok.png".to_string(),
            skipped: "gtest_report_disable.png".to_string(),
        }
    }
}

impl StatusIcons {
    #[must_use]
    pub fn file_for(&self, status: CaseStatus) -> &str {
        match status {
            CaseStatus::Success => &self.success,
            CaseStatus::Failed => &self.failed,
            CaseStatus::Skipped => &self.skipped,
        }
    }

    /// `<img>` tag for `status`, served from `resource_prefix`.
    #[must_use]
    pub fn img_tag(&self, status: CaseStatus, resource_prefix: &str) -> String {
        let file = self.file_for(status);
        let src = if resource_prefix.is_empty() {
            file.to_string()
        } else {
            format!("{resource_prefix}/{file}")
        };
        format!(
            r#"<img src="{}" alt="{}" class="icon" width="16" height="16"/>"#,
            html_escape(&src),
            status.as_str()
        )
    }
}
