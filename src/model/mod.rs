//! Core data types for `gtest_report`.
//!
//! - `CaseStatus` - outcome of one test case
//! - `TestCaseRecord` - one `<testcase>` element
//! - `TestFileRecord` - one parsed result file
//! - `SuiteStatus` - rolled-up outcome of all cases in a suite

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Success,
    Failed,
    Skipped,
}

impl CaseStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = crate::error::ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "success" | "passed" | "ok" => Ok(Self::Success),
            "failed" | "failure" => Ok(Self::Failed),
            "skipped" | "disabled" => Ok(Self::Skipped),
            other => Err(crate::error::ReportError::Config(format!(
                "unknown case status '{other}' (expected success, failed or skipped)"
            ))),
        }
    }
}

/// Rolled-up outcome of a suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteStatus {
    Passed,
    Failed,
    Skipped,
}

impl SuiteStatus {
    /// Any failure dominates; all-skipped is skipped; anything else passed.
    #[must_use]
    pub fn from_cases<'a, I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = &'a CaseStatus>,
    {
        let mut all_skipped = true;
        let mut any = false;
        for status in statuses {
            any = true;
            match status {
                CaseStatus::Failed => return Self::Failed,
                CaseStatus::Success => all_skipped = false,
                CaseStatus::Skipped => {}
            }
        }
        if any && all_skipped {
            Self::Skipped
        } else {
            Self::Passed
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    /// Case status used to pick an icon for this suite.
    #[must_use]
    pub const fn as_case_status(&self) -> CaseStatus {
        match self {
            Self::Passed => CaseStatus::Success,
            Self::Failed => CaseStatus::Failed,
            Self::Skipped => CaseStatus::Skipped,
        }
    }
}

impl fmt::Display for SuiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One executed or skipped test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseRecord {
    /// `<classname>.<name>`
    pub full_name: String,
    pub elapsed_seconds: f64,
    pub status: CaseStatus,
    /// Failure (or skip) message and body, trimmed; empty for plain successes.
    pub failure_detail: String,
}

impl TestCaseRecord {
    /// Suite part of the name (before the first `.`), empty if there is none.
    #[must_use]
    pub fn suite_name(&self) -> &str {
        self.split_name().0
    }

    /// Case part of the name (after the first `.`), the whole name if there is no `.`.
    #[must_use]
    pub fn case_name(&self) -> &str {
        self.split_name().1
    }

    #[must_use]
    pub fn split_name(&self) -> (&str, &str) {
        self.full_name.split_once('.').unwrap_or(("", &self.full_name))
    }

    /// A skip that carries an explanatory message.
    #[must_use]
    pub fn is_skip_with_reason(&self) -> bool {
        self.status == CaseStatus::Skipped && !self.failure_detail.trim().is_empty()
    }
}

/// Aggregate of one input file.
///
/// `failed_cases` comes from the suites' declared `failures` attributes while
/// `total_cases` and `skipped_cases` count `<testcase>` elements; the two
/// sources are independent and may disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestFileRecord {
    pub source_name: String,
    pub total_cases: usize,
    pub failed_cases: usize,
    pub skipped_cases: usize,
    pub total_duration_seconds: f64,
    pub earliest_timestamp: Option<NaiveDateTime>,
    pub cases: Vec<TestCaseRecord>,
}

impl TestFileRecord {
    /// Number of cases carrying a `<failure>` element.
    #[must_use]
    pub fn failed_case_count(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| c.status == CaseStatus::Failed)
            .count()
    }

    /// Iterate over failed cases in document order.
    pub fn failed(&self) -> impl Iterator<Item = &TestCaseRecord> {
        self.cases.iter().filter(|c| c.status == CaseStatus::Failed)
    }
}
