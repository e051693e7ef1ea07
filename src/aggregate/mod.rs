//! Aggregation of parsed result files.
//!
//! [`parse_many`] parses a batch of files and folds them into a
//! [`BatchResult`]; [`BatchResult::summary`] derives rates and the skip
//! breakdown; [`suite_rollup`] groups cases by suite across the batch.

use crate::error::Result;
use crate::model::{CaseStatus, SuiteStatus, TestCaseRecord, TestFileRecord};
use crate::parser;
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Records of one batch plus the running sums.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub records: Vec<TestFileRecord>,
    /// Sum of `total_cases`.
    pub total: usize,
    /// Sum of declared `failed_cases`.
    pub failures: usize,
    /// Sum of `skipped_cases`.
    pub skipped: usize,
    /// Each record's earliest timestamp, where present, in record order.
    pub timestamps: Vec<NaiveDateTime>,
}

impl BatchResult {
    /// Split into `(records, total, failures, skipped, timestamps)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<TestFileRecord>, usize, usize, usize, Vec<NaiveDateTime>) {
        (
            self.records,
            self.total,
            self.failures,
            self.skipped,
            self.timestamps,
        )
    }

    #[must_use]
    pub fn earliest_timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamps.iter().min().copied()
    }

    /// Derived counts and rates for this batch.
    #[must_use]
    pub fn summary(&self) -> AggregateSummary {
        let skip_with_reason = self
            .records
            .iter()
            .flat_map(|r| r.cases.iter())
            .filter(|c| c.is_skip_with_reason())
            .count();
        let executed = self.total.saturating_sub(self.skipped);

        AggregateSummary {
            file_count: self.records.len(),
            total: self.total,
            failures: self.failures,
            skipped: self.skipped,
            executed,
            passed: executed as i64 - self.failures as i64,
            skip_with_reason,
            skip_without_reason: self.skipped.saturating_sub(skip_with_reason),
            earliest_timestamp: self.earliest_timestamp(),
            all_timestamps: self.timestamps.clone(),
        }
    }
}

/// Parse every path in order and fold the records.
///
/// # Errors
///
/// The first file that fails to parse aborts the batch; its error is
/// returned unchanged.
pub fn parse_many<P: AsRef<Path>>(paths: &[P]) -> Result<BatchResult> {
    parse_many_with(paths, |_| {})
}

/// Like [`parse_many`], calling `on_file` after each file is parsed.
///
/// # Errors
///
/// Same as [`parse_many`].
pub fn parse_many_with<P, F>(paths: &[P], mut on_file: F) -> Result<BatchResult>
where
    P: AsRef<Path>,
    F: FnMut(&Path),
{
    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        records.push(parser::parse_file(path)?);
        on_file(path);
    }
    Ok(aggregate(records))
}

/// Fold already-parsed records into a [`BatchResult`].
#[must_use]
pub fn aggregate(records: Vec<TestFileRecord>) -> BatchResult {
    let mut batch = BatchResult::default();
    for record in &records {
        batch.total += record.total_cases;
        batch.failures += record.failed_cases;
        batch.skipped += record.skipped_cases;
        if let Some(ts) = record.earliest_timestamp {
            batch.timestamps.push(ts);
        }
    }
    batch.records = records;

    debug!(
        files = batch.records.len(),
        total = batch.total,
        failures = batch.failures,
        skipped = batch.skipped,
        "Aggregated batch"
    );
    batch
}

/// A ratio that is undefined when the denominator is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    NotApplicable,
    Ratio(f64),
}

impl Rate {
    #[must_use]
    pub fn of(numerator: i64, denominator: usize) -> Self {
        if denominator == 0 {
            Self::NotApplicable
        } else {
            Self::Ratio(numerator as f64 / denominator as f64)
        }
    }

    /// Percentage in `[0, 100]` for consistent inputs.
    #[must_use]
    pub fn as_percent(self) -> Option<f64> {
        match self {
            Self::NotApplicable => None,
            Self::Ratio(r) => Some(r * 100.0),
        }
    }

    /// Percentage with one decimal, or `fallback` when not applicable.
    #[must_use]
    pub fn display_or(self, fallback: &str) -> String {
        self.as_percent()
            .map_or_else(|| fallback.to_string(), |p| format!("{p:.1}"))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_or("N/A"))
    }
}

impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::NotApplicable => serializer.serialize_none(),
            Self::Ratio(r) => serializer.serialize_f64(*r),
        }
    }
}

/// Counts and rates derived from a [`BatchResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateSummary {
    pub file_count: usize,
    pub total: usize,
    pub failures: usize,
    pub skipped: usize,
    pub executed: usize,
    /// `executed - failures`; negative when declared failures exceed executed cases.
    pub passed: i64,
    pub skip_with_reason: usize,
    pub skip_without_reason: usize,
    pub earliest_timestamp: Option<NaiveDateTime>,
    /// Per-file earliest timestamps, in record order.
    pub all_timestamps: Vec<NaiveDateTime>,
}

impl AggregateSummary {
    #[must_use]
    pub fn execution_rate(&self) -> Rate {
        Rate::of(self.executed as i64, self.total)
    }

    /// Executed cases plus skips that carry a reason, over all cases.
    #[must_use]
    pub fn accounted_execution_rate(&self) -> Rate {
        let accounted = self.passed + self.failures as i64 + self.skip_with_reason as i64;
        Rate::of(accounted, self.total)
    }

    #[must_use]
    pub fn pass_rate(&self) -> Rate {
        Rate::of(self.passed, self.total)
    }
}

/// Outcome of one suite (cases sharing the part of `full_name` before the first `.`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteOutcome {
    pub name: String,
    pub status: SuiteStatus,
    pub case_count: usize,
    pub failed_count: usize,
    pub skipped_count: usize,
}

impl SuiteOutcome {
    fn from_statuses(name: String, statuses: &[CaseStatus]) -> Self {
        let count = |wanted: CaseStatus| statuses.iter().filter(|s| **s == wanted).count();
        Self {
            status: SuiteStatus::from_cases(statuses),
            case_count: statuses.len(),
            failed_count: count(CaseStatus::Failed),
            skipped_count: count(CaseStatus::Skipped),
            name,
        }
    }
}

/// Suites seen in one file, in first-appearance order.
///
/// Counts cover only this file's cases; `status` is the suite's outcome
/// across the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSuites {
    pub source_name: String,
    pub suites: Vec<SuiteOutcome>,
}

/// Suite-level totals across a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteRollup {
    pub suite_total: usize,
    pub suite_failures: usize,
    pub suite_skipped: usize,
    pub timestamps: Vec<NaiveDateTime>,
    /// One entry per suite name across all files, in first-appearance order.
    pub suites: Vec<SuiteOutcome>,
    pub suites_by_file: Vec<FileSuites>,
}

impl SuiteRollup {
    #[must_use]
    pub fn suite_passed(&self) -> usize {
        self.suite_total
            .saturating_sub(self.suite_failures)
            .saturating_sub(self.suite_skipped)
    }

    #[must_use]
    pub fn pass_rate(&self) -> Rate {
        Rate::of(self.suite_passed() as i64, self.suite_total)
    }

    /// Batch-wide status of a suite, if it appeared.
    #[must_use]
    pub fn status_of(&self, suite: &str) -> Option<SuiteStatus> {
        self.suites.iter().find(|s| s.name == suite).map(|s| s.status)
    }
}

/// Case statuses grouped by suite name, in first-appearance order.
fn group_by_suite<'a, I>(cases: I) -> Vec<(String, Vec<CaseStatus>)>
where
    I: IntoIterator<Item = &'a TestCaseRecord>,
{
    let mut groups: Vec<(String, Vec<CaseStatus>)> = Vec::new();
    for case in cases {
        let suite = case.suite_name();
        match groups.iter_mut().find(|(name, _)| name == suite) {
            Some((_, statuses)) => statuses.push(case.status),
            None => groups.push((suite.to_string(), vec![case.status])),
        }
    }
    groups
}

/// Group all cases of the batch by suite name.
///
/// A suite split over several files is one suite; a failure in any file
/// fails it.
#[must_use]
pub fn suite_rollup(records: &[TestFileRecord]) -> SuiteRollup {
    let suites: Vec<SuiteOutcome> = group_by_suite(records.iter().flat_map(|r| r.cases.iter()))
        .into_iter()
        .map(|(name, statuses)| SuiteOutcome::from_statuses(name, &statuses))
        .collect();

    let mut rollup = SuiteRollup {
        suite_total: suites.len(),
        suite_failures: suites
            .iter()
            .filter(|s| s.status == SuiteStatus::Failed)
            .count(),
        suite_skipped: suites
            .iter()
            .filter(|s| s.status == SuiteStatus::Skipped)
            .count(),
        suites,
        ..SuiteRollup::default()
    };

    for record in records {
        let file_suites: Vec<SuiteOutcome> = group_by_suite(&record.cases)
            .into_iter()
            .map(|(name, statuses)| {
                let mut outcome = SuiteOutcome::from_statuses(name, &statuses);
                if let Some(status) = rollup.status_of(&outcome.name) {
                    outcome.status = status;
                }
                outcome
            })
            .collect();
        if let Some(ts) = record.earliest_timestamp {
            rollup.timestamps.push(ts);
        }
        rollup.suites_by_file.push(FileSuites {
            source_name: record.source_name.clone(),
            suites: file_suites,
        });
    }

    debug!(
        suites = rollup.suite_total,
        failed = rollup.suite_failures,
        skipped = rollup.suite_skipped,
        "Rolled up suites"
    );
    rollup
}
