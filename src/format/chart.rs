//! Chart payloads embedded in report pages as `data-labels` / `data-values`.

use crate::aggregate::{AggregateSummary, Rate};
use crate::error::Result;
use serde::Serialize;

pub const EXEC_CHART: &str = "execChart";
pub const EXEC_NO_SKIP_CHART: &str = "execNoSkipChart";
pub const PASS_CHART: &str = "passChart";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartPayload {
    /// One labelled percentage, rounded to two decimals; no values when not applicable.
    #[must_use]
    pub fn single(label: &str, rate: Rate) -> Self {
        Self {
            labels: vec![label.to_string()],
            values: rate.as_percent().map(round2).into_iter().collect(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn labels_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.labels)?)
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn values_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.values)?)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The three report charts as `(canvas id, payload)`.
#[must_use]
pub fn report_charts(summary: &AggregateSummary) -> [(&'static str, ChartPayload); 3] {
    [
        (
            EXEC_CHART,
            ChartPayload::single("Execution Rate (%)", summary.accounted_execution_rate()),
        ),
        (
            EXEC_NO_SKIP_CHART,
            ChartPayload::single(
                "Execution Rate (without Skipped) (%)",
                summary.execution_rate(),
            ),
        ),
        (PASS_CHART, ChartPayload::single("Pass Rate (%)", summary.pass_rate())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_rounds_percent() {
        let payload = ChartPayload::single("Pass Rate (%)", Rate::Ratio(2.0 / 3.0));
        assert_eq!(payload.values, vec![66.67]);
        assert_eq!(payload.values_json().unwrap(), "[66.67]");
        assert_eq!(payload.labels_json().unwrap(), r#"["Pass Rate (%)"]"#);
    }

    #[test]
    fn test_not_applicable_has_no_values() {
        let payload = ChartPayload::single("Pass Rate (%)", Rate::NotApplicable);
        assert!(payload.values.is_empty());
        assert_eq!(payload.values_json().unwrap(), "[]");
    }
}
