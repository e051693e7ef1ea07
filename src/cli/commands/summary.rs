//! `summary`: aggregate numbers on the console, as JSON, or cases as CSV.

use super::{OutputContext, parse_batch, print_json};
use crate::aggregate::{AggregateSummary, Rate, SuiteRollup, suite_rollup};
use crate::cli::SummaryArgs;
use crate::config::ReportConfig;
use crate::error::{Result, ResultExt};
use crate::format::csv;
use crate::format::text::{self, TextFormatOptions};
use crate::model::CaseStatus;
use crate::util::expand_inputs;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Serialize)]
struct SummaryOutput {
    #[serde(flatten)]
    summary: AggregateSummary,
    execution_rate: Rate,
    execution_rate_without_skipped: Rate,
    pass_rate: Rate,
    #[serde(skip_serializing_if = "Option::is_none")]
    suites: Option<SuiteRollup>,
}

/// Execute the summary command.
///
/// # Errors
///
/// Returns an error if inputs are missing or unparseable, `--status` is
/// unknown, or writing to stdout fails.
pub fn execute(args: &SummaryArgs, config: &ReportConfig, ctx: OutputContext) -> Result<()> {
    let keep_status = args
        .status
        .as_deref()
        .map(str::parse::<CaseStatus>)
        .transpose()?;

    let files = expand_inputs(&args.inputs)?;
    let batch = parse_batch(&files, "Parsing", ctx.quiet || ctx.json || args.csv)?;

    if args.csv {
        let fields = csv::parse_fields(args.fields.as_deref());
        let stdout = io::stdout();
        let mut out = stdout.lock();
        csv::write_csv(&mut out, &batch.records, &fields, |case| {
            keep_status.is_none_or(|status| case.status == status)
        })
        .and_then(|()| out.flush())
        .context("writing CSV")?;
        return Ok(());
    }

    let summary = batch.summary();
    let suites = args.by_suite.then(|| suite_rollup(&batch.records));

    if ctx.json {
        return print_json(&SummaryOutput {
            execution_rate: summary.accounted_execution_rate(),
            execution_rate_without_skipped: summary.execution_rate(),
            pass_rate: summary.pass_rate(),
            summary,
            suites,
        });
    }

    let options = TextFormatOptions {
        use_color: ctx.use_color,
        timestamp_format: &config.timestamp_format,
    };
    print!("{}", text::format_summary(&summary, options));
    if let Some(rollup) = &suites {
        println!();
        print!("{}", text::format_suite_rollup(rollup, ctx.use_color));
        println!("Verdict: {}", text::verdict(rollup));
    }
    Ok(())
}
