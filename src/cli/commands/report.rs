//! `report`: a single report page from files or directories.

use super::{OutputContext, parse_batch, print_json, write_output};
use crate::aggregate::AggregateSummary;
use crate::cli::ReportArgs;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::format::{RenderOptions, ReportContext, render_report};
use crate::util::expand_inputs;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
struct ReportOutput<'a> {
    output: &'a Path,
    summary: AggregateSummary,
}

/// Execute the report command.
///
/// # Errors
///
/// Returns an error if an input is missing, no XML files are found, any file
/// fails to parse, or the output cannot be written.
pub fn execute(args: &ReportArgs, config: &ReportConfig, ctx: OutputContext) -> Result<()> {
    let files = expand_inputs(&args.inputs)?;
    info!(files = files.len(), output = %args.output.display(), "Generating report");

    let batch = parse_batch(&files, "Parsing", ctx.quiet || ctx.json)?;
    let report = ReportContext {
        project: args.project.clone(),
        report_name: args.name.clone(),
    };
    let options = RenderOptions::from_config(config).with_suite_rollup(args.by_suite);
    let html = render_report(&report, &batch, &options)?;
    write_output(&args.output, &html)?;

    if ctx.json {
        print_json(&ReportOutput {
            output: &args.output,
            summary: batch.summary(),
        })?;
    } else if !ctx.quiet {
        println!("Report generated at {}", args.output.display());
    }
    Ok(())
}
