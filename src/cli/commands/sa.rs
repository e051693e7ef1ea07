//! `sa`: static-analysis summary plus one page per component.

use super::{OutputContext, print_json, write_output};
use crate::cli::SaArgs;
use crate::config::ReportConfig;
use crate::error::{Result, ResultExt};
use crate::format::sa::{component_file_name, render_component};
use crate::format::text::format_sa_summary;
use crate::sa::{SaSummary, component_reports, parse_report_file, summarize};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Serialize)]
struct SaOutput {
    #[serde(flatten)]
    summary: SaSummary,
    reports: Vec<PathBuf>,
}

/// Execute the sa command.
///
/// # Errors
///
/// Returns an error if the report cannot be read or parsed, or an output file
/// cannot be written.
pub fn execute(args: &SaArgs, config: &ReportConfig, ctx: OutputContext) -> Result<()> {
    let violations = parse_report_file(&args.report_xml, &config.sa_anchor)?;
    let summary = summarize(&violations);
    fs::create_dir_all(&args.output_dir).with_path_context(&args.output_dir)?;

    let mut reports = Vec::new();
    for (component, report) in component_reports(&violations) {
        let path = args.output_dir.join(component_file_name(&component));
        write_output(&path, &render_component(&component, &report, &config.resource_prefix))?;
        reports.push(path);
    }
    info!(components = summary.total_components, violations = summary.total_violations, "Static-analysis reports written");

    if ctx.json {
        print_json(&SaOutput { summary, reports })?;
    } else if !ctx.quiet {
        print!("{}", format_sa_summary(&summary));
        for path in &reports {
            println!("  -> {}", path.display());
        }
    }
    Ok(())
}
