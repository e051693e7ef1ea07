//! `generate`: one report per test stage plus `index.html`.
//!
//! Stages are processed one after another. A stage whose inputs fail to parse
//! is reported and shown as `N/A` on the index; the remaining stages still
//! render.

use super::{OutputContext, parse_batch, print_json, write_output};
use crate::cli::GenerateArgs;
use crate::config::{CategoryConfig, ReportConfig};
use crate::error::{ReportError, Result, ResultExt};
use crate::format::{BuildInfo, RenderOptions, ReportContext, StageOutcome, StageRow};
use crate::format::{render_index, render_report};
use crate::util::list_xml_files;
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

pub const INDEX_FILE: &str = "index.html";

#[derive(Debug, Serialize)]
struct GenerateOutput<'a> {
    output_dir: &'a Path,
    index: PathBuf,
    stages: &'a [StageRow],
}

/// Execute the generate command.
///
/// # Errors
///
/// Returns an error if the input root is missing, the output directory or
/// index cannot be written, or resources cannot be copied. Per-stage failures
/// are not errors.
pub fn execute(args: &GenerateArgs, config: &ReportConfig, ctx: OutputContext) -> Result<()> {
    if !args.input_dir.is_dir() {
        return Err(ReportError::InputNotFound {
            path: args.input_dir.clone(),
        });
    }
    fs::create_dir_all(&args.output_dir).with_path_context(&args.output_dir)?;

    info!(
        project = %args.project,
        input = %args.input_dir.display(),
        output = %args.output_dir.display(),
        stages = config.categories.len(),
        "Generating reports"
    );

    if let Some(resources) = &config.resources_dir {
        copy_resources(resources, &args.output_dir.join(&config.resource_prefix))?;
    }

    let stages: Vec<StageRow> = config
        .categories
        .iter()
        .map(|category| StageRow {
            category: category.clone(),
            outcome: run_stage(args, config, category, ctx),
        })
        .collect();

    let build = BuildInfo {
        project: args.project.clone(),
        branch: args.branch.clone(),
        tag: args.tag.clone(),
        commit: args.commit.clone(),
        build: args.build.clone(),
        report_date: Some(Local::now().naive_local()),
    };
    let index_path = args.output_dir.join(INDEX_FILE);
    let html = render_index(&build, &stages, &RenderOptions::from_config(config));
    write_output(&index_path, &html)?;

    if ctx.json {
        print_json(&GenerateOutput {
            output_dir: &args.output_dir,
            index: index_path,
            stages: &stages,
        })?;
    } else if !ctx.quiet {
        println!("\nIndex generated at {}", index_path.display());
        let failed = stages
            .iter()
            .filter(|s| matches!(s.outcome, StageOutcome::Unavailable { .. }))
            .count();
        if failed == 0 {
            println!("All reports processed successfully.");
        } else {
            println!("{failed} stage(s) could not be processed.");
        }
    }
    Ok(())
}

fn run_stage(
    args: &GenerateArgs,
    config: &ReportConfig,
    category: &CategoryConfig,
    ctx: OutputContext,
) -> StageOutcome {
    match render_stage(args, config, category, ctx) {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(
                stage = %category.code,
                input_error = err.is_input_error(),
                error = %err,
                "Stage failed"
            );
            if !ctx.json {
                eprintln!("[ERROR] {}: {err}", category.code);
            }
            StageOutcome::Unavailable {
                error: err.to_string(),
            }
        }
    }
}

fn render_stage(
    args: &GenerateArgs,
    config: &ReportConfig,
    category: &CategoryConfig,
    ctx: OutputContext,
) -> Result<StageOutcome> {
    let files = list_xml_files(&args.input_dir.join(&category.code))?;
    if files.is_empty() {
        info!(stage = %category.code, "No result files, stage not tested");
        return Ok(StageOutcome::NotTested);
    }

    let batch = parse_batch(&files, &format!("Parsing {}", category.code), ctx.quiet || ctx.json)?;
    let report = ReportContext {
        project: args.project.clone(),
        report_name: category.display_name.clone(),
    };
    let options = RenderOptions::from_config(config).with_suite_rollup(category.suite_rollup);
    let html = render_report(&report, &batch, &options)?;
    write_output(&args.output_dir.join(category.report_file_name()), &html)?;

    if !ctx.quiet && !ctx.json {
        println!("  -> {} generated", category.report_file_name());
    }
    Ok(StageOutcome::Summary(batch.summary()))
}

/// Copy a resources directory tree into `dest`.
///
/// # Errors
///
/// Returns `Config` if `src` is not a directory, or an I/O error with the path.
pub fn copy_resources(src: &Path, dest: &Path) -> Result<usize> {
    if !src.is_dir() {
        return Err(ReportError::Config(format!(
            "resources directory not found: {}",
            src.display()
        )));
    }

    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| ReportError::Io(e.into()))?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).with_path_context(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).with_path_context(entry.path())?;
            copied += 1;
        } else {
            warn!(path = %entry.path().display(), "Skipping non-regular resource");
        }
    }
    info!(from = %src.display(), to = %dest.display(), files = copied, "Copied resources");
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_resources_tree() {
        let temp = TempDir::new().expect("tempdir");
        let src = temp.path().join("res");
        fs::create_dir_all(src.join("js")).expect("mkdir");
        fs::write(src.join("gtest_report_ok.png"), b"png").expect("write");
        fs::write(src.join("js").join("charts.js"), "//").expect("write");

        let dest = temp.path().join("out").join("html_resources");
        let copied = copy_resources(&src, &dest).expect("copy");
        assert_eq!(copied, 2);
        assert!(dest.join("js").join("charts.js").is_file());
    }

    #[test]
    fn test_copy_resources_missing_src() {
        let temp = TempDir::new().expect("tempdir");
        let err = copy_resources(&temp.path().join("none"), temp.path()).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }
}
