//! Command implementations.
//!
//! Shared helpers live here: batch parsing with a progress bar, writing
//! output files with path context, and JSON printing.

pub mod completions;
pub mod generate;
pub mod report;
pub mod sa;
pub mod summary;

use crate::aggregate::{self, BatchResult};
use crate::error::{Result, ResultExt};
use crate::util::{base_name, progress::ProgressTracker};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Output flags shared by all commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputContext {
    pub json: bool,
    pub quiet: bool,
    pub use_color: bool,
}

/// Parse a batch, showing a progress bar on interactive terminals.
///
/// # Errors
///
/// Returns the first per-file error unchanged.
pub fn parse_batch(paths: &[impl AsRef<Path>], label: &str, quiet: bool) -> Result<BatchResult> {
    let tracker = ProgressTracker::new(paths.len() as u64, label, quiet);
    let result = aggregate::parse_many_with(paths, |path| {
        tracker.set_message(base_name(path));
        tracker.inc(1);
    });
    tracker.finish_and_clear();
    result
}

/// Write `contents` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an I/O error carrying the path.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_path_context(parent)?;
    }
    fs::write(path, contents).with_path_context(path)?;
    info!(path = %path.display(), bytes = contents.len(), "Wrote output");
    Ok(())
}

/// Print a value as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
