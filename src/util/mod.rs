//! Shared utilities for `gtest_report`.
//!
//! - Timestamp parsing and display formatting
//! - Lenient numeric attribute parsing (named fallback policy)
//! - Progress indicators for batch parsing
//! - Input discovery (files and directories of `*.xml`)

pub mod lenient;
pub mod progress;
pub mod time;

use crate::error::{ReportError, Result, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};

/// Base name of a path, falling back to the full display form.
#[must_use]
pub fn base_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// List the `*.xml` files directly inside `dir`, sorted by path.
///
/// A missing directory yields an empty list.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be read.
pub fn list_xml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_path_context(dir)? {
        let path = entry.with_path_context(dir)?.path();
        let is_xml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if is_xml && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Expand command-line inputs: files are kept, directories contribute their
/// `*.xml` files.
///
/// # Errors
///
/// Returns `InputNotFound` for a path that does not exist, or `NoInputs`
/// when nothing is left after expansion.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(list_xml_files(input)?);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(ReportError::InputNotFound {
                path: input.clone(),
            });
        }
    }

    if files.is_empty() {
        let joined = inputs
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ReportError::NoInputs { inputs: joined });
    }
    Ok(files)
}
