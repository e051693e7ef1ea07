//! CSV export of test cases.
//!
//! One row per case, with field selection via `--fields`. Fields containing
//! commas, quotes, or newlines are quoted.

use crate::model::{TestCaseRecord, TestFileRecord};
use std::io::{self, Write};

/// Default fields for CSV export.
pub const DEFAULT_FIELDS: &[&str] = &["file", "suite", "case", "status", "elapsed"];

/// All available fields for CSV export.
pub const ALL_FIELDS: &[&str] = &[
    "file",
    "suite",
    "case",
    "full_name",
    "status",
    "elapsed",
    "detail",
];

/// Escape a CSV field value.
///
/// Wraps in double quotes if the value contains commas, quotes, or newlines.
/// Doubles any existing quotes within the value.
#[must_use]
pub fn escape_field(value: &str) -> String {
    let needs_quoting = value.contains(',')
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r');

    if needs_quoting {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

/// Get a field value for a case by field name.
#[must_use]
pub fn get_field_value(file: &TestFileRecord, case: &TestCaseRecord, field: &str) -> String {
    match field {
        "file" => file.source_name.clone(),
        "suite" => case.suite_name().to_string(),
        "case" => case.case_name().to_string(),
        "full_name" => case.full_name.clone(),
        "status" => case.status.as_str().to_string(),
        "elapsed" => format!("{:.3}", case.elapsed_seconds),
        "detail" => case.failure_detail.clone(),
        _ => String::new(),
    }
}

/// Parse a comma-separated list of field names.
///
/// Unknown names are dropped; returns the default fields if the input is empty.
#[must_use]
pub fn parse_fields(fields_arg: Option<&str>) -> Vec<&'static str> {
    match fields_arg {
        Some(arg) if !arg.is_empty() => arg
            .split(',')
            .map(str::trim)
            .filter_map(|f| ALL_FIELDS.iter().find(|&&af| af == f).copied())
            .collect(),
        _ => DEFAULT_FIELDS.to_vec(),
    }
}

/// Write CSV header row to the given writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_header<W: Write>(writer: &mut W, fields: &[&str]) -> io::Result<()> {
    let header = fields.join(",");
    writeln!(writer, "{header}")
}

/// Format a single case as a CSV row.
#[must_use]
pub fn format_case_row(file: &TestFileRecord, case: &TestCaseRecord, fields: &[&str]) -> String {
    fields
        .iter()
        .map(|&field| escape_field(&get_field_value(file, case, field)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Write the cases of all records as CSV, optionally keeping only cases that match `keep`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv<W, F>(
    writer: &mut W,
    records: &[TestFileRecord],
    fields: &[&str],
    keep: F,
) -> io::Result<()>
where
    W: Write,
    F: Fn(&TestCaseRecord) -> bool,
{
    write_header(writer, fields)?;
    for file in records {
        for case in file.cases.iter().filter(|c| keep(c)) {
            let row = format_case_row(file, case, fields);
            writeln!(writer, "{row}")?;
        }
    }
    Ok(())
}
