//! Timestamp parsing and formatting for result files.
//!
//! Google Test writes local timestamps such as `2024-01-01T10:00:00`; some
//! converters append a `Z` or a numeric offset. Offsets are discarded without
//! conversion, so every timestamp is compared as local wall-clock time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Attribute spellings that carry a timestamp, both treated identically.
pub const TIMESTAMP_ATTRS: [&str; 2] = ["timestamp", "timestamps"];

/// Display format used by reports and the index page.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// Parse a result-file timestamp as local time.
///
/// A single trailing `Z` is stripped first. Returns `None` for anything that
/// is not an ISO-8601 date or date-time; callers treat that as "no timestamp".
#[must_use]
pub fn parse_result_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    let s = s.strip_suffix('Z').unwrap_or(s);
    if s.is_empty() {
        return None;
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Format an optional timestamp for display, empty when absent.
#[must_use]
pub fn format_timestamp(ts: Option<NaiveDateTime>, fmt: &str) -> String {
    ts.map(|dt| dt.format(fmt).to_string()).unwrap_or_default()
}
