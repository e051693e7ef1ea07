//! Static-analysis report summaries.
//!
//! The input is an XML document of `<message>` elements, each carrying
//! `<file>`, `<type>`, `<desc>` and `<line>` children. Violations are grouped
//! by component, the path segment that follows a configurable anchor segment
//! (`para-api` by default).

use crate::error::{ReportError, Result, ResultExt};
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

pub const DEFAULT_ANCHOR_SEGMENT: &str = "para-api";
pub const FALLBACK_COMPONENT: &str = "etc";
pub const FALLBACK_RULE: &str = "etc";
pub const UNKNOWN_SEVERITY: &str = "Unknown";

static RULE_ID: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\[AUTOSAR Rule ([^\]]+)\]").ok());

/// One reported violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub component: String,
    pub file: String,
    pub line: String,
    pub severity: String,
    pub rule_id: String,
    pub description: String,
}

/// Summary across all components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SaSummary {
    pub total_components: usize,
    pub total_files: usize,
    pub comp_files_count: BTreeMap<String, usize>,
    pub total_violations: usize,
    pub comp_counts: BTreeMap<String, usize>,
    pub severity_counts: BTreeMap<String, usize>,
    pub ruleid_counts: BTreeMap<String, usize>,
}

/// A violation as listed under its file in a component report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileViolation {
    pub line: String,
    pub rule_id: String,
    pub severity: String,
    pub description: String,
}

/// Everything reported for one component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentReport {
    pub violations: usize,
    pub severity_counts: BTreeMap<String, usize>,
    pub ruleid_counts: BTreeMap<String, usize>,
    pub file_counts: BTreeMap<String, usize>,
    pub file_violations: BTreeMap<String, Vec<FileViolation>>,
}

/// Component for a file path: the segment after `anchor`, else `etc`.
#[must_use]
pub fn component_of(file_path: &str, anchor: &str) -> String {
    let parts: Vec<&str> = file_path
        .split(['/', '\\'])
        .filter(|p| !p.is_empty())
        .collect();
    parts
        .iter()
        .position(|p| *p == anchor)
        .and_then(|idx| parts.get(idx + 1))
        .map_or_else(|| FALLBACK_COMPONENT.to_string(), |c| (*c).to_string())
}

/// Rule id from a description such as `[AUTOSAR Rule A7-1-1] ...`, else `etc`.
#[must_use]
pub fn rule_id_of(description: &str) -> String {
    RULE_ID
        .as_ref()
        .and_then(|re| re.captures(description))
        .and_then(|caps| caps.get(1))
        .map_or_else(|| FALLBACK_RULE.to_string(), |m| m.as_str().to_string())
}

/// Read and parse a static-analysis report file.
///
/// # Errors
///
/// I/O errors carry the path; malformed XML is `ReportError::Parse`.
pub fn parse_report_file(path: &Path, anchor: &str) -> Result<Vec<Violation>> {
    let bytes = fs::read(path).with_path_context(path)?;
    parse_report_bytes(path, &bytes, anchor)
}

/// Parse an in-memory static-analysis report.
///
/// # Errors
///
/// Malformed XML is `ReportError::Parse`.
pub fn parse_report_str(source: &Path, xml: &str, anchor: &str) -> Result<Vec<Violation>> {
    parse_report_bytes(source, xml.as_bytes(), anchor)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    File,
    Type,
    Desc,
    Line,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"file" => Some(Self::File),
            b"type" => Some(Self::Type),
            b"desc" => Some(Self::Desc),
            b"line" => Some(Self::Line),
            _ => None,
        }
    }
}

/// First occurrence of each field inside one `<message>`.
#[derive(Debug, Default)]
struct MessageFields {
    depth: usize,
    file: Option<String>,
    kind: Option<String>,
    desc: Option<String>,
    line: Option<String>,
    capture: Option<(Field, usize)>,
}

impl MessageFields {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::File => &mut self.file,
            Field::Type => &mut self.kind,
            Field::Desc => &mut self.desc,
            Field::Line => &mut self.line,
        }
    }

    fn into_violation(self, anchor: &str) -> Option<Violation> {
        let file = self.file.map(|f| f.trim().to_string()).filter(|f| !f.is_empty())?;
        let severity = self
            .kind
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_SEVERITY.to_string());
        let description = self.desc.map(|d| d.trim().to_string()).unwrap_or_default();

        Some(Violation {
            component: component_of(&file, anchor),
            rule_id: rule_id_of(&description),
            line: self.line.map(|l| l.trim().to_string()).unwrap_or_default(),
            file,
            severity,
            description,
        })
    }
}

fn parse_report_bytes(path: &Path, xml: &[u8], anchor: &str) -> Result<Vec<Violation>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().expand_empty_elements = true;

    let mut violations = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut current: Option<MessageFields> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|err| {
            ReportError::parse(path, format!("{err} (at byte {})", reader.buffer_position()))
        })?;

        match event {
            Event::Eof => break,
            Event::Start(e) => {
                if depth == 0 && seen_root {
                    return Err(ReportError::parse(path, "junk after document element"));
                }
                seen_root = true;
                depth += 1;
                let name = e.name();
                match current.as_mut() {
                    None if name.as_ref() == b"message" => {
                        current = Some(MessageFields {
                            depth,
                            ..MessageFields::default()
                        });
                    }
                    Some(msg) if msg.capture.is_none() => {
                        if let Some(field) = Field::from_tag(name.as_ref()) {
                            let slot = msg.slot(field);
                            if slot.is_none() {
                                *slot = Some(String::new());
                                msg.capture = Some((field, depth));
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(_) => {
                if depth == 0 && seen_root {
                    return Err(ReportError::parse(path, "junk after document element"));
                }
                seen_root = true;
            }
            Event::End(_) => {
                if let Some(msg) = current.as_mut() {
                    if msg.capture.is_some_and(|(_, d)| d == depth) {
                        msg.capture = None;
                    } else if msg.depth == depth {
                        if let Some(violation) = current.take().and_then(|m| m.into_violation(anchor)) {
                            violations.push(violation);
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|err| ReportError::parse(path, err))?;
                if depth == 0 && !text.trim().is_empty() {
                    return Err(ReportError::parse(path, "text outside the document element"));
                }
                append_capture(current.as_mut(), &text);
            }
            Event::CData(c) => {
                let text = reader
                    .decoder()
                    .decode(&c)
                    .map_err(|err| ReportError::parse(path, err))?;
                append_capture(current.as_mut(), &text);
            }
            _ => {}
        }
        buf.clear();
    }

    if depth != 0 {
        return Err(ReportError::parse(path, "unexpected end of input"));
    }
    if !seen_root {
        return Err(ReportError::parse(path, "no element found"));
    }

    debug!(path = %path.display(), violations = violations.len(), "Parsed static-analysis report");
    Ok(violations)
}

fn append_capture(current: Option<&mut MessageFields>, text: &str) {
    if let Some(msg) = current {
        if let Some((field, _)) = msg.capture {
            if let Some(value) = msg.slot(field) {
                value.push_str(text);
            }
        }
    }
}

fn bump(map: &mut BTreeMap<String, usize>, key: &str) {
    *map.entry(key.to_string()).or_insert(0) += 1;
}

/// Summarize violations across components.
#[must_use]
pub fn summarize(violations: &[Violation]) -> SaSummary {
    let mut summary = SaSummary::default();
    let mut files: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for v in violations {
        bump(&mut summary.comp_counts, &v.component);
        bump(&mut summary.severity_counts, &v.severity);
        bump(&mut summary.ruleid_counts, &v.rule_id);
        files.entry(&v.component).or_default().insert(&v.file);
    }

    summary.total_components = summary.comp_counts.len();
    summary.total_violations = violations.len();
    summary.comp_files_count = files
        .iter()
        .map(|(comp, set)| ((*comp).to_string(), set.len()))
        .collect();
    summary.total_files = summary.comp_files_count.values().sum();
    summary
}

/// Group violations into one report per component.
#[must_use]
pub fn component_reports(violations: &[Violation]) -> BTreeMap<String, ComponentReport> {
    let mut reports: BTreeMap<String, ComponentReport> = BTreeMap::new();
    for v in violations {
        let report = reports.entry(v.component.clone()).or_default();
        report.violations += 1;
        bump(&mut report.severity_counts, &v.severity);
        bump(&mut report.ruleid_counts, &v.rule_id);
        bump(&mut report.file_counts, &v.file);
        report
            .file_violations
            .entry(v.file.clone())
            .or_default()
            .push(FileViolation {
                line: v.line.clone(),
                rule_id: v.rule_id.clone(),
                severity: v.severity.clone(),
                description: v.description.clone(),
            });
    }
    reports
}
