//! Google Test XML result parsing.
//!
//! One result file becomes one [`TestFileRecord`]. Only two conditions are
//! fatal for a file:
//!
//! - the document is not well-formed XML ([`ReportError::Parse`])
//! - it contains neither `<testsuites>` nor `<testsuite>` ([`ReportError::Structure`])
//!
//! Everything else (missing counts, bad durations, unparseable timestamps)
//! resolves to a default through [`crate::util::lenient`].
//!
//! # Root resolution
//!
//! The first `<testsuites>` element in document order is the root and every
//! `<testsuite>` nested inside it is a suite node. Without a collection, the
//! first `<testsuite>` is both root and the only suite node. Case elements are
//! counted document-wide, independent of the suite nodes.

use crate::error::{ReportError, Result, ResultExt};
use crate::model::{CaseStatus, TestCaseRecord, TestFileRecord};
use crate::util::{base_name, lenient, time};
use chrono::NaiveDateTime;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

const TAG_COLLECTION: &[u8] = b"testsuites";
const TAG_SUITE: &[u8] = b"testsuite";
const TAG_CASE: &[u8] = b"testcase";
const TAG_FAILURE: &[u8] = b"failure";
const TAG_SKIPPED: &[u8] = b"skipped";

const ATTR_FAILURES: &str = "failures";
const ATTR_TIME: &str = "time";
const ATTR_CLASSNAME: &str = "classname";
const ATTR_NAME: &str = "name";
const ATTR_MESSAGE: &str = "message";

/// Parse one result file.
///
/// # Errors
///
/// - `Io` (with the path as context) if the file cannot be read
/// - `Parse` if the document is not well-formed
/// - `Structure` if no suite element exists
pub fn parse_file(path: impl AsRef<Path>) -> Result<TestFileRecord> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_path_context(path)?;
    parse_bytes(path, &bytes)
}

/// Parse an in-memory document; `source` is used for `source_name` and errors.
///
/// # Errors
///
/// Same as [`parse_file`], minus I/O.
pub fn parse_str(source: impl AsRef<Path>, xml: &str) -> Result<TestFileRecord> {
    parse_bytes(source.as_ref(), xml.as_bytes())
}

fn parse_bytes(path: &Path, xml: &[u8]) -> Result<TestFileRecord> {
    let mut scan = DocumentScan::default();
    scan.run(xml).map_err(|message| ReportError::parse(path, message))?;

    let record = scan
        .into_record(base_name(path))
        .ok_or_else(|| ReportError::Structure {
            path: path.to_path_buf(),
        })?;

    debug!(
        file = %record.source_name,
        cases = record.total_cases,
        failed = record.failed_cases,
        skipped = record.skipped_cases,
        earliest = ?record.earliest_timestamp,
        "Parsed result file"
    );
    Ok(record)
}

/// Attributes of a `<testsuites>` or `<testsuite>` node.
#[derive(Debug, Clone, Default)]
struct SuiteNode {
    failures: usize,
    duration: f64,
    timestamps: Vec<NaiveDateTime>,
}

/// Message and text body of a `<failure>` or `<skipped>` element.
#[derive(Debug, Default)]
struct Detail {
    message: String,
    body: String,
}

impl Detail {
    fn finish(self) -> String {
        format!("{}\n{}", self.message, self.body).trim().to_string()
    }
}

#[derive(Debug)]
struct CaseBuilder {
    full_name: String,
    elapsed_seconds: f64,
    failure: Option<Detail>,
    skipped: Option<Detail>,
}

impl CaseBuilder {
    // failure > skipped > success
    fn finish(self) -> TestCaseRecord {
        let (status, failure_detail) = match (self.failure, self.skipped) {
            (Some(failure), _) => (CaseStatus::Failed, failure.finish()),
            (None, Some(skipped)) => (CaseStatus::Skipped, skipped.finish()),
            (None, None) => (CaseStatus::Success, String::new()),
        };
        TestCaseRecord {
            full_name: self.full_name,
            elapsed_seconds: self.elapsed_seconds,
            status,
            failure_detail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailKind {
    Failure,
    Skipped,
}

#[derive(Debug)]
enum Frame {
    Collection { first: bool },
    Suite,
    Case,
    /// `targets` are the open cases for which this is the first such element.
    Detail { kind: DetailKind, targets: Vec<usize> },
    Other,
}

#[derive(Debug, Default, PartialEq, Eq)]
enum CollectionState {
    #[default]
    NotSeen,
    Open,
    Closed,
}

#[derive(Debug, Default)]
struct DocumentScan {
    stack: Vec<Frame>,
    saw_root: bool,
    root_closed: bool,
    collection_state: CollectionState,
    collection: Option<SuiteNode>,
    collection_suites: Vec<SuiteNode>,
    first_suite: Option<SuiteNode>,
    cases: Vec<CaseBuilder>,
    open_cases: Vec<usize>,
}

type ScanResult<T> = std::result::Result<T, String>;

impl DocumentScan {
    fn run(&mut self, xml: &[u8]) -> ScanResult<()> {
        let mut reader = Reader::from_reader(xml);
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        config.check_end_names = true;
        config.trim_text(false);

        let mut buf = Vec::new();
        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|err| format!("{err} (at byte {})", reader.buffer_position()))?;

            match event {
                Event::Eof => break,
                Event::Start(e) => self.open(&e)?,
                Event::Empty(e) => {
                    self.open(&e)?;
                    self.close()?;
                }
                Event::End(_) => self.close()?,
                Event::Text(t) => {
                    let text = t.unescape().map_err(|err| err.to_string())?;
                    self.text(&text)?;
                }
                Event::CData(c) => {
                    if self.stack.is_empty() {
                        return Err("CDATA section outside the document element".to_string());
                    }
                    let text = reader.decoder().decode(&c).map_err(|err| err.to_string())?;
                    self.text(&text)?;
                }
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => {}
            }
            buf.clear();
        }

        if !self.stack.is_empty() {
            return Err(format!(
                "unexpected end of input: {} unclosed element(s)",
                self.stack.len()
            ));
        }
        if !self.saw_root {
            return Err("no element found".to_string());
        }
        Ok(())
    }

    fn open(&mut self, e: &BytesStart<'_>) -> ScanResult<()> {
        if self.stack.is_empty() {
            if self.root_closed {
                return Err("junk after document element".to_string());
            }
            self.saw_root = true;
        }
        for attr in e.attributes() {
            attr.map_err(|err| err.to_string())?;
        }

        let frame = match e.name().as_ref() {
            TAG_COLLECTION => {
                let first = self.collection_state == CollectionState::NotSeen;
                if first {
                    self.collection = Some(read_suite_node(e)?);
                    self.collection_state = CollectionState::Open;
                }
                Frame::Collection { first }
            }
            TAG_SUITE => {
                let node = read_suite_node(e)?;
                if self.collection_state == CollectionState::Open {
                    self.collection_suites.push(node.clone());
                }
                if self.first_suite.is_none() {
                    self.first_suite = Some(node);
                }
                Frame::Suite
            }
            TAG_CASE => {
                let classname = attr(e, ATTR_CLASSNAME)?.unwrap_or_default();
                let name = attr(e, ATTR_NAME)?.unwrap_or_default();
                let elapsed = lenient::seconds_or_zero(ATTR_TIME, attr(e, ATTR_TIME)?.as_deref());
                self.open_cases.push(self.cases.len());
                self.cases.push(CaseBuilder {
                    full_name: format!("{classname}.{name}"),
                    elapsed_seconds: elapsed.value,
                    failure: None,
                    skipped: None,
                });
                Frame::Case
            }
            TAG_FAILURE => self.open_detail(e, DetailKind::Failure)?,
            TAG_SKIPPED => self.open_detail(e, DetailKind::Skipped)?,
            _ => Frame::Other,
        };

        self.stack.push(frame);
        Ok(())
    }

    fn open_detail(&mut self, e: &BytesStart<'_>, kind: DetailKind) -> ScanResult<Frame> {
        let message = attr(e, ATTR_MESSAGE)?.unwrap_or_default();
        let mut targets = Vec::new();
        for &idx in &self.open_cases {
            let case = &mut self.cases[idx];
            let slot = match kind {
                DetailKind::Failure => &mut case.failure,
                DetailKind::Skipped => &mut case.skipped,
            };
            if slot.is_none() {
                *slot = Some(Detail {
                    message: message.clone(),
                    body: String::new(),
                });
                targets.push(idx);
            }
        }
        Ok(Frame::Detail { kind, targets })
    }

    fn close(&mut self) -> ScanResult<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| "end tag without matching start tag".to_string())?;

        match frame {
            Frame::Case => {
                self.open_cases.pop();
            }
            Frame::Collection { first: true } => {
                self.collection_state = CollectionState::Closed;
            }
            _ => {}
        }

        if self.stack.is_empty() {
            self.root_closed = true;
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> ScanResult<()> {
        match self.stack.last() {
            None => {
                if text.trim().is_empty() {
                    Ok(())
                } else {
                    Err("text outside the document element".to_string())
                }
            }
            Some(Frame::Detail { kind, targets }) => {
                for &idx in targets {
                    let case = &mut self.cases[idx];
                    let slot = match kind {
                        DetailKind::Failure => case.failure.as_mut(),
                        DetailKind::Skipped => case.skipped.as_mut(),
                    };
                    if let Some(detail) = slot {
                        detail.body.push_str(text);
                    }
                }
                Ok(())
            }
            Some(_) => Ok(()),
        }
    }

    /// Resolve the root shape; `None` means no suite element was found.
    fn into_record(self, source_name: String) -> Option<TestFileRecord> {
        let (root_stamps, suites) = match (self.collection, self.first_suite) {
            (Some(collection), _) => (collection.timestamps, self.collection_suites),
            (None, Some(suite)) => (suite.timestamps.clone(), vec![suite]),
            (None, None) => return None,
        };

        let earliest_timestamp = root_stamps
            .iter()
            .chain(suites.iter().flat_map(|s| s.timestamps.iter()))
            .min()
            .copied();

        let cases: Vec<TestCaseRecord> = self.cases.into_iter().map(CaseBuilder::finish).collect();
        let skipped_cases = cases
            .iter()
            .filter(|c| c.status == CaseStatus::Skipped)
            .count();

        Some(TestFileRecord {
            source_name,
            total_cases: cases.len(),
            failed_cases: suites.iter().map(|s| s.failures).sum(),
            skipped_cases,
            total_duration_seconds: suites.iter().map(|s| s.duration).sum(),
            earliest_timestamp,
            cases,
        })
    }
}

/// Read an attribute value, unescaped. Malformed attribute syntax is fatal.
fn attr(e: &BytesStart<'_>, name: &str) -> ScanResult<Option<String>> {
    match e.try_get_attribute(name) {
        Ok(Some(a)) => a
            .unescape_value()
            .map(|value| Some(value.into_owned()))
            .map_err(|err| err.to_string()),
        Ok(None) => Ok(None),
        Err(err) => Err(err.to_string()),
    }
}

fn read_suite_node(e: &BytesStart<'_>) -> ScanResult<SuiteNode> {
    let failures = lenient::count_or_zero(ATTR_FAILURES, attr(e, ATTR_FAILURES)?.as_deref());
    let duration = lenient::seconds_or_zero(ATTR_TIME, attr(e, ATTR_TIME)?.as_deref());

    let mut timestamps = Vec::new();
    for name in time::TIMESTAMP_ATTRS {
        if let Some(raw) = attr(e, name)? {
            match time::parse_result_timestamp(&raw) {
                Some(ts) => timestamps.push(ts),
                None => trace!(attr = name, value = %raw, "ignoring unparseable timestamp"),
            }
        }
    }

    Ok(SuiteNode {
        failures: failures.value,
        duration: duration.value,
        timestamps,
    })
}
