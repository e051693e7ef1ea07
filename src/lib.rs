//! `gtest_report` - static HTML dashboards from Google Test XML results.
//!
//! The crate is split into a small parsing/aggregation core and the
//! presentation layers that consume it:
//!
//! - [`parser`] reads one result file into a [`model::TestFileRecord`]
//! - [`aggregate`] folds many records into totals, rates and suite rollups
//! - [`sa`] summarizes static-analysis reports per component
//! - [`format`] renders HTML reports, the index page, chart payloads, text and CSV
//! - [`cli`] wires everything to the `gtest-report` binary

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod parser;
pub mod sa;
pub mod util;

pub use error::{ErrorCode, ReportError, Result, StructuredError};
