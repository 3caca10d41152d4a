//! Report generation for registry statistics
//!
//! This module turns collected records into files and log lines.
//!
//! # Implementation Model
//!
//! Three generators are provided:
//! - **JSON**: the in-memory structure verbatim, pretty-printed with a 2-space indent
//! - **CSV**: provider records sorted by downloads, with a header row
//! - **Console**: the top providers by downloads and the daily summary, as log lines
//!
//! [`ReportWriter`] places generated reports in an output directory under timestamped
//! names (`{prefix}_{YYYYMMDD_HHMMSS}.{ext}`). Saving is best-effort: a failure is logged
//! and reported to the caller as a missing path, never as an error.

mod common;
mod console;
mod csv;
mod json;
mod writer;

pub use common::format_thousands;
pub use console::{log_daily_summary, log_top_providers};
pub use writer::ReportWriter;
