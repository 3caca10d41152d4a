//! Command-line interface and orchestration for registry-stats
//!
//! This module implements the CLI commands and wires the registry fetchers, the report
//! writers and the scheduler together. It handles argument parsing, configuration and
//! logging setup, and the top-level error policy.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **crawl**: Fetch every provider page by page, optionally replace download counts with
//!   the current year's, and save JSON and CSV reports plus a top-10 summary
//! - **daily**: Fetch the download count of each tracked provider and save a JSON report,
//!   immediately and then every day at the configured time until interrupted
//! - **init**: Generate a default configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate command handler. The crawl and daily handlers:
//!
//! 1. Load configuration and install logging (`common`, `logging`)
//! 2. Build a registry client and a report writer
//! 3. Run their pipeline against a shutdown signal
//! 4. Log any unexpected error as `Unexpected error: ...` and return normally
//!
//! Errors before logging exists, such as an unreadable configuration file, are returned
//! from `run`.

mod common;
mod config;
mod crawl;
mod daily;
mod host;
mod init;
mod logging;
mod progress_reporter;
mod run;

#[cfg(debug_assertions)]
pub use config::Config;
#[cfg(debug_assertions)]
pub use crawl::collect_records;
#[cfg(debug_assertions)]
pub use daily::daily_cycle;

pub use crawl::{CrawlArgs, process_crawl};
pub use daily::{DailyArgs, process_daily};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use progress_reporter::ProgressReporter;
pub use run::run;
