//! Setup shared between the crawl and daily commands.

use super::ProgressReporter;
use super::config::{Config, Pipeline};
use super::logging::init_logging;
use crate::Result;
use crate::registry::{Clock, Progress, RegistryClient, SystemClock};
use crate::reports::ReportWriter;
use camino::Utf8PathBuf;
use clap::Args;
use clap::ValueEnum;
use core::time::Duration;
use std::sync::Arc;

const LOG_TARGET: &str = "  commands";

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Common arguments shared between crawl and daily commands
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Path to configuration file (default is `registry-stats.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Append log output to this file instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<Utf8PathBuf>,

    /// Directory where reports are written
    #[arg(long, value_name = "PATH")]
    pub output_dir: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,
}

/// Configuration, clock and progress reporting for one command invocation.
#[derive(Debug)]
pub struct Common {
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    pub progress: Arc<dyn Progress>,
    pipeline: Pipeline,
    output_dir: Utf8PathBuf,
}

impl Common {
    /// Load the configuration and install logging.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded
    pub fn new(args: &CommonArgs, pipeline: Pipeline) -> Result<Self> {
        let config = Config::load(args.config.as_deref())?;

        let log_file = args.log_file.as_deref().unwrap_or_else(|| config.log_file(pipeline));
        init_logging(args.log_level, log_file);

        let output_dir = args
            .output_dir
            .clone()
            .or_else(|| config.output_dir.clone())
            .unwrap_or_else(|| Utf8PathBuf::from("."));

        // progress bars and log lines share stderr, so only show a bar when logging is off
        let delay = if args.log_level == LogLevel::None {
            Duration::from_millis(300)
        } else {
            Duration::from_hours(365 * 24)
        };

        let use_colors_for_progress = match args.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                use std::io::{IsTerminal, stderr};
                stderr().is_terminal()
            }
        };

        Ok(Self {
            config,
            clock: Arc::new(SystemClock),
            progress: Arc::new(ProgressReporter::new(delay, use_colors_for_progress)),
            pipeline,
            output_dir,
        })
    }

    /// A registry client for the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn client(&self) -> Result<RegistryClient> {
        let client = RegistryClient::new(&self.config.base_url, self.config.request_timeout)?;
        log::debug!(target: LOG_TARGET, "Using registry at '{}'", client.base_url());
        Ok(client)
    }

    /// A report writer for this pipeline, creating the output directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created
    pub fn report_writer(&self) -> Result<ReportWriter> {
        ReportWriter::new(self.output_dir.clone(), self.config.report_prefix(self.pipeline))
    }
}

/// Completes when the process receives an interrupt.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!(target: LOG_TARGET, "Unable to listen for interrupts: {e}");
        core::future::pending::<()>().await;
    }
}
