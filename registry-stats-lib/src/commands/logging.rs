//! Process-wide logging setup.
//!
//! Records go to stderr and are appended to a log file, one line each, as
//! `{timestamp} - {LEVEL} - {message}`.

use super::common::LogLevel;
use camino::Utf8Path;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};

const LOG_TARGET: &str = "   logging";

/// Install the global logger.
///
/// `RUST_LOG` overrides `log_level`. If the log file can't be opened, logging continues on
/// the console alone. Only the first call in a process has any effect.
pub fn init_logging(log_level: LogLevel, log_file: &Utf8Path) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let (file, open_error) = match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => (Some(file), None),
        Err(e) => (None, Some(e)),
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    let installed = env_logger::Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(LogSink::new(io::stderr(), file))))
        .try_init()
        .is_ok();

    if installed && let Some(e) = open_error {
        log::warn!(target: LOG_TARGET, "Could not open log file '{log_file}', logging to the console only: {e}");
    }
}

/// Writes every byte to the console and, when present, to a log file.
///
/// A failing file write never suppresses console output.
#[derive(Debug)]
struct LogSink<C: Write> {
    console: C,
    file: Option<File>,
}

impl<C: Write> LogSink<C> {
    const fn new(console: C, file: Option<File>) -> Self {
        Self { console, file }
    }
}

impl<C: Write> Write for LogSink<C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.write_all(buf)?;
        if let Some(file) = &mut self.file {
            let _ = file.write_all(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(file) = &mut self.file {
            let _ = file.flush();
        }
        self.console.flush()
    }
}
