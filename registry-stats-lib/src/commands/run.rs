//! Command dispatch logic for registry-stats

use super::{CrawlArgs, DailyArgs, InitArgs, init_config, process_crawl, process_daily};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use ohno::app_err;
use std::io::Write;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "registry-stats", version, about, author, long_about = None)]
#[command(about = "Collect download statistics for Terraform registry providers")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: StatsSubcommand,
}

#[derive(Subcommand, Debug)]
enum StatsSubcommand {
    /// Crawl every provider once and save JSON and CSV reports
    Crawl(Box<CrawlArgs>),
    /// Report download counts of tracked providers, daily until interrupted
    Daily(Box<DailyArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if the arguments are invalid, the configuration can't be loaded or the
/// init command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            // --help and --version
            let _ = write!(host.output(), "{}", e.render());
            return Ok(());
        }
        Err(e) => return Err(app_err!("{}", e.render())),
    };

    match &cli.command {
        StatsSubcommand::Crawl(crawl_args) => process_crawl(host, crawl_args).await,
        StatsSubcommand::Daily(daily_args) => process_daily(host, daily_args).await,
        StatsSubcommand::Init(init_args) => init_config(host, init_args),
    }
}
