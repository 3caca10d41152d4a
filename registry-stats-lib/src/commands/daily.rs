use super::Host;
use super::common::{Common, CommonArgs, shutdown_signal};
use super::config::Pipeline;
use crate::Result;
use crate::registry::{Clock, RegistryClient, Throttler, TrackedProvider, generate_report};
use crate::reports::{ReportWriter, log_daily_summary};
use crate::schedule::{DailyTrigger, Scheduler};
use camino::Utf8PathBuf;
use clap::Parser;
use core::time::Duration;
use std::io::Write;
use std::sync::Arc;

const LOG_TARGET: &str = "     daily";

#[derive(Parser, Debug)]
pub struct DailyArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Produce a single report and exit instead of running on a daily schedule
    #[arg(long)]
    pub once: bool,
}

/// Produce the daily download report, immediately and then once a day until interrupted.
///
/// With `--once`, a single report is produced and its path written to the host's output.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded
pub async fn process_daily<H: Host>(host: &mut H, args: &DailyArgs) -> Result<()> {
    let common = Common::new(&args.common, Pipeline::Daily)?;
    log::info!(target: LOG_TARGET, "Starting Terraform Registry Statistics Monitor");

    let (client, writer, trigger) = match prepare(&common) {
        Ok(prepared) => prepared,
        Err(e) => {
            log::error!(target: LOG_TARGET, "Unexpected error: {e:#}");
            return Ok(());
        }
    };

    let tracked = common.config.tracked.as_slice();
    let provider_interval = common.config.provider_interval;

    if args.once {
        tokio::select! {
            biased;

            () = shutdown_signal() => {
                log::info!(target: LOG_TARGET, "Shutting down Terraform Registry Statistics Monitor");
            }
            saved = daily_cycle(&client, &writer, tracked, provider_interval, Arc::clone(&common.clock)) => {
                if let Some(path) = saved {
                    let _ = writeln!(host.output(), "{path}");
                }
            }
        }

        return Ok(());
    }

    let mut scheduler = Scheduler::new(Arc::clone(&common.clock), trigger, common.config.poll_interval);
    let (client, writer, clock) = (&client, &writer, &common.clock);

    scheduler
        .run(
            move || async move {
                let _ = daily_cycle(client, writer, tracked, provider_interval, Arc::clone(clock)).await;
            },
            shutdown_signal(),
        )
        .await;

    log::info!(target: LOG_TARGET, "Shutting down Terraform Registry Statistics Monitor");
    Ok(())
}

fn prepare(common: &Common) -> Result<(RegistryClient, ReportWriter, DailyTrigger)> {
    let client = common.client()?;
    let writer = common.report_writer()?;
    let trigger = DailyTrigger::new(common.config.daily_at_time()?);
    Ok((client, writer, trigger))
}

/// Fetch the tracked providers, log a summary and save the report as JSON.
///
/// Returns the path of the saved report, or `None` if it couldn't be saved.
pub async fn daily_cycle(
    client: &RegistryClient,
    writer: &ReportWriter,
    tracked: &[TrackedProvider],
    provider_interval: Duration,
    clock: Arc<dyn Clock>,
) -> Option<Utf8PathBuf> {
    let mut throttler = Throttler::new(provider_interval, Arc::clone(&clock));
    let report = generate_report(client, tracked, &mut throttler, clock.as_ref()).await;

    let failed = report.iter().filter(|(_, snapshot)| snapshot.is_error()).count();
    if failed > 0 {
        log::warn!(target: LOG_TARGET, "{failed} of {} providers could not be fetched", report.len());
    }

    log_daily_summary(&report);
    writer.save_json(&report, &clock.now())
}
