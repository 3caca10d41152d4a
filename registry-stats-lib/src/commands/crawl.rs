use super::Host;
use super::common::{Common, CommonArgs, shutdown_signal};
use super::config::{Config, Pipeline};
use crate::Result;
use crate::registry::{Clock, Progress, ProviderRecord, RegistryClient, Throttler, extract_provider, fetch_all_providers, fetch_yearly_downloads};
use crate::reports::log_top_providers;
use camino::Utf8PathBuf;
use chrono::Datelike;
use clap::Parser;
use std::io::Write;
use std::sync::Arc;

const LOG_TARGET: &str = "     crawl";

#[derive(Parser, Debug)]
pub struct CrawlArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Report downloads during the current calendar year instead of all-time totals
    #[arg(long)]
    pub this_year: bool,
}

/// Crawl every provider in the registry and save JSON and CSV reports.
///
/// The paths of the saved reports are written to the host's output. Failures after logging
/// is set up are logged and end the command without an error.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded
pub async fn process_crawl<H: Host>(host: &mut H, args: &CrawlArgs) -> Result<()> {
    let common = Common::new(&args.common, Pipeline::Crawl)?;
    log::info!(target: LOG_TARGET, "Starting Terraform Registry Full Provider Statistics");

    let result = tokio::select! {
        biased;

        () = shutdown_signal() => {
            log::info!(target: LOG_TARGET, "Shutting down Terraform Registry Statistics Monitor");
            return Ok(());
        }
        result = crawl(&common, args.this_year) => result,
    };

    match result {
        Ok(saved) => {
            for path in saved {
                let _ = writeln!(host.output(), "{path}");
            }
        }
        Err(e) => log::error!(target: LOG_TARGET, "Unexpected error: {e:#}"),
    }

    Ok(())
}

async fn crawl(common: &Common, this_year: bool) -> Result<Vec<Utf8PathBuf>> {
    let client = common.client()?;
    let writer = common.report_writer()?;
    log::debug!(target: LOG_TARGET, "Writing reports to '{}'", writer.output_dir());

    let records = collect_records(
        &client,
        &common.config,
        Arc::clone(&common.clock),
        common.progress.as_ref(),
        this_year,
    )
    .await;

    let timestamp = common.clock.now();
    let json_path = writer.save_json(&records, &timestamp);
    let csv_path = writer.save_csv(&records, &timestamp);

    if csv_path.is_some() {
        log_top_providers(&records);
    }

    Ok(json_path.into_iter().chain(csv_path).collect())
}

/// Fetch every provider and turn it into a record.
///
/// Items that can't be interpreted are skipped. With `this_year`, each record's download
/// count is replaced by its count for the current calendar year, and records whose yearly
/// count can't be fetched are dropped. Yearly requests share the page pacing.
pub async fn collect_records(
    client: &RegistryClient,
    config: &Config,
    clock: Arc<dyn Clock>,
    progress: &dyn Progress,
    this_year: bool,
) -> Vec<ProviderRecord> {
    log::info!(target: LOG_TARGET, "Fetching all providers from Terraform Registry...");

    let mut page_throttler = Throttler::new(config.page_interval, Arc::clone(&clock));
    let items = fetch_all_providers(client, config.page_size, &mut page_throttler).await;
    log::info!(target: LOG_TARGET, "Found {} providers", items.len());

    progress.set_phase("Processing");
    progress.set_length(items.len() as u64);

    let mut records = Vec::with_capacity(items.len());
    for item in &items {
        if let Some(record) = extract_provider(item) {
            records.push(record);
        }
        progress.advance();
    }

    if this_year {
        let year = clock.now().year();
        records = apply_yearly_downloads(client, records, year, &mut page_throttler, progress).await;
    }

    progress.done();
    records
}

async fn apply_yearly_downloads(
    client: &RegistryClient,
    records: Vec<ProviderRecord>,
    year: i32,
    throttler: &mut Throttler,
    progress: &dyn Progress,
) -> Vec<ProviderRecord> {
    log::info!(target: LOG_TARGET, "Fetching {year} downloads for {} providers", records.len());

    progress.set_phase(&year.to_string());
    progress.set_length(records.len() as u64);

    let mut yearly = Vec::with_capacity(records.len());
    for record in records {
        throttler.acquire().await;

        if let Some(downloads) = fetch_yearly_downloads(client, &record.id, year).await {
            yearly.push(record.with_downloads(downloads));
        }
        progress.advance();
    }

    yearly
}
