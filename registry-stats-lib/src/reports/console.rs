use super::common::{format_thousands, sort_by_downloads};
use crate::registry::{DailyReport, ProviderRecord};

const LOG_TARGET: &str = "   reports";

/// Number of providers listed after a full crawl.
pub const TOP_PROVIDER_COUNT: usize = 10;

/// `{full_name}: {downloads} downloads` for the `limit` most downloaded providers.
#[must_use]
pub fn top_provider_lines(records: &[ProviderRecord], limit: usize) -> Vec<String> {
    sort_by_downloads(records)
        .into_iter()
        .take(limit)
        .map(|record| format!("{}: {} downloads", record.full_name, format_thousands(record.downloads)))
        .collect()
}

/// `{key}: {downloads} downloads` for every entry of a daily report.
#[must_use]
pub fn daily_summary_lines(report: &DailyReport) -> Vec<String> {
    report
        .iter()
        .map(|(key, snapshot)| format!("{key}: {} downloads", format_thousands(snapshot.total_downloads)))
        .collect()
}

pub fn log_top_providers(records: &[ProviderRecord]) {
    log::info!(target: LOG_TARGET, "Top {TOP_PROVIDER_COUNT} Providers by Downloads:");
    for line in top_provider_lines(records, TOP_PROVIDER_COUNT) {
        log::info!(target: LOG_TARGET, "{line}");
    }
}

pub fn log_daily_summary(report: &DailyReport) {
    log::info!(target: LOG_TARGET, "Provider Download Statistics:");
    for line in daily_summary_lines(report) {
        log::info!(target: LOG_TARGET, "{line}");
    }
}
