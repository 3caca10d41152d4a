//! Common utilities shared across report generators.

use crate::registry::ProviderRecord;
use chrono::{DateTime, TimeZone};
use core::fmt::Display;

/// Format an integer with `,` between groups of three digits.
///
/// Example: `1234567` becomes `"1,234,567"`.
#[must_use]
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(ch);
    }

    result
}

/// Build a report file name of the form `{prefix}_{YYYYMMDD_HHMMSS}.{ext}`.
#[must_use]
pub fn report_file_name<Tz: TimeZone>(prefix: &str, timestamp: &DateTime<Tz>, extension: &str) -> String
where
    Tz::Offset: Display,
{
    format!("{prefix}_{}.{extension}", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Records ordered by descending downloads. Ties keep their input order.
#[must_use]
pub fn sort_by_downloads(records: &[ProviderRecord]) -> Vec<&ProviderRecord> {
    let mut sorted: Vec<&ProviderRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.downloads.cmp(&a.downloads));
    sorted
}
