use super::common;
use crate::Result;
use crate::registry::ProviderRecord;
use ohno::IntoAppError;
use std::io::Write;

/// Write `records` as CSV, highest downloads first.
///
/// The header row names the record fields; absent optional fields are empty cells.
pub fn generate<W: Write>(records: &[ProviderRecord], writer: W) -> Result<()> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    if records.is_empty() {
        csv_writer
            .write_record(HEADER)
            .into_app_err("writing CSV header")?;
    }

    for record in common::sort_by_downloads(records) {
        csv_writer
            .serialize(record)
            .into_app_err_with(|| format!("writing CSV row for provider '{}'", record.full_name))?;
    }

    csv_writer.flush().into_app_err("flushing CSV output")?;
    Ok(())
}

/// Column names, used when there are no rows to derive them from.
const HEADER: [&str; 9] = [
    "id",
    "namespace",
    "name",
    "full_name",
    "downloads",
    "version",
    "published_at",
    "tier",
    "source",
];
