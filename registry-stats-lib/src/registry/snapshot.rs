use super::client::RegistryClient;
use super::clock::Clock;
use super::downloads::fetch_downloads;
use super::throttler::Throttler;
use crate::reports::format_thousands;
use chrono::SecondsFormat;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

const LOG_TARGET: &str = "  snapshot";

/// Error text recorded for a provider whose download count could not be fetched.
pub const FETCH_FAILED: &str = "Failed to fetch data";

/// A provider followed by the daily report, keyed by a short name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackedProvider {
    pub key: String,
    pub provider: String,
}

impl TrackedProvider {
    #[must_use]
    pub fn new(key: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            provider: provider.into(),
        }
    }
}

/// The providers tracked when the configuration doesn't name any.
#[must_use]
pub fn default_tracked_providers() -> Vec<TrackedProvider> {
    [
        ("aws", "hashicorp/aws"),
        ("azure", "hashicorp/azurerm"),
        ("gcp", "hashicorp/google"),
        ("datadog", "datadog/datadog"),
        ("splunk", "splunk/splunk"),
        ("databricks", "databricks/databricks"),
        ("elastic", "elastic/ec"),
    ]
    .into_iter()
    .map(|(key, provider)| TrackedProvider::new(key, provider))
    .collect()
}

/// Download count of one provider at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySnapshot {
    pub provider: String,
    pub total_downloads: u64,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DailySnapshot {
    #[must_use]
    pub fn fetched(provider: impl Into<String>, total_downloads: u64, timestamp: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            total_downloads,
            timestamp: timestamp.into(),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(provider: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            total_downloads: 0,
            timestamp: timestamp.into(),
            error: Some(FETCH_FAILED.to_string()),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Snapshots keyed by short name, in tracking order.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyReport {
    entries: Vec<(String, DailySnapshot)>,
}

impl DailyReport {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DailySnapshot> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, snapshot)| snapshot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DailySnapshot)> {
        self.entries.iter().map(|(key, snapshot)| (key.as_str(), snapshot))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, DailySnapshot)> for DailyReport {
    fn from_iter<I: IntoIterator<Item = (String, DailySnapshot)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for DailyReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, snapshot) in &self.entries {
            map.serialize_entry(key, snapshot)?;
        }
        map.end()
    }
}

/// Fetch the current download count of every tracked provider, one at a time.
///
/// A provider that can't be fetched gets an error-flagged snapshot with zero downloads.
/// Requests are spaced by `throttler`.
pub async fn generate_report(
    client: &RegistryClient,
    tracked: &[TrackedProvider],
    throttler: &mut Throttler,
    clock: &dyn Clock,
) -> DailyReport {
    let mut entries = Vec::with_capacity(tracked.len());

    for tracked_provider in tracked {
        throttler.acquire().await;

        let key = &tracked_provider.key;
        log::info!(target: LOG_TARGET, "Fetching statistics for {key}...");

        let result = fetch_downloads(client, &tracked_provider.provider).await;
        let timestamp = clock.now().to_rfc3339_opts(SecondsFormat::Micros, false);

        let snapshot = if let Some(fetched) = result {
            log::info!(target: LOG_TARGET, "Successfully fetched {key} downloads: {}", format_thousands(fetched.downloads));
            DailySnapshot::fetched(&tracked_provider.provider, fetched.downloads, timestamp)
        } else {
            log::warn!(target: LOG_TARGET, "Failed to fetch data for {key}");
            DailySnapshot::failed(&tracked_provider.provider, timestamp)
        };

        entries.push((key.clone(), snapshot));
    }

    DailyReport { entries }
}
