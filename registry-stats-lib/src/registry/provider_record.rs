use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

const LOG_TARGET: &str = "  provider";

/// Placeholder used in `full_name` when the namespace or name is missing.
const MISSING_PART: &str = "None";

/// One row of the full-crawl report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderRecord {
    pub id: String,
    pub namespace: Option<String>,
    pub name: Option<String>,
    pub full_name: String,
    pub downloads: u64,
    pub version: Option<String>,
    pub published_at: Option<String>,
    pub tier: Option<String>,
    pub source: Option<String>,
}

impl ProviderRecord {
    /// The same record with its download count replaced.
    #[must_use]
    pub fn with_downloads(self, downloads: u64) -> Self {
        Self { downloads, ..self }
    }
}

/// `namespace/name`, substituting `None` for a missing part.
#[must_use]
pub fn full_name(namespace: Option<&str>, name: Option<&str>) -> String {
    format!("{}/{}", namespace.unwrap_or(MISSING_PART), name.unwrap_or(MISSING_PART))
}

#[derive(Debug, Deserialize)]
struct RawProvider {
    id: RawId,
    attributes: RawAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

/// Attributes of a provider item. A value of the wrong type counts as absent.
#[derive(Debug, Deserialize)]
struct RawAttributes {
    #[serde(default, deserialize_with = "lenient")]
    namespace: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    downloads: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    version: Option<String>,
    #[serde(default, rename = "published-at", deserialize_with = "lenient")]
    published_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    tier: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    source: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> core::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

impl From<RawProvider> for ProviderRecord {
    fn from(raw: RawProvider) -> Self {
        let id = match raw.id {
            RawId::Text(id) => id,
            RawId::Number(id) => id.to_string(),
        };
        let attributes = raw.attributes;

        Self {
            id,
            full_name: full_name(attributes.namespace.as_deref(), attributes.name.as_deref()),
            namespace: attributes.namespace,
            name: attributes.name,
            downloads: attributes.downloads.unwrap_or(0),
            version: attributes.version,
            published_at: attributes.published_at,
            tier: attributes.tier,
            source: attributes.source,
        }
    }
}

/// Turn one raw item of the provider list into a record.
///
/// Returns `None`, after logging, when the item lacks an `id` or an `attributes` object.
/// Attributes of an unexpected type are treated as absent.
#[must_use]
pub fn extract_provider(item: &Value) -> Option<ProviderRecord> {
    match RawProvider::deserialize(item) {
        Ok(raw) => Some(raw.into()),
        Err(e) => {
            log::error!(target: LOG_TARGET, "Error processing provider {}: {e}", describe_id(item));
            None
        }
    }
}

fn describe_id(item: &Value) -> String {
    match item.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(other) => other.to_string(),
        None => MISSING_PART.to_string(),
    }
}
