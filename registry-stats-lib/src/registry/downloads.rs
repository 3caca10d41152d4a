use super::client::RegistryClient;
use super::provider_path::ProviderPath;
use serde::Deserialize;

const LOG_TARGET: &str = " downloads";

/// Download count taken from a provider's detail document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Downloads {
    pub downloads: u64,
}

#[derive(Debug, Deserialize)]
struct DetailDocument {
    data: Option<DetailData>,
}

#[derive(Debug, Deserialize)]
struct DetailData {
    attributes: Option<DetailAttributes>,
}

#[derive(Debug, Deserialize)]
struct DetailAttributes {
    downloads: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct YearlyDocument {
    downloads: Option<u64>,
}

/// Fetch the cumulative download count for `provider_path` (`namespace/name`).
///
/// Returns `None` when the path is malformed, the request fails, or the document has no
/// `data.attributes`. The cause is logged; nothing is propagated.
pub async fn fetch_downloads(client: &RegistryClient, provider_path: &str) -> Option<Downloads> {
    let path = match provider_path.parse::<ProviderPath>() {
        Ok(path) => path,
        Err(e) => {
            log::error!(target: LOG_TARGET, "Unexpected error for {provider_path}: {e:#}");
            return None;
        }
    };

    let url_path = format!("/providers/{}/{}", path.namespace(), path.name());
    match client.get_json::<DetailDocument>(&url_path, &[]).await {
        Ok(DetailDocument {
            data: Some(DetailData {
                attributes: Some(attributes),
            }),
        }) => Some(Downloads {
            downloads: attributes.downloads.unwrap_or(0),
        }),
        Ok(_) => {
            log::error!(target: LOG_TARGET, "Unexpected response shape for {provider_path}: missing data.attributes");
            None
        }
        Err(e) => {
            log::error!(target: LOG_TARGET, "Error fetching data for {provider_path}: {e:#}");
            None
        }
    }
}

/// Fetch the number of downloads `provider_id` received during `year`.
///
/// A missing `downloads` field counts as zero. Request failures are logged and yield `None`.
pub async fn fetch_yearly_downloads(client: &RegistryClient, provider_id: &str, year: i32) -> Option<u64> {
    let url_path = format!("/providers/{provider_id}/downloads");
    match client
        .get_json::<YearlyDocument>(&url_path, &[("year", year.to_string())])
        .await
    {
        Ok(document) => Some(document.downloads.unwrap_or(0)),
        Err(e) => {
            log::error!(target: LOG_TARGET, "Error fetching downloads for provider {provider_id}: {e:#}");
            None
        }
    }
}
