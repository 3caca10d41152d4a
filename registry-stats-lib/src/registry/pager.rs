use super::client::RegistryClient;
use super::throttler::Throttler;
use serde::Deserialize;
use serde_json::Value;

const LOG_TARGET: &str = "     pager";

/// Number of providers requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Deserialize)]
struct ProvidersPage {
    #[serde(default)]
    data: Option<Vec<Value>>,
}

/// Walk the provider list page by page and return every raw item, in page order.
///
/// Pagination ends at the first page with no items. A failed request ends it as well; the
/// items gathered so far are returned as the final result and the failure is logged with
/// its page number. Requests are spaced by `throttler`.
pub async fn fetch_all_providers(client: &RegistryClient, page_size: u32, throttler: &mut Throttler) -> Vec<Value> {
    let mut providers = Vec::new();
    let mut page: u32 = 1;

    loop {
        throttler.acquire().await;

        let query = [("page[number]", page.to_string()), ("page[size]", page_size.to_string())];
        match client.get_json::<ProvidersPage>("/providers", &query).await {
            Ok(ProvidersPage { data: Some(items) }) if !items.is_empty() => {
                log::debug!(target: LOG_TARGET, "Page {page} returned {} providers", items.len());
                providers.extend(items);
                page += 1;
            }
            Ok(_) => {
                log::debug!(target: LOG_TARGET, "Page {page} is empty, pagination complete");
                break;
            }
            Err(e) => {
                log::error!(target: LOG_TARGET, "Error fetching providers page {page}: {e:#}");
                break;
            }
        }
    }

    providers
}
