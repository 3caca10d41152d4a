//! Registry API client
//!
//! Minimal client for the registry's JSON:API endpoints. Each call is a single GET with a
//! request timeout; failures are returned to the caller, which decides how to log them.

use crate::Result;
use core::time::Duration;
use ohno::IntoAppError;
use serde::de::DeserializeOwned;

const LOG_TARGET: &str = "    client";

/// Base URL of the public Terraform registry v2 API.
pub const TERRAFORM_REGISTRY_URL: &str = "https://registry.terraform.io/v2";

#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    /// Create a client for the registry rooted at `base_url`.
    ///
    /// `timeout` bounds each request from connect to the end of the body.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("registry-stats")
            .timeout(timeout)
            .build()
            .into_app_err("creating HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}{path}` with the given query pairs and decode the JSON body.
    ///
    /// Transport errors, non-success statuses and undecodable bodies are all errors.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        log::debug!(target: LOG_TARGET, "GET '{url}' {query:?}");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .into_app_err_with(|| format!("requesting '{url}'"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ohno::app_err!("request to '{url}' failed with HTTP status {status}"));
        }

        response
            .json::<T>()
            .await
            .into_app_err_with(|| format!("decoding response from '{url}'"))
    }
}
