use crate::Result;
use crate::registry::{DEFAULT_PAGE_SIZE, ProviderPath, TERRAFORM_REGISTRY_URL, TrackedProvider, default_tracked_providers};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveTime;
use core::time::Duration;
use ohno::{EnrichableExt, IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Configuration file looked up in the current directory when `--config` is absent
pub const CONFIG_FILE_NAME: &str = "registry-stats.toml";

/// The two collection pipelines, which differ in log file and report prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    Crawl,
    Daily,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root of the registry v2 API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Providers requested per page during a full crawl
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Minimum spacing between provider list pages
    #[serde(default = "default_page_interval", with = "humantime_serde")]
    pub page_interval: Duration,

    /// Minimum spacing between per-provider requests
    #[serde(default = "default_provider_interval", with = "humantime_serde")]
    pub provider_interval: Duration,

    /// How often the daily scheduler checks for a due run
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Upper bound on each HTTP request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Local time of day of the daily run, `HH:MM` or `HH:MM:SS`
    #[serde(default = "default_daily_at")]
    pub daily_at: String,

    /// Directory receiving reports; the current directory when absent
    #[serde(default)]
    pub output_dir: Option<Utf8PathBuf>,

    #[serde(default = "default_crawl_prefix")]
    pub crawl_prefix: String,

    #[serde(default = "default_daily_prefix")]
    pub daily_prefix: String,

    #[serde(default = "default_crawl_log_file")]
    pub crawl_log_file: Utf8PathBuf,

    #[serde(default = "default_daily_log_file")]
    pub daily_log_file: Utf8PathBuf,

    /// Providers included in the daily report
    #[serde(default = "default_tracked_providers")]
    pub tracked: Vec<TrackedProvider>,
}

fn default_base_url() -> String {
    TERRAFORM_REGISTRY_URL.to_string()
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

const fn default_page_interval() -> Duration {
    Duration::from_millis(500)
}

const fn default_provider_interval() -> Duration {
    Duration::from_secs(1)
}

const fn default_poll_interval() -> Duration {
    Duration::from_secs(60)
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_daily_at() -> String {
    "00:00".to_string()
}

fn default_crawl_prefix() -> String {
    "terraform_all_providers".to_string()
}

fn default_daily_prefix() -> String {
    "terraform_downloads".to_string()
}

fn default_crawl_log_file() -> Utf8PathBuf {
    Utf8PathBuf::from("terraform_all_providers.log")
}

fn default_daily_log_file() -> Utf8PathBuf {
    Utf8PathBuf::from("terraform_stats.log")
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `registry-stats.toml` in the current directory is used if it
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load(config_path: Option<&Utf8Path>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.to_path_buf(), text)
        } else {
            let path = Utf8PathBuf::from(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// The configured daily run time.
    ///
    /// # Errors
    ///
    /// Returns an error if `daily_at` is not `HH:MM` or `HH:MM:SS`
    pub fn daily_at_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.daily_at, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&self.daily_at, "%H:%M:%S"))
            .into_app_err_with(|| format!("daily_at must be HH:MM or HH:MM:SS, got '{}'", self.daily_at))
    }

    #[must_use]
    pub fn log_file(&self, pipeline: Pipeline) -> &Utf8Path {
        match pipeline {
            Pipeline::Crawl => &self.crawl_log_file,
            Pipeline::Daily => &self.daily_log_file,
        }
    }

    #[must_use]
    pub fn report_prefix(&self, pipeline: Pipeline) -> &str {
        match pipeline {
            Pipeline::Crawl => &self.crawl_prefix,
            Pipeline::Daily => &self.daily_prefix,
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range or malformed
    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(app_err!("base_url must not be empty"));
        }

        if self.page_size == 0 {
            return Err(app_err!("page_size must be greater than 0"));
        }

        let _ = self.daily_at_time()?;

        if self.tracked.is_empty() {
            return Err(app_err!("tracked must list at least one provider"));
        }

        let mut keys = HashSet::new();
        for tracked in &self.tracked {
            let _ = tracked
                .provider
                .parse::<ProviderPath>()
                .map_err(|e| e.enrich_with(|| format!("invalid provider for tracked key '{}'", tracked.key)))?;

            if !keys.insert(tracked.key.as_str()) {
                return Err(app_err!("tracked key '{}' appears more than once", tracked.key));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
