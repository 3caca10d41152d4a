//! Data collection from the provider registry
//!
//! This module talks to the registry's HTTP API and turns its JSON:API documents into the
//! records the reports are built from.
//!
//! # Implementation Model
//!
//! Two pipelines share a [`RegistryClient`]:
//!
//! - **Full crawl**: [`fetch_all_providers`] walks the paginated provider list and returns
//!   the raw items; [`extract_provider`] turns each item into a [`ProviderRecord`]. With
//!   the yearly option, [`fetch_yearly_downloads`] replaces each record's download count.
//! - **Daily report**: [`generate_report`] fetches the download count of a fixed list of
//!   [`TrackedProvider`]s through [`fetch_downloads`] and yields a [`DailyReport`].
//!
//! Everything is sequential. Requests are spaced by a [`Throttler`], a minimum-interval
//! gate driven by an injected [`Clock`], so tests observe the pacing on virtual time.
//! Failures never escape this module: a failed page ends pagination, a malformed item is
//! skipped, and a failed provider is recorded as an error snapshot.

mod client;
mod clock;
mod downloads;
mod pager;
mod progress;
mod provider_path;
mod provider_record;
mod snapshot;
mod throttler;

pub use client::{RegistryClient, TERRAFORM_REGISTRY_URL};
#[cfg(any(debug_assertions, test))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use downloads::fetch_yearly_downloads;
#[cfg(any(debug_assertions, test))]
pub use downloads::{Downloads, fetch_downloads};
pub use pager::{DEFAULT_PAGE_SIZE, fetch_all_providers};
pub use progress::Progress;
pub use provider_path::ProviderPath;
pub use provider_record::{ProviderRecord, extract_provider};
pub use snapshot::{DailyReport, TrackedProvider, default_tracked_providers, generate_report};
#[cfg(any(debug_assertions, test))]
pub use snapshot::{DailySnapshot, FETCH_FAILED};
pub use throttler::Throttler;
