#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for registry-stats
//!
//! This library holds all functionality of the registry-stats tool, which collects
//! download statistics for providers published on the Terraform registry.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`registry`]: Registry API access and record extraction
//! - [`reports`]: JSON, CSV and console reports
//! - [`schedule`]: Daily re-execution of the report cycle

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod registry;
#[cfg(not(any(debug_assertions, test)))]
mod registry;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

#[cfg(any(debug_assertions, test))]
pub mod schedule;
#[cfg(not(any(debug_assertions, test)))]
mod schedule;

pub use crate::commands::{Host, run};
