//! Collect download statistics for Terraform registry providers.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use registry_stats_lib::{Host, run};
use std::io::Write;
use std::io::stdout;

/// Default host that writes to the real standard output.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

#[cfg_attr(coverage_nightly, coverage(off))]
impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }
}

#[tokio::main(flavor = "current_thread")]
#[cfg_attr(coverage_nightly, coverage(off))]
async fn main() -> Result<(), ohno::AppError> {
    run(&mut RealHost, std::env::args()).await
}
