//! A tool to rate the quality of open-source packages.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use core::time::Duration;
use ohno::IntoAppError;
use pkg_rate::{Host, run};
use std::io::Write;
use std::io::{stderr, stdout};

/// Default host that runs real OS commands.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

#[cfg_attr(coverage_nightly, coverage(off))]
impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

/// How long exit waits for metric evaluations that were abandoned after timing out.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

#[cfg_attr(coverage_nightly, coverage(off))]
fn main() -> Result<(), ohno::AppError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_app_err("unable to start the async runtime")?;

    let result = runtime.block_on(run(&mut RealHost, std::env::args()));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}
