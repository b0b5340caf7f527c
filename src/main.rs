use std::env;
use std::io;

use procmon_logbench::{run_suite, BenchConfig, Registry, SystemDevice};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter for the tool's own diagnostics.
const LOG_FILTER_ENV: &str = "PMBENCH_LOG";

fn main() -> io::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = BenchConfig::from_args(env::args().skip(1));
    tracing::debug!(?config, "starting benchmark");

    let mut registry = Registry::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    run_suite(&mut out, &mut registry, &config, || SystemDevice)
}
