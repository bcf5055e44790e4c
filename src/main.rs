//! Top Disk Usage -- estimates the disk usage of a directory tree.
//!
//! Thin binary entry point. All logic lives in the `tdu-core` and
//! `tdu-cli` crates.
use tracing_subscriber::EnvFilter;

fn main() {
    // The report owns stdout; diagnostics go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("tdu starting");
    std::process::exit(tdu_cli::run());
}
