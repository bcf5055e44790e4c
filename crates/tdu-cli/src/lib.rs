//! tdu command-line frontend.
//!
//! Parses arguments into a [`ScanConfig`], runs the scan with a background
//! progress reporter, and prints the report. All scanning and accounting
//! lives in `tdu-core`.
pub mod args;
pub mod console;

use anyhow::Context;
use args::Cli;
use clap::Parser;
use console::Console;
use std::ffi::OsString;
use std::io::{self, Write};
use std::time::Instant;
use tdu_core::analysis::render::render_report;
use tdu_core::config::name_width_for;
use tdu_core::scanner::{self, ProgressReporter};
use tdu_core::{ScanConfig, ScanError};
use tracing::debug;

pub const EXIT_OK: i32 = 0;
/// Fatal I/O failure, e.g. the export file cannot be written.
pub const EXIT_FATAL: i32 = 1;
/// Usage error, help or version output, or an unusable root directory.
pub const EXIT_USAGE: i32 = 2;

/// Run with the process arguments and return the exit code.
pub fn run() -> i32 {
    run_with_args(std::env::args_os())
}

pub fn run_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return EXIT_USAGE;
        }
    };

    let console = Console::detect();
    let config = cli.into_config(name_width_for(console.width));
    debug!(?config, "parsed arguments");

    match execute(&config, &console) {
        Ok(()) => EXIT_OK,
        Err(err) => {
            console.error(&format!("ERROR: {err:#}"));
            exit_code_for(&err)
        }
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ScanError>() {
        Some(ScanError::InvalidRoot { .. }) => EXIT_USAGE,
        _ => EXIT_FATAL,
    }
}

fn execute(config: &ScanConfig, console: &Console) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut out = io::stdout();

    console.banner(&mut out)?;
    console.status(&mut out, &format!("  Scanning [{}]...", config.root.display()))?;
    out.flush()?;

    let reporter = ProgressReporter::spawn(io::stdout(), console.tty)
        .context("cannot start the progress reporter")?;
    let result = scanner::scan(config, Some(reporter.sender()));
    reporter.finish();
    let outcome = result?;

    let mut out = out.lock();
    render_report(&mut out, &outcome, config).context("cannot write the report")?;
    if let (Some(count), Some(path)) = (outcome.exported_entries, &config.export_path) {
        writeln!(out, "  Exported {count} entries to {}", path.display())?;
    }
    writeln!(out, "\n  Total time: {:.3} s\n", start.elapsed().as_secs_f64())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_usage_errors_exit_2() {
        assert_eq!(run_with_args(["tdu", "--bogus"]), EXIT_USAGE);
        assert_eq!(run_with_args(["tdu", "--help"]), EXIT_USAGE);
        assert_eq!(run_with_args(["tdu", "--version"]), EXIT_USAGE);
    }

    #[test]
    fn test_missing_root_exits_2() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert_eq!(
            run_with_args([OsString::from("tdu"), missing.into_os_string()]),
            EXIT_USAGE
        );
    }

    #[test]
    fn test_unwritable_export_exits_1() {
        let tmp = tempfile::TempDir::new().unwrap();
        let export = tmp.path().join("no-such-dir").join("out.json");
        let args = [
            OsString::from("tdu"),
            OsString::from("-o"),
            export.into_os_string(),
            tmp.path().as_os_str().to_owned(),
        ];
        assert_eq!(run_with_args(args), EXIT_FATAL);
    }

    #[test]
    fn test_successful_scan_with_export() {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = tmp.path().join("tree");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.txt"), vec![1u8; 3000]).unwrap();
        let export = tmp.path().join("out.json");
        let args = [
            OsString::from("tdu"),
            OsString::from("-o"),
            export.clone().into_os_string(),
            root.into_os_string(),
        ];
        assert_eq!(run_with_args(args), EXIT_OK);
        let text = fs::read_to_string(export).unwrap();
        assert!(text.starts_with("[1,1,"));
    }
}
