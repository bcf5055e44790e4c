//! Command-line arguments.
use clap::Parser;
use std::path::PathBuf;
use tdu_core::config::{DEFAULT_TOP_ENTRIES, DEFAULT_TOP_FILES};
use tdu_core::{ListLimits, ScanConfig};

#[derive(Parser, Debug)]
#[command(
    name = "tdu",
    version,
    about = "Top Disk Usage: estimate disk usage and list the biggest items"
)]
pub struct Cli {
    /// Directory to scan (default: current directory)
    pub dir: Option<PathBuf>,

    /// Number of biggest files to display
    #[arg(short = 'b', value_name = "N", default_value_t = DEFAULT_TOP_FILES)]
    pub biggest: usize,

    /// Number of top-level entries to display
    #[arg(short = 'l', value_name = "N", default_value_t = DEFAULT_TOP_ENTRIES)]
    pub list: usize,

    /// List up to N empty directories
    #[arg(short = 'e', value_name = "N", default_value_t = 0)]
    pub empty_dirs: usize,

    /// List up to N directories that could not be read
    #[arg(short = 'd', value_name = "N", default_value_t = 0)]
    pub denied_dirs: usize,

    /// List up to N paths whose metadata could not be read
    #[arg(short = 's', value_name = "N", default_value_t = 0)]
    pub stat_errors: usize,

    /// List up to N block and character devices
    #[arg(short = 'f', value_name = "N", default_value_t = 0)]
    pub devices: usize,

    /// List up to N sockets and named pipes
    #[arg(short = 't', value_name = "N", default_value_t = 0)]
    pub streams: usize,

    /// Show the deepest directory and the longest path and name
    #[arg(long, overrides_with = "nomax")]
    pub max: bool,

    /// Do not track the deepest directory or longest names
    #[arg(long, overrides_with = "max")]
    pub nomax: bool,

    /// Stream an ncdu-compatible JSON export of the tree to FILE
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Human readable sizes (default)
    #[arg(long, overrides_with = "nohuman")]
    pub human: bool,

    /// Sizes in kilobytes
    #[arg(long, overrides_with = "human")]
    pub nohuman: bool,
}

impl Cli {
    /// Build the scan configuration, with `name_width` taken from the terminal.
    pub fn into_config(self, name_width: usize) -> ScanConfig {
        ScanConfig {
            root: self.dir.unwrap_or_else(|| PathBuf::from(".")),
            top_files: self.biggest,
            top_entries: self.list,
            limits: ListLimits {
                empty_dirs: self.empty_dirs,
                denied_dirs: self.denied_dirs,
                stat_errors: self.stat_errors,
                devices: self.devices,
                streams: self.streams,
            },
            show_max: self.max && !self.nomax,
            export_path: self.output,
            human_readable: !self.nohuman,
            name_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ScanConfig {
        let mut argv = vec!["tdu"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().into_config(37)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.top_files, DEFAULT_TOP_FILES);
        assert_eq!(config.top_entries, DEFAULT_TOP_ENTRIES);
        assert_eq!(config.limits, ListLimits::default());
        assert!(!config.show_max);
        assert!(config.human_readable);
        assert!(config.export_path.is_none());
        assert_eq!(config.name_width, 37);
    }

    #[test]
    fn test_limits_and_counts() {
        let config = parse(&[
            "-b", "3", "-l", "20", "-e", "1", "-d", "2", "-s", "3", "-f", "4", "-t", "5", "/srv",
        ]);
        assert_eq!(config.root, PathBuf::from("/srv"));
        assert_eq!(config.top_files, 3);
        assert_eq!(config.top_entries, 20);
        assert_eq!(
            config.limits,
            ListLimits {
                empty_dirs: 1,
                denied_dirs: 2,
                stat_errors: 3,
                devices: 4,
                streams: 5,
            }
        );
    }

    #[test]
    fn test_toggles_last_one_wins() {
        assert!(parse(&["--max"]).show_max);
        assert!(!parse(&["--max", "--nomax"]).show_max);
        assert!(parse(&["--nomax", "--max"]).show_max);
        assert!(!parse(&["--nohuman"]).human_readable);
        assert!(parse(&["--nohuman", "--human"]).human_readable);
    }

    #[test]
    fn test_export_path() {
        let config = parse(&["-o", "tree.json"]);
        assert_eq!(config.export_path, Some(PathBuf::from("tree.json")));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Cli::try_parse_from(["tdu", "-b", "many"]).is_err());
        assert!(Cli::try_parse_from(["tdu", "a", "b"]).is_err());
        assert!(Cli::try_parse_from(["tdu", "--bogus"]).is_err());
    }
}
