//! Scan configuration -- the value set the frontend hands to the core.
use std::path::PathBuf;

/// Default number of biggest files to list.
pub const DEFAULT_TOP_FILES: usize = 8;

/// Default number of top-level entries to list.
pub const DEFAULT_TOP_ENTRIES: usize = 15;

/// Display width used when no terminal is attached.
pub const DEFAULT_WIDTH: usize = 80;

/// Width taken by the numbered size/percentage/items columns of a report row.
pub const FIXED_COLUMNS: usize = 43;

/// Caps on the bounded diagnostic lists.
///
/// A limit of 0 disables recording for that list; the matching counter in
/// [`crate::scanner::ScanCounters`] is always exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListLimits {
    pub empty_dirs: usize,
    pub denied_dirs: usize,
    pub stat_errors: usize,
    pub devices: usize,
    pub streams: usize,
}

/// Everything a scan and its report need to know.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directory to scan.
    pub root: PathBuf,
    /// How many of the biggest leaf items to report (K).
    pub top_files: usize,
    /// How many top-level entries to list before rolling the rest up.
    pub top_entries: usize,
    pub limits: ListLimits,
    /// Track and report the deepest directory and the longest path/name.
    pub show_max: bool,
    /// Stream an ncdu-compatible export to this file.
    pub export_path: Option<PathBuf>,
    /// Human readable units instead of fixed kilobytes.
    pub human_readable: bool,
    /// Character budget for names in the report.
    pub name_width: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            top_files: DEFAULT_TOP_FILES,
            top_entries: DEFAULT_TOP_ENTRIES,
            limits: ListLimits::default(),
            show_max: false,
            export_path: None,
            human_readable: true,
            name_width: name_width_for(DEFAULT_WIDTH),
        }
    }
}

impl ScanConfig {
    /// Config for `root` with every other setting at its default.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

/// Clamp a detected terminal width into the supported range.
///
/// `None` means no terminal is attached.
pub fn clamp_width(detected: Option<usize>) -> usize {
    match detected {
        Some(w) if w >= 72 => w.min(120),
        _ => DEFAULT_WIDTH,
    }
}

/// Name budget left over once the fixed report columns are laid out.
pub fn name_width_for(width: usize) -> usize {
    width.saturating_sub(FIXED_COLUMNS)
}
