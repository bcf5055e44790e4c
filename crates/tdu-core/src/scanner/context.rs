//! Scan-scoped state threaded through every recursive call.
//!
//! A [`ScanContext`] is owned exclusively by one scan. It holds the counters,
//! the inode ledger, the boundary guard, the Top-K tracker, the bounded
//! diagnostic lists and the optional export stream. Nothing here outlives
//! the scan or is shared with another thread.
use super::boundary::BoundaryGuard;
use super::estimator::DiskUsageEstimator;
use super::ledger::InodeLedger;
use super::progress::ScanEvent;
use crate::analysis::TopKTracker;
use crate::config::{ListLimits, ScanConfig};
use crate::export::NcduExporter;
use crate::model::{Item, ItemKind};
use crate::platform::StatProbe;
use crossbeam_channel::Sender;
use tracing::debug;
use std::io;
use std::path::{Path, PathBuf};

/// Send a progress tick every this many resolved entries.
const PROGRESS_EVERY: u64 = 1_024;

/// Exact per-run counters. Never capped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanCounters {
    /// Every successfully resolved entry, the root included.
    pub items: u64,
    pub files: u64,
    pub dirs: u64,
    pub symlinks: u64,
    /// Occurrences discounted as hardlinks to already-counted content.
    pub hardlinks: u64,
    pub sockets: u64,
    pub pipes: u64,
    pub block_devices: u64,
    pub char_devices: u64,
    pub unknown: u64,
    /// Directories that could not be enumerated.
    pub denied: u64,
    /// Paths whose metadata could not be resolved.
    pub errors: u64,
    pub empty_dirs: u64,
    /// Entries excluded because they live on another filesystem.
    pub other_fs: u64,
}

/// A list that stops recording at `cap` entries.
#[derive(Debug, Clone)]
pub struct BoundedList<T> {
    cap: usize,
    entries: Vec<T>,
}

impl<T> BoundedList<T> {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            entries: Vec::new(),
        }
    }

    /// Record lazily so nothing is built once the list is full.
    ///
    /// Returns whether the value was kept.
    pub fn push_with(&mut self, f: impl FnOnce() -> T) -> bool {
        if self.entries.len() < self.cap {
            self.entries.push(f());
            true
        } else {
            false
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A path whose metadata could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Bounded diagnostic recordings.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    pub empty_dirs: BoundedList<PathBuf>,
    pub denied_dirs: BoundedList<PathBuf>,
    pub stat_errors: BoundedList<StatFailure>,
    pub devices: BoundedList<(PathBuf, ItemKind)>,
    pub streams: BoundedList<(PathBuf, ItemKind)>,
}

impl Diagnostics {
    pub fn new(limits: &ListLimits) -> Self {
        Self {
            empty_dirs: BoundedList::new(limits.empty_dirs),
            denied_dirs: BoundedList::new(limits.denied_dirs),
            stat_errors: BoundedList::new(limits.stat_errors),
            devices: BoundedList::new(limits.devices),
            streams: BoundedList::new(limits.streams),
        }
    }
}

/// Deepest directory and longest path/name seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaxTracker {
    pub deepest_depth: u32,
    pub deepest_path: PathBuf,
    pub longest_path_len: usize,
    pub longest_path: PathBuf,
    pub longest_name_len: usize,
    pub longest_name: String,
}

impl MaxTracker {
    pub fn observe(&mut self, item: &Item) {
        if item.is_dir() && item.depth > self.deepest_depth {
            self.deepest_depth = item.depth;
            self.deepest_path = item.path.clone();
        }
        let path_len = item.path.as_os_str().len();
        if path_len > self.longest_path_len {
            self.longest_path_len = path_len;
            self.longest_path = item.path.clone();
        }
        let name_len = item.name.chars().count();
        if name_len > self.longest_name_len {
            self.longest_name_len = name_len;
            self.longest_name = item.name.to_string();
        }
    }
}

/// State for one scan.
pub struct ScanContext<'p> {
    pub(crate) probe: &'p dyn StatProbe,
    pub(crate) estimator: DiskUsageEstimator,
    /// Absolute scan root.
    pub(crate) root: PathBuf,
    pub(crate) counters: ScanCounters,
    pub(crate) ledger: InodeLedger,
    pub(crate) guard: BoundaryGuard,
    pub(crate) top_files: TopKTracker,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) max: Option<MaxTracker>,
    pub(crate) events: Option<Sender<ScanEvent>>,
    pub(crate) exporter: Option<NcduExporter>,
}

impl<'p> ScanContext<'p> {
    pub fn new(
        config: &ScanConfig,
        root: PathBuf,
        probe: &'p dyn StatProbe,
        events: Option<Sender<ScanEvent>>,
        exporter: Option<NcduExporter>,
    ) -> Self {
        Self {
            probe,
            estimator: DiskUsageEstimator::default(),
            root,
            counters: ScanCounters::default(),
            ledger: InodeLedger::new(),
            guard: BoundaryGuard::new(),
            top_files: TopKTracker::new(config.top_files),
            diagnostics: Diagnostics::new(&config.limits),
            max: config.show_max.then(MaxTracker::default),
            events,
            exporter,
        }
    }

    /// Count one resolved entry and occasionally report progress.
    pub(crate) fn tick(&mut self) {
        self.counters.items += 1;
        if self.counters.items.is_multiple_of(PROGRESS_EVERY) {
            self.send_progress();
        }
    }

    pub(crate) fn send_progress(&self) {
        if let Some(tx) = &self.events {
            // Dropped when the reporter lags; the next tick carries the totals.
            let _ = tx.try_send(ScanEvent::Progress {
                items: self.counters.items,
                errors: self.counters.errors,
            });
        }
    }

    /// Count a path that could not be resolved or listed, and keep it for
    /// the error listing while there is room.
    pub(crate) fn path_failed(&mut self, path: &Path, err: &io::Error) {
        self.counters.errors += 1;
        debug!("cannot resolve {}: {err}", path.display());
        self.diagnostics.stat_errors.push_with(|| StatFailure {
            path: path.to_path_buf(),
            message: err.to_string(),
        });
    }

    /// Push a discrete notice to the reporter, or log it when none is attached.
    pub(crate) fn alert(&self, message: String) {
        match &self.events {
            Some(tx) => {
                if tx.send(ScanEvent::Alert(message.clone())).is_err() {
                    tracing::info!("{}", message.trim());
                }
            }
            None => tracing::info!("{}", message.trim()),
        }
    }
}
