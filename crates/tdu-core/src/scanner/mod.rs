//! Scanner module -- orchestrates one single-threaded scan.
//!
//! The walk is a synchronous depth-first recursion on the calling thread.
//! Aggregate sums and the inode ledger rely on there being exactly one
//! writer, so there is no parallelism in the walk itself. Progress and
//! boundary alerts leave through an optional channel to a
//! [`progress::ProgressReporter`].
pub mod boundary;
pub mod context;
pub mod estimator;
pub mod ledger;
pub mod progress;
mod walker;

pub use boundary::BoundaryGuard;
pub use context::{BoundedList, Diagnostics, MaxTracker, ScanContext, ScanCounters, StatFailure};
pub use estimator::DiskUsageEstimator;
pub use ledger::InodeLedger;
pub use progress::{ProgressReporter, ScanEvent};

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::export::NcduExporter;
use crate::model::Item;
use crate::platform::{partition, PartitionInfo, PlatformProbe, StatProbe};
use crossbeam_channel::Sender;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// Everything a finished scan produced.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Aggregate record of the scan root.
    pub root: Item,
    /// Immediate children of the root, in enumeration order.
    pub entries: Vec<Item>,
    /// The K biggest leaf items, sorted descending by disk usage.
    pub top_files: Vec<Item>,
    pub counters: ScanCounters,
    pub diagnostics: Diagnostics,
    /// Present when max tracking was requested.
    pub max: Option<MaxTracker>,
    /// At least one entry lived on another filesystem.
    pub boundary_crossed: bool,
    /// Partition of the root device (native probes only).
    pub partition: Option<PartitionInfo>,
    /// Device/inode/block data was available for this run.
    pub native_stats: bool,
    /// Number of entry objects written to the export, if exporting.
    pub exported_entries: Option<u64>,
    pub duration: Duration,
}

/// Scan `config.root` with the platform's native probe.
pub fn scan(config: &ScanConfig, events: Option<Sender<ScanEvent>>) -> Result<ScanOutcome> {
    scan_with_probe(config, &PlatformProbe::default(), events)
}

/// Scan `config.root` with an explicit metadata probe.
///
/// Fails only on pre-flight problems (bad root, export file cannot be
/// created) or when the export stream could not be written. Per-path
/// failures are counted in the outcome.
pub fn scan_with_probe(
    config: &ScanConfig,
    probe: &dyn StatProbe,
    events: Option<Sender<ScanEvent>>,
) -> Result<ScanOutcome> {
    let start = Instant::now();
    let root = resolve_root(&config.root)?;

    let exporter = match &config.export_path {
        Some(path) => {
            let mut exporter = NcduExporter::create(path)?;
            exporter.begin(chrono::Utc::now().timestamp());
            Some(exporter)
        }
        None => None,
    };

    info!("Scanning {}", root.display());
    if !probe.is_native() {
        info!("native stat unavailable: disk usage is approximated from apparent sizes");
    }

    let mut ctx = ScanContext::new(config, root.clone(), probe, events, exporter);
    let mut entries = Vec::new();
    let root_item = ctx
        .walk(PathBuf::new(), 1, Some(&mut entries))
        .ok_or_else(|| ScanError::InvalidRoot {
            path: root.clone(),
            reason: "metadata could not be read".into(),
        })?;
    ctx.send_progress();

    let exported_entries = match ctx.exporter.take() {
        Some(exporter) => Some(exporter.finish()?),
        None => None,
    };

    let ScanContext {
        counters,
        ledger,
        guard,
        top_files,
        diagnostics,
        max,
        ..
    } = ctx;
    debug_assert_eq!(counters.hardlinks, ledger.hardlinks());

    let partition = probe
        .is_native()
        .then(|| partition::describe(root_item.device, &root));

    let duration = start.elapsed();
    info!(
        items = counters.items,
        errors = counters.errors,
        denied = counters.denied,
        "Scan complete in {duration:?}"
    );

    Ok(ScanOutcome {
        root: root_item,
        entries,
        top_files: top_files.finish(),
        counters,
        diagnostics,
        max,
        boundary_crossed: guard.crossed(),
        partition,
        native_stats: probe.is_native(),
        exported_entries,
        duration,
    })
}

/// Check that `path` is a readable directory and make it absolute.
fn resolve_root(path: &Path) -> Result<PathBuf> {
    let invalid = |reason: String| ScanError::InvalidRoot {
        path: path.to_path_buf(),
        reason,
    };
    let meta = std::fs::metadata(path).map_err(|e| invalid(e.to_string()))?;
    if !meta.is_dir() {
        return Err(invalid("not a directory".into()));
    }
    std::fs::canonicalize(path).map_err(|e| invalid(e.to_string()))
}
