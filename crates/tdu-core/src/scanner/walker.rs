//! Depth-first recursive walker.
//!
//! Each call resolves one path, classifies it, and for directories recurses
//! into the children before finalising the aggregate record (bottom-up).
//! Only real directories are entered; symlinks are never followed, so the
//! walk cannot loop.
//!
//! Per-child detail is retained only for the immediate children of the root.
//! Deeper levels still contribute to the aggregates but are dropped as soon
//! as their parent has summed them, keeping memory proportional to the
//! breadth of the top level rather than the total entry count.
use super::context::ScanContext;
use crate::model::{Item, ItemKind};
use crate::platform::{partition, RawStat};
use compact_str::CompactString;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

impl ScanContext<'_> {
    /// Scan `rel` (relative to the root) at `depth`.
    ///
    /// Returns `None` when the path's metadata cannot be resolved; the
    /// failure is counted and the caller carries on with the siblings.
    /// `detail` receives the finished record of every entry at depth 2.
    pub(crate) fn walk(
        &mut self,
        rel: PathBuf,
        depth: u32,
        mut detail: Option<&mut Vec<Item>>,
    ) -> Option<Item> {
        let full = if rel.as_os_str().is_empty() {
            self.root.clone()
        } else {
            self.root.join(&rel)
        };

        let stat = match self.probe.probe(&full) {
            Ok(stat) => stat,
            Err(err) => {
                self.path_failed(&full, &err);
                return None;
            }
        };

        let mut item = self.resolve(rel, full, depth, stat);
        self.tick();
        if let Some(max) = self.max.as_mut() {
            max.observe(&item);
        }

        if item.other_fs {
            if let Some(exporter) = self.exporter.as_mut() {
                exporter.leaf(&item);
            }
            return Some(item);
        }

        if item.is_leaf() {
            self.top_files.offer(&item);
            if let Some(exporter) = self.exporter.as_mut() {
                exporter.leaf(&item);
            }
            if let Some(entries) = detail {
                entries.push(item.clone());
            }
            return Some(item);
        }

        if let Some(exporter) = self.exporter.as_mut() {
            exporter.open_dir(&item);
        }

        let children = self.read_children(&mut item);
        if children.is_empty() && !item.read_error {
            self.counters.empty_dirs += 1;
            self.diagnostics
                .empty_dirs
                .push_with(|| item.full_path.clone());
        }

        // The directory's own allocation is its base cost.
        let mut size = item.size;
        let mut usage = item.disk_usage;
        let mut items: u64 = 0;
        for name in children {
            let child_detail = if depth == 1 {
                detail.as_deref_mut()
            } else {
                None
            };
            if let Some(child) = self.walk(item.path.join(&name), depth + 1, child_detail) {
                size += child.contributed_size();
                usage += child.contributed_usage();
                items += child.contributed_items();
            }
        }

        if let Some(exporter) = self.exporter.as_mut() {
            exporter.close_dir();
        }

        item.size = size;
        item.disk_usage = usage;
        item.items = items;

        if depth > 1 {
            if let Some(entries) = detail {
                entries.push(item.clone());
            }
        }
        Some(item)
    }

    /// Build the leaf record for a resolved path and apply device/inode policy.
    fn resolve(&mut self, rel: PathBuf, full: PathBuf, depth: u32, stat: RawStat) -> Item {
        self.count_kind(stat.kind, &full);

        let native = stat.native;
        let mut item = Item {
            name: entry_name(&full),
            path: rel,
            depth,
            kind: stat.kind,
            size: stat.size,
            disk_usage: self
                .estimator
                .estimate(stat.kind, stat.size, native.as_ref()),
            items: 0,
            device: native.map_or(0, |n| n.device),
            inode: native.map_or(0, |n| n.inode),
            nlink: native.map_or(0, |n| n.nlink),
            blocks: native.map_or(0, |n| n.blocks),
            other_fs: false,
            read_error: false,
            full_path: full,
        };

        // Without native data there is no device or inode to reason about.
        let Some(native) = native else {
            return item;
        };

        if depth == 1 {
            self.guard.fix_root(native.device);
        }
        if self.guard.is_foreign(native.device) {
            item.other_fs = true;
            self.counters.other_fs = self.guard.crossings();
            self.alert(format!(
                "  Not crossing FS boundary at {:<15} {}",
                item.full_path.display(),
                partition::partition_label(native.device)
            ));
        }

        // Directories are never hardlinked; a repeated one is a bind mount
        // and keeps its own cost.
        if !item.is_dir() && self.ledger.record(native.device, native.inode, item.other_fs) {
            item.disk_usage = 0;
            self.counters.hardlinks = self.ledger.hardlinks();
        }
        item
    }

    fn count_kind(&mut self, kind: ItemKind, full: &Path) {
        let c = &mut self.counters;
        match kind {
            ItemKind::Regular => c.files += 1,
            ItemKind::Directory => c.dirs += 1,
            ItemKind::Symlink => c.symlinks += 1,
            ItemKind::BlockDevice => c.block_devices += 1,
            ItemKind::CharDevice => c.char_devices += 1,
            ItemKind::Socket => c.sockets += 1,
            ItemKind::Pipe => c.pipes += 1,
            ItemKind::Unknown => {
                c.unknown += 1;
                debug!("unknown file type: {}", full.display());
            }
        }
        if kind.is_device() {
            self.diagnostics
                .devices
                .push_with(|| (full.to_path_buf(), kind));
        } else if kind.is_stream() {
            self.diagnostics
                .streams
                .push_with(|| (full.to_path_buf(), kind));
        }
    }

    /// Enumerate a directory's children in the order the OS returns them.
    ///
    /// A failure to open the directory marks it `read_error` and yields no
    /// children; the walk carries on.
    fn read_children(&mut self, dir: &mut Item) -> Vec<OsString> {
        let reader = match std::fs::read_dir(&dir.full_path) {
            Ok(reader) => reader,
            Err(err) => {
                self.counters.denied += 1;
                dir.read_error = true;
                debug!("cannot read directory {}: {err}", dir.full_path.display());
                self.diagnostics
                    .denied_dirs
                    .push_with(|| dir.full_path.clone());
                return Vec::new();
            }
        };

        let mut names = Vec::new();
        for entry in reader {
            match entry {
                Ok(entry) => names.push(entry.file_name()),
                Err(err) => self.path_failed(&dir.full_path, &err),
            }
        }
        names
    }
}

/// File name of `path`, or the whole path for `/`.
fn entry_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}
