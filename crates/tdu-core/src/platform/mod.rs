//! Platform capabilities -- metadata probing and partition lookup.
//!
//! [`StatProbe`] is the seam between the walker and the operating system.
//! Unix targets get [`NativeProbe`], which exposes device, inode, link count
//! and allocated blocks. Every other target gets [`ApparentProbe`], a degraded
//! implementation that reports apparent sizes only; hardlink and boundary
//! detection are disabled for the whole run in that mode.
pub mod degraded;
#[cfg(unix)]
pub mod native;
pub mod partition;

pub use degraded::ApparentProbe;
#[cfg(unix)]
pub use native::NativeProbe;
pub use partition::{FsUsage, PartitionInfo};

use crate::model::ItemKind;
use std::fs::FileType;
use std::io;
use std::path::Path;

/// The probe selected for this build target.
#[cfg(unix)]
pub type PlatformProbe = NativeProbe;

/// The probe selected for this build target.
#[cfg(not(unix))]
pub type PlatformProbe = ApparentProbe;

/// Low-level metadata that only some platforms can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeStat {
    pub device: u64,
    pub inode: u64,
    pub nlink: u64,
    /// Preferred I/O block size.
    pub block_size: u64,
    /// Allocated 512-byte blocks.
    pub blocks: u64,
}

/// Result of probing one path without following symlinks.
#[derive(Debug, Clone)]
pub struct RawStat {
    pub kind: ItemKind,
    /// Apparent size in bytes.
    pub size: u64,
    /// `None` on platforms without native block accounting.
    pub native: Option<NativeStat>,
}

/// Resolves metadata for a single path.
///
/// Implementations must not follow symlinks and must report failures
/// (permission denied, entry vanished) as errors rather than panicking.
pub trait StatProbe {
    fn probe(&self, path: &Path) -> io::Result<RawStat>;

    /// Whether this probe reports [`NativeStat`] data.
    fn is_native(&self) -> bool;
}

/// Map a `FileType` onto the item classification.
pub fn classify(ft: &FileType) -> ItemKind {
    if ft.is_symlink() {
        return ItemKind::Symlink;
    }
    if ft.is_dir() {
        return ItemKind::Directory;
    }
    if ft.is_file() {
        return ItemKind::Regular;
    }
    classify_special(ft)
}

#[cfg(unix)]
fn classify_special(ft: &FileType) -> ItemKind {
    use std::os::unix::fs::FileTypeExt;
    if ft.is_block_device() {
        ItemKind::BlockDevice
    } else if ft.is_char_device() {
        ItemKind::CharDevice
    } else if ft.is_socket() {
        ItemKind::Socket
    } else if ft.is_fifo() {
        ItemKind::Pipe
    } else {
        ItemKind::Unknown
    }
}

#[cfg(not(unix))]
fn classify_special(_ft: &FileType) -> ItemKind {
    ItemKind::Unknown
}
