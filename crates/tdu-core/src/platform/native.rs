//! Native `lstat` probe for Unix targets.
use super::{classify, NativeStat, RawStat, StatProbe};
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

/// Full metadata probe backed by `lstat(2)`.
///
/// Disk usage is exact: `st_blocks` is always counted in 512-byte units,
/// the same figure `du` uses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeProbe;

impl StatProbe for NativeProbe {
    fn probe(&self, path: &Path) -> io::Result<RawStat> {
        let meta = std::fs::symlink_metadata(path)?;
        Ok(RawStat {
            kind: classify(&meta.file_type()),
            size: meta.len(),
            native: Some(NativeStat {
                device: meta.dev(),
                inode: meta.ino(),
                nlink: meta.nlink(),
                block_size: meta.blksize(),
                blocks: meta.blocks(),
            }),
        })
    }

    fn is_native(&self) -> bool {
        true
    }
}
