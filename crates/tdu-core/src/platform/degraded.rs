//! Apparent-size probe for platforms without native block accounting.
use super::{classify, RawStat, StatProbe};
use std::io;
use std::path::Path;

/// Reports kind and apparent size only.
///
/// Device and inode are unknown, so the scan cannot detect hardlinks or
/// filesystem boundaries, and disk usage falls back to block rounding.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApparentProbe;

impl StatProbe for ApparentProbe {
    fn probe(&self, path: &Path) -> io::Result<RawStat> {
        let meta = std::fs::symlink_metadata(path)?;
        Ok(RawStat {
            kind: classify(&meta.file_type()),
            size: meta.len(),
            native: None,
        })
    }

    fn is_native(&self) -> bool {
        false
    }
}
