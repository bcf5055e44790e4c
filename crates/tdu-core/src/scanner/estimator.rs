//! Disk usage estimation from raw size and block metadata.
use crate::model::ItemKind;
use crate::platform::NativeStat;

/// Block size assumed when the platform cannot report allocation.
pub const DEFAULT_BLOCK_SIZE: u64 = 4096;

/// Symlink targets shorter than this are stored inside the inode
/// ("fast symlinks") and allocate no data blocks.
pub const INLINE_SYMLINK_MAX: u64 = 60;

/// Converts apparent size and block metadata into an allocation estimate.
#[derive(Debug, Clone, Copy)]
pub struct DiskUsageEstimator {
    block_size: u64,
}

impl Default for DiskUsageEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCK_SIZE)
    }
}

impl DiskUsageEstimator {
    pub fn new(block_size: u64) -> Self {
        Self {
            block_size: block_size.max(1),
        }
    }

    /// Estimated bytes allocated for an entry.
    ///
    /// With native block counts the figure is exact (`512 × st_blocks`).
    /// Without them, `size` is rounded up to the next block boundary.
    pub fn estimate(&self, kind: ItemKind, size: u64, native: Option<&NativeStat>) -> u64 {
        if kind == ItemKind::Symlink && size < INLINE_SYMLINK_MAX {
            return 0;
        }
        match native {
            Some(n) => 512 * n.blocks,
            None => self.rounded(size),
        }
    }

    /// Round `size` up to a whole number of blocks; 0 stays 0.
    pub fn rounded(&self, size: u64) -> u64 {
        if size == 0 {
            return 0;
        }
        size.div_ceil(self.block_size) * self.block_size
    }
}
