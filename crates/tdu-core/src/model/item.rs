//! A single scanned filesystem entry.
//!
//! Items are built once during the bottom-up walk and only read afterwards
//! (for sorting, rendering and export). Directory items carry aggregate
//! totals over their subtree; every other kind carries its own figures.
use compact_str::CompactString;
use std::path::PathBuf;

/// Classification of a filesystem entry, from `lstat` semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Regular,
    Directory,
    /// Never followed for traversal; metadata is the link's own.
    Symlink,
    BlockDevice,
    CharDevice,
    Socket,
    Pipe,
    Unknown,
}

impl ItemKind {
    /// Short label used in diagnostic listings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Regular => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::BlockDevice => "block device",
            Self::CharDevice => "character device",
            Self::Socket => "socket",
            Self::Pipe => "named pipe",
            Self::Unknown => "unknown",
        }
    }

    #[inline]
    pub fn is_dir(self) -> bool {
        self == Self::Directory
    }

    /// Sockets and named pipes (the "streams" diagnostic list).
    #[inline]
    pub fn is_stream(self) -> bool {
        matches!(self, Self::Socket | Self::Pipe)
    }

    /// Block and character devices.
    #[inline]
    pub fn is_device(self) -> bool {
        matches!(self, Self::BlockDevice | Self::CharDevice)
    }
}

/// One scanned entry.
#[derive(Debug, Clone)]
pub struct Item {
    /// Path relative to the scan root (empty for the root itself).
    pub path: PathBuf,
    /// Absolute path.
    pub full_path: PathBuf,
    /// File name only.
    pub name: CompactString,
    /// Nesting depth; the scan root is 1.
    pub depth: u32,
    pub kind: ItemKind,

    /// Apparent size in bytes. Aggregated over the subtree for directories.
    pub size: u64,
    /// Estimated allocation in bytes. Aggregated over the subtree for
    /// directories; 0 for repeated hardlinks.
    pub disk_usage: u64,
    /// Number of descendant items (directories only).
    pub items: u64,

    /// Device id, 0 when the platform cannot report it.
    pub device: u64,
    /// Inode number, 0 when the platform cannot report it.
    pub inode: u64,
    /// Hard link count, 0 when the platform cannot report it.
    pub nlink: u64,
    /// Allocated 512-byte blocks, 0 when the platform cannot report it.
    pub blocks: u64,

    /// Lives on another filesystem than the scan root; contributes nothing.
    pub other_fs: bool,
    /// The directory could not be enumerated.
    pub read_error: bool,
}

impl Item {
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Counts towards the biggest-files ranking.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        !self.kind.is_dir()
    }

    /// Physical allocation ignoring hardlink discounting.
    pub fn physical_usage(&self) -> u64 {
        if self.blocks > 0 {
            512 * self.blocks
        } else {
            self.disk_usage
        }
    }

    /// Bytes this item adds to its parent's aggregate.
    #[inline]
    pub fn contributed_usage(&self) -> u64 {
        if self.other_fs {
            0
        } else {
            self.disk_usage
        }
    }

    /// Apparent bytes this item adds to its parent's aggregate.
    #[inline]
    pub fn contributed_size(&self) -> u64 {
        if self.other_fs {
            0
        } else {
            self.size
        }
    }

    /// Items this entry adds to its parent's count (itself plus descendants).
    #[inline]
    pub fn contributed_items(&self) -> u64 {
        if self.other_fs {
            0
        } else {
            1 + self.items
        }
    }

    /// Relative path as shown in reports.
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(kind: ItemKind) -> Item {
        Item {
            path: PathBuf::from("a"),
            full_path: PathBuf::from("/tmp/a"),
            name: CompactString::new("a"),
            depth: 2,
            kind,
            size: 100,
            disk_usage: 4096,
            items: 0,
            device: 1,
            inode: 2,
            nlink: 1,
            blocks: 8,
            other_fs: false,
            read_error: false,
        }
    }

    #[test]
    fn test_other_fs_contributes_nothing() {
        let mut item = leaf(ItemKind::Regular);
        assert_eq!(item.contributed_usage(), 4096);
        assert_eq!(item.contributed_items(), 1);
        item.other_fs = true;
        assert_eq!(item.contributed_usage(), 0);
        assert_eq!(item.contributed_size(), 0);
        assert_eq!(item.contributed_items(), 0);
    }

    #[test]
    fn test_kind_classes() {
        assert!(ItemKind::Socket.is_stream());
        assert!(ItemKind::Pipe.is_stream());
        assert!(ItemKind::BlockDevice.is_device());
        assert!(!ItemKind::Symlink.is_stream());
        assert!(!ItemKind::Symlink.is_device());
        assert!(leaf(ItemKind::Symlink).is_leaf());
    }

    #[test]
    fn test_physical_usage_ignores_discount() {
        let mut item = leaf(ItemKind::Regular);
        item.disk_usage = 0;
        assert_eq!(item.physical_usage(), 4096);
    }
}
