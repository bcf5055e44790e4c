//! Partition lookup for the scanned device.
//!
//! On Linux the device number is resolved to a partition name through
//! `/proc/partitions`, the filesystem type and mount options through
//! `/proc/mounts`, and capacity figures through `statvfs(3)`. Anything that
//! cannot be read degrades to a bare `[dev 0xNNNN]` label.
use std::path::Path;

/// Capacity figures of a mounted filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsUsage {
    pub total_bytes: u64,
    pub avail_bytes: u64,
    pub total_inodes: u64,
    pub free_inodes: u64,
}

impl FsUsage {
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.avail_bytes)
    }

    pub fn used_inodes(&self) -> u64 {
        self.total_inodes.saturating_sub(self.free_inodes)
    }
}

/// What is known about the partition holding a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionInfo {
    pub device: u64,
    /// Display label, e.g. `(8,1) /dev/sda1`.
    pub label: String,
    pub fs_type: Option<String>,
    pub mount_options: Option<String>,
    pub usage: Option<FsUsage>,
}

/// Fallback label when the device cannot be resolved.
pub fn device_label(device: u64) -> String {
    format!("[dev 0x{device:04X}]")
}

/// Find `/dev/<name>` for a major/minor pair in `/proc/partitions` content.
///
/// Lines have the form `major minor #blocks name`; the header and blank
/// lines do not have four numeric-leading fields and are skipped.
pub fn parse_partitions(content: &str, major: u64, minor: u64) -> Option<String> {
    content.lines().find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            return None;
        }
        let maj: u64 = fields[0].parse().ok()?;
        let min: u64 = fields[1].parse().ok()?;
        (maj == major && min == minor).then(|| format!("/dev/{}", fields[3]))
    })
}

/// Find `(fs_type, options)` for a device node in `/proc/mounts` content.
pub fn parse_mounts(content: &str, device_node: &str) -> Option<(String, String)> {
    content.lines().find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        // device mountpoint fstype options dump pass
        if fields.len() != 6 || fields[0] != device_node {
            return None;
        }
        Some((fields[2].to_string(), fields[3].to_string()))
    })
}

/// Short label for `device`, used in boundary alerts.
pub fn partition_label(device: u64) -> String {
    resolve_node(device)
        .map(|(_, label)| label)
        .unwrap_or_else(|| device_label(device))
}

/// Describe the partition holding `device`, mounted somewhere above `path`.
pub fn describe(device: u64, path: &Path) -> PartitionInfo {
    let (label, node) = match resolve_node(device) {
        Some((node, label)) => (label, Some(node)),
        None => (device_label(device), None),
    };
    let mount = node.as_deref().and_then(read_mount);
    let (fs_type, mount_options) = match mount {
        Some((t, o)) => (Some(t), Some(o)),
        None => (None, None),
    };
    PartitionInfo {
        device,
        label,
        fs_type,
        mount_options,
        usage: fs_usage(path),
    }
}

/// Returns `(device node, display label)`.
#[cfg(target_os = "linux")]
fn resolve_node(device: u64) -> Option<(String, String)> {
    use nix::sys::stat::{major, minor};

    let dev = device as nix::libc::dev_t;
    let (maj, min) = (major(dev), minor(dev));
    let content = std::fs::read_to_string("/proc/partitions").ok()?;
    let node = parse_partitions(&content, maj, min)?;
    let label = format!("({maj},{min}) {node}");
    Some((node, label))
}

#[cfg(not(target_os = "linux"))]
fn resolve_node(_device: u64) -> Option<(String, String)> {
    None
}

#[cfg(target_os = "linux")]
fn read_mount(node: &str) -> Option<(String, String)> {
    let content = std::fs::read_to_string("/proc/mounts").ok()?;
    parse_mounts(&content, node)
}

#[cfg(not(target_os = "linux"))]
fn read_mount(_node: &str) -> Option<(String, String)> {
    None
}

#[cfg(target_os = "linux")]
fn fs_usage(path: &Path) -> Option<FsUsage> {
    let st = match nix::sys::statvfs::statvfs(path) {
        Ok(st) => st,
        Err(e) => {
            tracing::debug!("statvfs({}) failed: {e}", path.display());
            return None;
        }
    };
    let frag = st.fragment_size() as u64;
    Some(FsUsage {
        total_bytes: st.blocks() as u64 * frag,
        avail_bytes: st.blocks_available() as u64 * frag,
        total_inodes: st.files() as u64,
        free_inodes: st.files_free() as u64,
    })
}

#[cfg(not(target_os = "linux"))]
fn fs_usage(_path: &Path) -> Option<FsUsage> {
    None
}
