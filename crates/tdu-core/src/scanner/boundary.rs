//! Filesystem boundary detection (`du -x` policy).

/// Remembers the scan root's device and flags entries on any other device.
#[derive(Debug, Default)]
pub struct BoundaryGuard {
    root_device: Option<u64>,
    crossings: u64,
}

impl BoundaryGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the current device. Called with the root entry's device.
    pub fn fix_root(&mut self, device: u64) {
        self.root_device = Some(device);
    }

    /// `true` if `device` differs from the root device. Counts the crossing.
    ///
    /// Before the root device is fixed nothing is foreign.
    pub fn is_foreign(&mut self, device: u64) -> bool {
        match self.root_device {
            Some(root) if root != device => {
                self.crossings += 1;
                true
            }
            _ => false,
        }
    }

    /// Whether any boundary was met during the scan.
    pub fn crossed(&self) -> bool {
        self.crossings > 0
    }

    /// Number of entries found on a foreign device.
    pub fn crossings(&self) -> u64 {
        self.crossings
    }
}
