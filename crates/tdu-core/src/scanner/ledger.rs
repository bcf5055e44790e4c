//! Inode ledger for hardlink deduplication.
use std::collections::HashSet;

/// Remembers every `(device, inode)` pair credited during one scan.
///
/// Only the first occurrence of an inode keeps its disk usage; later ones
/// are hardlinks to content that has already been credited.
#[derive(Debug, Default)]
pub struct InodeLedger {
    seen: HashSet<(u64, u64)>,
    hardlinks: u64,
}

impl InodeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence. Returns `true` when its usage must be discounted.
    ///
    /// Entries on another filesystem are never discounted: their inode numbers
    /// live in a different namespace.
    pub fn record(&mut self, device: u64, inode: u64, other_fs: bool) -> bool {
        let first = self.seen.insert((device, inode));
        if !first && !other_fs {
            self.hardlinks += 1;
            true
        } else {
            false
        }
    }

    /// Number of discounted occurrences so far.
    pub fn hardlinks(&self) -> u64 {
        self.hardlinks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_stands() {
        let mut ledger = InodeLedger::new();
        assert!(!ledger.record(1, 42, false));
        assert!(ledger.record(1, 42, false));
        assert!(ledger.record(1, 42, false));
        assert_eq!(ledger.hardlinks(), 2);
    }

    #[test]
    fn test_same_inode_on_other_device_is_distinct() {
        let mut ledger = InodeLedger::new();
        assert!(!ledger.record(1, 2, false));
        assert!(!ledger.record(7, 2, true));
        assert_eq!(ledger.hardlinks(), 0);
    }

    #[test]
    fn test_other_fs_never_discounted() {
        let mut ledger = InodeLedger::new();
        assert!(!ledger.record(7, 2, true));
        assert!(!ledger.record(7, 2, true));
        assert_eq!(ledger.hardlinks(), 0);
    }
}
