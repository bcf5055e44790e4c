//! Top-K largest leaf items.
//!
//! Sorting every leaf of a multi-million-file tree just to keep a handful
//! of them is wasteful. The tracker appends candidates to a working list and
//! only compacts (stable descending sort, truncate to K) once the list grows
//! past [`COMPACTION_FACTOR`] × K. After the first compaction the K-th usage
//! becomes a floor, and anything at or below it is rejected without being
//! stored. A final compaction makes the result identical to a full stable
//! sort over all offered items.
use crate::model::Item;

/// Working list size, as a multiple of K, that triggers a compaction.
pub const COMPACTION_FACTOR: usize = 4;

/// Upper bound on the working list reserved up front. K comes straight from
/// the command line, so larger lists grow on demand.
const INITIAL_RESERVE: usize = 256;

/// Retains the K items with the largest disk usage.
///
/// Ties keep encounter order: an item never displaces an equal one seen
/// before it.
#[derive(Debug)]
pub struct TopKTracker {
    k: usize,
    /// Working list length that triggers a compaction.
    threshold: usize,
    working: Vec<Item>,
    /// Usage of the K-th item after the last full compaction.
    floor: Option<u64>,
}

impl TopKTracker {
    pub fn new(k: usize) -> Self {
        let threshold = k.saturating_mul(COMPACTION_FACTOR);
        Self {
            k,
            threshold,
            working: Vec::with_capacity(threshold.min(INITIAL_RESERVE)),
            floor: None,
        }
    }

    /// Consider `item`. Returns whether it was kept as a candidate.
    pub fn offer(&mut self, item: &Item) -> bool {
        if self.k == 0 {
            return false;
        }
        if matches!(self.floor, Some(floor) if item.disk_usage <= floor) {
            return false;
        }
        self.working.push(item.clone());
        if self.working.len() > self.threshold {
            self.compact();
        }
        true
    }

    fn compact(&mut self) {
        // `sort_by` is stable: equal usages stay in encounter order.
        self.working.sort_by(|a, b| b.disk_usage.cmp(&a.disk_usage));
        self.working.truncate(self.k);
        if self.working.len() == self.k {
            self.floor = self.working.last().map(|i| i.disk_usage);
        }
    }

    /// The final K items, sorted descending by disk usage.
    pub fn finish(mut self) -> Vec<Item> {
        self.compact();
        self.working
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemKind;
    use compact_str::CompactString;
    use std::path::PathBuf;

    fn file(name: &str, usage: u64) -> Item {
        Item {
            path: PathBuf::from(name),
            full_path: PathBuf::from("/r").join(name),
            name: CompactString::new(name),
            depth: 2,
            kind: ItemKind::Regular,
            size: usage,
            disk_usage: usage,
            items: 0,
            device: 0,
            inode: 0,
            nlink: 0,
            blocks: 0,
            other_fs: false,
            read_error: false,
        }
    }

    /// Deterministic pseudo-random usages with plenty of ties.
    fn usages(n: usize) -> Vec<u64> {
        let mut x: u64 = 0x2545_f491;
        (0..n)
            .map(|_| {
                x ^= x << 13;
                x ^= x >> 7;
                x ^= x << 17;
                (x % 50) * 4096
            })
            .collect()
    }

    #[test]
    fn test_matches_full_stable_sort() {
        let items: Vec<Item> = usages(2_000)
            .into_iter()
            .enumerate()
            .map(|(i, u)| file(&format!("f{i}"), u))
            .collect();

        for k in [1, 3, 7, 8, 50] {
            let mut tracker = TopKTracker::new(k);
            for item in &items {
                tracker.offer(item);
            }
            let got: Vec<String> = tracker.finish().iter().map(|i| i.name.to_string()).collect();

            let mut expected = items.clone();
            expected.sort_by(|a, b| b.disk_usage.cmp(&a.disk_usage));
            let expected: Vec<String> = expected
                .iter()
                .take(k)
                .map(|i| i.name.to_string())
                .collect();

            assert_eq!(got, expected, "k = {k}");
        }
    }

    #[test]
    fn test_working_list_stays_bounded() {
        let mut tracker = TopKTracker::new(5);
        for (i, u) in usages(10_000).into_iter().enumerate() {
            tracker.offer(&file(&format!("f{i}"), u));
            assert!(tracker.working.len() <= COMPACTION_FACTOR * 5);
        }
    }

    #[test]
    fn test_huge_k_reserves_little() {
        for k in [100_000_000, usize::MAX / 2, usize::MAX] {
            let mut tracker = TopKTracker::new(k);
            assert!(tracker.working.capacity() <= INITIAL_RESERVE);
            assert!(tracker.offer(&file("a", 4096)));
            assert!(tracker.offer(&file("b", 8192)));
            let names: Vec<String> = tracker.finish().iter().map(|i| i.name.to_string()).collect();
            assert_eq!(names, ["b", "a"]);
        }
    }

    #[test]
    fn test_fewer_items_than_k() {
        let mut tracker = TopKTracker::new(10);
        tracker.offer(&file("small", 1));
        tracker.offer(&file("big", 9));
        let out = tracker.finish();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "big");
    }

    #[test]
    fn test_zero_k_keeps_nothing() {
        let mut tracker = TopKTracker::new(0);
        assert!(!tracker.offer(&file("a", 100)));
        assert!(tracker.working.is_empty());
        assert!(tracker.finish().is_empty());
    }
}
