//! Report aggregation -- ranking, percentages and remainder rollups.
//!
//! The entry report always reconciles: the displayed rows plus the
//! remainder equal the root's total. The remainder therefore also carries the
//! root directory's own allocation, which belongs to no listed entry.
use crate::model::Item;

/// Shortest budget for which middle truncation is attempted.
const MIN_MIDDLE_TRUNCATE: usize = 10;

/// Extra characters the biggest-files list may use over the entry names.
pub const TOP_FILES_EXTRA_WIDTH: usize = 18;

/// Percentage of `part` in `total`; 0 when the total is 0.
pub fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Shorten `name` to at most `max` characters by cutting out its middle.
///
/// The prefix and suffix survive so extensions and numbering stay visible.
pub fn smart_truncate(name: &str, max: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max {
        return name.to_string();
    }
    if max < MIN_MIDDLE_TRUNCATE {
        return chars[..max].iter().collect();
    }
    let start = max / 2 - 4;
    let end = max - (start + 1);
    let mut out: String = chars[..start].iter().collect();
    out.push('~');
    out.extend(&chars[chars.len() - end..]);
    out
}

/// One displayed top-level entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRow {
    pub rank: usize,
    /// Display name, `/`-suffixed for directories and already truncated.
    pub name: String,
    pub disk_usage: u64,
    pub percent: f64,
    /// Descendant count, for directories.
    pub items: Option<u64>,
}

/// Totals for everything not displayed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rollup {
    /// Entries beyond the display limit.
    pub hidden: usize,
    pub disk_usage: u64,
    pub items: u64,
    pub percent: f64,
}

/// Ranked top-level entries with their reconciling remainder.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryReport {
    pub rows: Vec<EntryRow>,
    pub remaining: Rollup,
    pub total_usage: u64,
    pub total_items: u64,
    /// Width of the name column.
    pub name_column: usize,
}

impl EntryReport {
    pub fn displayed_usage(&self) -> u64 {
        self.rows.iter().map(|r| r.disk_usage).sum()
    }
}

/// Sort `entries` descending by usage and split them at `limit`.
pub fn build_entry_report(
    entries: &[Item],
    root: &Item,
    limit: usize,
    name_width: usize,
) -> EntryReport {
    let mut sorted: Vec<&Item> = entries.iter().collect();
    sorted.sort_by(|a, b| b.disk_usage.cmp(&a.disk_usage));

    let shown = &sorted[..limit.min(sorted.len())];
    let hidden = &sorted[shown.len()..];

    // Minimum fits the TOTAL label.
    let longest = shown
        .iter()
        .map(|i| i.name.chars().count() + usize::from(i.is_dir()))
        .max()
        .unwrap_or(0)
        .max(7);
    let name_column = (longest + 1).min(name_width.max(1));

    let rows: Vec<EntryRow> = shown
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let mut name = item.name.to_string();
            if item.is_dir() {
                name.push('/');
            }
            EntryRow {
                rank: idx + 1,
                name: smart_truncate(&name, name_width),
                disk_usage: item.disk_usage,
                percent: percent_of(item.disk_usage, root.disk_usage),
                items: item.is_dir().then_some(item.items),
            }
        })
        .collect();

    let displayed_usage: u64 = rows.iter().map(|r| r.disk_usage).sum();
    let displayed_items: u64 = shown.iter().map(|i| i.contributed_items()).sum();
    let remaining_usage = root.disk_usage.saturating_sub(displayed_usage);

    EntryReport {
        rows,
        remaining: Rollup {
            hidden: hidden.len(),
            disk_usage: remaining_usage,
            items: root.items.saturating_sub(displayed_items),
            percent: percent_of(remaining_usage, root.disk_usage),
        },
        total_usage: root.disk_usage,
        total_items: root.items,
        name_column,
    }
}

/// One line of the biggest-files list.
#[derive(Debug, Clone, PartialEq)]
pub struct TopFileRow {
    pub rank: usize,
    /// Relative path, truncated.
    pub path: String,
    pub disk_usage: u64,
}

/// The biggest files and their share of the total.
#[derive(Debug, Clone, PartialEq)]
pub struct TopFilesReport {
    pub rows: Vec<TopFileRow>,
    pub shown_usage: u64,
    pub percent: f64,
}

/// Rank `files` (already the tracker's output) for display.
pub fn build_top_files_report(
    files: &[Item],
    total_usage: u64,
    limit: usize,
    name_width: usize,
) -> TopFilesReport {
    let mut sorted: Vec<&Item> = files.iter().collect();
    sorted.sort_by(|a, b| b.disk_usage.cmp(&a.disk_usage));

    let rows: Vec<TopFileRow> = sorted
        .iter()
        .take(limit)
        .enumerate()
        .map(|(idx, item)| TopFileRow {
            rank: idx + 1,
            path: smart_truncate(&item.display_path(), name_width + TOP_FILES_EXTRA_WIDTH),
            disk_usage: item.disk_usage,
        })
        .collect();
    let shown_usage = rows.iter().map(|r| r.disk_usage).sum();

    TopFilesReport {
        rows,
        shown_usage,
        percent: percent_of(shown_usage, total_usage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemKind;
    use compact_str::CompactString;
    use std::path::PathBuf;

    fn entry(name: &str, kind: ItemKind, usage: u64, items: u64) -> Item {
        Item {
            path: PathBuf::from(name),
            full_path: PathBuf::from("/r").join(name),
            name: CompactString::new(name),
            depth: 2,
            kind,
            size: usage,
            disk_usage: usage,
            items,
            device: 0,
            inode: 0,
            nlink: 0,
            blocks: 0,
            other_fs: false,
            read_error: false,
        }
    }

    fn root_of(entries: &[Item], own: u64) -> Item {
        let mut root = entry("r", ItemKind::Directory, own, 0);
        root.depth = 1;
        root.disk_usage += entries.iter().map(|e| e.disk_usage).sum::<u64>();
        root.items = entries.iter().map(|e| e.contributed_items()).sum();
        root
    }

    #[test]
    fn test_smart_truncate_keeps_ends() {
        assert_eq!(smart_truncate("short.txt", 20), "short.txt");
        let cut = smart_truncate("a_really_long_file_name_version_0042.tar.gz", 20);
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.starts_with("a_real"));
        assert!(cut.ends_with("0042.tar.gz"));
        assert!(cut.contains('~'));
    }

    #[test]
    fn test_smart_truncate_tiny_budget() {
        assert_eq!(smart_truncate("abcdefghijkl", 4), "abcd");
    }

    #[test]
    fn test_smart_truncate_multibyte() {
        let name = "ééééééééééééééééééééééééé.bin";
        let cut = smart_truncate(name, 12);
        assert_eq!(cut.chars().count(), 12);
        assert!(cut.ends_with(".bin"));
    }

    #[test]
    fn test_percent_of_zero_total() {
        assert_eq!(percent_of(10, 0), 0.0);
        assert_eq!(percent_of(25, 100), 25.0);
    }

    #[test]
    fn test_entry_report_reconciles() {
        let entries = vec![
            entry("small", ItemKind::Regular, 4096, 0),
            entry("big", ItemKind::Directory, 40960, 9),
            entry("mid", ItemKind::Regular, 8192, 0),
            entry("tiny", ItemKind::Regular, 0, 0),
        ];
        let root = root_of(&entries, 4096);

        for limit in 0..=5 {
            let report = build_entry_report(&entries, &root, limit, 37);
            assert_eq!(
                report.displayed_usage() + report.remaining.disk_usage,
                root.disk_usage,
                "limit = {limit}"
            );
            assert_eq!(report.rows.len(), limit.min(4));
        }

        let report = build_entry_report(&entries, &root, 2, 37);
        assert_eq!(report.rows[0].name, "big/");
        assert_eq!(report.rows[0].items, Some(9));
        assert_eq!(report.rows[1].name, "mid");
        assert_eq!(report.rows[1].items, None);
        assert_eq!(report.remaining.hidden, 2);
        // small + tiny + the root's own 4096.
        assert_eq!(report.remaining.disk_usage, 8192);
        assert_eq!(report.remaining.items, 2);

        // Everything listed: only the root's own allocation remains.
        let full = build_entry_report(&entries, &root, 15, 37);
        assert_eq!(full.remaining.hidden, 0);
        assert_eq!(full.remaining.items, 0);
        assert_eq!(full.remaining.disk_usage, 4096);
    }

    #[test]
    fn test_entry_report_empty_root() {
        let root = root_of(&[], 0);
        let report = build_entry_report(&[], &root, 15, 37);
        assert!(report.rows.is_empty());
        assert_eq!(report.remaining.percent, 0.0);
        assert_eq!(report.name_column, 8);
    }

    #[test]
    fn test_top_files_report() {
        let files = vec![
            entry("a", ItemKind::Regular, 100, 0),
            entry("b", ItemKind::Regular, 300, 0),
            entry("c", ItemKind::Symlink, 200, 0),
        ];
        let report = build_top_files_report(&files, 1000, 2, 37);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].path, "b");
        assert_eq!(report.shown_usage, 500);
        assert_eq!(report.percent, 50.0);
    }
}
