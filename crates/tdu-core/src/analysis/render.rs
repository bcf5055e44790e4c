//! Plain-text rendering of a finished scan.
//!
//! Everything is written to a caller-supplied `Write` so the frontend can
//! decorate or redirect it; nothing here touches the terminal directly.
use super::report::{build_entry_report, build_top_files_report, EntryReport, TopFilesReport};
use crate::config::ScanConfig;
use crate::model::size::{format_count, size_column};
use crate::platform::PartitionInfo;
use crate::scanner::{BoundedList, MaxTracker, ScanCounters, ScanOutcome};
use std::fmt::Display;
use std::io::{self, Write};

/// Render the full report: partition, entries, summary, lists, max, biggest files.
pub fn render_report<W: Write>(
    w: &mut W,
    outcome: &ScanOutcome,
    config: &ScanConfig,
) -> io::Result<()> {
    let human = config.human_readable;

    if let Some(partition) = &outcome.partition {
        render_partition(w, partition, human)?;
    }
    if !outcome.native_stats {
        writeln!(w, "  Disk usage is approximated from apparent sizes on this platform.")?;
    }
    if outcome.boundary_crossed {
        writeln!(w)?;
    }

    let entries = build_entry_report(
        &outcome.entries,
        &outcome.root,
        config.top_entries,
        config.name_width,
    );
    render_entries(w, &entries, human)?;
    render_summary(w, &outcome.counters)?;
    render_diagnostics(w, outcome)?;

    if let Some(max) = &outcome.max {
        render_max(w, max)?;
    }

    if config.top_files > 0 {
        let top = build_top_files_report(
            &outcome.top_files,
            outcome.root.disk_usage,
            config.top_files,
            config.name_width,
        );
        render_top_files(w, &top, human)?;
    }
    Ok(())
}

pub fn render_partition<W: Write>(w: &mut W, p: &PartitionInfo, human: bool) -> io::Result<()> {
    write!(w, "  Partition: {}", p.label)?;
    match (&p.fs_type, &p.mount_options) {
        (Some(fs), Some(opts)) => writeln!(w, " {fs} {opts}")?,
        _ => writeln!(w)?,
    }
    if let Some(u) = &p.usage {
        if u.total_inodes > 0 {
            writeln!(
                w,
                "  Inodes  :{:>11} Avail:{:>10} Used:{:>10} ({}%)",
                u.total_inodes,
                u.free_inodes,
                u.used_inodes(),
                u.used_inodes() * 100 / u.total_inodes
            )?;
        }
        if u.total_bytes > 0 {
            writeln!(
                w,
                "  Size    :{} Avail:{} Used:{} ({}%)",
                size_column(u.total_bytes, human),
                size_column(u.avail_bytes, human),
                size_column(u.used_bytes(), human),
                u.used_bytes() * 100 / u.total_bytes
            )?;
        }
    }
    writeln!(w)
}

pub fn render_entries<W: Write>(w: &mut W, report: &EntryReport, human: bool) -> io::Result<()> {
    let nc = report.name_column;
    for row in &report.rows {
        write!(
            w,
            "{:>3}. {:>nc$} |{}|{:6.2}%",
            row.rank,
            row.name,
            size_column(row.disk_usage, human),
            row.percent
        )?;
        if let Some(items) = row.items {
            write!(w, "| {items:>6} items")?;
        }
        writeln!(w)?;
    }

    let label_width = nc + 5;
    let rest = &report.remaining;
    if rest.hidden > 0 {
        writeln!(
            w,
            "{:>label_width$} |{}|{:6.2}%| {:>6} items",
            "REMAINING",
            size_column(rest.disk_usage, human),
            rest.percent,
            rest.items
        )?;
    } else if rest.disk_usage > 0 {
        // Nothing hidden: what remains is the root directory's own allocation.
        writeln!(
            w,
            "{:>label_width$} |{}|{:6.2}%",
            "./",
            size_column(rest.disk_usage, human),
            rest.percent
        )?;
    }
    writeln!(
        w,
        "{:>label_width$} |{}| {:>14} items",
        "TOTAL",
        size_column(report.total_usage, human),
        report.total_items
    )
}

/// `Dir: n, File: n` followed by every non-zero counter.
pub fn summary_line(c: &ScanCounters) -> String {
    let mut line = format!("Dir: {}, File: {}", format_count(c.dirs), format_count(c.files));
    let optional = [
        ("Symlink", c.symlinks),
        ("Hardlink", c.hardlinks),
        ("Socket", c.sockets),
        ("Pipe", c.pipes),
        ("Denied", c.denied),
        ("Error", c.errors),
        ("Empty dir", c.empty_dirs),
        ("Block device", c.block_devices),
        ("Character device", c.char_devices),
        ("Unknown", c.unknown),
        ("Other FS", c.other_fs),
    ];
    for (label, n) in optional.into_iter().filter(|(_, n)| *n > 0) {
        line.push_str(&format!(", {label}: {}", format_count(n)));
    }
    line
}

fn render_summary<W: Write>(w: &mut W, c: &ScanCounters) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "  {}", summary_line(c))
}

fn render_diagnostics<W: Write>(w: &mut W, outcome: &ScanOutcome) -> io::Result<()> {
    let d = &outcome.diagnostics;
    let c = &outcome.counters;

    render_list(w, "EMPTY DIRECTORIES", c.empty_dirs, &d.empty_dirs, |p| p.display().to_string())?;
    render_list(w, "DENIED DIRECTORIES", c.denied, &d.denied_dirs, |p| p.display().to_string())?;
    render_list(w, "STAT ERRORS", c.errors, &d.stat_errors, |f| {
        format!("{}: {}", f.path.display(), f.message)
    })?;
    render_list(
        w,
        "DEVICES",
        c.block_devices + c.char_devices,
        &d.devices,
        |(p, kind)| format!("[{}] {}", kind.label(), p.display()),
    )?;
    render_list(w, "SOCKETS AND PIPES", c.sockets + c.pipes, &d.streams, |(p, kind)| {
        format!("[{}] {}", kind.label(), p.display())
    })
}

/// A capped list with its exact total; silent when disabled or empty.
fn render_list<W, T, F, D>(
    w: &mut W,
    title: &str,
    total: u64,
    list: &BoundedList<T>,
    fmt: F,
) -> io::Result<()>
where
    W: Write,
    F: Fn(&T) -> D,
    D: Display,
{
    if list.cap() == 0 || total == 0 {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "  --------- {title} ({total}) ---")?;
    for entry in list.entries() {
        writeln!(w, "    {}", fmt(entry))?;
    }
    let unlisted = total.saturating_sub(list.len() as u64);
    if unlisted > 0 {
        writeln!(w, "    ... and {unlisted} more")?;
    }
    Ok(())
}

fn render_max<W: Write>(w: &mut W, max: &MaxTracker) -> io::Result<()> {
    writeln!(w)?;
    writeln!(
        w,
        "  Deepest directory (depth {}): {}",
        max.deepest_depth,
        max.deepest_path.display()
    )?;
    writeln!(
        w,
        "  Longest path ({} bytes): {}",
        max.longest_path_len,
        max.longest_path.display()
    )?;
    writeln!(
        w,
        "  Longest name ({} chars): {}",
        max.longest_name_len, max.longest_name
    )
}

pub fn render_top_files<W: Write>(
    w: &mut W,
    report: &TopFilesReport,
    human: bool,
) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "  --------- BIGGEST FILES -------------")?;
    for row in &report.rows {
        writeln!(w, "{:>3}.{}| {}", row.rank, size_column(row.disk_usage, human), row.path)?;
    }
    writeln!(
        w,
        "  ={:>13}| {:.2}% of total disk usage",
        size_column(report.shown_usage, human),
        report.percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::report::{EntryRow, Rollup, TopFileRow};

    #[test]
    fn test_summary_line_skips_zero_counters() {
        let c = ScanCounters {
            dirs: 3,
            files: 1_200,
            hardlinks: 2,
            ..Default::default()
        };
        assert_eq!(summary_line(&c), "Dir: 3, File: 1,200, Hardlink: 2");
    }

    #[test]
    fn test_render_list_reports_unlisted() {
        let mut list = BoundedList::new(1);
        list.push_with(|| "a".to_string());
        let mut out = Vec::new();
        render_list(&mut out, "EMPTY DIRECTORIES", 3, &list, |s| s.clone()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("EMPTY DIRECTORIES (3)"));
        assert!(text.contains("    a\n"));
        assert!(text.contains("and 2 more"));
    }

    fn entry_report(hidden: usize, remaining_usage: u64) -> EntryReport {
        EntryReport {
            rows: vec![EntryRow {
                rank: 1,
                name: "data/".into(),
                disk_usage: 8192,
                percent: 50.0,
                items: Some(3),
            }],
            remaining: Rollup {
                hidden,
                disk_usage: remaining_usage,
                items: hidden as u64,
                percent: 25.0,
            },
            total_usage: 8192 + remaining_usage,
            total_items: 4 + hidden as u64,
            name_column: 8,
        }
    }

    #[test]
    fn test_remaining_row_only_when_entries_hidden() {
        let mut out = Vec::new();
        render_entries(&mut out, &entry_report(0, 4096), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("REMAINING"));
        assert!(text.contains("./ |"));
        assert!(text.contains("TOTAL"));

        let mut out = Vec::new();
        render_entries(&mut out, &entry_report(2, 8192), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("REMAINING"));
        assert!(text.contains("2 items"));
        assert!(!text.contains("./ |"));

        let mut out = Vec::new();
        render_entries(&mut out, &entry_report(0, 0), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("REMAINING"));
        assert!(!text.contains("./ |"));
    }

    #[test]
    fn test_render_list_disabled() {
        let list: BoundedList<String> = BoundedList::new(0);
        let mut out = Vec::new();
        render_list(&mut out, "X", 5, &list, |s| s.clone()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_render_top_files_kilobytes() {
        let report = TopFilesReport {
            rows: vec![TopFileRow {
                rank: 1,
                path: "dir/big.iso".into(),
                disk_usage: 8192,
            }],
            shown_usage: 8192,
            percent: 50.0,
        };
        let mut out = Vec::new();
        render_top_files(&mut out, &report, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  1.        8 Kb| dir/big.iso"));
        assert!(text.contains("50.00% of total disk usage"));
    }
}
