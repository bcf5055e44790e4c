//! Size formatting utilities -- human-readable byte counts.
//!
//! All internal sizes are `u64` bytes. Floating point is only used
//! at the display-formatting boundary.

/// Width of a formatted size column.
pub const SIZE_COLUMN: usize = 12;

/// Format a byte count into a human-readable string with appropriate unit.
///
/// Uses binary units (KiB = 1024) but labels them with common short forms
/// (KB, MB, GB, TB) because that is what users expect in a disk tool.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    const TB: f64 = GB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else if b < GB {
        format!("{:.1} MB", b / MB)
    } else if b < TB {
        format!("{:.2} GB", b / GB)
    } else {
        format!("{:.2} TB", b / TB)
    }
}

/// Format a byte count as whole kilobytes, `du -k` style.
pub fn format_kb(bytes: u64) -> String {
    format!("{} Kb", bytes / 1024)
}

/// Right-aligned size column in the selected unit style.
pub fn size_column(bytes: u64, human: bool) -> String {
    let s = if human {
        format_size(bytes)
    } else {
        format_kb(bytes)
    };
    format!("{s:>SIZE_COLUMN$}")
}

/// Format a count with thousand separators.
pub fn format_count(count: u64) -> String {
    if count < 1_000 {
        return count.to_string();
    }
    let s = count.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}
