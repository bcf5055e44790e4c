//! Streaming export in the ncdu JSON dump format (major version 1).
//!
//! The document is emitted token by token during the walk:
//!
//! ```text
//! [1,1,{"progname":"tdu","progver":"0.1.0","timestamp":1700000000},
//! [{"name":"/abs/root",...,"dev":2049,"ino":2},
//! {"name":"file",...},
//! [{"name":"subdir",...},
//! {"name":"nested",...}]]]
//! ```
//!
//! A directory is an array whose first element is its own info object;
//! files and excluded directories are bare objects. Sizes are the entry's
//! own figures, not subtree totals; consumers aggregate themselves.
use crate::error::{Result, ScanError};
use crate::model::{Item, ItemKind};
use crate::{PROGRAM_NAME, PROGRAM_VERSION};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// Writes one ncdu document.
///
/// The first write error is latched: later writes are skipped so the walk
/// is never interrupted, and [`NcduExporter::finish`] reports the failure.
pub struct NcduExporter {
    out: Box<dyn Write + Send>,
    error: Option<io::Error>,
    entries: u64,
}

impl NcduExporter {
    /// Create (or truncate) the export file.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| ScanError::ExportOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file)))
    }

    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self {
            out: Box::new(out),
            error: None,
            entries: 0,
        }
    }

    /// Header: format version and the producing program.
    pub fn begin(&mut self, timestamp: i64) {
        let header = serde_json::json!({
            "progname": PROGRAM_NAME,
            "progver": PROGRAM_VERSION,
            "timestamp": timestamp,
        });
        self.write(&format!("[1,1,{header},\n"));
    }

    /// Open a directory array with its own info object.
    pub fn open_dir(&mut self, item: &Item) {
        let sep = if item.depth > 1 { ",\n" } else { "" };
        let obj = entry_object(item);
        self.write(&format!("{sep}[{obj}"));
        self.entries += 1;
    }

    /// A file, special file, or excluded directory.
    pub fn leaf(&mut self, item: &Item) {
        let obj = entry_object(item);
        self.write(&format!(",\n{obj}"));
        self.entries += 1;
    }

    pub fn close_dir(&mut self) {
        self.write("]");
    }

    /// Close the document and flush. Returns the number of entry objects.
    pub fn finish(mut self) -> Result<u64> {
        self.write("]\n");
        if self.error.is_none() {
            if let Err(e) = self.out.flush() {
                self.error = Some(e);
            }
        }
        match self.error.take() {
            Some(e) => Err(ScanError::ExportWrite(e)),
            None => Ok(self.entries),
        }
    }

    fn write(&mut self, s: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_all(s.as_bytes()) {
            warn!("export write failed, further output skipped: {e}");
            self.error = Some(e);
        }
    }
}

/// Escape a name for a JSON string body.
///
/// Control characters, DEL, `"` and `\` become `\u00XX`; everything else,
/// including non-ASCII, is copied through.
pub fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            '\u{0}'..='\u{1f}' | '"' | '\\' | '\u{7f}' => {
                let _ = write!(out, "\\u{:04X}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// The info object for one entry.
///
/// The root carries its absolute path as name. Hardlinked non-directories
/// report their physical allocation with `hlnkc` so the consumer can
/// deduplicate by `(dev, ino)`.
pub fn entry_object(item: &Item) -> String {
    let name = if item.depth == 1 {
        item.full_path.to_string_lossy()
    } else {
        item.name.as_str().into()
    };

    let mut s = format!("{{\"name\":\"{}\"", escape_name(&name));
    if item.size > 0 && !item.other_fs {
        let _ = write!(s, ",\"asize\":{}", item.size);
    }
    let hardlinked = item.nlink > 1 && !item.is_dir();
    let dsize = if hardlinked {
        item.physical_usage()
    } else {
        item.disk_usage
    };
    if dsize > 0 && !item.other_fs {
        let _ = write!(s, ",\"dsize\":{dsize}");
    }
    if item.depth == 1 || item.other_fs {
        let _ = write!(s, ",\"dev\":{}", item.device);
    }
    let _ = write!(s, ",\"ino\":{}", item.inode);
    if hardlinked {
        s.push_str(",\"hlnkc\":true");
    }
    if !item.is_dir() && item.kind != ItemKind::Regular {
        s.push_str(",\"notreg\":true");
    }
    if item.read_error {
        s.push_str(",\"read_error\":true");
    }
    if item.other_fs {
        s.push_str(",\"excluded\":\"othfs\"");
    }
    s.push('}');
    s
}
