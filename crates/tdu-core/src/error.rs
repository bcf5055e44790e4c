//! Fatal error type for the scan pipeline.
//!
//! Only pre-flight failures and export stream failures are represented here.
//! Per-path failures during the walk are counted by the scan context instead.
use std::path::PathBuf;

/// Errors that abort a scan or its export.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The scan root does not exist or is not a directory.
    #[error("cannot scan {}: {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    /// The export file could not be created.
    #[error("cannot open export file {}: {source}", path.display())]
    ExportOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the export stream failed part-way through the walk.
    #[error("export write failed: {0}")]
    ExportWrite(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
