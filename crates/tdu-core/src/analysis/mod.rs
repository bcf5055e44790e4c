//! Analysis modules -- post-scan ranking, aggregation and rendering.
pub mod render;
pub mod report;
pub mod top_files;

pub use report::{
    build_entry_report, build_top_files_report, smart_truncate, EntryReport, TopFilesReport,
};
pub use top_files::TopKTracker;
