//! tdu core -- scanning, disk-usage accounting, reporting and export.
//!
//! This crate contains all business logic with zero terminal dependencies.
//! The command-line frontend lives in `tdu-cli`.
//!
//! # Modules
//!
//! - [`model`] -- Scanned item records and size formatting.
//! - [`platform`] -- Native metadata probe and partition lookup.
//! - [`scanner`] -- Single-threaded depth-first walker with inode and device accounting.
//! - [`analysis`] -- Top-K tracking, report aggregation and text rendering.
//! - [`export`] -- Streaming ncdu-compatible JSON export.
pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod platform;
pub mod scanner;

pub use config::{ListLimits, ScanConfig};
pub use error::{Result, ScanError};

/// Program name written into export headers.
pub const PROGRAM_NAME: &str = "tdu";

/// Program version written into export headers.
pub const PROGRAM_VERSION: &str = env!("CARGO_PKG_VERSION");
