//! Data model for scanned filesystem entries.
pub mod item;
pub mod size;

pub use item::{Item, ItemKind};
