//! Export of the walked tree to third-party formats.
pub mod ncdu;

pub use ncdu::{entry_object, escape_name, NcduExporter};
