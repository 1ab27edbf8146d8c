#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod error;

pub use config::{PointerUnits, SketchConfig};
pub use error::SketchError;
