//! Metron Registry
//!
//! Provides the shared store of converters:
//! - `ConverterRegistry`: case-insensitive, thread-safe unit lookup
//! - `ConverterReader`: parser seam for bulk loading data files
//! - `LoadError`: failures while loading files

mod registry;
mod loader;

pub use registry::ConverterRegistry;
pub use loader::{ConverterReader, LoadError};

/// Re-export core types for reader authors
pub mod prelude {
    pub use crate::{ConverterRegistry, ConverterReader, LoadError};
    pub use metron_core::prelude::*;
}
