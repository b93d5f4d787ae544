//! Metron Core - Fundamental types
//!
//! This crate provides the core types used throughout Metron:
//! - `Converter`: A unit that converts values to compatible units
//! - `LinearConverter`: Affine conversion against a base unit
//! - `UnitDescriptor`: Read-only view of a unit
//! - `ConvertError`: Error taxonomy for construction and conversion

mod converter;
mod linear;
mod error;

pub use converter::{Converter, UnitDescriptor};
pub use linear::LinearConverter;
pub use error::{ConvertError, ConvertResult, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Converter, LinearConverter, UnitDescriptor, ConvertError, ConvertResult};
    pub use crate::error::codes;
}
