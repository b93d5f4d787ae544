//! Converter abstraction and unit descriptors

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::{ConvertError, ConvertResult};

/// Read-only description of a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDescriptor {
    /// The unit name (e.g., "kilojoule")
    pub name: String,
    /// The unit symbol (e.g., "kJ")
    pub symbol: String,
    /// Category for organization (e.g., "Energy")
    pub category: String,
    /// Name of the unit every value in the category is expressed against
    #[serde(rename = "baseUOM")]
    pub base_unit: String,
}

/// A unit of measurement that can convert values to any other unit sharing
/// its base unit and category.
///
/// Implementations only describe how to reach the base unit and back.
/// `convert` is built on top of that, so two different implementations
/// sharing a base unit interoperate without knowing about each other.
pub trait Converter: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;
    fn symbol(&self) -> &str;
    fn category(&self) -> &str;
    fn base_unit(&self) -> &str;

    /// Express `value` (in this unit) in the base unit
    fn to_base(&self, value: f64) -> f64;

    /// Express `base_value` (in the base unit) in this unit
    fn from_base(&self, base_value: f64) -> ConvertResult<f64>;

    fn descriptor(&self) -> UnitDescriptor {
        UnitDescriptor {
            name: self.name().to_string(),
            symbol: self.symbol().to_string(),
            category: self.category().to_string(),
            base_unit: self.base_unit().to_string(),
        }
    }

    /// Check if two units share base unit and category (can be converted)
    fn is_compatible(&self, target: &dyn Converter) -> bool {
        self.base_unit() == target.base_unit() && self.category() == target.category()
    }

    /// Convert `value` from this unit to `target`
    fn convert(&self, value: f64, target: &dyn Converter) -> ConvertResult<f64> {
        if !self.is_compatible(target) {
            return Err(ConvertError::incompatible(self.name(), target.name()));
        }
        target.from_base(self.to_base(value))
    }
}
