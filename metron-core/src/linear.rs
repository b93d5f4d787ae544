//! Linear (affine) converters

use crate::{ConvertError, ConvertResult, Converter};

/// Unit related to its base unit by `base = value * factor + offset`.
///
/// Covers proportional units (kilojoule: factor 1000) and offset units such
/// as temperature scales (celsius against kelvin: factor 1, offset 273.15).
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConverter {
    name: String,
    symbol: String,
    base_unit: String,
    category: String,
    // Never zero, checked in `new`.
    factor: f64,
    offset: f64,
}

impl LinearConverter {
    /// Create a linear converter.
    ///
    /// Fails with `MissingData` when `name`, `base_unit` or `category` is
    /// empty and with `ZeroNotAllowed` when `factor` is zero.
    pub fn new(
        name: &str,
        symbol: &str,
        base_unit: &str,
        category: &str,
        factor: f64,
        offset: f64,
    ) -> ConvertResult<Self> {
        if name.is_empty() {
            return Err(ConvertError::MissingData("name"));
        }
        if base_unit.is_empty() {
            return Err(ConvertError::MissingData("base unit"));
        }
        if category.is_empty() {
            return Err(ConvertError::MissingData("category"));
        }
        if factor == 0.0 {
            return Err(ConvertError::ZeroNotAllowed);
        }

        Ok(LinearConverter {
            name: name.to_string(),
            symbol: symbol.to_string(),
            base_unit: base_unit.to_string(),
            category: category.to_string(),
            factor,
            offset,
        })
    }

    /// Create a proportional converter (no offset)
    pub fn proportional(
        name: &str,
        symbol: &str,
        base_unit: &str,
        category: &str,
        factor: f64,
    ) -> ConvertResult<Self> {
        Self::new(name, symbol, base_unit, category, factor, 0.0)
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Check if this unit has an offset (non-proportional conversion)
    pub fn has_offset(&self) -> bool {
        self.offset != 0.0
    }
}

impl Converter for LinearConverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn base_unit(&self) -> &str {
        &self.base_unit
    }

    fn to_base(&self, value: f64) -> f64 {
        value * self.factor + self.offset
    }

    fn from_base(&self, base_value: f64) -> ConvertResult<f64> {
        Ok((base_value - self.offset) / self.factor)
    }
}
