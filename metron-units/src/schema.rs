//! Layout of linear unit data files
//!
//! ```json
//! {
//!   "category": "Energy",
//!   "description": "Energy, work and heat",
//!   "baseunit": "joule",
//!   "units": [
//!     { "name": "kilojoule", "symbol": "kJ", "baseunit": "joule", "factor": 1000 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// One data file: a category of units sharing a base unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitFile {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "baseunit")]
    pub base_unit: String,
    #[serde(default)]
    pub units: Vec<UnitEntry>,
}

/// One unit inside a data file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    /// Informational; the file-level base unit applies
    #[serde(default, rename = "baseunit", skip_serializing_if = "String::is_empty")]
    pub base_unit: String,
    /// Missing or null factors read as zero and are rejected when the
    /// converter is built
    #[serde(default)]
    pub factor: Option<f64>,
    #[serde(default)]
    pub offset: f64,
}

impl UnitEntry {
    pub fn factor(&self) -> f64 {
        self.factor.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_defaults_to_zero() {
        let file: UnitFile = serde_json::from_str(
            r#"{"category":"Length","baseunit":"meter","units":[{"name":"foot","symbol":"ft","factor":0.3048}]}"#,
        )
        .unwrap();

        assert_eq!(file.units.len(), 1);
        assert_eq!(file.units[0].offset, 0.0);
        assert_eq!(file.units[0].base_unit, "");
        assert_eq!(file.description, "");
    }

    #[test]
    fn test_missing_factor_reads_as_zero() {
        let file: UnitFile = serde_json::from_str(
            r#"{"category":"Length","baseunit":"meter","units":[{"name":"foot"}]}"#,
        )
        .unwrap();
        assert_eq!(file.units[0].factor, None);
        assert_eq!(file.units[0].factor(), 0.0);
    }

    #[test]
    fn test_null_factor_reads_as_zero() {
        let file: UnitFile = serde_json::from_str(
            r#"{"category":"Length","baseunit":"meter","units":[{"name":"foot","factor":null}]}"#,
        )
        .unwrap();
        assert_eq!(file.units[0].factor(), 0.0);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let file: UnitFile = serde_json::from_str(
            r#"{"category":"Mass","baseunit":"gram","version":2,"units":[]}"#,
        )
        .unwrap();
        assert_eq!(file.category, "Mass");
    }
}
