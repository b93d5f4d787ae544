//! Reader for linear unit data files

use crate::schema::UnitFile;
use metron_core::{ConvertError, Converter, LinearConverter};
use metron_registry::ConverterReader;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid unit '{unit}': {source}")]
    Convert {
        unit: String,
        #[source]
        source: ConvertError,
    },
}

/// Builds `LinearConverter`s from JSON data files
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearReader;

impl LinearReader {
    pub fn new() -> Self {
        LinearReader
    }

    /// Parse the contents of one data file
    pub fn parse_str(&self, json: &str) -> Result<Vec<Arc<dyn Converter>>, ReadError> {
        let file: UnitFile = serde_json::from_str(json)?;
        self.build(&file)
    }

    /// Build one converter per unit; the file's category and base unit apply
    /// to every entry.
    pub fn build(&self, file: &UnitFile) -> Result<Vec<Arc<dyn Converter>>, ReadError> {
        file.units
            .iter()
            .map(|u| {
                if !u.base_unit.is_empty() && u.base_unit != file.base_unit {
                    tracing::warn!(
                        unit = %u.name,
                        declared = %u.base_unit,
                        file = %file.base_unit,
                        "unit base unit differs from its file; using the file's"
                    );
                }

                let converter = LinearConverter::new(
                    &u.name,
                    &u.symbol,
                    &file.base_unit,
                    &file.category,
                    u.factor(),
                    u.offset,
                )
                .map_err(|source| ReadError::Convert { unit: u.name.clone(), source })?;

                Ok(Arc::new(converter) as Arc<dyn Converter>)
            })
            .collect()
    }
}

impl ConverterReader for LinearReader {
    type Error = ReadError;

    fn read_file(&self, path: &Path) -> Result<Vec<Arc<dyn Converter>>, ReadError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
    }
}
