//! Metron - Unit conversion over a converter registry

mod response;

pub use response::ConversionResponse;

pub use metron_core::{Converter, LinearConverter, UnitDescriptor, ConvertError, ConvertResult};
pub use metron_registry::{ConverterRegistry, ConverterReader, LoadError};
pub use metron_units::{LinearReader, ReadError};

use std::sync::Arc;

/// Main Metron engine
///
/// Resolves unit names through a shared registry and converts between them.
/// Cloning is cheap; clones share the same registry.
#[derive(Debug, Clone)]
pub struct Metron {
    registry: Arc<ConverterRegistry>,
}

impl Metron {
    pub fn new(registry: Arc<ConverterRegistry>) -> Self {
        Self { registry }
    }

    /// Engine over an empty registry
    pub fn empty() -> Self {
        Self::new(Arc::new(ConverterRegistry::new()))
    }

    /// Engine pre-loaded with the built-in unit catalogue
    pub fn with_builtin_units() -> Result<Self, ReadError> {
        Ok(Self::new(Arc::new(metron_units::builtin_registry()?)))
    }

    pub fn registry(&self) -> &Arc<ConverterRegistry> {
        &self.registry
    }

    fn lookup(&self, name: &str) -> ConvertResult<Arc<dyn Converter>> {
        self.registry.get(name).ok_or_else(|| ConvertError::unknown_unit(name))
    }

    /// Convert `value` from the unit named `from` to the unit named `to`
    pub fn to_value(&self, value: f64, from: &str, to: &str) -> ConvertResult<f64> {
        let f = self.lookup(from)?;
        let t = self.lookup(to)?;
        f.convert(value, t.as_ref())
    }

    /// Convert and describe the outcome. Never fails: errors become a
    /// failure response carrying the error text.
    pub fn conversion(&self, value: f64, from: &str, to: &str) -> ConversionResponse {
        // Resolve once so the response describes the converters actually used
        let resolved = self.lookup(from).and_then(|f| {
            let t = self.lookup(to)?;
            let result = f.convert(value, t.as_ref())?;
            Ok((f, t, result))
        });

        match resolved {
            Ok((f, t, result)) => ConversionResponse {
                ok: true,
                message: "success".to_string(),
                result: Some(result),
                category: t.category().to_string(),
                from: from.to_string(),
                from_symbol: f.symbol().to_string(),
                to: to.to_string(),
                to_symbol: t.symbol().to_string(),
                base_unit: t.base_unit().to_string(),
            },
            Err(e) => {
                tracing::debug!(from, to, error = %e, "conversion failed");
                ConversionResponse::failure(e.to_string())
            }
        }
    }

    /// Convert and serialize the outcome as JSON
    pub fn to_json(&self, value: f64, from: &str, to: &str) -> serde_json::Result<Vec<u8>> {
        self.conversion(value, from, to).to_json()
    }

    pub fn categories(&self) -> Vec<String> {
        self.registry.categories()
    }

    pub fn units_by_category(&self, category: &str) -> Vec<UnitDescriptor> {
        self.registry.units_by_category(category)
    }

    /// Add or replace a converter
    pub fn add(&self, converter: Arc<dyn Converter>) {
        self.registry.add(converter);
    }

    pub fn remove(&self, name: &str) {
        self.registry.remove(name);
    }

    pub fn clear(&self) {
        self.registry.clear();
    }

    /// Load every `*.json` file matching `pattern`
    pub fn load_files<R: ConverterReader>(&self, reader: &R, pattern: &str) -> Result<usize, LoadError> {
        self.registry.add_from_files(reader, pattern)
    }
}

impl Default for Metron {
    fn default() -> Self {
        Self::empty()
    }
}
