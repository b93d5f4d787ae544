//! Built-in unit catalogue, embedded from `data/*.json`

use crate::{LinearReader, ReadError};
use metron_registry::ConverterRegistry;

/// (file name, contents) of every embedded data file
pub static BUILTIN_FILES: [(&str, &str); 14] = [
    ("angle.json", include_str!("../data/angle.json")),
    ("area.json", include_str!("../data/area.json")),
    ("data.json", include_str!("../data/data.json")),
    ("energy.json", include_str!("../data/energy.json")),
    ("force.json", include_str!("../data/force.json")),
    ("frequency.json", include_str!("../data/frequency.json")),
    ("length.json", include_str!("../data/length.json")),
    ("mass.json", include_str!("../data/mass.json")),
    ("power.json", include_str!("../data/power.json")),
    ("pressure.json", include_str!("../data/pressure.json")),
    ("temperature.json", include_str!("../data/temperature.json")),
    ("time.json", include_str!("../data/time.json")),
    ("velocity.json", include_str!("../data/velocity.json")),
    ("volume.json", include_str!("../data/volume.json")),
];

/// Load the built-in catalogue into `registry`.
///
/// Returns the number of units added. Built-in entries overwrite units of the
/// same name already in the registry.
pub fn load_builtin(registry: &ConverterRegistry) -> Result<usize, ReadError> {
    let reader = LinearReader::new();
    let mut loaded = 0;

    for (file, json) in BUILTIN_FILES.iter() {
        let converters = reader.parse_str(json)?;
        tracing::debug!(file, units = converters.len(), "loaded built-in units");
        loaded += registry.extend(converters);
    }

    tracing::info!(units = loaded, "loaded built-in unit catalogue");
    Ok(loaded)
}

/// Registry pre-loaded with the built-in catalogue
pub fn builtin_registry() -> Result<ConverterRegistry, ReadError> {
    let registry = ConverterRegistry::new();
    load_builtin(&registry)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn convert(registry: &ConverterRegistry, value: f64, from: &str, to: &str) -> f64 {
        let f = registry.get(from).unwrap();
        let t = registry.get(to).unwrap();
        f.convert(value, t.as_ref()).unwrap()
    }

    #[test]
    fn test_all_files_parse() {
        let registry = builtin_registry().unwrap();
        assert!(registry.len() > 100);
        assert_eq!(registry.categories().len(), BUILTIN_FILES.len());
    }

    #[test]
    fn test_unit_names_unique() {
        let reader = LinearReader::new();
        let total: usize = BUILTIN_FILES
            .iter()
            .map(|(_, json)| reader.parse_str(json).unwrap().len())
            .sum();
        assert_eq!(builtin_registry().unwrap().len(), total);
    }

    #[test]
    fn test_every_category_has_its_base_unit() {
        let registry = builtin_registry().unwrap();
        for category in registry.categories() {
            let units = registry.units_by_category(&category);
            let base = &units[0].base_unit;
            assert!(registry.contains(base), "{} has no '{}' unit", category, base);
            assert!(units.iter().all(|u| &u.base_unit == base));
        }
    }

    #[test]
    fn test_temperature_conversions() {
        let registry = builtin_registry().unwrap();
        assert!(approx_eq(convert(&registry, 0.0, "Celsius", "Fahrenheit"), 32.0, 1e-9));
        assert!(approx_eq(convert(&registry, 212.0, "fahrenheit", "celsius"), 100.0, 1e-9));
        assert!(approx_eq(convert(&registry, 0.0, "kelvin", "celsius"), -273.15, 1e-9));
        assert!(approx_eq(convert(&registry, 491.67, "rankine", "fahrenheit"), 32.0, 1e-9));
    }

    #[test]
    fn test_energy_conversions() {
        let registry = builtin_registry().unwrap();
        assert!(approx_eq(convert(&registry, 1000.0, "joule", "kilojoule"), 1.0, 1e-12));
        assert!(approx_eq(convert(&registry, 3_600_000.0, "joule", "kilowatt-hour"), 1.0, 1e-12));
        assert!(approx_eq(convert(&registry, 1.0, "kilocalorie", "kilojoule"), 4.184, 1e-12));
    }

    #[test]
    fn test_length_conversions() {
        let registry = builtin_registry().unwrap();
        assert!(approx_eq(convert(&registry, 1.0, "mile", "kilometer"), 1.609344, 1e-12));
        assert!(approx_eq(convert(&registry, 12.0, "inch", "foot"), 1.0, 1e-12));
    }
}
