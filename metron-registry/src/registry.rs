//! Converter Registry

use metron_core::{Converter, UnitDescriptor};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type UnitMap = HashMap<String, Arc<dyn Converter>>;

/// Thread-safe store of converters keyed by lower-cased unit name.
///
/// Readers share a read lock; `add`, `remove` and `clear` take the write
/// lock. Stored converters are immutable, so a converter obtained through
/// `get` stays valid even if it is removed concurrently.
#[derive(Default)]
pub struct ConverterRegistry {
    units: RwLock<UnitMap>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Entries are replaced whole under the write lock, so a poisoned lock
    // never guards a half-written map.
    fn read(&self) -> RwLockReadGuard<'_, UnitMap> {
        self.units.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, UnitMap> {
        self.units.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Case-insensitive lookup
    pub fn get(&self, name: &str) -> Option<Arc<dyn Converter>> {
        self.read().get(&name.to_lowercase()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(&name.to_lowercase())
    }

    /// Add or replace the converter stored under its lower-cased name
    pub fn add(&self, converter: Arc<dyn Converter>) {
        let key = converter.name().to_lowercase();
        tracing::debug!(unit = %key, category = converter.category(), "registering unit");
        self.write().insert(key, converter);
    }

    /// Add every converter in `converters`
    pub fn extend<I>(&self, converters: I) -> usize
    where
        I: IntoIterator<Item = Arc<dyn Converter>>,
    {
        let mut units = self.write();
        let mut count = 0;
        for converter in converters {
            units.insert(converter.name().to_lowercase(), converter);
            count += 1;
        }
        count
    }

    /// Remove a converter by name. Does nothing if it is not registered.
    pub fn remove(&self, name: &str) {
        if self.write().remove(&name.to_lowercase()).is_some() {
            tracing::debug!(unit = name, "removed unit");
        }
    }

    pub fn clear(&self) {
        let mut units = self.write();
        let count = units.len();
        *units = HashMap::new();
        tracing::debug!(count, "cleared registry");
    }

    /// Replace every entry with the contents of `source` under one write lock.
    ///
    /// Readers see either the old units or the new ones, never a mix.
    /// Returns the number of units now registered.
    pub fn replace_all(&self, source: ConverterRegistry) -> usize {
        let units = source.units.into_inner().unwrap_or_else(PoisonError::into_inner);
        let count = units.len();
        *self.write() = units;
        tracing::debug!(count, "replaced registry contents");
        count
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered unit names, sorted case-insensitively
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .read()
            .values()
            .map(|c| c.name().to_string())
            .collect();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }

    /// Distinct categories, sorted case-insensitively
    pub fn categories(&self) -> Vec<String> {
        let distinct: HashSet<String> = self
            .read()
            .values()
            .map(|c| c.category().to_string())
            .collect();

        let mut categories: Vec<String> = distinct.into_iter().collect();
        categories.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
        categories
    }

    /// Units whose category matches `category` exactly, sorted by name
    pub fn units_by_category(&self, category: &str) -> Vec<UnitDescriptor> {
        let mut units: Vec<UnitDescriptor> = self
            .read()
            .values()
            .filter(|c| c.category() == category)
            .map(|c| c.descriptor())
            .collect();

        units.sort_by(|a, b| {
            a.name.to_lowercase().cmp(&b.name.to_lowercase()).then_with(|| a.name.cmp(&b.name))
        });
        units
    }

    /// Find unit names similar to the given name (for error suggestions)
    pub fn suggest(&self, name: &str, limit: usize) -> Vec<String> {
        let query = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self
            .read()
            .iter()
            .filter_map(|(key, c)| {
                let score = similarity_score(&query, key);
                if score > 0 {
                    Some((c.name().to_string(), score))
                } else {
                    None
                }
            })
            .collect();

        // Higher score first, ties by name for stable output
        matches.sort_by(|a, b| {
            b.1.cmp(&a.1).then_with(|| a.0.to_lowercase().cmp(&b.0.to_lowercase()))
        });
        matches.into_iter().take(limit).map(|(name, _)| name).collect()
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let units: BTreeSet<String> = self.read().keys().cloned().collect();
        f.debug_struct("ConverterRegistry").field("units", &units).finish()
    }
}

/// Calculate similarity score between two lower-cased names
fn similarity_score(query: &str, candidate: &str) -> usize {
    if query.is_empty() {
        return 0;
    }

    let mut score = 0;

    // Exact prefix match is best
    if candidate.starts_with(query) {
        score += 100;
    } else if candidate.contains(query) {
        score += 50;
    } else if query.contains(candidate) {
        score += 30;
    }

    // Require some real overlap before counting shared characters
    let query_chars: HashSet<char> = query.chars().collect();
    let candidate_chars: HashSet<char> = candidate.chars().collect();
    let common = query_chars.intersection(&candidate_chars).count();
    if score == 0 && common * 2 < query_chars.len().max(1) + 1 {
        return 0;
    }
    score += common * 2;

    // Penalize length difference
    let len_diff = query.chars().count().abs_diff(candidate.chars().count());
    if len_diff < 5 {
        score += 5 - len_diff;
    }

    score
}
