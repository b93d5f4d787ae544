//! Bulk loading of converters from data files

use crate::ConverterRegistry;
use metron_core::Converter;
use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Parses one data file into converters
pub trait ConverterReader {
    type Error: StdError + Send + Sync + 'static;

    fn read_file(&self, path: &Path) -> Result<Vec<Arc<dyn Converter>>, Self::Error>;
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("cannot access matched path: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl ConverterRegistry {
    /// Load every `*.json` file matching `pattern` through `reader`.
    ///
    /// Stops at the first error. Converters from files read before the
    /// failure stay registered. Returns the number of converters added.
    pub fn add_from_files<R: ConverterReader>(&self, reader: &R, pattern: &str) -> Result<usize, LoadError> {
        let mut files = 0;
        let mut loaded = 0;

        for entry in glob::glob(pattern)? {
            let path = entry?;
            if !is_json(&path) {
                continue;
            }

            let converters = reader.read_file(&path).map_err(|e| LoadError::Read {
                path: path.clone(),
                source: Box::new(e),
            })?;

            tracing::debug!(file = %path.display(), units = converters.len(), "read unit file");
            loaded += self.extend(converters);
            files += 1;
        }

        tracing::info!(pattern, files, units = loaded, "loaded unit files");
        Ok(loaded)
    }
}

fn is_json(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".json")
}
