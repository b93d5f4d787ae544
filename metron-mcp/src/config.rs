//! Server configuration and unit sources

use metron::{ConverterRegistry, LinearReader, LoadError, Metron, ReadError};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const DATA_PATH_VAR: &str = "METRON_DATA_PATH";
pub const BUILTIN_VAR: &str = "METRON_BUILTIN";
const DEFAULT_DATA_PATH: &str = "./data";

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("built-in catalogue: {0}")]
    Builtin(#[from] ReadError),

    #[error("data files: {0}")]
    Files(#[from] LoadError),
}

/// Where units come from
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Directory scanned for `*.json` unit files
    pub data_path: PathBuf,
    /// Load the embedded catalogue before the data files
    pub builtin: bool,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_vars(env::var(DATA_PATH_VAR).ok(), env::var(BUILTIN_VAR).ok())
    }

    fn from_vars(data_path: Option<String>, builtin: Option<String>) -> Self {
        Self {
            data_path: data_path
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            builtin: builtin.map_or(true, |v| !is_disabled(&v)),
        }
    }

    /// Glob pattern matching the unit files in `data_path`
    pub fn file_pattern(&self) -> String {
        let dir = glob::Pattern::escape(&self.data_path.to_string_lossy());
        format!("{}/*.json", dir.trim_end_matches('/'))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_vars(None, None)
    }
}

fn is_disabled(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off")
}

/// Replace the registry contents with the configured sources.
///
/// Units are loaded into a fresh registry and swapped in only once every
/// source has loaded, so a failure leaves the current units untouched. Data
/// files load after the built-in catalogue and can redefine a built-in unit.
/// Returns the number of units registered.
pub fn load_sources(metron: &Metron, config: &ServerConfig) -> Result<usize, SourceError> {
    let staged = ConverterRegistry::new();

    if config.builtin {
        metron_units::load_builtin(&staged)?;
    }

    if !config.data_path.is_dir() {
        tracing::warn!(path = %config.data_path.display(), "data path is not a directory; skipping unit files");
    } else {
        staged.add_from_files(&LinearReader::new(), &config.file_pattern())?;
    }

    Ok(metron.registry().replace_all(staged))
}
