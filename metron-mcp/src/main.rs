//! Metron MCP Server
//!
//! Serves unit conversion over line-delimited JSON-RPC on stdio.
//! Logs go to stderr; stdout carries protocol messages only.

mod config;
mod server;

use config::{load_sources, ServerConfig};
use metron::Metron;
use server::Server;
use std::env;
use std::io;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "metron=info";

/// `RUST_LOG` directives when set and valid, otherwise `metron=info`
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_writer(io::stderr)
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(
        data_path = %config.data_path.display(),
        builtin = config.builtin,
        protocol = server::PROTOCOL_VERSION,
        "starting metron-mcp"
    );

    let metron = Metron::empty();
    let units = load_sources(&metron, &config).map_err(|e| {
        tracing::error!(error = %e, "failed to load units");
        e
    })?;
    tracing::info!(units, categories = metron.categories().len(), "units loaded");

    let server = Server::new(metron, config);
    let stdin = io::stdin();
    server.serve(stdin.lock(), io::stdout().lock())?;

    tracing::info!("shutdown");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_default_log_filter() {
        let filter = log_filter(None);
        assert_eq!(filter.to_string(), "metron=info");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));

        assert_eq!(log_filter(Some("  ".to_string())).to_string(), "metron=info");
    }

    #[test]
    fn test_rust_log_overrides_default() {
        let filter = log_filter(Some("metron=debug".to_string()));
        assert_eq!(filter.to_string(), "metron=debug");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = log_filter(Some("debug".to_string()));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_invalid_rust_log_falls_back() {
        let filter = log_filter(Some("metron=loud".to_string()));
        assert_eq!(filter.to_string(), "metron=info");
    }
}
