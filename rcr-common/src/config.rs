//! Configuration loading for RCR services
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default listen port for rcr-api
pub const DEFAULT_PORT: u16 = 5780;

/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default database filename (relative to the working directory)
pub const DEFAULT_DATABASE: &str = "rcr.db";

/// Optional settings read from a TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<String>,
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
}

impl ServiceConfig {
    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load a TOML config file. A missing file is not an error (all settings
/// have defaults); a present-but-malformed file is.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read config failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse config failed: {}", e)))
}

/// Resolve the service configuration from CLI arguments, environment
/// variables, and an optional TOML file.
///
/// Environment variables: `RCR_HOST`, `RCR_PORT`, `RCR_DATABASE`.
pub fn resolve_config(
    cli_port: Option<u16>,
    cli_database: Option<PathBuf>,
    toml_config: &TomlConfig,
) -> ServiceConfig {
    let host = std::env::var("RCR_HOST")
        .ok()
        .or_else(|| toml_config.host.clone())
        .unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = cli_port
        .or_else(|| {
            std::env::var("RCR_PORT").ok().and_then(|p| {
                p.parse().map_err(|_| warn!("Ignoring non-numeric RCR_PORT: {}", p)).ok()
            })
        })
        .or(toml_config.port)
        .unwrap_or(DEFAULT_PORT);

    let database_path = cli_database
        .or_else(|| std::env::var("RCR_DATABASE").ok().map(PathBuf::from))
        .or_else(|| toml_config.database_path.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));

    info!(
        "Configuration resolved: host={} port={} database={}",
        host,
        port,
        database_path.display()
    );

    ServiceConfig {
        host,
        port,
        database_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = resolve_config(None, None, &TomlConfig::default());
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE));
    }

    #[test]
    fn test_cli_beats_toml() {
        let toml_config = TomlConfig {
            host: None,
            port: Some(9000),
            database_path: Some("toml.db".to_string()),
        };
        let config = resolve_config(Some(8000), Some(PathBuf::from("cli.db")), &toml_config);
        assert_eq!(config.port, 8000);
        assert_eq!(config.database_path, PathBuf::from("cli.db"));
    }

    #[test]
    fn test_toml_used_as_fallback() {
        let toml_config = TomlConfig {
            host: Some("0.0.0.0".to_string()),
            port: Some(9000),
            database_path: None,
        };
        let config = resolve_config(None, None, &toml_config);
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_missing_toml_file_is_default() {
        let config = load_toml_config(Path::new("/nonexistent/rcr.toml")).unwrap();
        assert!(config.port.is_none());
    }
}
