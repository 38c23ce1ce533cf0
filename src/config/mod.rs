//! Application configuration: config.toml, environment overrides, and the database.

/// Seed coupons declared in config.toml
pub mod coupons;

/// Database configuration and connection management
pub mod database;

/// Bearer tokens and roles from environment variables
pub mod tokens;

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

pub use coupons::CouponSeed;
pub use tokens::{ApiTokens, Role};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn default_bind_address() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Entire config.toml file. Every section is optional.
#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Where coupons are kept
    #[serde(default)]
    pub storage: StorageConfig,
    /// Coupons created on start-up when missing
    #[serde(default)]
    pub coupons: Vec<CouponSeed>,
}

/// `[server]` section
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Origin allowed to call the API from a browser
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_origin: default_cors_origin(),
        }
    }
}

impl ServerConfig {
    /// Replaces the port of `bind_address`, keeping the host.
    pub fn set_port(&mut self, port: u16) {
        let host = self
            .bind_address
            .rsplit_once(':')
            .map_or(self.bind_address.as_str(), |(host, _)| host);
        self.bind_address = format!("{host}:{port}");
    }
}

/// Storage backend selection
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Coupons live in process memory and vanish on restart
    #[default]
    Memory,
    /// Coupons live in the `SQLite` database at `DATABASE_URL`
    Sqlite,
}

/// `[storage]` section
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageConfig {
    /// Which backend to use
    #[serde(default)]
    pub backend: StorageBackend,
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid TOML for [`AppConfig`].
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_config(&contents)
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the application configuration.
///
/// The file is `BWADMIN_CONFIG` or `./config.toml`; when it does not exist the
/// defaults are used. A `PORT` variable overrides the listening port.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("BWADMIN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        warn!("No configuration file at {}, using defaults", path);
        AppConfig::default()
    };

    if let Ok(port) = std::env::var("PORT") {
        let port = port.parse::<u16>().map_err(|e| Error::Config {
            message: format!("Invalid PORT {port:?}: {e}"),
        })?;
        config.server.set_port(port);
    }

    info!(
        "Configuration loaded: listening on {}, {:?} storage, {} seed coupons",
        config.server.bind_address,
        config.storage.backend,
        config.coupons.len()
    );
    Ok(config)
}
