//! Centralized server configuration.
//!
//! Loaded via the `config` crate from `ALMANAC__*` environment variables,
//! e.g. `ALMANAC__BIND_ADDRESS=0.0.0.0:8080`.

use almanac_core::SiteId;
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable prefix.
const ENV_PREFIX: &str = "ALMANAC";

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Site used when a request carries no `X-Site-Id` header.
    #[serde(default = "default_site_id")]
    pub default_site_id: SiteId,

    /// JSON seed file for the in-memory workflow catalog.
    /// The catalog starts empty when unset.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_site_id() -> SiteId {
    SiteId::new(0)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            default_site_id: default_site_id(),
            seed_path: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                environment
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
