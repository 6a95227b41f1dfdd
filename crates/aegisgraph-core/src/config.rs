//! Layered configuration.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults,
//! 2. an optional TOML file,
//! 3. environment variables prefixed `AEGISGRAPH_`, nested keys split on `__`
//!    (e.g. `AEGISGRAPH_LOADER__MIN_CHUNK_BYTES=4096`).
//!
//! # Example TOML
//!
//! ```toml
//! [loader]
//! workers = { fixed = 8 }   # or "auto"
//! min_chunk_bytes = 65536
//!
//! [walk]
//! length = 80
//! count = 10
//! seed = 42
//!
//! [paths]
//! allowed_root = "/data/graphs"
//! ```

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{LoaderConfig, PathConfig, ThreadConfig};
use crate::walk::WalkConfig;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "AEGISGRAPH_";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Bulk loader tuning.
    pub loader: LoaderConfig,
    /// Walk corpus defaults.
    pub walk: WalkConfig,
    /// Path policy.
    pub paths: PathConfig,
}

impl GraphConfig {
    /// Loads defaults, then `file` (if given), then the environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `file` does not exist, a source cannot be
    /// parsed, or the merged values fail [`GraphConfig::validate`].
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            if !file.is_file() {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    file.display()
                )));
            }
            figment = figment.merge(Toml::file(file));
        }
        Self::finish(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Parses a TOML document over the defaults. The environment is ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on parse or validation failure.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Self::finish(Figment::from(Serialized::defaults(Self::default())).merge(Toml::string(toml)))
    }

    fn finish(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract()?;
        config.validate()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Checks value ranges serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for a fixed worker count of zero or a zero
    /// minimum chunk size.
    pub fn validate(&self) -> Result<()> {
        if self.loader.workers == ThreadConfig::Fixed(0) {
            return Err(Error::Config(
                "loader.workers must be \"auto\" or at least 1".to_string(),
            ));
        }
        if self.loader.min_chunk_bytes == 0 {
            return Err(Error::Config(
                "loader.min_chunk_bytes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
