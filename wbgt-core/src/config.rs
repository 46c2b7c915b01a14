//! Client configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{WbgtError, WbgtResult};
use crate::remote::RemoteConfig;

static DEFAULT_CACHE_PATH: &str = "~/.wbgt/cache";

fn default_cache_path() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_PATH)
}

/// Configuration at ~/.config/wbgt/config.toml
///
/// Every key can be overridden with a `WBGT_` environment variable,
/// e.g. `WBGT_OFFLINE=true`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WbgtConfig {
    #[serde(default = "default_cache_path")]
    pub cache_dir: PathBuf,

    /// Never contact the remote, even if it is reachable.
    #[serde(default)]
    pub offline: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
}

impl Default for WbgtConfig {
    fn default() -> Self {
        WbgtConfig {
            cache_dir: default_cache_path(),
            offline: false,
            remote: None,
        }
    }
}

impl WbgtConfig {
    pub fn config_path() -> WbgtResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WbgtError::Config("Could not determine config directory".into()))?
            .join("wbgt");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file, creating a commented-out default on first run.
    pub fn load() -> WbgtResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> WbgtResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("WBGT").try_parsing(true))
            .build()
            .map_err(|e| WbgtError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| WbgtError::Config(e.to_string()))
    }

    /// Cache directory with `~` expanded.
    pub fn cache_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.cache_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn remote(&self) -> WbgtResult<&RemoteConfig> {
        self.remote.as_ref().ok_or(WbgtError::NoRemoteConfigured)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> WbgtResult<()> {
        let contents = format!(
            "\
# wbgt configuration

# Where the offline cache lives:
# cache_dir = \"{}\"

# Never contact the remote store:
# offline = false

# Remote store provider (binary `wbgt-remote-<provider>` on PATH).
# Other keys in this table are passed to the provider as-is.
# [remote]
# provider = \"file\"
# path = \"~/wbgt-remote.json\"
",
            DEFAULT_CACHE_PATH
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WbgtError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| WbgtError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
