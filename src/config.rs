// CLI configuration, resolved from an optional YAML file

use crate::error::StoreError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings the quotebase CLI reads from a config file.
///
/// Everything is optional: with no file present the defaults below apply,
/// and command-line flags override whatever the file says.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Where the local JSON blob lives.
    pub storage_path: Option<PathBuf>,
    /// Base URL of a quote-base server; set to use remote persistence.
    pub server_url: Option<String>,
    /// Default page size for listings.
    pub items_per_page: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: None,
            server_url: None,
            items_per_page: 10,
        }
    }
}

impl Config {
    /// Read the config file at `path`, or from the platform config directory
    /// when no path is given. A missing default-location file is fine; a
    /// missing explicitly-named file is an error.
    pub fn load(path: Option<&Path>) -> Result<Config, StoreError> {
        let candidate = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => {
                let Some(dir) = dirs::config_dir() else {
                    return Ok(Config::default());
                };
                dir.join("quotebase").join("config.yaml")
            }
        };

        if !candidate.exists() {
            if path.is_some() {
                return Err(StoreError::Persistence(format!(
                    "config file not found: {}",
                    candidate.display()
                )));
            }
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(&candidate)?;
        let config = serde_yaml::from_str(&raw)
            .map_err(|e| StoreError::Persistence(format!("invalid config: {}", e)))?;
        debug!(path = ?candidate, "loaded config");
        Ok(config)
    }

    /// The local blob location, falling back to the platform data directory.
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("quotebase")
                .join("quotes.json")
        })
    }
}
