// Service configuration
//
// Sources, in precedence order:
//
// 1. command line flags (`--listen`)
// 2. the file given with `--config`
// 3. `~/.config/recipebox/config.yaml`, if it exists
// 4. built-in defaults
//
// ```yaml
// listen: 127.0.0.1:3000
// meal_db_url: https://www.themealdb.com/api/json/v1/1
// cocktail_db_url: https://www.thecocktaildb.com/api/json/v1/1
// schema_path: proto/favorites.proto   # optional, built-in schema otherwise
// ```

use crate::catalog::{DEFAULT_COCKTAIL_DB_URL, DEFAULT_MEAL_DB_URL};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_DIR: &str = "recipebox";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_meal_db_url")]
    pub meal_db_url: String,

    #[serde(default = "default_cocktail_db_url")]
    pub cocktail_db_url: String,

    /// `.proto` file for the binary format; built-in schema if unset
    #[serde(default)]
    pub schema_path: Option<PathBuf>,
}

fn default_listen() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_meal_db_url() -> String {
    DEFAULT_MEAL_DB_URL.to_string()
}

fn default_cocktail_db_url() -> String {
    DEFAULT_COCKTAIL_DB_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            meal_db_url: default_meal_db_url(),
            cocktail_db_url: default_cocktail_db_url(),
            schema_path: None,
        }
    }
}

impl Config {
    /// Load a config file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Default per-user config location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Resolve the effective config
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }
}
