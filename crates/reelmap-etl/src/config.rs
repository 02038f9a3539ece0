use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use reelmap_core::query::DEFAULT_NEAREST;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "reelmap/0.1.0 (https://github.com/oxur/reelmap)";

/// Configuration for reelmap.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (REEL_* prefix)
/// 3. Config file (~/.config/reelmap/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the filming-location dataset.
    ///
    /// Can be set via:
    /// - CLI: --dataset /path/to/locations.tsv
    /// - ENV: REEL_DATASET_PATH
    /// - Config: dataset_path = "/path/to/locations.tsv"
    /// - Default: ~/.local/share/reelmap/locations.tsv
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Directory the rendered map is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// How many nearby locations to show on the map.
    #[serde(default = "default_nearest_count")]
    pub nearest_count: usize,

    /// Base URL of the Nominatim service.
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    /// User agent sent to Nominatim (its usage policy requires one).
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_requests_per_second")]
    pub geocode_requests_per_second: u32,

    /// Retries for transient geocoding failures.
    #[serde(default = "default_max_retries")]
    pub geocode_max_retries: usize,

    /// Log level used when no -v flag is given (trace, debug, info).
    #[serde(default)]
    pub logging_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            output_dir: default_output_dir(),
            nearest_count: default_nearest_count(),
            nominatim_url: default_nominatim_url(),
            user_agent: default_user_agent(),
            geocode_requests_per_second: default_requests_per_second(),
            geocode_max_retries: default_max_retries(),
            logging_level: None,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/reelmap/config.toml
    /// Reads environment variables with REEL_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("reel");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Apply command-line overrides on top of the loaded configuration.
    #[must_use]
    pub fn with_overrides(
        mut self,
        dataset_path: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        nearest_count: Option<usize>,
    ) -> Self {
        if let Some(path) = dataset_path {
            self.dataset_path = path;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if let Some(count) = nearest_count {
            self.nearest_count = count;
        }
        self
    }
}

/// Returns: ~/.local/share/reelmap (or platform equivalent)
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reelmap")
}

fn default_dataset_path() -> PathBuf {
    data_dir().join("locations.tsv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_nearest_count() -> usize {
    DEFAULT_NEAREST
}

fn default_nominatim_url() -> String {
    DEFAULT_NOMINATIM_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_requests_per_second() -> u32 {
    1
}

fn default_max_retries() -> usize {
    3
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/reelmap/config.toml
/// - macOS: ~/Library/Application Support/reelmap/config.toml
/// - Windows: %APPDATA%\reelmap\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reelmap")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Reelmap Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (REEL_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Filming-location dataset, one TAB-separated record per line:
#   title, year, place name, latitude, longitude
#
# Build one from an IMDb locations.list with `reelmap import`.
#
# Can also be set via:
# - CLI: reelmap map --dataset /custom/locations.tsv
# - Environment: REEL_DATASET_PATH=/custom/locations.tsv
#
# Default: Platform-specific data directory
#dataset_path = "/path/to/locations.tsv"

# Where rendered maps are written
#output_dir = "."

# Number of nearby filming locations shown on the map
nearest_count = 10

# Nominatim geocoding service
#
# Please respect the usage policy of the public instance:
# https://operations.osmfoundation.org/policies/nominatim/
nominatim_url = "https://nominatim.openstreetmap.org"
#user_agent = "reelmap/0.1.0 (you@example.org)"
geocode_requests_per_second = 1
geocode_max_retries = 3

# Log level when no -v flag is given: trace, debug or info
#logging_level = "info"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
