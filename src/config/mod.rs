//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `INSPIRE_DOWNLOADER_*` environment variables (`__` separates sections).
//! Command-line flags are applied on top by the binary.
//!
//! ```toml
//! [client]
//! base_url = "https://inspirehep.net/api"
//! timeout_secs = 30
//!
//! [downloads]
//! output_dir = "./papers"
//! format = "txt"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::client::{BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::utils::DEFAULT_USER_AGENT;

/// Name of the config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "inspire-downloader.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "INSPIRE_DOWNLOADER";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API client settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Download settings
    #[serde(default)]
    pub downloads: DownloadConfig,
}

/// API client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Default output directory
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Default metadata format ("json" or "txt")
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            format: default_format(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_format() -> String {
    "json".to_string()
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}

/// Configuration from defaults and environment variables only
pub fn get_config() -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(environment())
        .build()?
        .try_deserialize()
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Find a config file in the usual places
///
/// Checks `./inspire-downloader.toml`, then
/// `<config dir>/inspire-downloader/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("inspire-downloader").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.client.base_url, "https://inspirehep.net/api");
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.downloads.output_dir, PathBuf::from("."));
        assert_eq!(config.downloads.format, "json");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[client]\ntimeout_secs = 60\n\n[downloads]\nformat = \"txt\""
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.client.timeout_secs, 60);
        assert_eq!(config.client.base_url, BASE_URL);
        assert_eq!(config.downloads.format, "txt");
        assert_eq!(config.downloads.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = load_config(Path::new("/nonexistent/inspire-downloader.toml"));
        assert!(result.is_err());
    }
}
