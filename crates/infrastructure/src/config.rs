//! Client configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. an optional `lernen.toml`
//! 3. `LERNEN_*` environment variables, e.g. `LERNEN_API_URL`

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use lernen_application::ApplicationError;
use serde::Deserialize;
use url::Url;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "lernen.toml";

/// Prefix of the environment variables read.
pub const ENV_PREFIX: &str = "LERNEN";

/// Errors raised while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or has the wrong shape.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// `api_url` is not an absolute http(s) URL.
    #[error("invalid api_url {value:?}: {reason}")]
    InvalidUrl {
        /// The configured value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No storage directory is configured and the platform has none.
    #[error("no storage directory available, set LERNEN_STORAGE_DIR")]
    NoStorageDir,
}

impl From<ConfigError> for ApplicationError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    api_url: String,
    timeout_secs: u64,
    user_agent: String,
    #[serde(default)]
    storage_dir: Option<PathBuf>,
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the backend API.
    pub api_url: Url,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Directory holding the persisted entries.
    pub storage_dir: PathBuf,
}

impl ClientConfig {
    /// Loads from `lernen.toml` in the working directory and the environment.
    ///
    /// # Errors
    ///
    /// See [`ConfigError`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Loads from `file` (if it exists) and the environment.
    ///
    /// # Errors
    ///
    /// See [`ConfigError`].
    pub fn load_from(file: &Path) -> Result<Self, ConfigError> {
        Self::build(file, Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    fn build(file: &Path, environment: Environment) -> Result<Self, ConfigError> {
        let raw: RawConfig = Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("user_agent", default_user_agent())?
            .add_source(File::from(file).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        let storage_dir = match raw.storage_dir {
            Some(dir) => dir,
            None => default_storage_dir().ok_or(ConfigError::NoStorageDir)?,
        };

        Ok(Self {
            api_url: parse_api_url(&raw.api_url)?,
            timeout_secs: raw.timeout_secs,
            user_agent: raw.user_agent,
            storage_dir,
        })
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_user_agent() -> String {
    format!("lernen/{}", env!("CARGO_PKG_VERSION"))
}

/// Platform data directory, e.g. `~/.local/share/lernen`.
fn default_storage_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("lernen"))
}

fn parse_api_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason,
    };
    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ClientConfig::build(
            &dir.path().join("missing.toml"),
            environment(&[("LERNEN_STORAGE_DIR", "/tmp/lernen")]),
        )
        .unwrap();

        assert_eq!(config.api_url.as_str(), "http://localhost:8000/api");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.user_agent.starts_with("lernen/"));
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/lernen"));
    }

    #[test]
    fn test_file_then_environment() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("lernen.toml");
        std::fs::write(
            &file,
            "api_url = \"https://lernen.example.com/api\"\ntimeout_secs = 10\nstorage_dir = \"/srv/lernen\"\n",
        )
        .unwrap();

        let from_file = ClientConfig::build(&file, environment(&[])).unwrap();
        assert_eq!(from_file.api_url.as_str(), "https://lernen.example.com/api");
        assert_eq!(from_file.timeout_secs, 10);

        let overridden = ClientConfig::build(
            &file,
            environment(&[
                ("LERNEN_API_URL", "http://10.0.0.2:8000/api"),
                ("LERNEN_TIMEOUT_SECS", "5"),
            ]),
        )
        .unwrap();
        assert_eq!(overridden.api_url.as_str(), "http://10.0.0.2:8000/api");
        assert_eq!(overridden.timeout_secs, 5);
        assert_eq!(overridden.storage_dir, PathBuf::from("/srv/lernen"));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let dir = TempDir::new().unwrap();
        let result = ClientConfig::build(
            &dir.path().join("missing.toml"),
            environment(&[
                ("LERNEN_API_URL", "localhost:8000"),
                ("LERNEN_STORAGE_DIR", "/tmp/lernen"),
            ]),
        );
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));

        let result = ClientConfig::build(
            &dir.path().join("missing.toml"),
            environment(&[
                ("LERNEN_API_URL", "not a url"),
                ("LERNEN_STORAGE_DIR", "/tmp/lernen"),
            ]),
        );
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn test_config_error_converts_to_application_error() {
        let error: ApplicationError = ConfigError::NoStorageDir.into();
        assert!(matches!(error, ApplicationError::Config(_)));
    }
}
