//! Configuration management for authsession

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::session::RefreshPolicy;

/// Default Authentication API base URL (gateway-routed v1 API)
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Authentication API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Session file location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_file: Option<String>,

    /// Seconds between periodic credential checks
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    /// What happens to the refresh token when a renewal response omits one
    #[serde(default)]
    pub refresh_policy: RefreshPolicy,

    /// HTTP request timeout; transport default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_check_interval() -> u64 {
    5 * 60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            session_file: None,
            check_interval_secs: default_check_interval(),
            refresh_policy: RefreshPolicy::default(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Get the default config file path (~/.authsession/config.yaml)
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHome)?;
        Ok(home.join(".authsession").join("config.yaml"))
    }

    /// Resolve an optional override to a concrete config path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an optional path, falling back to defaults
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path.
    ///
    /// A missing file is not an error: every setting has a default.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to an optional path (default location when `None`)
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // Set file permissions to 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Reject settings the session core cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.check_interval_secs == 0 {
            return Err(
                ConfigError::Invalid("check_interval_secs must be greater than zero".into()).into(),
            );
        }
        if let Some(url) = &self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "api_url must start with http:// or https://, got {}",
                    url
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Effective API base URL, without a trailing slash
    pub fn api_url(&self) -> String {
        self.api_url
            .as_deref()
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Period between credential checks
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    /// Optional HTTP request timeout
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Effective session file path (<data dir>/authsession/session.json by default)
    pub fn session_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.session_file {
            return Ok(PathBuf::from(path));
        }
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(ConfigError::NoHome)?;
        Ok(data_dir.join("authsession").join("session.json"))
    }
}
