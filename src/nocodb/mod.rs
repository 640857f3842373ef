//! NocoDB leads table integration.
//!
//! Pulls every row of the leads table/view over the v2 records API, page by
//! page, and hands the raw rows to the normalizer. Follows the same shape as
//! the other third-party syncs: a config struct, a thin HTTP client, and a
//! background poller.

pub mod client;
pub mod pager;
pub mod poller;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://app.nocodb.com";

/// NocoDB connection configuration stored in ~/.leadboard/config.json,
/// overridable from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NocoConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_id: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_secs() -> u64 {
    30
}

impl Default for NocoConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            table_id: None,
            view_id: None,
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

/// Validated connection settings. Only constructed via [`NocoConfig::connection`].
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub base_url: url::Url,
    pub api_token: String,
    pub table_id: String,
    pub view_id: Option<String>,
    pub page_size: usize,
    pub timeout: Duration,
}

impl NocoConfig {
    /// Validate and resolve the settings needed to talk to NocoDB.
    ///
    /// Blank strings count as absent. Nothing here touches the network.
    pub fn connection(&self) -> Result<ConnectionSettings, ConfigError> {
        let api_token = non_blank(self.api_token.as_deref()).ok_or(ConfigError::MissingToken)?;
        let base = non_blank(Some(self.base_url.as_str())).ok_or(ConfigError::MissingBaseUrl)?;
        let table_id = non_blank(self.table_id.as_deref()).ok_or(ConfigError::MissingTableId)?;

        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let mut base_url = url::Url::parse(&base)
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", base, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(format!(
                "{}: unsupported scheme",
                base
            )));
        }
        // Url::join replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(ConnectionSettings {
            base_url,
            api_token,
            table_id,
            view_id: non_blank(self.view_id.as_deref()),
            page_size: self.page_size,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }

    /// Overlay `NOCODB_*` variables from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay `NOCODB_*` values from an arbitrary lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("NOCODB_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("NOCODB_API_TOKEN") {
            self.api_token = Some(v);
        }
        if let Some(v) = lookup("NOCODB_TABLE_ID") {
            self.table_id = Some(v);
        }
        if let Some(v) = lookup("NOCODB_VIEW_ID") {
            self.view_id = Some(v);
        }
        if let Some(v) = lookup("NOCODB_PAGE_SIZE") {
            self.page_size = parse_env_number("NOCODB_PAGE_SIZE", &v)?;
        }
        if let Some(v) = lookup("NOCODB_TIMEOUT_SECS") {
            self.timeout_secs = parse_env_number("NOCODB_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("NOCODB_POLL_INTERVAL_SECS") {
            self.poll_interval_secs = parse_env_number("NOCODB_POLL_INTERVAL_SECS", &v)?;
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_env_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

/// Default config location: ~/.leadboard/config.json
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".leadboard").join("config.json"))
}

/// Read a config file. A missing file yields the defaults.
pub fn load_config_file(path: &Path) -> Result<NocoConfig, ConfigError> {
    if !path.exists() {
        log::debug!("No config file at {}, using defaults", path.display());
        return Ok(NocoConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

    serde_json::from_str(&content)
        .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))
}

/// Defaults, then the config file (explicit path or ~/.leadboard/config.json),
/// then `NOCODB_*` environment variables.
pub fn load_config(path: Option<&Path>) -> Result<NocoConfig, ConfigError> {
    let mut config = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(p) => load_config_file(&p)?,
        None => NocoConfig::default(),
    };
    config.apply_env()?;
    Ok(config)
}
