use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use kuy_dashboard_backend::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// CLI configuration loaded from config.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cli: CliSettings,
    /// Per-kind endpoint overrides, e.g. `blogs = "/api/v2/blogs"`.
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}

/// Dashboard API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// CLI-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliSettings {
    #[serde(default = "default_layout")]
    pub default_layout: String,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            default_layout: default_layout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_layout() -> String {
    "table".to_string()
}

/// Resolved API connection parameters after merging config + CLI flags.
#[derive(Debug, Clone)]
pub struct ApiParams {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

/// Discovery order for config file:
/// 1. `--config <path>` (explicit, also fed by `KUY_DASHBOARD_CONFIG`)
/// 2. `./config.toml` (project-local)
/// 3. `$XDG_CONFIG_HOME/kuy-dashboard/config.toml`
/// 4. `~/.config/kuy-dashboard/config.toml`
pub fn load_config(explicit_path: Option<&Path>) -> Result<CliConfig, CliError> {
    if let Some(path) = explicit_path {
        return load_config_from_path(path);
    }

    let local = PathBuf::from("config.toml");
    if local.exists() {
        return load_config_from_path(&local);
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg).join("kuy-dashboard/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config/kuy-dashboard/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Ok(CliConfig::default())
}

fn load_config_from_path(path: &Path) -> Result<CliConfig, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: CliConfig = toml::from_str(&contents).map_err(|e| CliError::Config {
        message: format!("failed to parse {}: {}", path.display(), e),
    })?;
    config.validate().map_err(|message| CliError::Config {
        message: format!("{}: {message}", path.display()),
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

impl CliConfig {
    fn validate(&self) -> Result<(), String> {
        if !matches!(self.cli.default_layout.as_str(), "table" | "cards") {
            return Err(format!(
                "cli.default_layout must be \"table\" or \"cards\", got \"{}\"",
                self.cli.default_layout
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err("api.timeout_secs must be positive".to_string());
        }
        if let Some((kind, _)) = self.endpoints.iter().find(|(_, p)| !p.starts_with('/')) {
            return Err(format!("endpoints.{kind} must start with '/'"));
        }
        Ok(())
    }

    /// The configured endpoint override for `kind`, if any.
    pub fn endpoint_for(&self, kind: &str) -> Option<&str> {
        self.endpoints.get(kind).map(String::as_str)
    }
}

/// Resolve API connection parameters from config + CLI overrides.
///
/// CLI flags take precedence over config file values.
pub fn resolve_api_params(config: &CliConfig, global: &GlobalOpts) -> ApiParams {
    ApiParams {
        base_url: global
            .api_url
            .clone()
            .unwrap_or_else(|| config.api.base_url.clone()),
        token: global
            .token
            .clone()
            .or_else(|| config.api.token.clone())
            .filter(|t| !t.trim().is_empty()),
        timeout: Duration::from_secs(config.api.timeout_secs),
    }
}
