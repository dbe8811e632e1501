//! Application configuration
//!
//! A YAML file holding the site under test and an optional log level.
//! Environment variables override the file after it is loaded.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stepframe_core_types::SiteConfig;
use tokio::fs;
use tracing::{info, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_PATHNAME: &str = "/";
pub const LOCAL_CONFIG_PATH: &str = "config/stepframe.yaml";

pub const ENV_BASE_URL: &str = "STEPFRAME_BASE_URL";
pub const ENV_DEFAULT_PATHNAME: &str = "STEPFRAME_DEFAULT_PATHNAME";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_site")]
    pub site: SiteConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

// DEFAULT_BASE_URL is a literal absolute URL; parsing cannot fail.
fn default_site() -> SiteConfig {
    SiteConfig {
        base_url: Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!()),
        default_pathname: DEFAULT_PATHNAME.to_string(),
        origin_url: None,
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site: default_site(),
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Apply overrides looked up by variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_BASE_URL) {
            self.site.base_url = Url::parse(&raw)
                .with_context(|| format!("{ENV_BASE_URL} is not a valid URL: {raw}"))?;
            info!(base_url = %self.site.base_url, "base URL overridden from environment");
        }
        if let Some(pathname) = lookup(ENV_DEFAULT_PATHNAME) {
            info!(pathname = %pathname, "default pathname overridden from environment");
            self.site.default_pathname = pathname;
        }
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }
}

pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
}

/// `--config` path, else `./config/stepframe.yaml` if present, else the user
/// config directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let local = PathBuf::from(LOCAL_CONFIG_PATH);
    if local.exists() {
        return Ok(local);
    }
    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push("stepframe");
    path.push("config.yaml");
    Ok(path)
}

/// Read the config file at `path`, or defaults when there is none.
pub async fn read_config_file(path: &Path) -> Result<AppConfig> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        warn!(path = %path.display(), "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let config =
        serde_yaml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

pub async fn write_config_file(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let serialized = serde_yaml::to_string(config)?;
    fs::write(path, serialized)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Resolve, read and apply environment overrides.
pub async fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let path = resolve_config_path(explicit)?;
    let mut config = read_config_file(&path).await?;
    config.apply_env_overrides()?;
    Ok(LoadedConfig { config, path })
}
