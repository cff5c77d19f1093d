//! Configuration schema, defaults, and layered loading.
//!
//! Precedence: defaults < config file < environment < CLI

use anyhow::{ensure, Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_PORT: u16 = 8000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "peerlink")
        .map(|p| p.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("peerlink.toml"))
}

/// Fully resolved relay configuration after all layers merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Port the HTTP API binds.
    pub port: u16,
    /// Directory uploaded files are staged in before transfer.
    /// Defaults to a namespaced directory under the system temp location.
    pub upload_dir: Option<PathBuf>,
    /// Upper bound on an upload body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_API_PORT,
            upload_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// CLI-level settings that win over every other layer.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub upload_dir: Option<PathBuf>,
}

/// Merge defaults, the TOML file, and `PEERLINK_*` environment variables.
pub fn load_config(config_file: Option<&Path>) -> Result<AppConfig> {
    let path = config_file
        .map(Path::to_path_buf)
        .unwrap_or_else(config_path);

    let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("PEERLINK_"))
        .extract()
        .context("failed to load configuration")?;

    config.validate()?;
    Ok(config)
}

pub fn apply_overrides(mut config: AppConfig, overrides: &ConfigOverrides) -> Result<AppConfig> {
    if let Some(port) = overrides.port {
        config.port = port;
    }
    if let Some(dir) = &overrides.upload_dir {
        config.upload_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.port != 0, "api port must be non-zero");
        ensure!(
            self.max_upload_bytes > 0,
            "max_upload_bytes must be non-zero"
        );
        Ok(())
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("peerlink-uploads"))
    }
}
