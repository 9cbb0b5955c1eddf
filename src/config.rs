use anyhow::{bail, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub local: LocalConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Base URL objects are served from, e.g. `https://cdn.example.com/storage/v1/object/public`
    pub public_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalConfig {
    pub db_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    pub path: String,
    /// Rotate after this many MiB
    #[serde(default = "default_log_size")]
    pub size: u64,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

fn default_max_connections() -> u32 {
    5
}

fn default_interval_seconds() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_size() -> u64 {
    10
}

fn default_max_files() -> usize {
    5
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.sync.interval_seconds == 0 {
            bail!("sync.interval_seconds must be at least 1");
        }
        Ok(())
    }
}

pub fn load_config(path: &str) -> Result<Config> {
    let config_text = fs::read_to_string(Path::new(path))?;
    let config: Config = toml::from_str(&config_text)?;
    config.validate()?;
    Ok(config)
}
