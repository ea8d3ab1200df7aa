use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::errors::{AppError, AppResult};

pub mod defaults;
pub mod duration_serde;

use defaults::*;

/// Where and how corpus snapshots are persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the platform application data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Sub-directory holding cache entries
    #[serde(default = "default_cache_dir_name")]
    pub cache_dir_name: String,
    /// File name prefix; the capture timestamp follows it
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Entries older than this are treated as absent and deleted
    #[serde(default = "default_freshness", with = "duration_serde::duration")]
    pub freshness: Duration,
    /// Number of newest entries kept after each write
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// When false the library runs memory-only
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
}

/// Remote corpus source and bundled supplementary dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_scryfall_api")]
    pub scryfall_api: String,
    /// Bulk-data variant tag selected from the index
    #[serde(default = "default_bulk_data_type")]
    pub bulk_data_type: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_connect_timeout", with = "duration_serde::duration")]
    pub connect_timeout: Duration,
    /// Replaces the embedded supplementary dataset when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplementary_path: Option<PathBuf>,
}

/// Synergy collaborator endpoint and its in-memory cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynergyConfig {
    #[serde(default = "default_synergy_base_url")]
    pub base_url: String,
    #[serde(default = "default_synergy_cache_ttl", with = "duration_serde::duration")]
    pub cache_ttl: Duration,
    #[serde(default = "default_synergy_cache_capacity")]
    pub cache_capacity: usize,
}

/// Search limits and the legality format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,
    #[serde(default = "default_partner_scan_limit")]
    pub partner_scan_limit: usize,
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub synergy: SynergyConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

fn default_cache_dir_name() -> String {
    DEFAULT_CACHE_DIR_NAME.to_string()
}

fn default_file_prefix() -> String {
    DEFAULT_CACHE_FILE_PREFIX.to_string()
}

fn default_freshness() -> Duration {
    duration_serde::parse(DEFAULT_CACHE_FRESHNESS).unwrap_or(Duration::from_secs(24 * 60 * 60))
}

fn default_max_entries() -> usize {
    DEFAULT_CACHE_MAX_ENTRIES
}

fn default_cache_enabled() -> bool {
    DEFAULT_CACHE_ENABLED
}

fn default_scryfall_api() -> String {
    DEFAULT_SCRYFALL_API.to_string()
}

fn default_bulk_data_type() -> String {
    DEFAULT_BULK_DATA_TYPE.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_connect_timeout() -> Duration {
    duration_serde::parse(DEFAULT_CONNECT_TIMEOUT).unwrap_or(Duration::from_secs(10))
}

fn default_synergy_base_url() -> String {
    DEFAULT_SYNERGY_BASE_URL.to_string()
}

fn default_synergy_cache_ttl() -> Duration {
    duration_serde::parse(DEFAULT_SYNERGY_CACHE_TTL).unwrap_or(Duration::from_secs(60 * 60))
}

fn default_synergy_cache_capacity() -> usize {
    DEFAULT_SYNERGY_CACHE_CAPACITY
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_partner_scan_limit() -> usize {
    DEFAULT_PARTNER_SCAN_LIMIT
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            cache_dir_name: default_cache_dir_name(),
            file_prefix: default_file_prefix(),
            freshness: default_freshness(),
            max_entries: default_max_entries(),
            enabled: default_cache_enabled(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            scryfall_api: default_scryfall_api(),
            bulk_data_type: default_bulk_data_type(),
            user_agent: default_user_agent(),
            connect_timeout: default_connect_timeout(),
            supplementary_path: None,
        }
    }
}

impl Default for SynergyConfig {
    fn default() -> Self {
        Self {
            base_url: default_synergy_base_url(),
            cache_ttl: default_synergy_cache_ttl(),
            cache_capacity: default_synergy_cache_capacity(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
            partner_scan_limit: default_partner_scan_limit(),
            format: default_format(),
        }
    }
}

impl StorageConfig {
    /// The retention rules the cache store applies.
    pub fn retention_policy(&self) -> host_storage::RetentionPolicy {
        host_storage::RetentionPolicy::new()
            .max_age(self.freshness)
            .keep_latest(self.max_entries)
            .enabled(self.enabled)
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from_file(&config_file)
    }

    pub fn load_from_file<P: AsRef<Path>>(config_file: P) -> AppResult<Self> {
        let config_file = config_file.as_ref();
        if config_file.exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str(&contents).map_err(|e| {
                AppError::configuration(format!("{}: {e}", config_file.display()))
            })
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)
                .map_err(|e| AppError::configuration(e.to_string()))?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file.display());
            Ok(default_config)
        }
    }
}
