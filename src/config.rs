//! TOML configuration.
//!
//! ```toml
//! [source]
//! url = "https://proyectos.aldeapucela.org/exports/guardados/data.json"
//! # path = "./data/guardados.json"   # takes precedence over url
//! timeout_secs = 30
//!
//! [browse]
//! per_page = 20
//! max_content_length = 400
//! default_sort = "saves-desc"
//!
//! [topics]
//! policy = "all"          # or "filtered"
//! cache_capacity = 1000
//! popular_limit = 20
//! ```

use anyhow::{Context, Result};
use guardados_core::normalize::{TagPolicy, DEFAULT_CACHE_CAPACITY};
use guardados_core::query::SortOrder;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub browse: BrowseConfig,
    #[serde(default)]
    pub topics: TopicsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowseConfig {
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,
    #[serde(default = "default_sort")]
    pub default_sort: String,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            max_content_length: default_max_content_length(),
            default_sort: default_sort(),
        }
    }
}

fn default_per_page() -> usize {
    20
}
fn default_max_content_length() -> usize {
    400
}
fn default_sort() -> String {
    "saves-desc".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct TopicsConfig {
    #[serde(default)]
    pub policy: TagPolicy,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "default_popular_limit")]
    pub popular_limit: usize,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            policy: TagPolicy::default(),
            cache_capacity: default_cache_capacity(),
            popular_limit: default_popular_limit(),
        }
    }
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}
fn default_popular_limit() -> usize {
    20
}

impl Config {
    /// Defaults with no source, for runs driven by `--data` alone.
    pub fn minimal() -> Self {
        Self {
            source: SourceConfig {
                url: None,
                path: None,
                timeout_secs: default_timeout_secs(),
            },
            browse: BrowseConfig::default(),
            topics: TopicsConfig::default(),
        }
    }
}

impl BrowseConfig {
    /// The configured default sort, already validated by [`load_config`].
    pub fn sort_order(&self) -> SortOrder {
        self.default_sort.parse().unwrap_or_default()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate source
    if config.source.url.is_none() && config.source.path.is_none() {
        anyhow::bail!("source.url or source.path must be set");
    }
    if let Some(url) = &config.source.url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("source.url must be an http(s) URL, got '{}'", url);
        }
    }
    if config.source.timeout_secs == 0 {
        anyhow::bail!("source.timeout_secs must be > 0");
    }

    // Validate browse
    if config.browse.per_page == 0 {
        anyhow::bail!("browse.per_page must be >= 1");
    }
    if config.browse.max_content_length == 0 {
        anyhow::bail!("browse.max_content_length must be >= 1");
    }
    config
        .browse
        .default_sort
        .parse::<SortOrder>()
        .with_context(|| "Invalid browse.default_sort")?;

    // Validate topics
    if config.topics.cache_capacity == 0 {
        anyhow::bail!("topics.cache_capacity must be >= 1");
    }

    Ok(config)
}
