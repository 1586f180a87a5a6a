use crate::models::RankMode;
use feed_core::constants::{
    DEFAULT_BROWSE_LIMIT, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, TOP_AFFINITY_CATEGORIES,
};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub ranking: RankingConfig,
    pub job: JobConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

/// Tunables of the ranking engine (`RANKING_*`)
#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    #[serde(default = "default_top_categories")]
    pub top_categories: usize,
    #[serde(default = "default_browse_limit")]
    pub browse_limit: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            top_categories: default_top_categories(),
            browse_limit: default_browse_limit(),
        }
    }
}

/// Snapshot ranking job inputs (`RANK_JOB_*`)
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub catalog_path: PathBuf,
    /// JSON array of the catalog items the viewer has watched
    #[serde(default)]
    pub history_path: Option<PathBuf>,
    #[serde(default)]
    pub mode: RankMode,
    #[serde(default)]
    pub page_size: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Config {
            service: envy::from_env()?,
            ranking: RankingConfig::from_env()?,
            job: envy::prefixed("RANK_JOB_").from_env()?,
        };
        config.ranking.validate()?;
        Ok(config)
    }
}

impl RankingConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("RANKING_").from_env()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 || self.max_page_size == 0 || self.browse_limit == 0 {
            return Err(ConfigError::Invalid(
                "page sizes must be positive".to_string(),
            ));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "RANKING_DEFAULT_PAGE_SIZE ({}) exceeds RANKING_MAX_PAGE_SIZE ({})",
                self.default_page_size, self.max_page_size
            )));
        }
        if self.top_categories == 0 {
            return Err(ConfigError::Invalid(
                "RANKING_TOP_CATEGORIES must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_service_name() -> String {
    "ranking-service".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> usize {
    MAX_PAGE_SIZE
}

fn default_top_categories() -> usize {
    TOP_AFFINITY_CATEGORIES
}

fn default_browse_limit() -> usize {
    DEFAULT_BROWSE_LIMIT
}
