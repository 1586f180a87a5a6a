use feed_core::constants::{
    DEFAULT_ACTIVATION_THRESHOLD, DEFAULT_EVENT_QUEUE_CAPACITY, DEFAULT_LOAD_TIMEOUT_MS,
    DEFAULT_UNLOAD_RATIO,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub playback: PlaybackConfig,
    pub replay: ReplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

/// Scheduler tunables (`PLAYBACK_*`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Visible fraction at which an entry may take the decode slot
    #[serde(default = "default_activation_threshold")]
    pub activation_threshold: f64,
    /// Paused entries at or below this fraction are unloaded to idle
    #[serde(default = "default_unload_ratio")]
    pub unload_ratio: f64,
    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,
    /// Keep entries in `Loading` until the media pipeline reports ready
    #[serde(default)]
    pub await_media_ready: bool,
    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            activation_threshold: default_activation_threshold(),
            unload_ratio: default_unload_ratio(),
            load_timeout_ms: default_load_timeout_ms(),
            await_media_ready: false,
            event_queue_capacity: default_event_queue_capacity(),
        }
    }
}

impl PlaybackConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("PLAYBACK_").from_env()
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.activation_threshold > 0.0 && self.activation_threshold <= 1.0) {
            return Err(format!(
                "activation_threshold must be in (0, 1], got {}",
                self.activation_threshold
            ));
        }
        if !(self.unload_ratio >= 0.0 && self.unload_ratio < self.activation_threshold) {
            return Err(format!(
                "unload_ratio must be in [0, activation_threshold), got {}",
                self.unload_ratio
            ));
        }
        if self.load_timeout_ms == 0 {
            return Err("load_timeout_ms must be positive".to_string());
        }
        if self.event_queue_capacity == 0 {
            return Err("event_queue_capacity must be positive".to_string());
        }
        Ok(())
    }
}

/// Replay tool inputs (`FEED_REPLAY_*`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Ranked feed, JSON array of catalog items in viewing order
    pub feed_path: PathBuf,
    /// JSON array of feed events
    pub events_path: PathBuf,
    /// Optional JSON array of like/unlike/repost records
    #[serde(default)]
    pub engagements_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            app: envy::from_env()?,
            playback: PlaybackConfig::from_env()?,
            replay: envy::prefixed("FEED_REPLAY_").from_env()?,
        };
        config.playback.validate()?;
        Ok(config)
    }
}

fn default_service_name() -> String {
    "feed-service".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_activation_threshold() -> f64 {
    DEFAULT_ACTIVATION_THRESHOLD
}

fn default_unload_ratio() -> f64 {
    DEFAULT_UNLOAD_RATIO
}

fn default_load_timeout_ms() -> u64 {
    DEFAULT_LOAD_TIMEOUT_MS
}

fn default_event_queue_capacity() -> usize {
    DEFAULT_EVENT_QUEUE_CAPACITY
}
