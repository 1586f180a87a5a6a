pub mod config;
pub mod error;
pub mod models;
pub mod replay;
pub mod services;

pub use config::{Config, PlaybackConfig};
pub use error::{PlaybackError, Result};
pub use models::{
    ControlOutcome, EntrySnapshot, FeedEntry, FeedEvent, IgnoreReason, PlaybackState, StateChange,
};
pub use services::{FeedSession, FeedSessionHandle, PlaybackScheduler, StateListener, StateLog};
