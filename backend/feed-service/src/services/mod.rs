//! Service layer for feed-service
//!
//! - playback: viewport playback scheduler and feed sessions

pub mod playback;

pub use playback::{FeedSession, FeedSessionHandle, PlaybackScheduler, StateListener, StateLog};
