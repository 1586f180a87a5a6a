use feed_core::ItemId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaybackError {
    /// Malformed feed input; the caller has to fix it upstream
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown feed entry: {0}")]
    UnknownEntry(ItemId),

    /// Scoped to one entry; recoverable by retry
    #[error("Playback failed for {entry_id}: {reason}")]
    PlaybackFailed { entry_id: ItemId, reason: String },

    #[error("Feed session closed")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
