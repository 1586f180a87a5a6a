use crate::error::PlaybackError;
use feed_core::{CatalogItem, ItemId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-entry playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Failed,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Loading => "loading",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Failed => "failed",
        }
    }

    /// Whether the entry holds the decode slot in this state
    pub fn holds_slot(&self) -> bool {
        matches!(self, PlaybackState::Loading | PlaybackState::Playing)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog item plus the playback state owned by the scheduler
#[derive(Debug, Clone)]
pub struct FeedEntry {
    item: CatalogItem,
    visibility_ratio: f64,
    playback_state: PlaybackState,
    /// Paused by a tap; not auto-resumed until the entry leaves the viewport
    pub(crate) manually_paused: bool,
}

impl FeedEntry {
    pub fn new(item: CatalogItem) -> Self {
        Self {
            item,
            visibility_ratio: 0.0,
            playback_state: PlaybackState::Idle,
            manually_paused: false,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.item.id
    }

    pub fn item(&self) -> &CatalogItem {
        &self.item
    }

    pub fn visibility_ratio(&self) -> f64 {
        self.visibility_ratio
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback_state
    }

    pub fn is_manually_paused(&self) -> bool {
        self.manually_paused
    }

    pub(crate) fn set_visibility_ratio(&mut self, ratio: f64) {
        self.visibility_ratio = ratio;
    }

    pub(crate) fn set_playback_state(&mut self, state: PlaybackState) {
        self.playback_state = state;
    }

    pub fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            entry_id: self.item.id.clone(),
            visibility_ratio: self.visibility_ratio,
            state: self.playback_state,
        }
    }
}

/// Read-only view of one entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    pub entry_id: ItemId,
    pub visibility_ratio: f64,
    pub state: PlaybackState,
}

/// Outbound notification: one per transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub entry_id: ItemId,
    pub state: PlaybackState,
    /// Set on transitions to `Failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl StateChange {
    pub fn new(entry_id: ItemId, state: PlaybackState) -> Self {
        Self {
            entry_id,
            state,
            reason: None,
        }
    }

    /// The failure carried by a `Failed` transition, surfaced as an error
    pub fn failure(&self) -> Option<PlaybackError> {
        match self.state {
            PlaybackState::Failed => Some(PlaybackError::PlaybackFailed {
                entry_id: self.entry_id.clone(),
                reason: self
                    .reason
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string()),
            }),
            _ => None,
        }
    }
}

/// Inbound events, processed strictly one at a time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    /// The rendering layer observed a new visible fraction
    Visibility { entry_id: ItemId, ratio: f64 },
    /// User tap
    Toggle { entry_id: ItemId },
    /// Media pipeline finished buffering
    MediaReady { entry_id: ItemId },
    /// Media pipeline could not load or decode the asset
    MediaFailed { entry_id: ItemId, reason: String },
    /// Retry affordance on a failed entry
    Retry { entry_id: ItemId },
}

impl FeedEvent {
    pub fn entry_id(&self) -> &ItemId {
        match self {
            FeedEvent::Visibility { entry_id, .. }
            | FeedEvent::Toggle { entry_id }
            | FeedEvent::MediaReady { entry_id }
            | FeedEvent::MediaFailed { entry_id, .. }
            | FeedEvent::Retry { entry_id } => entry_id,
        }
    }
}

/// Why a control request changed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Another entry is more visible
    NotMostVisible,
    /// Image entries never play
    NotPlayable,
    /// The entry is in a state the request does not apply to
    NotApplicable(PlaybackState),
}

/// Result of processing one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ControlOutcome {
    /// Event applied; transitions, if any, went out as notifications
    Applied,
    /// Toggle resumed the entry
    Resumed,
    /// Toggle paused the entry
    Paused,
    /// Failed entry reset to idle
    Retried,
    /// No-op, not an error
    Ignored { reason: IgnoreReason },
}

impl ControlOutcome {
    pub fn ignored(reason: IgnoreReason) -> Self {
        ControlOutcome::Ignored { reason }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, ControlOutcome::Ignored { .. })
    }
}

/// Identifies one allocation of the decode slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub(crate) u64);
