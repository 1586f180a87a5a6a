//! Viewport playback scheduling
//!
//! - `scheduler`: synchronous state machine, one decode slot per feed
//! - `session`: tokio task serializing inbound events into the scheduler

pub mod scheduler;
pub mod session;

pub use scheduler::PlaybackScheduler;
pub use session::{FeedSession, FeedSessionHandle};

use crate::models::StateChange;

/// Outbound side of the scheduler.
///
/// Called synchronously for every transition, before the event that caused
/// it finishes. Implementations drive the actual media element
/// (load/play/pause/unload).
pub trait StateListener {
    fn on_state_change(&mut self, change: &StateChange);
}

impl<F> StateListener for F
where
    F: FnMut(&StateChange),
{
    fn on_state_change(&mut self, change: &StateChange) {
        self(change)
    }
}

/// Listener that records every transition in order
#[derive(Debug, Default, Clone)]
pub struct StateLog {
    changes: Vec<StateChange>,
}

impl StateLog {
    pub fn changes(&self) -> &[StateChange] {
        &self.changes
    }
}

impl StateListener for StateLog {
    fn on_state_change(&mut self, change: &StateChange) {
        self.changes.push(change.clone());
    }
}
