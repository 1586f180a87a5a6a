// ============================================
// Viewport Playback Scheduler
// ============================================
//
// Finite-state machine over the ranked feed. Exactly one decode slot exists
// per scheduler; the entry holding it is the only one allowed in `Loading`
// or `Playing`. Every event either leaves the slot where it is, or releases
// it from the old holder (notifying the listener) before handing it to the
// new one, so two entries are never `Playing` at once.
//
// Slot ownership rule, applied when a visibility change concerns the slot
// holder, when the updated entry becomes the candidate, or when the slot is
// free:
// - the candidate is the most visible entry at or above the activation
//   threshold (higher ratio wins, equal ratios go to the earlier entry);
// - the candidate only gets the slot if it is a video, is not failed and was
//   not paused by a tap. Otherwise nothing plays.

use super::StateListener;
use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, Result};
use crate::models::{
    ControlOutcome, EntrySnapshot, FeedEntry, FeedEvent, IgnoreReason, LoadTicket, PlaybackState,
    StateChange,
};
use feed_core::{CatalogItem, ItemId};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

pub struct PlaybackScheduler<L> {
    entries: Vec<FeedEntry>,
    index: HashMap<ItemId, usize>,
    /// Entries at or above the activation threshold, in viewing order
    visible: BTreeSet<usize>,
    /// Holder of the decode slot
    active: Option<usize>,
    /// Set while the slot holder waits for the media pipeline
    pending_load: Option<LoadTicket>,
    next_ticket: u64,
    config: PlaybackConfig,
    listener: L,
}

impl<L: StateListener> PlaybackScheduler<L> {
    /// Build a scheduler over a ranked feed. Viewing order is the order of
    /// `items` and is never changed.
    pub fn new(items: Vec<CatalogItem>, config: PlaybackConfig, listener: L) -> Result<Self> {
        config.validate().map_err(PlaybackError::InvalidInput)?;

        let mut index = HashMap::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            if index.insert(item.id.clone(), i).is_some() {
                return Err(PlaybackError::InvalidInput(format!(
                    "duplicate feed entry: {}",
                    item.id
                )));
            }
        }

        Ok(Self {
            entries: items.into_iter().map(FeedEntry::new).collect(),
            index,
            visible: BTreeSet::new(),
            active: None,
            pending_load: None,
            next_ticket: 0,
            config,
            listener,
        })
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn entry(&self, entry_id: &ItemId) -> Option<&FeedEntry> {
        self.index.get(entry_id).map(|&idx| &self.entries[idx])
    }

    pub fn state(&self, entry_id: &ItemId) -> Option<PlaybackState> {
        self.entry(entry_id).map(FeedEntry::playback_state)
    }

    /// Entry currently holding the decode slot
    pub fn active_entry(&self) -> Option<&ItemId> {
        self.active.map(|idx| self.entries[idx].id())
    }

    /// Ticket of the load waiting on the media pipeline, if any
    pub fn pending_load(&self) -> Option<LoadTicket> {
        self.pending_load
    }

    pub fn playing_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.playback_state() == PlaybackState::Playing)
            .count()
    }

    pub fn snapshot(&self) -> Vec<EntrySnapshot> {
        self.entries.iter().map(FeedEntry::snapshot).collect()
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Process one event to completion
    pub fn apply(&mut self, event: FeedEvent) -> Result<ControlOutcome> {
        let outcome = match event {
            FeedEvent::Visibility { entry_id, ratio } => self.observe_visibility(&entry_id, ratio),
            FeedEvent::Toggle { entry_id } => self.toggle(&entry_id),
            FeedEvent::MediaReady { entry_id } => self.media_ready(&entry_id),
            FeedEvent::MediaFailed { entry_id, reason } => self.media_failed(&entry_id, &reason),
            FeedEvent::Retry { entry_id } => self.retry(&entry_id),
        };
        debug_assert!(self.playing_count() <= 1);
        outcome
    }

    pub fn observe_visibility(&mut self, entry_id: &ItemId, ratio: f64) -> Result<ControlOutcome> {
        if ratio.is_nan() {
            return Err(PlaybackError::InvalidInput(format!(
                "visibility ratio for {} is NaN",
                entry_id
            )));
        }
        let ratio = ratio.clamp(0.0, 1.0);
        let idx = self.lookup(entry_id)?;
        let threshold = self.config.activation_threshold;

        let was_visible = self.entries[idx].visibility_ratio() >= threshold;
        let now_visible = ratio >= threshold;
        self.entries[idx].set_visibility_ratio(ratio);

        if now_visible {
            self.visible.insert(idx);
        } else {
            self.visible.remove(&idx);
            self.entries[idx].manually_paused = false;
        }

        if !self.entries[idx].item().is_playable() {
            self.contend(idx);
            return Ok(ControlOutcome::Applied);
        }

        // Re-entering the viewport is an implicit retry.
        if now_visible && !was_visible && self.entries[idx].playback_state() == PlaybackState::Failed
        {
            self.transition(idx, PlaybackState::Idle, None);
        }

        self.contend(idx);

        if self.entries[idx].playback_state() == PlaybackState::Paused
            && ratio <= self.config.unload_ratio
        {
            self.transition(idx, PlaybackState::Idle, None);
        }

        Ok(ControlOutcome::Applied)
    }

    /// Invert `Playing`/`Paused` for the most visible entry
    pub fn toggle(&mut self, entry_id: &ItemId) -> Result<ControlOutcome> {
        let idx = self.lookup(entry_id)?;

        if !self.entries[idx].item().is_playable() {
            return Ok(ControlOutcome::ignored(IgnoreReason::NotPlayable));
        }
        if self.most_visible() != Some(idx) {
            debug!(entry_id = %entry_id, "Toggle ignored, entry is not the most visible");
            return Ok(ControlOutcome::ignored(IgnoreReason::NotMostVisible));
        }

        match self.entries[idx].playback_state() {
            PlaybackState::Playing => {
                self.entries[idx].manually_paused = true;
                self.release(idx);
                Ok(ControlOutcome::Paused)
            }
            PlaybackState::Paused => {
                self.entries[idx].manually_paused = false;
                if let Some(current) = self.active {
                    self.release(current);
                }
                self.start(idx);
                Ok(ControlOutcome::Resumed)
            }
            state => Ok(ControlOutcome::ignored(IgnoreReason::NotApplicable(state))),
        }
    }

    pub fn media_ready(&mut self, entry_id: &ItemId) -> Result<ControlOutcome> {
        let idx = self.lookup(entry_id)?;
        let state = self.entries[idx].playback_state();

        if self.active == Some(idx) && state == PlaybackState::Loading {
            self.pending_load = None;
            self.transition(idx, PlaybackState::Playing, None);
            return Ok(ControlOutcome::Applied);
        }

        debug!(entry_id = %entry_id, state = %state, "Stale media-ready signal dropped");
        Ok(ControlOutcome::ignored(IgnoreReason::NotApplicable(state)))
    }

    pub fn media_failed(&mut self, entry_id: &ItemId, reason: &str) -> Result<ControlOutcome> {
        let idx = self.lookup(entry_id)?;
        let state = self.entries[idx].playback_state();

        if !state.holds_slot() {
            debug!(entry_id = %entry_id, state = %state, "Media failure for inactive entry dropped");
            return Ok(ControlOutcome::ignored(IgnoreReason::NotApplicable(state)));
        }

        self.fail(idx, reason.to_string());
        self.rebalance();
        Ok(ControlOutcome::Applied)
    }

    /// Reset a failed entry; it takes the slot again if it is the most visible
    pub fn retry(&mut self, entry_id: &ItemId) -> Result<ControlOutcome> {
        let idx = self.lookup(entry_id)?;
        let state = self.entries[idx].playback_state();
        if state != PlaybackState::Failed {
            return Ok(ControlOutcome::ignored(IgnoreReason::NotApplicable(state)));
        }

        self.transition(idx, PlaybackState::Idle, None);
        self.contend(idx);
        Ok(ControlOutcome::Retried)
    }

    /// Fail the pending load if `ticket` is still the one waiting.
    /// Returns whether anything changed.
    pub fn expire_load(&mut self, ticket: LoadTicket) -> bool {
        if self.pending_load != Some(ticket) {
            return false;
        }
        let Some(idx) = self.active else {
            self.pending_load = None;
            return false;
        };

        let reason = format!("load timed out after {} ms", self.config.load_timeout_ms);
        self.fail(idx, reason);
        self.rebalance();
        true
    }

    /// Release the slot and move every entry back to `Idle`
    pub fn teardown(&mut self) {
        if let Some(idx) = self.active {
            self.release(idx);
        }
        for idx in 0..self.entries.len() {
            if self.entries[idx].playback_state() != PlaybackState::Idle {
                self.transition(idx, PlaybackState::Idle, None);
            }
            self.entries[idx].manually_paused = false;
        }
        self.visible.clear();
    }

    fn lookup(&self, entry_id: &ItemId) -> Result<usize> {
        self.index
            .get(entry_id)
            .copied()
            .ok_or_else(|| PlaybackError::UnknownEntry(entry_id.clone()))
    }

    /// Highest ratio among entries on screen, earliest entry on ties
    fn most_visible(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (idx, entry) in self.entries.iter().enumerate() {
            if entry.visibility_ratio() <= 0.0 {
                continue;
            }
            match best {
                Some(b) if self.entries[b].visibility_ratio() >= entry.visibility_ratio() => {}
                _ => best = Some(idx),
            }
        }
        best
    }

    /// Same as `most_visible`, restricted to entries past the threshold
    fn slot_candidate(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for &idx in &self.visible {
            match best {
                Some(b)
                    if self.entries[b].visibility_ratio()
                        >= self.entries[idx].visibility_ratio() => {}
                _ => best = Some(idx),
            }
        }
        best
    }

    fn can_take_slot(&self, idx: usize) -> bool {
        let entry = &self.entries[idx];
        entry.item().is_playable()
            && !entry.manually_paused
            && entry.playback_state() != PlaybackState::Failed
    }

    /// Re-evaluate the slot after a change to `idx`. The current holder is
    /// only released by its own update or by `idx` becoming the candidate.
    fn contend(&mut self, idx: usize) {
        let may_release = match self.active {
            None => true,
            Some(current) => current == idx || self.slot_candidate() == Some(idx),
        };
        if may_release {
            self.rebalance();
        } else {
            debug!(entry_id = %self.entries[idx].id(), "Update leaves the slot holder alone");
        }
    }

    fn rebalance(&mut self) {
        let target = self.slot_candidate().filter(|&idx| self.can_take_slot(idx));
        if target == self.active {
            return;
        }
        if let Some(current) = self.active {
            self.release(current);
        }
        if let Some(idx) = target {
            self.start(idx);
        }
    }

    fn start(&mut self, idx: usize) {
        debug_assert!(self.active.is_none());
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;

        self.active = Some(idx);
        self.transition(idx, PlaybackState::Loading, None);
        if self.config.await_media_ready {
            self.pending_load = Some(ticket);
        } else {
            self.transition(idx, PlaybackState::Playing, None);
        }
    }

    fn release(&mut self, idx: usize) {
        match self.entries[idx].playback_state() {
            PlaybackState::Playing => self.transition(idx, PlaybackState::Paused, None),
            PlaybackState::Loading => {
                // Cancelled before it ever played.
                self.pending_load = None;
                self.transition(idx, PlaybackState::Idle, None);
            }
            _ => {}
        }
        if self.active == Some(idx) {
            self.active = None;
        }
    }

    fn fail(&mut self, idx: usize, reason: String) {
        warn!(entry_id = %self.entries[idx].id(), reason = %reason, "Playback failed");
        if self.active == Some(idx) {
            self.active = None;
            self.pending_load = None;
        }
        self.transition(idx, PlaybackState::Failed, Some(reason));
    }

    fn transition(&mut self, idx: usize, state: PlaybackState, reason: Option<String>) {
        let entry = &mut self.entries[idx];
        let from = entry.playback_state();
        entry.set_playback_state(state);

        debug!(entry_id = %entry.id(), from = %from, to = %state, "Playback transition");

        let change = StateChange {
            entry_id: entry.id().clone(),
            state,
            reason,
        };
        self.listener.on_state_change(&change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::playback::StateLog;
    use chrono::Utc;
    use feed_core::MediaKind;

    fn feed(ids: &[&str]) -> Vec<CatalogItem> {
        ids.iter()
            .map(|id| CatalogItem::new(*id, "channel", Utc::now(), format!("https://cdn/{id}.mp4")))
            .collect()
    }

    fn scheduler(ids: &[&str]) -> PlaybackScheduler<StateLog> {
        PlaybackScheduler::new(feed(ids), PlaybackConfig::default(), StateLog::default()).unwrap()
    }

    fn id(s: &str) -> ItemId {
        ItemId::from(s)
    }

    fn changes(s: &PlaybackScheduler<StateLog>) -> Vec<(String, PlaybackState)> {
        s.listener()
            .changes()
            .iter()
            .map(|c| (c.entry_id.to_string(), c.state))
            .collect()
    }

    #[test]
    fn test_rejects_duplicate_entries() {
        let result =
            PlaybackScheduler::new(feed(&["a", "a"]), PlaybackConfig::default(), StateLog::default());
        assert!(matches!(result, Err(PlaybackError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_entry_and_nan_ratio() {
        let mut s = scheduler(&["a"]);
        assert_eq!(
            s.observe_visibility(&id("zzz"), 0.9),
            Err(PlaybackError::UnknownEntry(id("zzz")))
        );
        assert!(matches!(
            s.observe_visibility(&id("a"), f64::NAN),
            Err(PlaybackError::InvalidInput(_))
        ));
        assert!(s.listener().changes().is_empty());
    }

    #[test]
    fn test_pause_happens_before_next_load() {
        let mut s = scheduler(&["a", "b"]);
        s.observe_visibility(&id("a"), 0.8).unwrap();
        s.observe_visibility(&id("b"), 0.9).unwrap();

        assert_eq!(
            changes(&s),
            vec![
                ("a".to_string(), PlaybackState::Loading),
                ("a".to_string(), PlaybackState::Playing),
                ("a".to_string(), PlaybackState::Paused),
                ("b".to_string(), PlaybackState::Loading),
                ("b".to_string(), PlaybackState::Playing),
            ]
        );
        assert_eq!(s.active_entry(), Some(&id("b")));
    }

    #[test]
    fn test_less_visible_entry_does_not_steal_slot() {
        let mut s = scheduler(&["a", "b"]);
        s.observe_visibility(&id("a"), 0.9).unwrap();
        s.observe_visibility(&id("b"), 0.7).unwrap();

        assert_eq!(s.state(&id("a")), Some(PlaybackState::Playing));
        assert_eq!(s.state(&id("b")), Some(PlaybackState::Idle));

        // Once a scrolls away, b is the most visible and takes over.
        s.observe_visibility(&id("a"), 0.2).unwrap();
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Paused));
        assert_eq!(s.state(&id("b")), Some(PlaybackState::Playing));
    }

    #[test]
    fn test_exact_tie_goes_to_earlier_entry() {
        let mut s = scheduler(&["a", "b"]);
        s.observe_visibility(&id("b"), 0.7).unwrap();
        assert_eq!(s.state(&id("b")), Some(PlaybackState::Playing));

        s.observe_visibility(&id("a"), 0.7).unwrap();
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Playing));
        assert_eq!(s.state(&id("b")), Some(PlaybackState::Paused));
    }

    #[test]
    fn test_scrolled_away_pauses_then_unloads() {
        let mut s = scheduler(&["a"]);
        s.observe_visibility(&id("a"), 0.8).unwrap();
        s.observe_visibility(&id("a"), 0.3).unwrap();
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Paused));
        assert_eq!(s.active_entry(), None);

        s.observe_visibility(&id("a"), 0.0).unwrap();
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Idle));
    }

    #[test]
    fn test_loading_cancelled_when_scrolled_away() {
        let config = PlaybackConfig {
            await_media_ready: true,
            ..Default::default()
        };
        let mut s = PlaybackScheduler::new(feed(&["a"]), config, StateLog::default()).unwrap();

        s.observe_visibility(&id("a"), 0.9).unwrap();
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Loading));
        assert!(s.pending_load().is_some());

        s.observe_visibility(&id("a"), 0.1).unwrap();
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Idle));
        assert!(s.pending_load().is_none());
        assert!(!changes(&s)
            .iter()
            .any(|(_, state)| *state == PlaybackState::Playing));
    }

    #[test]
    fn test_media_ready_completes_load() {
        let config = PlaybackConfig {
            await_media_ready: true,
            ..Default::default()
        };
        let mut s = PlaybackScheduler::new(feed(&["a", "b"]), config, StateLog::default()).unwrap();

        s.observe_visibility(&id("a"), 0.9).unwrap();
        assert_eq!(
            s.media_ready(&id("b")).unwrap(),
            ControlOutcome::ignored(IgnoreReason::NotApplicable(PlaybackState::Idle))
        );
        assert_eq!(s.media_ready(&id("a")).unwrap(), ControlOutcome::Applied);
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Playing));
        assert!(s.pending_load().is_none());
    }

    #[test]
    fn test_expire_load_fails_only_current_ticket() {
        let config = PlaybackConfig {
            await_media_ready: true,
            ..Default::default()
        };
        let mut s = PlaybackScheduler::new(feed(&["a", "b"]), config, StateLog::default()).unwrap();

        s.observe_visibility(&id("a"), 0.9).unwrap();
        let first = s.pending_load().unwrap();
        s.observe_visibility(&id("a"), 0.1).unwrap();
        s.observe_visibility(&id("b"), 0.9).unwrap();

        assert!(!s.expire_load(first));
        assert_eq!(s.state(&id("b")), Some(PlaybackState::Loading));

        let second = s.pending_load().unwrap();
        assert!(s.expire_load(second));
        assert_eq!(s.state(&id("b")), Some(PlaybackState::Failed));
        assert_eq!(s.active_entry(), None);

        let last = s.listener().changes().last().unwrap();
        assert_eq!(last.reason.as_deref(), Some("load timed out after 5000 ms"));
    }

    #[test]
    fn test_failed_entry_retries_on_reentry() {
        let mut s = scheduler(&["a"]);
        s.observe_visibility(&id("a"), 0.9).unwrap();
        s.media_failed(&id("a"), "decoder error").unwrap();
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Failed));

        // Still on screen: no automatic retry loop.
        s.observe_visibility(&id("a"), 0.95).unwrap();
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Failed));

        s.observe_visibility(&id("a"), 0.2).unwrap();
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Failed));
        s.observe_visibility(&id("a"), 0.9).unwrap();
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Playing));
    }

    #[test]
    fn test_retry_restarts_visible_failed_entry() {
        let mut s = scheduler(&["a", "b"]);
        s.observe_visibility(&id("a"), 0.9).unwrap();
        s.media_failed(&id("a"), "404").unwrap();

        assert_eq!(
            s.retry(&id("b")).unwrap(),
            ControlOutcome::ignored(IgnoreReason::NotApplicable(PlaybackState::Idle))
        );
        assert_eq!(s.retry(&id("a")).unwrap(), ControlOutcome::Retried);
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Playing));
    }

    #[test]
    fn test_toggle_only_affects_most_visible_entry() {
        let mut s = scheduler(&["a", "b"]);
        s.observe_visibility(&id("a"), 0.9).unwrap();
        s.observe_visibility(&id("b"), 0.1).unwrap();

        assert_eq!(
            s.toggle(&id("b")).unwrap(),
            ControlOutcome::ignored(IgnoreReason::NotMostVisible)
        );
        assert_eq!(s.toggle(&id("a")).unwrap(), ControlOutcome::Paused);
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Paused));
        assert_eq!(s.toggle(&id("a")).unwrap(), ControlOutcome::Resumed);
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Playing));
    }

    #[test]
    fn test_manual_pause_is_sticky_until_entry_leaves() {
        let mut s = scheduler(&["a", "b"]);
        s.observe_visibility(&id("a"), 0.9).unwrap();
        s.toggle(&id("a")).unwrap();
        assert!(s.entry(&id("a")).unwrap().is_manually_paused());

        s.observe_visibility(&id("a"), 0.95).unwrap();
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Paused));

        s.observe_visibility(&id("a"), 0.3).unwrap();
        assert!(!s.entry(&id("a")).unwrap().is_manually_paused());
        s.observe_visibility(&id("a"), 0.9).unwrap();
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Playing));
    }

    #[test]
    fn test_unrelated_update_below_threshold_keeps_holder_playing() {
        let mut s = scheduler(&["a", "b", "c"]);
        s.observe_visibility(&id("a"), 0.9).unwrap();
        s.observe_visibility(&id("a"), 0.5).unwrap();
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Paused));

        // Tap resume below the threshold.
        assert_eq!(s.toggle(&id("a")).unwrap(), ControlOutcome::Resumed);
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Playing));

        let before = s.listener().changes().len();
        s.observe_visibility(&id("c"), 0.0).unwrap();
        s.observe_visibility(&id("b"), 0.3).unwrap();
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Playing));
        assert_eq!(s.listener().changes().len(), before);

        // A neighbour reaching the threshold still takes over.
        s.observe_visibility(&id("b"), 0.7).unwrap();
        assert_eq!(s.state(&id("a")), Some(PlaybackState::Paused));
        assert_eq!(s.state(&id("b")), Some(PlaybackState::Playing));
    }

    #[test]
    fn test_closure_listener_sees_every_transition() {
        let mut seen = Vec::new();
        {
            let mut s = PlaybackScheduler::new(
                feed(&["a"]),
                PlaybackConfig::default(),
                |change: &StateChange| seen.push(change.state),
            )
            .unwrap();
            s.observe_visibility(&id("a"), 1.0).unwrap();
            s.teardown();
        }
        assert_eq!(
            seen,
            vec![
                PlaybackState::Loading,
                PlaybackState::Playing,
                PlaybackState::Paused,
                PlaybackState::Idle,
            ]
        );
    }

    #[test]
    fn test_images_never_play() {
        let mut items = feed(&["img", "vid"]);
        items[0].media_kind = MediaKind::Image;
        let mut s = PlaybackScheduler::new(items, PlaybackConfig::default(), StateLog::default())
            .unwrap();

        s.observe_visibility(&id("img"), 1.0).unwrap();
        assert_eq!(s.state(&id("img")), Some(PlaybackState::Idle));
        assert_eq!(
            s.toggle(&id("img")).unwrap(),
            ControlOutcome::ignored(IgnoreReason::NotPlayable)
        );
        assert!(s.listener().changes().is_empty());

        s.observe_visibility(&id("img"), 0.0).unwrap();
        s.observe_visibility(&id("vid"), 1.0).unwrap();
        assert_eq!(s.state(&id("vid")), Some(PlaybackState::Playing));
    }

    #[test]
    fn test_teardown_releases_everything() {
        let mut s = scheduler(&["a", "b", "c"]);
        s.observe_visibility(&id("a"), 0.9).unwrap();
        s.observe_visibility(&id("b"), 0.95).unwrap();
        s.observe_visibility(&id("c"), 0.99).unwrap();
        s.media_failed(&id("c"), "boom").unwrap();

        s.teardown();

        assert!(s
            .entries()
            .iter()
            .all(|e| e.playback_state() == PlaybackState::Idle));
        assert_eq!(s.active_entry(), None);
    }
}
