//! Like and repost bookkeeping for a feed session
//!
//! Persistence belongs to the relational store; this ledger only keeps the
//! per-viewer relations so that repeated taps are idempotent and a repost of
//! an already reposted item is reported instead of treated as a failure.

use crate::models::ItemId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementAction {
    Like,
    Unlike,
    Repost,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engagement {
    pub item_id: ItemId,
    pub viewer_id: String,
    pub action: EngagementAction,
    pub at: DateTime<Utc>,
}

/// Result of applying one engagement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementOutcome {
    Liked,
    Unliked,
    /// Like or unlike that did not change anything
    Unchanged,
    Reposted,
    /// The viewer already reposted this item
    AlreadyReposted,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngagementError {
    #[error("Anonymous viewers cannot engage with {0}")]
    AnonymousViewer(ItemId),
}

/// In-memory like/repost relations keyed by (item, viewer)
#[derive(Debug, Default)]
pub struct EngagementLedger {
    likes: HashMap<ItemId, HashSet<String>>,
    reposts: HashSet<(ItemId, String)>,
}

impl EngagementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, engagement: &Engagement) -> Result<EngagementOutcome, EngagementError> {
        if engagement.viewer_id.trim().is_empty() {
            return Err(EngagementError::AnonymousViewer(engagement.item_id.clone()));
        }

        let outcome = match engagement.action {
            EngagementAction::Like => {
                let inserted = self
                    .likes
                    .entry(engagement.item_id.clone())
                    .or_default()
                    .insert(engagement.viewer_id.clone());
                if inserted {
                    EngagementOutcome::Liked
                } else {
                    EngagementOutcome::Unchanged
                }
            }
            EngagementAction::Unlike => {
                let removed = self
                    .likes
                    .get_mut(&engagement.item_id)
                    .map(|viewers| viewers.remove(&engagement.viewer_id))
                    .unwrap_or(false);
                if removed {
                    EngagementOutcome::Unliked
                } else {
                    EngagementOutcome::Unchanged
                }
            }
            EngagementAction::Repost => {
                let key = (engagement.item_id.clone(), engagement.viewer_id.clone());
                if self.reposts.insert(key) {
                    EngagementOutcome::Reposted
                } else {
                    EngagementOutcome::AlreadyReposted
                }
            }
        };

        Ok(outcome)
    }

    pub fn is_liked_by(&self, item_id: &ItemId, viewer_id: &str) -> bool {
        self.likes
            .get(item_id)
            .is_some_and(|viewers| viewers.contains(viewer_id))
    }

    /// Likes recorded in this session, on top of the stored `like_count`
    pub fn session_likes(&self, item_id: &ItemId) -> u64 {
        self.likes.get(item_id).map_or(0, |viewers| viewers.len() as u64)
    }

    pub fn has_reposted(&self, item_id: &ItemId, viewer_id: &str) -> bool {
        self.reposts
            .contains(&(item_id.clone(), viewer_id.to_string()))
    }
}
