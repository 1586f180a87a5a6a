// ============================================
// Event Replay
// ============================================
//
// Drives one feed session with a recorded event stream and collects every
// state change it emits. Used by the `feed-service` binary to reproduce
// playback traces captured from clients. Recorded likes and reposts, when
// given, are applied to an engagement ledger in the same run.
//
// Usage:
//   FEED_REPLAY_FEED_PATH=feed.json \
//   FEED_REPLAY_EVENTS_PATH=events.json \
//   FEED_REPLAY_ENGAGEMENTS_PATH=engagements.json feed-service

use crate::config::{Config, PlaybackConfig};
use crate::models::{ControlOutcome, FeedEvent, StateChange};
use crate::services::FeedSession;
use anyhow::{Context, Result};
use feed_core::{CatalogItem, Engagement, EngagementLedger, EngagementOutcome};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// Outcome of one replayed event
#[derive(Debug, Clone, Serialize)]
pub struct ReplayStep {
    pub event: FeedEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ControlOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of one replayed like/unlike/repost
#[derive(Debug, Clone, Serialize)]
pub struct EngagementStep {
    pub engagement: Engagement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<EngagementOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub session_id: Uuid,
    pub steps: Vec<ReplayStep>,
    pub changes: Vec<StateChange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub engagements: Vec<EngagementStep>,
}

impl ReplayReport {
    pub fn rejected(&self) -> usize {
        self.steps.iter().filter(|s| s.error.is_some()).count()
            + self.engagements.iter().filter(|s| s.error.is_some()).count()
    }
}

/// Replay `events` against a fresh session over `feed`.
///
/// Rejected events (unknown entry, bad ratio) are recorded and skipped; the
/// session keeps running, as it would for a live client.
pub async fn replay_events(
    feed: Vec<CatalogItem>,
    events: Vec<FeedEvent>,
    config: PlaybackConfig,
) -> Result<ReplayReport> {
    let (handle, mut changes_rx) =
        FeedSession::spawn(feed, config).context("Failed to start feed session")?;
    let session_id = handle.session_id();

    let mut steps = Vec::with_capacity(events.len());
    for event in events {
        match handle.send(event.clone()).await {
            Ok(outcome) => steps.push(ReplayStep {
                event,
                outcome: Some(outcome),
                error: None,
            }),
            Err(e) => {
                warn!(session_id = %session_id, entry_id = %event.entry_id(), error = %e, "Event rejected");
                steps.push(ReplayStep {
                    event,
                    outcome: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    handle
        .shutdown()
        .await
        .context("Feed session closed before shutdown")?;

    let mut changes = Vec::new();
    while let Some(change) = changes_rx.recv().await {
        if let Some(failure) = change.failure() {
            warn!(session_id = %session_id, "{}", failure);
        }
        changes.push(change);
    }

    info!(
        session_id = %session_id,
        events = steps.len(),
        changes = changes.len(),
        "Replay finished"
    );

    Ok(ReplayReport {
        session_id,
        steps,
        changes,
        engagements: Vec::new(),
    })
}

/// Apply recorded engagements in order to a fresh ledger
pub fn replay_engagements(engagements: Vec<Engagement>) -> Vec<EngagementStep> {
    let mut ledger = EngagementLedger::new();
    engagements
        .into_iter()
        .map(|engagement| match ledger.apply(&engagement) {
            Ok(outcome) => EngagementStep {
                engagement,
                outcome: Some(outcome),
                error: None,
            },
            Err(e) => {
                warn!(item_id = %engagement.item_id, error = %e, "Engagement rejected");
                EngagementStep {
                    engagement,
                    outcome: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect()
}

pub async fn run_replay(config: Config) -> Result<ReplayReport> {
    let feed: Vec<CatalogItem> = read_json(&config.replay.feed_path).await?;
    let events: Vec<FeedEvent> = read_json(&config.replay.events_path).await?;
    let engagements: Vec<Engagement> = match &config.replay.engagements_path {
        Some(path) => read_json(path).await?,
        None => Vec::new(),
    };

    let mut report = replay_events(feed, events, config.playback).await?;
    report.engagements = replay_engagements(engagements);
    Ok(report)
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, ReplayConfig};
    use crate::models::PlaybackState;
    use chrono::Utc;
    use feed_core::ItemId;

    #[tokio::test]
    async fn test_replay_records_rejected_events() {
        let feed = vec![CatalogItem::new("a", "c", Utc::now(), "https://cdn/a.mp4")];
        let events = vec![
            FeedEvent::Visibility {
                entry_id: ItemId::from("a"),
                ratio: 0.9,
            },
            FeedEvent::Toggle {
                entry_id: ItemId::from("ghost"),
            },
        ];

        let report = replay_events(feed, events, PlaybackConfig::default())
            .await
            .unwrap();

        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.rejected(), 1);
        assert_eq!(report.changes[1].state, PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_run_replay_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let feed_path = dir.path().join("feed.json");
        let events_path = dir.path().join("events.json");

        let feed = vec![CatalogItem::new("a", "c", Utc::now(), "https://cdn/a.mp4")];
        std::fs::write(&feed_path, serde_json::to_string(&feed).unwrap()).unwrap();
        std::fs::write(
            &events_path,
            r#"[{"type":"visibility","entry_id":"a","ratio":1.0},{"type":"toggle","entry_id":"a"}]"#,
        )
        .unwrap();

        let config = Config {
            app: AppConfig {
                service_name: "feed-service".to_string(),
                log_format: "text".to_string(),
            },
            playback: PlaybackConfig::default(),
            replay: ReplayConfig {
                feed_path,
                events_path,
                engagements_path: None,
            },
        };

        let report = run_replay(config).await.unwrap();
        assert_eq!(report.steps[1].outcome, Some(ControlOutcome::Paused));
    }

    #[test]
    fn test_replay_engagements_is_idempotent_per_viewer() {
        let raw = r#"[
            {"item_id":"a","viewer_id":"v1","action":"like","at":"2024-05-01T12:00:00Z"},
            {"item_id":"a","viewer_id":"v1","action":"like","at":"2024-05-01T12:00:01Z"},
            {"item_id":"a","viewer_id":"v1","action":"repost","at":"2024-05-01T12:00:02Z"},
            {"item_id":"a","viewer_id":"v1","action":"repost","at":"2024-05-01T12:00:03Z"},
            {"item_id":"a","viewer_id":"","action":"like","at":"2024-05-01T12:00:04Z"}
        ]"#;
        let engagements: Vec<Engagement> = serde_json::from_str(raw).unwrap();

        let steps = replay_engagements(engagements);

        let outcomes: Vec<Option<EngagementOutcome>> = steps.iter().map(|s| s.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                Some(EngagementOutcome::Liked),
                Some(EngagementOutcome::Unchanged),
                Some(EngagementOutcome::Reposted),
                Some(EngagementOutcome::AlreadyReposted),
                None,
            ]
        );
        assert!(steps[4].error.is_some());
    }

    #[tokio::test]
    async fn test_run_replay_applies_engagement_file() {
        let dir = tempfile::tempdir().unwrap();
        let feed_path = dir.path().join("feed.json");
        let events_path = dir.path().join("events.json");
        let engagements_path = dir.path().join("engagements.json");

        let feed = vec![CatalogItem::new("a", "c", Utc::now(), "https://cdn/a.mp4")];
        std::fs::write(&feed_path, serde_json::to_string(&feed).unwrap()).unwrap();
        std::fs::write(&events_path, "[]").unwrap();
        std::fs::write(
            &engagements_path,
            r#"[{"item_id":"a","viewer_id":"v1","action":"repost","at":"2024-05-01T12:00:00Z"}]"#,
        )
        .unwrap();

        let config = Config {
            app: AppConfig {
                service_name: "feed-service".to_string(),
                log_format: "text".to_string(),
            },
            playback: PlaybackConfig::default(),
            replay: ReplayConfig {
                feed_path,
                events_path,
                engagements_path: Some(engagements_path),
            },
        };

        let report = run_replay(config).await.unwrap();
        assert!(report.changes.is_empty());
        assert_eq!(report.engagements.len(), 1);
        assert_eq!(report.engagements[0].outcome, Some(EngagementOutcome::Reposted));
        assert_eq!(report.rejected(), 0);
    }

    #[tokio::test]
    async fn test_run_replay_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            app: AppConfig {
                service_name: "feed-service".to_string(),
                log_format: "text".to_string(),
            },
            playback: PlaybackConfig::default(),
            replay: ReplayConfig {
                feed_path: dir.path().join("missing.json"),
                events_path: dir.path().join("events.json"),
                engagements_path: None,
            },
        };
        assert!(run_replay(config).await.is_err());
    }
}
