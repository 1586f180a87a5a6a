// ============================================
// Rank Snapshot Job
// ============================================
//
// Ranks a catalog snapshot exported from the data store.
//
// Usage:
//   RANK_JOB_CATALOG_PATH=catalog.json \
//   RANK_JOB_HISTORY_PATH=history.json \
//   RANK_JOB_MODE=personalized ranking-service

use crate::config::{Config, JobConfig};
use crate::models::{RankMode, ViewerProfile};
use crate::services::RankingEngine;
use anyhow::{Context, Result};
use feed_core::CatalogItem;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct RankSnapshotOutput {
    pub mode: RankMode,
    pub count: usize,
    pub items: Vec<CatalogItem>,
}

pub struct RankSnapshotJob {
    engine: RankingEngine,
    job: JobConfig,
}

impl RankSnapshotJob {
    pub fn new(engine: RankingEngine, job: JobConfig) -> Self {
        Self { engine, job }
    }

    pub async fn run(&self) -> Result<RankSnapshotOutput> {
        let catalog: Vec<CatalogItem> = read_json(&self.job.catalog_path).await?;

        let profile = match &self.job.history_path {
            Some(path) => {
                let history: Vec<CatalogItem> = read_json(path).await?;
                Some(ViewerProfile::from_history(&history))
            }
            None => None,
        };

        let items = self
            .engine
            .rank(&catalog, profile.as_ref(), self.job.mode, self.job.page_size)
            .context("Failed to rank catalog snapshot")?;

        info!(
            mode = %self.job.mode,
            catalog = catalog.len(),
            returned = items.len(),
            "Rank snapshot job finished"
        );

        Ok(RankSnapshotOutput {
            mode: self.job.mode,
            count: items.len(),
            items,
        })
    }
}

pub async fn run_rank_snapshot_job(config: Config) -> Result<RankSnapshotOutput> {
    let engine = RankingEngine::new(config.ranking);
    RankSnapshotJob::new(engine, config.job).run().await
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
