mod personalized_recall;
mod trending_recall;

use crate::models::ViewerProfile;
use crate::services::ranking::{RankingError, Result};
use feed_core::{CatalogItem, ItemId};
use std::collections::HashSet;
use tracing::warn;

pub use personalized_recall::{PersonalizedRecall, PersonalizedRecallStrategy};
pub use trending_recall::TrendingRecallStrategy;

/// Recall 統計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecallStats {
    pub snapshot_size: usize,
    /// Dropped because the item is not live/published
    pub not_public: usize,
    /// Dropped because the viewer already watched it
    pub watched: usize,
    /// Dropped by the top-category filter
    pub outside_top_categories: usize,
    pub total_candidates: usize,
}

/// Recall 層：把 catalog snapshot 過濾成候選集
pub struct RecallLayer {
    trending: TrendingRecallStrategy,
    personalized: PersonalizedRecallStrategy,
}

impl RecallLayer {
    pub fn new(top_categories: usize) -> Self {
        Self {
            trending: TrendingRecallStrategy,
            personalized: PersonalizedRecallStrategy::new(top_categories),
        }
    }

    pub fn recall_public<'a>(
        &self,
        catalog: &'a [CatalogItem],
    ) -> (Vec<&'a CatalogItem>, RecallStats) {
        self.trending.recall(catalog)
    }

    pub fn recall_personalized<'a>(
        &self,
        catalog: &'a [CatalogItem],
        profile: &ViewerProfile,
    ) -> (PersonalizedRecall<'a>, RecallStats) {
        self.personalized.recall(catalog, profile)
    }
}

/// Reject snapshots that cannot be totally ordered
pub fn validate_snapshot(catalog: &[CatalogItem]) -> Result<()> {
    let mut seen: HashSet<&ItemId> = HashSet::with_capacity(catalog.len());
    for item in catalog {
        if !seen.insert(&item.id) {
            warn!(item_id = %item.id, "Duplicate id in catalog snapshot");
            return Err(RankingError::InvalidInput(format!(
                "duplicate item id in catalog snapshot: {}",
                item.id
            )));
        }
    }
    Ok(())
}
