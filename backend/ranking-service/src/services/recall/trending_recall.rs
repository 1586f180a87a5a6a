use super::RecallStats;
use feed_core::CatalogItem;

/// Trending Recall Strategy - 熱門召回
/// 只保留 live / published 的內容
pub struct TrendingRecallStrategy;

impl TrendingRecallStrategy {
    pub fn recall<'a>(&self, catalog: &'a [CatalogItem]) -> (Vec<&'a CatalogItem>, RecallStats) {
        let candidates: Vec<&CatalogItem> = catalog
            .iter()
            .filter(|item| item.status.is_public())
            .collect();

        let stats = RecallStats {
            snapshot_size: catalog.len(),
            not_public: catalog.len() - candidates.len(),
            total_candidates: candidates.len(),
            ..Default::default()
        };

        (candidates, stats)
    }
}
