use crate::models::ViewerProfile;
use feed_core::CatalogItem;
use std::cmp::Ordering;

/// Ranking Layer - deterministic comparators over catalog items
pub struct RankingLayer;

impl Default for RankingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingLayer {
    pub fn new() -> Self {
        Self
    }

    /// Most viewed first, then most liked, then newest, then id
    pub fn rank_trending<'a>(&self, mut items: Vec<&'a CatalogItem>) -> Vec<&'a CatalogItem> {
        items.sort_by(|a, b| trending_order(a, b));
        items
    }

    /// Highest affinity score first, then most viewed, then id
    pub fn rank_by_affinity<'a>(
        &self,
        items: Vec<&'a CatalogItem>,
        profile: &ViewerProfile,
    ) -> Vec<&'a CatalogItem> {
        let mut scored: Vec<(&CatalogItem, i64)> = items
            .into_iter()
            .map(|item| (item, profile.score(item)))
            .collect();

        scored.sort_by(|(a, score_a), (b, score_b)| {
            score_b
                .cmp(score_a)
                .then_with(|| b.popularity.view_count.cmp(&a.popularity.view_count))
                .then_with(|| a.id.cmp(&b.id))
        });

        scored.into_iter().map(|(item, _)| item).collect()
    }

    /// Newest first, then id
    pub fn rank_latest<'a>(&self, mut items: Vec<&'a CatalogItem>) -> Vec<&'a CatalogItem> {
        items.sort_by(|a, b| latest_order(a, b));
        items
    }
}

pub fn trending_order(a: &CatalogItem, b: &CatalogItem) -> Ordering {
    b.popularity
        .view_count
        .cmp(&a.popularity.view_count)
        .then_with(|| b.popularity.like_count.cmp(&a.popularity.like_count))
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn latest_order(a: &CatalogItem, b: &CatalogItem) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}
