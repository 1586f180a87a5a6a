//! Ranking engine: recall, then ordering, then truncation
//!
//! Pure and synchronous. A failed validation aborts the whole call so callers
//! never see a partially ordered page.

use crate::config::RankingConfig;
use crate::models::{BrowseOrder, CatalogPage, CatalogQuery, RankMode, ViewerProfile};
use crate::services::ranking::{RankingError, RankingLayer, Result};
use crate::services::recall::{validate_snapshot, RecallLayer};
use feed_core::CatalogItem;
use tracing::{debug, info};

pub struct RankingEngine {
    recall: RecallLayer,
    ranking: RankingLayer,
    config: RankingConfig,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new(RankingConfig::default())
    }
}

impl RankingEngine {
    pub fn new(config: RankingConfig) -> Self {
        Self {
            recall: RecallLayer::new(config.top_categories),
            ranking: RankingLayer::new(),
            config,
        }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Order a catalog snapshot for one viewer.
    ///
    /// `profile` is only read in [`RankMode::Personalized`]; a missing profile
    /// is treated as a cold-start viewer. `page_size` defaults to the
    /// configured page size and is capped at `max_page_size`.
    pub fn rank(
        &self,
        catalog: &[CatalogItem],
        profile: Option<&ViewerProfile>,
        mode: RankMode,
        page_size: Option<usize>,
    ) -> Result<Vec<CatalogItem>> {
        validate_snapshot(catalog)?;
        let page_size = self.resolve_page_size(page_size)?;

        let (ordered, stats) = match mode {
            RankMode::Trending => {
                let (candidates, stats) = self.recall.recall_public(catalog);
                (self.ranking.rank_trending(candidates), stats)
            }
            RankMode::Latest => {
                let (candidates, stats) = self.recall.recall_public(catalog);
                (self.ranking.rank_latest(candidates), stats)
            }
            RankMode::Personalized => {
                let cold_start = ViewerProfile::cold_start();
                let profile = profile.unwrap_or(&cold_start);
                let (recall, stats) = self.recall.recall_personalized(catalog, profile);
                let ordered = if recall.is_cold_start() {
                    self.ranking.rank_trending(recall.candidates)
                } else {
                    debug!(top_categories = ?recall.top_categories, "Affinity categories selected");
                    self.ranking.rank_by_affinity(recall.candidates, profile)
                };
                (ordered, stats)
            }
        };

        let page: Vec<CatalogItem> = ordered.into_iter().take(page_size).cloned().collect();

        info!(
            mode = %mode,
            snapshot = stats.snapshot_size,
            candidates = stats.total_candidates,
            not_public = stats.not_public,
            watched = stats.watched,
            outside_top_categories = stats.outside_top_categories,
            returned = page.len(),
            "Ranking completed"
        );

        Ok(page)
    }

    /// Category/search listing with page numbers
    pub fn browse(&self, catalog: &[CatalogItem], query: &CatalogQuery) -> Result<CatalogPage> {
        validate_snapshot(catalog)?;

        let limit = query.limit.unwrap_or(self.config.browse_limit);
        if limit == 0 {
            return Err(RankingError::InvalidInput(
                "browse limit must be positive".to_string(),
            ));
        }
        let page = query.page.unwrap_or(1);
        if page == 0 {
            return Err(RankingError::InvalidInput(
                "browse pages start at 1".to_string(),
            ));
        }

        let category = query.category_filter();
        let needle = query.search_needle();

        let (public, _) = self.recall.recall_public(catalog);
        let matching: Vec<&CatalogItem> = public
            .into_iter()
            .filter(|item| category.map_or(true, |c| item.has_category(c)))
            .filter(|item| needle.as_deref().map_or(true, |n| matches_search(item, n)))
            .collect();

        let ordered = match query.order {
            BrowseOrder::Latest => self.ranking.rank_latest(matching),
            BrowseOrder::Popular => self.ranking.rank_trending(matching),
        };

        let total_items = ordered.len();
        let total_pages = total_items.div_ceil(limit);
        let items: Vec<CatalogItem> = ordered
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .cloned()
            .collect();

        debug!(
            category = category.unwrap_or("all"),
            search = needle.as_deref().unwrap_or(""),
            total_items,
            page,
            "Catalog browse completed"
        );

        Ok(CatalogPage {
            items,
            total_items,
            total_pages,
            current_page: page,
        })
    }

    fn resolve_page_size(&self, requested: Option<usize>) -> Result<usize> {
        match requested {
            Some(0) => Err(RankingError::InvalidInput(
                "page size must be positive".to_string(),
            )),
            Some(size) if size > self.config.max_page_size => {
                debug!(
                    requested = size,
                    max = self.config.max_page_size,
                    "Page size capped"
                );
                Ok(self.config.max_page_size)
            }
            Some(size) => Ok(size),
            None => Ok(self.config.default_page_size),
        }
    }
}

fn matches_search(item: &CatalogItem, needle: &str) -> bool {
    item.title.to_lowercase().contains(needle)
        || item
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}
