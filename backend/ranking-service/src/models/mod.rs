use feed_core::{constants::ALL_CATEGORIES, CatalogItem, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Ordering requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMode {
    /// Most viewed first
    #[default]
    Trending,
    /// Genre-affinity recommendation for one viewer
    Personalized,
    /// Newest first
    Latest,
}

impl RankMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankMode::Trending => "trending",
            RankMode::Personalized => "personalized",
            RankMode::Latest => "latest",
        }
    }
}

impl fmt::Display for RankMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trending" => Ok(RankMode::Trending),
            "personalized" => Ok(RankMode::Personalized),
            "latest" => Ok(RankMode::Latest),
            other => Err(format!("unknown rank mode: {}", other)),
        }
    }
}

/// Ranking input derived from one viewer's history
///
/// Rebuilt from history on every request; nothing mutates it afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerProfile {
    pub watched_item_ids: HashSet<ItemId>,
    pub category_affinity: BTreeMap<String, i64>,
}

impl ViewerProfile {
    pub fn new(
        watched_item_ids: impl IntoIterator<Item = ItemId>,
        category_affinity: impl IntoIterator<Item = (String, i64)>,
    ) -> Self {
        Self {
            watched_item_ids: watched_item_ids.into_iter().collect(),
            category_affinity: category_affinity.into_iter().collect(),
        }
    }

    /// Viewer without any history
    pub fn cold_start() -> Self {
        Self::default()
    }

    /// Count category occurrences across the items the viewer has consumed
    pub fn from_history<'a>(history: impl IntoIterator<Item = &'a CatalogItem>) -> Self {
        let mut profile = Self::default();
        for item in history {
            // A rewatch counts once.
            if !profile.watched_item_ids.insert(item.id.clone()) {
                continue;
            }
            for category in &item.categories {
                *profile
                    .category_affinity
                    .entry(category.clone())
                    .or_insert(0) += 1;
            }
        }
        profile
    }

    pub fn is_cold_start(&self) -> bool {
        self.category_affinity.is_empty()
    }

    pub fn has_watched(&self, id: &ItemId) -> bool {
        self.watched_item_ids.contains(id)
    }

    /// Sum of affinity weights over the item's categories
    pub fn score(&self, item: &CatalogItem) -> i64 {
        item.categories
            .iter()
            .filter_map(|category| self.category_affinity.get(category))
            .sum()
    }

    /// Categories with the highest weights, ties broken by tag order
    pub fn top_categories(&self, limit: usize) -> Vec<&str> {
        let mut weighted: Vec<(&String, &i64)> = self.category_affinity.iter().collect();
        weighted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        weighted
            .into_iter()
            .take(limit)
            .map(|(category, _)| category.as_str())
            .collect()
    }
}

/// Ordering used by catalog browsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowseOrder {
    #[default]
    Latest,
    Popular,
}

/// Category/search listing request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub order: BrowseOrder,
    /// 1-based
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl CatalogQuery {
    /// Category filter, or `None` when every category is accepted
    pub fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
    }

    /// Lower-cased search needle, or `None` for an empty search
    pub fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// One page of a catalog listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
}
