use super::RecallStats;
use crate::models::ViewerProfile;
use feed_core::CatalogItem;
use tracing::debug;

/// Candidates for one viewer plus the category set they were restricted to
#[derive(Debug, Clone)]
pub struct PersonalizedRecall<'a> {
    pub candidates: Vec<&'a CatalogItem>,
    /// Empty for a cold-start viewer
    pub top_categories: Vec<String>,
}

impl PersonalizedRecall<'_> {
    pub fn is_cold_start(&self) -> bool {
        self.top_categories.is_empty()
    }
}

/// Personalized Recall Strategy - 個性化召回
/// 排除已看過的內容，只保留命中 top-N 興趣類別的候選
pub struct PersonalizedRecallStrategy {
    top_categories: usize,
}

impl PersonalizedRecallStrategy {
    pub fn new(top_categories: usize) -> Self {
        Self { top_categories }
    }

    pub fn recall<'a>(
        &self,
        catalog: &'a [CatalogItem],
        profile: &ViewerProfile,
    ) -> (PersonalizedRecall<'a>, RecallStats) {
        let mut stats = RecallStats {
            snapshot_size: catalog.len(),
            ..Default::default()
        };

        let mut unwatched = Vec::with_capacity(catalog.len());
        for item in catalog {
            if !item.status.is_public() {
                stats.not_public += 1;
            } else if profile.has_watched(&item.id) {
                stats.watched += 1;
            } else {
                unwatched.push(item);
            }
        }

        let top_categories: Vec<String> = profile
            .top_categories(self.top_categories)
            .into_iter()
            .map(str::to_string)
            .collect();

        if top_categories.is_empty() {
            debug!(candidates = unwatched.len(), "Cold-start viewer, skipping category filter");
            stats.total_candidates = unwatched.len();
            return (
                PersonalizedRecall {
                    candidates: unwatched,
                    top_categories,
                },
                stats,
            );
        }

        let candidates: Vec<&CatalogItem> = unwatched
            .into_iter()
            .filter(|item| {
                let hit = top_categories.iter().any(|c| item.has_category(c));
                if !hit {
                    stats.outside_top_categories += 1;
                }
                hit
            })
            .collect();

        stats.total_candidates = candidates.len();

        (
            PersonalizedRecall {
                candidates,
                top_categories,
            },
            stats,
        )
    }
}
