/// Ranking Module
///
/// Orders candidate items once recall has filtered them.
///
/// # Orderings
/// - **Trending**: view count, like count, recency, id
/// - **Affinity**: affinity score, view count, id
/// - **Latest**: recency, id
///
/// Every ordering ends on the item id, so the result is a total order and
/// re-ranking the same snapshot always yields the same page.
pub mod simple;

pub use simple::RankingLayer;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, RankingError>;
