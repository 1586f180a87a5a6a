pub mod config;
pub mod jobs;
pub mod models;
pub mod services;

pub use config::{Config, RankingConfig};
pub use models::{BrowseOrder, CatalogPage, CatalogQuery, RankMode, ViewerProfile};
pub use services::{RankingEngine, RankingError, RankingLayer, RecallLayer};
