pub mod engine;
pub mod ranking;
pub mod recall;

pub use engine::RankingEngine;
pub use ranking::{RankingError, RankingLayer};
pub use recall::{RecallLayer, RecallStats};
