//! Engagement feed core models and types
//!
//! Shared data structures for ranking-service and feed-service

pub mod constants;
pub mod engagement;
pub mod models;

pub use engagement::{
    Engagement, EngagementAction, EngagementError, EngagementLedger, EngagementOutcome,
};
pub use models::*;
