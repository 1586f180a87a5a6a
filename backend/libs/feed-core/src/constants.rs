//! Feed core constants

/// Page size used when the caller does not pass one
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Upper bound for a single ranking page
pub const MAX_PAGE_SIZE: usize = 100;

/// Number of affinity categories a personalized feed is restricted to
pub const TOP_AFFINITY_CATEGORIES: usize = 3;

/// Page size for catalog browsing (category/search listing)
pub const DEFAULT_BROWSE_LIMIT: usize = 20;

/// Category filter value that disables category filtering
pub const ALL_CATEGORIES: &str = "all";

/// Visible fraction at which an entry becomes eligible to play
pub const DEFAULT_ACTIVATION_THRESHOLD: f64 = 0.6;

/// Visible fraction at or below which a paused entry is unloaded
pub const DEFAULT_UNLOAD_RATIO: f64 = 0.0;

/// Loading timeout (5 seconds)
pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 5_000;

/// Capacity of a feed session's event queue
pub const DEFAULT_EVENT_QUEUE_CAPACITY: usize = 256;
