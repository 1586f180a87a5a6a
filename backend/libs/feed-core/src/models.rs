//! Core catalog data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Opaque catalog item identifier
///
/// Ordering is lexicographic on the underlying string and is the final
/// tiebreak of every ranking mode.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Publication status of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    /// Stream currently broadcasting
    Live,
    /// Uploaded clip visible to everyone
    #[default]
    Published,
    Draft,
    Ended,
}

impl PublicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationStatus::Live => "live",
            PublicationStatus::Published => "published",
            PublicationStatus::Draft => "draft",
            PublicationStatus::Ended => "ended",
        }
    }

    /// Whether the item may appear in trending and personalized feeds
    pub fn is_public(&self) -> bool {
        matches!(self, PublicationStatus::Live | PublicationStatus::Published)
    }
}

/// Media kind; only video entries take part in playback scheduling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
}

/// View and like counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Popularity {
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
}

impl Popularity {
    pub fn new(view_count: u64, like_count: u64) -> Self {
        Self {
            view_count,
            like_count,
        }
    }
}

/// A unit of content eligible for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    /// Publishing channel
    pub owner_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub popularity: Popularity,
    pub media_kind: MediaKind,
    pub media_ref: String,
    /// Derived thumbnail returned by the upload service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_ref: Option<String>,
    #[serde(default)]
    pub status: PublicationStatus,
}

impl CatalogItem {
    /// Create a published video item with empty popularity
    pub fn new(
        id: impl Into<ItemId>,
        owner_id: impl Into<String>,
        created_at: DateTime<Utc>,
        media_ref: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            title: id.to_string(),
            id,
            owner_id: owner_id.into(),
            description: None,
            categories: BTreeSet::new(),
            created_at,
            popularity: Popularity::default(),
            media_kind: MediaKind::Video,
            media_ref: media_ref.into(),
            thumbnail_ref: None,
            status: PublicationStatus::Published,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_popularity(mut self, view_count: u64, like_count: u64) -> Self {
        self.popularity = Popularity::new(view_count, like_count);
        self
    }

    pub fn with_media_kind(mut self, media_kind: MediaKind) -> Self {
        self.media_kind = media_kind;
        self
    }

    pub fn with_status(mut self, status: PublicationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_playable(&self) -> bool {
        self.media_kind == MediaKind::Video
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }
}
