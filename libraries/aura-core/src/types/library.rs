/// Library view types
use serde::{Deserialize, Serialize};

/// Sort key for the visible track list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Ascending by title
    Title,
    /// Ascending by artist
    Artist,
    /// Most recently added first (descending track id)
    #[default]
    DateAdded,
}

impl SortOrder {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Artist => "artist",
            Self::DateAdded => "date_added",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "artist" => Some(Self::Artist),
            "date_added" | "recent" => Some(Self::DateAdded),
            _ => None,
        }
    }
}

/// Ordering applied by the media index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MediaOrder {
    /// Newest first
    #[default]
    DateAddedDesc,
}

/// Fixed query issued against the media index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaQuery {
    /// Only return entries recognised as music
    pub music_only: bool,

    /// Result ordering
    pub order: MediaOrder,
}

impl Default for MediaQuery {
    fn default() -> Self {
        Self {
            music_only: true,
            order: MediaOrder::DateAddedDesc,
        }
    }
}

/// Load status of the library as seen by the interactive layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LibraryStatus {
    /// Index query in flight
    #[default]
    Loading,
    /// Index query finished
    Ready {
        /// Number of tracks reported by the index
        count: usize,
    },
    /// The index could not be read; the user must grant access
    PermissionRequired,
}
