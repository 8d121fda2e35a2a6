//! Types for the media catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalog identifier of a media item.
pub type ItemId = i64;

/// Catalog identifier of a playlist.
pub type PlaylistId = i64;

/// A media item known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    /// Absolute filesystem path.
    pub path: String,
    /// Audio media rather than some other media type.
    pub is_music: bool,
}

/// A named playlist record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    /// When the catalog created the record.
    pub date_added: DateTime<Utc>,
}

/// One row to be inserted into a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMembership {
    pub item_id: ItemId,
    /// 1-based position within the playlist.
    pub play_order: u32,
}

/// A stored (playlist, item, order) association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistMembership {
    pub playlist_id: PlaylistId,
    pub item_id: ItemId,
    pub play_order: u32,
}

/// Result of a conditional playlist creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// No playlist had the name; this one was created.
    Created(Playlist),
    /// A playlist with the name was already present and is returned unchanged.
    Existed(Playlist),
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_serialization() {
        let playlist = Playlist {
            id: 7,
            name: "road trip".to_string(),
            date_added: Utc::now(),
        };

        let json = serde_json::to_string(&playlist).unwrap();
        let parsed: Playlist = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, playlist);
    }

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::AccessDenied("catalog opened read-only".to_string());
        assert_eq!(err.to_string(), "Access denied: catalog opened read-only");
    }
}
