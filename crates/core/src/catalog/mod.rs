//! Media catalog - the store of known media items and playlists.
//!
//! The catalog is owned by an external ingestion process. This crate only
//! queries items and creates playlists and their memberships through the
//! [`CatalogClient`] trait.

mod sqlite;
mod types;

pub use sqlite::SqliteCatalog;
pub use types::*;

use crate::access::{Access, AccessGrant};

/// Trait for the media catalog consumed by the import and dump flows.
pub trait CatalogClient: Send + Sync {
    /// Ask the store for access at the given level.
    ///
    /// Fails with [`CatalogError::AccessDenied`] when the store cannot honour it.
    fn request_access(&self, access: Access) -> Result<AccessGrant, CatalogError>;

    /// Find the id of the music item whose path equals `path` exactly.
    ///
    /// Items with `is_music == false` never match. If several items share the
    /// path, the lowest id wins.
    fn find_item_id_by_path(&self, path: &str) -> Result<Option<ItemId>, CatalogError>;

    /// All music items, ordered by path ascending (byte-wise).
    fn list_music_items_ordered_by_path(&self) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Find a playlist by exact, case-sensitive name. Returns the first match.
    fn find_playlist_by_name(&self, name: &str) -> Result<Option<Playlist>, CatalogError>;

    /// Insert a playlist record unconditionally.
    fn create_playlist(&self, name: &str) -> Result<Playlist, CatalogError>;

    /// Insert a playlist record unless one with the same name exists.
    ///
    /// The check and the insert are atomic with respect to other writers.
    fn create_playlist_if_absent(&self, name: &str) -> Result<CreateOutcome, CatalogError>;

    /// Insert memberships for a playlist in one unit.
    ///
    /// Returns the number of rows the store accepted, which may be lower than
    /// `members.len()`.
    fn bulk_insert_memberships(
        &self,
        playlist_id: PlaylistId,
        members: &[NewMembership],
    ) -> Result<usize, CatalogError>;
}
