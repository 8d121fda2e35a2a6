//! Mock media catalog for testing.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use chrono::Utc;

use crate::access::{Access, AccessGrant};
use crate::catalog::{
    CatalogClient, CatalogError, CatalogItem, CreateOutcome, ItemId, NewMembership, Playlist,
    PlaylistId, PlaylistMembership,
};

/// A recorded catalog call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCatalogCall {
    RequestAccess { access: Access },
    FindItemIdByPath { path: String },
    ListMusicItems,
    FindPlaylistByName { name: String },
    CreatePlaylist { name: String },
    CreatePlaylistIfAbsent { name: String },
    BulkInsertMemberships { playlist_id: PlaylistId, count: usize },
}

impl RecordedCatalogCall {
    /// Whether the call can modify the catalog.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            RecordedCatalogCall::CreatePlaylist { .. }
                | RecordedCatalogCall::CreatePlaylistIfAbsent { .. }
                | RecordedCatalogCall::BulkInsertMemberships { .. }
        )
    }
}

#[derive(Debug, Default)]
struct State {
    items: Vec<CatalogItem>,
    playlists: Vec<Playlist>,
    members: Vec<PlaylistMembership>,
    next_item_id: ItemId,
    next_playlist_id: PlaylistId,
}

/// Mock implementation of the CatalogClient trait.
///
/// Provides controllable behavior for testing:
/// - Seed items and playlists
/// - Track calls for assertions
/// - Simulate failures, denied access, rejected rows and a concurrent writer
///
/// # Example
///
/// ```rust,ignore
/// use playlistreader_core::testing::MockCatalog;
///
/// let catalog = MockCatalog::new();
/// let id = catalog.add_item("/music/song.mp3", true);
///
/// assert_eq!(catalog.find_item_id_by_path("/music/song.mp3")?, Some(id));
/// assert_eq!(catalog.item_lookup_count(), 1);
/// ```
#[derive(Debug)]
pub struct MockCatalog {
    state: Arc<RwLock<State>>,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedCatalogCall>>>,
    /// If set, the next item lookup or listing fails with this error.
    next_lookup_error: Arc<RwLock<Option<CatalogError>>>,
    /// If set, the next playlist creation or bulk insert fails with this error.
    next_write_error: Arc<RwLock<Option<CatalogError>>>,
    /// If set, the next bulk insert fails with this error; creation is unaffected.
    next_insert_error: Arc<RwLock<Option<CatalogError>>>,
    /// Refuse `Access::ReadWrite` grants.
    read_only: Arc<RwLock<bool>>,
    /// Item ids that bulk inserts silently reject.
    rejected_items: Arc<RwLock<HashSet<ItemId>>>,
    /// Name another writer creates right before our conditional create runs.
    concurrent_creator: Arc<RwLock<Option<String>>>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                next_item_id: 1,
                next_playlist_id: 1,
                ..State::default()
            })),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_lookup_error: Arc::new(RwLock::new(None)),
            next_write_error: Arc::new(RwLock::new(None)),
            next_insert_error: Arc::new(RwLock::new(None)),
            read_only: Arc::new(RwLock::new(false)),
            rejected_items: Arc::new(RwLock::new(HashSet::new())),
            concurrent_creator: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Seeding
    // =========================================================================

    /// Add a media item and return its id.
    pub fn add_item(&self, path: &str, is_music: bool) -> ItemId {
        let mut state = self.state.write().unwrap();
        let id = state.next_item_id;
        state.next_item_id += 1;
        state.items.push(CatalogItem {
            id,
            path: path.to_string(),
            is_music,
        });
        id
    }

    /// Add a playlist directly, bypassing call recording.
    pub fn add_playlist(&self, name: &str) -> Playlist {
        let mut state = self.state.write().unwrap();
        Self::push_playlist(&mut state, name)
    }

    fn push_playlist(state: &mut State, name: &str) -> Playlist {
        let playlist = Playlist {
            id: state.next_playlist_id,
            name: name.to_string(),
            date_added: Utc::now(),
        };
        state.next_playlist_id += 1;
        state.playlists.push(playlist.clone());
        playlist
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// All playlists in creation order.
    pub fn playlists(&self) -> Vec<Playlist> {
        self.state.read().unwrap().playlists.clone()
    }

    /// Memberships of a playlist ordered by play order.
    pub fn members(&self, playlist_id: PlaylistId) -> Vec<PlaylistMembership> {
        let mut members: Vec<PlaylistMembership> = self
            .state
            .read()
            .unwrap()
            .members
            .iter()
            .filter(|m| m.playlist_id == playlist_id)
            .copied()
            .collect();
        members.sort_by_key(|m| m.play_order);
        members
    }

    /// Get all recorded calls.
    pub fn recorded_calls(&self) -> Vec<RecordedCatalogCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of point lookups by path.
    pub fn item_lookup_count(&self) -> usize {
        self.count_calls(|c| matches!(c, RecordedCatalogCall::FindItemIdByPath { .. }))
    }

    /// Number of full music item listings.
    pub fn listing_count(&self) -> usize {
        self.count_calls(|c| matches!(c, RecordedCatalogCall::ListMusicItems))
    }

    /// Number of calls that can modify the catalog.
    pub fn write_count(&self) -> usize {
        self.count_calls(RecordedCatalogCall::is_write)
    }

    fn count_calls(&self, predicate: impl Fn(&RecordedCatalogCall) -> bool) -> usize {
        self.calls.read().unwrap().iter().filter(|c| predicate(c)).count()
    }

    // =========================================================================
    // Behavior Control
    // =========================================================================

    /// Make the next item lookup or listing fail.
    pub fn set_next_lookup_error(&self, error: CatalogError) {
        *self.next_lookup_error.write().unwrap() = Some(error);
    }

    /// Make the next playlist creation or bulk insert fail.
    pub fn set_next_write_error(&self, error: CatalogError) {
        *self.next_write_error.write().unwrap() = Some(error);
    }

    /// Make the next bulk insert fail while playlist creation still succeeds.
    pub fn set_next_insert_error(&self, error: CatalogError) {
        *self.next_insert_error.write().unwrap() = Some(error);
    }

    /// Refuse write access.
    pub fn set_read_only(&self, read_only: bool) {
        *self.read_only.write().unwrap() = read_only;
    }

    /// Reject these item ids during bulk inserts.
    pub fn reject_items(&self, ids: &[ItemId]) {
        self.rejected_items.write().unwrap().extend(ids.iter().copied());
    }

    /// Simulate another writer creating `name` just before the next
    /// conditional create.
    pub fn set_concurrent_creator(&self, name: &str) {
        *self.concurrent_creator.write().unwrap() = Some(name.to_string());
    }

    fn record(&self, call: RecordedCatalogCall) {
        self.calls.write().unwrap().push(call);
    }

    fn take_lookup_error(&self) -> Result<(), CatalogError> {
        match self.next_lookup_error.write().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn take_write_error(&self) -> Result<(), CatalogError> {
        if *self.read_only.read().unwrap() {
            return Err(CatalogError::AccessDenied("mock catalog is read-only".to_string()));
        }
        match self.next_write_error.write().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl CatalogClient for MockCatalog {
    fn request_access(&self, access: Access) -> Result<AccessGrant, CatalogError> {
        self.record(RecordedCatalogCall::RequestAccess { access });
        if access == Access::ReadWrite && *self.read_only.read().unwrap() {
            return Err(CatalogError::AccessDenied("mock catalog is read-only".to_string()));
        }
        Ok(AccessGrant::issue(access))
    }

    fn find_item_id_by_path(&self, path: &str) -> Result<Option<ItemId>, CatalogError> {
        self.record(RecordedCatalogCall::FindItemIdByPath {
            path: path.to_string(),
        });
        self.take_lookup_error()?;

        let state = self.state.read().unwrap();
        Ok(state
            .items
            .iter()
            .filter(|item| item.is_music && item.path == path)
            .map(|item| item.id)
            .min())
    }

    fn list_music_items_ordered_by_path(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        self.record(RecordedCatalogCall::ListMusicItems);
        self.take_lookup_error()?;

        let mut items: Vec<CatalogItem> = self
            .state
            .read()
            .unwrap()
            .items
            .iter()
            .filter(|item| item.is_music)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.path.cmp(&b.path).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    fn find_playlist_by_name(&self, name: &str) -> Result<Option<Playlist>, CatalogError> {
        self.record(RecordedCatalogCall::FindPlaylistByName {
            name: name.to_string(),
        });

        let state = self.state.read().unwrap();
        Ok(state.playlists.iter().find(|p| p.name == name).cloned())
    }

    fn create_playlist(&self, name: &str) -> Result<Playlist, CatalogError> {
        self.record(RecordedCatalogCall::CreatePlaylist {
            name: name.to_string(),
        });
        self.take_write_error()?;

        let mut state = self.state.write().unwrap();
        Ok(Self::push_playlist(&mut state, name))
    }

    fn create_playlist_if_absent(&self, name: &str) -> Result<CreateOutcome, CatalogError> {
        self.record(RecordedCatalogCall::CreatePlaylistIfAbsent {
            name: name.to_string(),
        });
        self.take_write_error()?;

        let mut state = self.state.write().unwrap();
        if let Some(other) = self.concurrent_creator.write().unwrap().take() {
            Self::push_playlist(&mut state, &other);
        }

        if let Some(existing) = state.playlists.iter().find(|p| p.name == name) {
            return Ok(CreateOutcome::Existed(existing.clone()));
        }
        Ok(CreateOutcome::Created(Self::push_playlist(&mut state, name)))
    }

    fn bulk_insert_memberships(
        &self,
        playlist_id: PlaylistId,
        members: &[NewMembership],
    ) -> Result<usize, CatalogError> {
        self.record(RecordedCatalogCall::BulkInsertMemberships {
            playlist_id,
            count: members.len(),
        });
        self.take_write_error()?;
        if let Some(error) = self.next_insert_error.write().unwrap().take() {
            return Err(error);
        }

        let rejected = self.rejected_items.read().unwrap();
        let mut state = self.state.write().unwrap();
        if !state.playlists.iter().any(|p| p.id == playlist_id) {
            return Err(CatalogError::NotFound(format!("playlist {}", playlist_id)));
        }

        let mut inserted = 0;
        for member in members {
            if rejected.contains(&member.item_id) {
                continue;
            }
            state.members.push(PlaylistMembership {
                playlist_id,
                item_id: member.item_id,
                play_order: member.play_order,
            });
            inserted += 1;
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls() {
        let catalog = MockCatalog::new();
        catalog.add_item("/a.mp3", true);

        catalog.find_item_id_by_path("/a.mp3").unwrap();
        catalog.find_playlist_by_name("mix").unwrap();

        assert_eq!(
            catalog.recorded_calls(),
            vec![
                RecordedCatalogCall::FindItemIdByPath {
                    path: "/a.mp3".to_string()
                },
                RecordedCatalogCall::FindPlaylistByName {
                    name: "mix".to_string()
                },
            ]
        );
        assert_eq!(catalog.write_count(), 0);
    }

    #[test]
    fn test_next_lookup_error_is_consumed() {
        let catalog = MockCatalog::new();
        catalog.set_next_lookup_error(CatalogError::Database("boom".to_string()));

        assert!(catalog.find_item_id_by_path("/a.mp3").is_err());
        assert!(catalog.find_item_id_by_path("/a.mp3").is_ok());
    }

    #[test]
    fn test_insert_error_spares_create() {
        let catalog = MockCatalog::new();
        let id = catalog.add_item("/a.mp3", true);
        catalog.set_next_insert_error(CatalogError::Database("disk full".to_string()));

        let playlist = match catalog.create_playlist_if_absent("mix").unwrap() {
            CreateOutcome::Created(playlist) => playlist,
            CreateOutcome::Existed(_) => panic!("Expected a new playlist"),
        };
        let members = [NewMembership {
            item_id: id,
            play_order: 1,
        }];
        assert!(catalog.bulk_insert_memberships(playlist.id, &members).is_err());
        assert_eq!(catalog.bulk_insert_memberships(playlist.id, &members).unwrap(), 1);
    }

    #[test]
    fn test_read_only_refuses_writes() {
        let catalog = MockCatalog::new();
        catalog.set_read_only(true);

        assert!(catalog.request_access(Access::Read).is_ok());
        assert!(matches!(
            catalog.request_access(Access::ReadWrite),
            Err(CatalogError::AccessDenied(_))
        ));
        assert!(catalog.create_playlist("mix").is_err());
        assert!(catalog.playlists().is_empty());
    }

    #[test]
    fn test_concurrent_creator_wins() {
        let catalog = MockCatalog::new();
        catalog.set_concurrent_creator("mix");

        let outcome = catalog.create_playlist_if_absent("mix").unwrap();
        assert!(matches!(outcome, CreateOutcome::Existed(_)));
        assert_eq!(catalog.playlists().len(), 1);
    }
}
