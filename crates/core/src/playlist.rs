//! Playlist lookup and creation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::{CatalogClient, CatalogError, CreateOutcome, Playlist};

/// Finds and creates playlists by name.
pub struct PlaylistRepository {
    catalog: Arc<dyn CatalogClient>,
}

impl PlaylistRepository {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Find a playlist by exact, case-sensitive name.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Playlist>, CatalogError> {
        let found = self.catalog.find_playlist_by_name(name)?;
        if let Some(ref playlist) = found {
            debug!("Playlist {:?} exists with id {}", name, playlist.id);
        }
        Ok(found)
    }

    /// Create a playlist unless the name is taken.
    ///
    /// Callers check [`find_by_name`](Self::find_by_name) first; a
    /// [`CreateOutcome::Existed`] here means another writer created the name
    /// in between.
    pub fn create(&self, name: &str) -> Result<CreateOutcome, CatalogError> {
        let outcome = self.catalog.create_playlist_if_absent(name)?;
        match &outcome {
            CreateOutcome::Created(playlist) => {
                info!("Created playlist {:?} with id {}", name, playlist.id)
            }
            CreateOutcome::Existed(playlist) => warn!(
                "Playlist {:?} was created concurrently (id {})",
                name, playlist.id
            ),
        }
        Ok(outcome)
    }
}
