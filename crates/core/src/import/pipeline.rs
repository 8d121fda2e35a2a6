//! The import pipeline: name check, resolution, creation, bulk insert.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{ImportError, ImportOutcome};
use crate::access::AccessGrant;
use crate::catalog::{CatalogClient, CreateOutcome, ItemId, NewMembership};
use crate::playlist::PlaylistRepository;
use crate::resolver::{parse_lines, LookupStrategy, PathResolver};

/// Imports playlist text into the catalog as a new playlist.
pub struct ImportPipeline {
    catalog: Arc<dyn CatalogClient>,
    resolver: PathResolver,
    playlists: PlaylistRepository,
}

impl ImportPipeline {
    pub fn new(catalog: Arc<dyn CatalogClient>, lookup: LookupStrategy) -> Self {
        Self {
            resolver: PathResolver::new(Arc::clone(&catalog), lookup),
            playlists: PlaylistRepository::new(Arc::clone(&catalog)),
            catalog,
        }
    }

    /// Import `text` as a playlist called `playlist_name`.
    ///
    /// Policy rejections (existing name, no usable lines, no matches) are
    /// returned as [`ImportOutcome`] values and leave the catalog untouched.
    /// Catalog failures abort the import with an [`ImportError`].
    pub fn run(
        &self,
        grant: &AccessGrant,
        playlist_name: &str,
        text: &str,
    ) -> Result<ImportOutcome, ImportError> {
        if !grant.can_write() {
            return Err(ImportError::AccessDenied);
        }
        if playlist_name.trim().is_empty() {
            return Err(ImportError::InvalidName(playlist_name.to_string()));
        }

        if self.playlists.find_by_name(playlist_name)?.is_some() {
            warn!("Playlist {:?} already exists, import skipped", playlist_name);
            return Ok(ImportOutcome::NameConflict {
                name: playlist_name.to_string(),
            });
        }

        let paths = parse_lines(text);
        let attempted = paths.len();
        if attempted == 0 {
            info!("No valid entries in playlist {:?}", playlist_name);
            return Ok(ImportOutcome::NoValidLines);
        }

        debug!(
            "Resolving {} paths with {:?} lookup",
            attempted,
            self.resolver.strategy()
        );
        let matched = self.resolver.resolve_all(&paths)?;
        info!(
            "Matched {} of {} entries for playlist {:?}",
            matched.len(),
            attempted,
            playlist_name
        );
        if matched.is_empty() {
            return Ok(ImportOutcome::NoMatches { attempted });
        }

        let members = memberships(&matched)?;

        let playlist = match self.playlists.create(playlist_name)? {
            CreateOutcome::Created(playlist) => playlist,
            CreateOutcome::Existed(_) => {
                return Ok(ImportOutcome::NameConflict {
                    name: playlist_name.to_string(),
                })
            }
        };

        let imported = match self.catalog.bulk_insert_memberships(playlist.id, &members) {
            Ok(count) => count,
            Err(e) => {
                warn!(
                    "Playlist {:?} (id {}) was created but its entries could not be stored",
                    playlist.name, playlist.id
                );
                return Err(e.into());
            }
        };

        if imported < members.len() {
            warn!(
                "Catalog accepted {} of {} entries for playlist {:?}",
                imported,
                members.len(),
                playlist.name
            );
        }
        info!(
            "Imported {} of {} entries into playlist {:?}",
            imported, attempted, playlist.name
        );

        Ok(ImportOutcome::Imported {
            playlist,
            attempted,
            imported,
        })
    }
}

/// Play order for the entry at `index`; orders start at 1.
fn play_order(index: usize) -> Result<u32, ImportError> {
    u32::try_from(index)
        .ok()
        .and_then(|i| i.checked_add(1))
        .ok_or(ImportError::TooManyEntries(index))
}

fn memberships(matched: &[ItemId]) -> Result<Vec<NewMembership>, ImportError> {
    matched
        .iter()
        .enumerate()
        .map(|(index, &item_id)| {
            Ok(NewMembership {
                item_id,
                play_order: play_order(index)?,
            })
        })
        .collect()
}
