//! Testing utilities and mock implementations.
//!
//! This module provides an in-memory [`MockCatalog`] so the import pipeline
//! and the dumper can be exercised without a database.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use playlistreader_core::testing::{fixtures, MockCatalog};
//!
//! let catalog = Arc::new(MockCatalog::new());
//! let ids = fixtures::seed_items(&catalog, &["/music/a.mp3", "/music/b.mp3"]);
//! ```

mod mock_catalog;

pub use mock_catalog::{MockCatalog, RecordedCatalogCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use super::MockCatalog;
    use crate::catalog::ItemId;

    /// Add music items for every path, returning their ids in order.
    pub fn seed_items(catalog: &MockCatalog, paths: &[&str]) -> Vec<ItemId> {
        paths.iter().map(|path| catalog.add_item(path, true)).collect()
    }

    /// Build playlist text from paths, one per line, with an M3U header.
    pub fn playlist_text(paths: &[&str]) -> String {
        let mut text = String::from("#EXTM3U\n");
        for path in paths {
            text.push_str(path);
            text.push('\n');
        }
        text
    }

    /// A typical absolute path for a track of an album.
    pub fn track_path(artist: &str, album: &str, track: u32) -> String {
        format!(
            "/storage/emulated/0/Music/{}/{}/{:02} - Track {}.mp3",
            artist, album, track, track
        )
    }
}
