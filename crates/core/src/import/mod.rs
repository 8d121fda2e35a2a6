//! Playlist import.
//!
//! Turns a plain-text playlist (one absolute path per line) into a new
//! catalog playlist:
//!
//! 1. refuse the import if a playlist with the name exists
//! 2. parse the text into candidate paths
//! 3. resolve candidates to catalog items, dropping misses
//! 4. create the playlist
//! 5. insert all memberships at once with play order 1..N in match order
//!
//! Steps 1-3 never write. Once the playlist exists, a failing insert leaves
//! it without members; this is logged but not rolled back.

mod naming;
mod pipeline;
mod types;

pub use naming::playlist_name_from_path;
pub use pipeline::ImportPipeline;
pub use types::{ImportError, ImportOutcome, ImportStatus};
