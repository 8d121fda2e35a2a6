use std::path::Path;

/// Derive a playlist name from the playlist file's path.
///
/// The name is the file name without its last extension, so
/// `Playlists/road trip.m3u` becomes `road trip`. Returns `None` when the
/// path has no file name or the remaining name is blank.
pub fn playlist_name_from_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_string_lossy();
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _extension)) => stem,
        None => file_name.as_ref(),
    };

    if stem.trim().is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
