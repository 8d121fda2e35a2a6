//! Subcommand handlers. Each returns the process exit code.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use playlistreader_core::{
    playlist_name_from_path, Access, CatalogClient, CatalogDumper, Config, ImportOutcome,
    ImportPipeline, ImportStatus, SqliteCatalog,
};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_PARTIAL: i32 = 2;
pub const EXIT_NOTHING_IMPORTED: i32 = 3;
pub const EXIT_NAME_CONFLICT: i32 = 4;

/// Output name meaning "write to stdout"
const STDOUT_MARKER: &str = "-";

fn open_catalog(config: &Config) -> Result<Arc<SqliteCatalog>> {
    let path = &config.database.path;
    let catalog = if config.database.read_only {
        SqliteCatalog::open_read_only(path)
    } else {
        SqliteCatalog::new(path)
    }
    .with_context(|| format!("Failed to open catalog {:?}", path))?;
    Ok(Arc::new(catalog))
}

/// Exit code for an import outcome.
pub fn exit_code(outcome: &ImportOutcome) -> i32 {
    match outcome.status() {
        ImportStatus::Full => EXIT_SUCCESS,
        ImportStatus::Partial => EXIT_PARTIAL,
        ImportStatus::NoMatches | ImportStatus::NoValidLines => EXIT_NOTHING_IMPORTED,
        ImportStatus::NameConflict => EXIT_NAME_CONFLICT,
    }
}

pub fn import(config: &Config, file: &Path, name: Option<&str>, json: bool) -> Result<i32> {
    let playlist_name = match name {
        Some(name) => name.to_string(),
        None => playlist_name_from_path(file)
            .ok_or_else(|| anyhow!("Could not derive a playlist name from {:?}", file))?,
    };

    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read playlist {:?}", file))?;
    let text = String::from_utf8_lossy(&bytes);

    let catalog = open_catalog(config)?;
    let grant = catalog
        .request_access(Access::ReadWrite)
        .context("Catalog refused write access")?;

    info!("Importing {:?} as playlist {:?}", file, playlist_name);
    let outcome = ImportPipeline::new(catalog, config.import.lookup)
        .run(&grant, &playlist_name, &text)
        .with_context(|| format!("Import of {:?} failed", file))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", outcome);
    }
    Ok(exit_code(&outcome))
}

pub fn dump(config: &Config, output: Option<&Path>) -> Result<i32> {
    let catalog = open_catalog(config)?;
    let grant = catalog
        .request_access(Access::Read)
        .context("Catalog refused read access")?;
    let dumper = CatalogDumper::new(catalog);

    let written = match output {
        Some(path) if path == Path::new(STDOUT_MARKER) => {
            dumper.dump_all(&grant, io::stdout().lock())?
        }
        _ => {
            let path = output
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(&config.dump.default_filename));
            // The file is only touched once the catalog query has succeeded
            let mut buffer = Vec::new();
            let written = dumper.dump_all(&grant, &mut buffer)?;
            std::fs::write(&path, &buffer)
                .with_context(|| format!("Failed to write {:?}", path))?;
            info!("Wrote {} entries to {:?}", written, path);
            written
        }
    };

    if written == 0 {
        info!("Catalog has no music entries");
    }
    Ok(EXIT_SUCCESS)
}

pub fn add(config: &Config, paths: &[String], is_music: bool) -> Result<i32> {
    let catalog = open_catalog(config)?;
    for path in paths {
        let id = catalog
            .insert_item(path, is_music)
            .with_context(|| format!("Failed to add {:?}", path))?;
        info!("Added {:?} with id {}", path, id);
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use playlistreader_core::{DatabaseConfig, DumpConfig, ImportConfig, LookupStrategy};
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> Config {
        Config {
            database: DatabaseConfig {
                path: dir.path().join("catalog.db"),
                read_only: false,
            },
            import: ImportConfig {
                lookup: LookupStrategy::Prefetch,
            },
            dump: DumpConfig::default(),
        }
    }

    #[test]
    fn test_import_derives_name_and_reports_partial() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        add(&config, &["/music/a.mp3".to_string()], true).unwrap();

        let playlist = dir.path().join("road trip.m3u");
        std::fs::write(&playlist, "#EXTM3U\n/music/a.mp3\n/music/b.mp3\n").unwrap();

        assert_eq!(import(&config, &playlist, None, false).unwrap(), EXIT_PARTIAL);

        let catalog = SqliteCatalog::new(&config.database.path).unwrap();
        let found = catalog.find_playlist_by_name("road trip").unwrap();
        assert!(found.is_some());

        // Same file again hits the existing name
        assert_eq!(
            import(&config, &playlist, None, true).unwrap(),
            EXIT_NAME_CONFLICT
        );
    }

    #[test]
    fn test_import_without_entries() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let playlist = dir.path().join("empty.m3u");
        std::fs::write(&playlist, "#EXTM3U\n\n").unwrap();

        assert_eq!(
            import(&config, &playlist, None, false).unwrap(),
            EXIT_NOTHING_IMPORTED
        );
    }

    #[test]
    fn test_import_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let result = import(&config, &dir.path().join("missing.m3u"), None, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_dump_to_file() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        add(
            &config,
            &["/music/b.mp3".to_string(), "/music/a.mp3".to_string()],
            true,
        )
        .unwrap();
        add(&config, &["/video/c.mp4".to_string()], false).unwrap();

        let out = dir.path().join("dump.txt");
        assert_eq!(dump(&config, Some(&out)).unwrap(), EXIT_SUCCESS);
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "/music/a.mp3\n/music/b.mp3\n"
        );
    }

    #[test]
    fn test_failed_dump_keeps_existing_output() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        // An empty database file has no catalog tables, so listing fails
        std::fs::write(&config.database.path, b"").unwrap();
        config.database.read_only = true;

        let out = dir.path().join("dump.txt");
        std::fs::write(&out, "/music/previous.mp3\n").unwrap();

        assert!(dump(&config, Some(&out)).is_err());
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "/music/previous.mp3\n"
        );
    }

    #[test]
    fn test_add_to_read_only_catalog_fails() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        add(&config, &["/music/a.mp3".to_string()], true).unwrap();

        let playlist = dir.path().join("mix.m3u");
        std::fs::write(&playlist, "/music/a.mp3\n").unwrap();

        config.database.read_only = true;
        assert!(add(&config, &["/music/b.mp3".to_string()], true).is_err());
        assert!(import(&config, &playlist, None, false).is_err());
    }
}
