//! Import lifecycle integration tests.
//!
//! These tests run the import pipeline and the dumper against a file-backed
//! SQLite catalog:
//! name check -> parse -> resolve -> create -> bulk insert

use std::sync::Arc;

use tempfile::TempDir;

use playlistreader_core::{
    Access, CatalogClient, CatalogDumper, ImportError, ImportOutcome, ImportPipeline,
    ImportStatus, LookupStrategy, SqliteCatalog,
};

/// Test helper owning a catalog on a temporary database.
struct TestHarness {
    catalog: Arc<SqliteCatalog>,
    _temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("catalog.db");
        let catalog = Arc::new(SqliteCatalog::new(&db_path).expect("Failed to create catalog"));

        Self {
            catalog,
            _temp_dir: temp_dir,
        }
    }

    fn seed(&self, paths: &[&str]) -> Vec<i64> {
        paths
            .iter()
            .map(|p| self.catalog.insert_item(p, true).expect("Failed to insert item"))
            .collect()
    }

    fn import(&self, name: &str, text: &str) -> Result<ImportOutcome, ImportError> {
        self.import_with(LookupStrategy::PerPath, name, text)
    }

    fn import_with(
        &self,
        lookup: LookupStrategy,
        name: &str,
        text: &str,
    ) -> Result<ImportOutcome, ImportError> {
        let grant = self
            .catalog
            .request_access(Access::ReadWrite)
            .expect("Failed to get write access");
        ImportPipeline::new(self.catalog.clone(), lookup).run(&grant, name, text)
    }

    fn member_pairs(&self, outcome: &ImportOutcome) -> Vec<(u32, i64)> {
        let playlist = outcome.playlist().expect("Expected a created playlist");
        self.catalog
            .members(playlist.id)
            .expect("Failed to load members")
            .iter()
            .map(|m| (m.play_order, m.item_id))
            .collect()
    }
}

#[test]
fn test_all_entries_matched() {
    let harness = TestHarness::new();
    let ids = harness.seed(&["/a/song1.mp3", "/a/song2.mp3"]);

    let outcome = harness
        .import("mix", "#comment\n/a/song1.mp3\n\n/a/song2.mp3")
        .unwrap();

    assert_eq!(outcome.status(), ImportStatus::Full);
    assert_eq!(outcome.attempted(), 2);
    assert_eq!(outcome.imported(), 2);
    assert_eq!(harness.member_pairs(&outcome), vec![(1, ids[0]), (2, ids[1])]);
}

#[test]
fn test_partial_match() {
    let harness = TestHarness::new();
    let ids = harness.seed(&["/music/keep.flac"]);

    let outcome = harness
        .import(
            "mix",
            "/music/gone.flac\n/music/keep.flac\n/music/also-gone.flac\n",
        )
        .unwrap();

    assert_eq!(outcome.status(), ImportStatus::Partial);
    assert_eq!(outcome.attempted(), 3);
    assert_eq!(outcome.imported(), 1);
    assert_eq!(harness.member_pairs(&outcome), vec![(1, ids[0])]);
}

#[test]
fn test_existing_playlist_name() {
    let harness = TestHarness::new();
    harness.seed(&["/a.mp3"]);
    harness.catalog.create_playlist("mix").unwrap();

    let outcome = harness.import("mix", "/a.mp3").unwrap();

    assert_eq!(
        outcome,
        ImportOutcome::NameConflict {
            name: "mix".to_string()
        }
    );
    let playlists = harness.catalog.playlists().unwrap();
    assert_eq!(playlists.len(), 1);
    assert!(harness.catalog.members(playlists[0].id).unwrap().is_empty());
}

#[test]
fn test_no_matches() {
    let harness = TestHarness::new();
    harness.seed(&["/other.mp3"]);

    let outcome = harness.import("mix", "/x.mp3\n/y.mp3").unwrap();

    assert_eq!(outcome, ImportOutcome::NoMatches { attempted: 2 });
    assert!(harness.catalog.playlists().unwrap().is_empty());
}

#[test]
fn test_only_comments_and_blanks() {
    let harness = TestHarness::new();

    let outcome = harness.import("mix", "#EXTM3U\n\n#EXTINF:123,Artist - Title\n  \n").unwrap();

    assert_eq!(outcome, ImportOutcome::NoValidLines);
    assert!(harness.catalog.playlists().unwrap().is_empty());
}

#[test]
fn test_second_import_with_same_name_conflicts() {
    let harness = TestHarness::new();
    harness.seed(&["/a.mp3", "/b.mp3"]);

    let first = harness.import("mix", "/a.mp3").unwrap();
    assert_eq!(first.status(), ImportStatus::Full);

    let second = harness.import("mix", "/b.mp3\n/a.mp3").unwrap();
    assert_eq!(second.status(), ImportStatus::NameConflict);

    let playlists = harness.catalog.playlists().unwrap();
    assert_eq!(playlists.len(), 1);
    assert_eq!(harness.catalog.members(playlists[0].id).unwrap().len(), 1);
}

#[test]
fn test_lookup_strategies_agree() {
    let harness = TestHarness::new();
    harness.seed(&["/m/3.mp3", "/m/1.mp3", "/m/2.mp3"]);
    harness.catalog.insert_item("/m/video.mp4", false).unwrap();
    let text = "/m/2.mp3\n/m/video.mp4\n/m/3.mp3\n/m/missing.mp3\n/m/1.mp3\n/m/2.mp3\n";

    let per_path = harness
        .import_with(LookupStrategy::PerPath, "per-path", text)
        .unwrap();
    let prefetch = harness
        .import_with(LookupStrategy::Prefetch, "prefetch", text)
        .unwrap();

    assert_eq!(per_path.attempted(), 6);
    assert_eq!(per_path.imported(), 4);
    assert_eq!(harness.member_pairs(&per_path), harness.member_pairs(&prefetch));
}

#[test]
fn test_read_only_catalog_refuses_import() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalog.db");
    SqliteCatalog::new(&db_path)
        .unwrap()
        .insert_item("/a.mp3", true)
        .unwrap();

    let catalog = SqliteCatalog::open_read_only(&db_path).unwrap();
    assert!(catalog.request_access(Access::ReadWrite).is_err());

    // A read grant is not enough for the pipeline either
    let grant = catalog.request_access(Access::Read).unwrap();
    let result = ImportPipeline::new(Arc::new(catalog), LookupStrategy::PerPath)
        .run(&grant, "mix", "/a.mp3");
    assert!(matches!(result, Err(ImportError::AccessDenied)));
}

#[test]
fn test_dump_after_import() {
    let harness = TestHarness::new();
    harness.seed(&["/music/b.mp3", "/music/a.mp3", "/music/C.mp3"]);
    harness.catalog.insert_item("/podcasts/ep1.mp3", false).unwrap();

    let grant = harness.catalog.request_access(Access::Read).unwrap();
    let mut out = Vec::new();
    let written = CatalogDumper::new(harness.catalog.clone())
        .dump_all(&grant, &mut out)
        .unwrap();

    assert_eq!(written, 3);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "/music/C.mp3\n/music/a.mp3\n/music/b.mp3\n"
    );
}

#[test]
fn test_dump_output_reimports_everything() {
    let harness = TestHarness::new();
    harness.seed(&["/music/x.mp3", "/music/y.mp3", "/music/z.mp3"]);

    let grant = harness.catalog.request_access(Access::Read).unwrap();
    let mut out = Vec::new();
    CatalogDumper::new(harness.catalog.clone())
        .dump_all(&grant, &mut out)
        .unwrap();

    let outcome = harness
        .import("everything", &String::from_utf8(out).unwrap())
        .unwrap();
    assert_eq!(outcome.status(), ImportStatus::Full);
    assert_eq!(outcome.imported(), 3);
}
