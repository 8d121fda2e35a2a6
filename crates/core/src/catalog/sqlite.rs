//! SQLite-backed media catalog implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, TransactionBehavior};

use super::{
    CatalogClient, CatalogError, CatalogItem, CreateOutcome, ItemId, NewMembership, Playlist,
    PlaylistId, PlaylistMembership,
};
use crate::access::{Access, AccessGrant};

/// SQLite-backed media catalog.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
    read_only: bool,
}

impl SqliteCatalog {
    /// Open a catalog, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            read_only: false,
        })
    }

    /// Open an existing catalog without write access.
    ///
    /// The schema is not created; queries against a database that lacks it fail.
    pub fn open_read_only(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            read_only: true,
        })
    }

    /// Create an in-memory catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            read_only: false,
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(
            r#"
            -- Media items, written by the catalog's own ingestion
            CREATE TABLE IF NOT EXISTS media (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                path TEXT NOT NULL,
                is_music INTEGER NOT NULL DEFAULT 1,
                date_added TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_media_path ON media(path);

            -- Playlist names are not unique at the schema level
            CREATE TABLE IF NOT EXISTS playlists (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                date_added TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_playlists_name ON playlists(name);

            CREATE TABLE IF NOT EXISTS playlist_members (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                playlist_id INTEGER NOT NULL REFERENCES playlists(id) ON DELETE CASCADE,
                audio_id INTEGER NOT NULL REFERENCES media(id),
                play_order INTEGER NOT NULL,
                UNIQUE(playlist_id, play_order)
            );

            CREATE INDEX IF NOT EXISTS idx_playlist_members_playlist ON playlist_members(playlist_id);
            "#,
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn
            .lock()
            .map_err(|_| CatalogError::Internal("catalog connection lock poisoned".to_string()))
    }

    fn ensure_writable(&self) -> Result<(), CatalogError> {
        if self.read_only {
            return Err(CatalogError::AccessDenied(
                "catalog opened read-only".to_string(),
            ));
        }
        Ok(())
    }

    fn parse_timestamp(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn row_to_playlist(row: &rusqlite::Row) -> rusqlite::Result<Playlist> {
        let date_added_str: String = row.get(2)?;
        Ok(Playlist {
            id: row.get(0)?,
            name: row.get(1)?,
            date_added: Self::parse_timestamp(&date_added_str),
        })
    }

    fn select_playlist_by_name(
        conn: &Connection,
        name: &str,
    ) -> Result<Option<Playlist>, CatalogError> {
        conn.query_row(
            "SELECT id, name, date_added FROM playlists WHERE name = ? ORDER BY id LIMIT 1",
            params![name],
            Self::row_to_playlist,
        )
        .optional()
        .map_err(|e| CatalogError::Database(e.to_string()))
    }

    fn insert_playlist(conn: &Connection, name: &str) -> Result<Playlist, CatalogError> {
        let now = Utc::now();
        conn.execute(
            "INSERT INTO playlists (name, date_added) VALUES (?, ?)",
            params![name, now.to_rfc3339()],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(Playlist {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            date_added: now,
        })
    }

    /// Register a media item. Stands in for the catalog's own ingestion.
    pub fn insert_item(&self, path: &str, is_music: bool) -> Result<ItemId, CatalogError> {
        self.ensure_writable()?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO media (path, is_music, date_added) VALUES (?, ?, ?)",
            params![path, is_music, Utc::now().to_rfc3339()],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(conn.last_insert_rowid())
    }

    /// All playlists, oldest first.
    pub fn playlists(&self) -> Result<Vec<Playlist>, CatalogError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT id, name, date_added FROM playlists ORDER BY id")
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_playlist)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut playlists = Vec::new();
        for row in rows {
            playlists.push(row.map_err(|e| CatalogError::Database(e.to_string()))?);
        }
        Ok(playlists)
    }

    /// Memberships of a playlist, ordered by play order.
    pub fn members(
        &self,
        playlist_id: PlaylistId,
    ) -> Result<Vec<PlaylistMembership>, CatalogError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT playlist_id, audio_id, play_order FROM playlist_members
                 WHERE playlist_id = ? ORDER BY play_order",
            )
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![playlist_id], |row| {
                Ok(PlaylistMembership {
                    playlist_id: row.get(0)?,
                    item_id: row.get(1)?,
                    play_order: row.get(2)?,
                })
            })
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut members = Vec::new();
        for row in rows {
            members.push(row.map_err(|e| CatalogError::Database(e.to_string()))?);
        }
        Ok(members)
    }
}

impl CatalogClient for SqliteCatalog {
    fn request_access(&self, access: Access) -> Result<AccessGrant, CatalogError> {
        if access == Access::ReadWrite {
            self.ensure_writable()?;
        }
        Ok(AccessGrant::issue(access))
    }

    fn find_item_id_by_path(&self, path: &str) -> Result<Option<ItemId>, CatalogError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id FROM media WHERE is_music != 0 AND path = ? ORDER BY id LIMIT 1",
            params![path],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| CatalogError::Database(e.to_string()))
    }

    fn list_music_items_ordered_by_path(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, path, is_music FROM media
                 WHERE is_music != 0
                 ORDER BY path ASC, id ASC",
            )
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(CatalogItem {
                    id: row.get(0)?,
                    path: row.get(1)?,
                    is_music: row.get(2)?,
                })
            })
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row.map_err(|e| CatalogError::Database(e.to_string()))?);
        }
        Ok(items)
    }

    fn find_playlist_by_name(&self, name: &str) -> Result<Option<Playlist>, CatalogError> {
        let conn = self.conn()?;
        Self::select_playlist_by_name(&conn, name)
    }

    fn create_playlist(&self, name: &str) -> Result<Playlist, CatalogError> {
        self.ensure_writable()?;
        let conn = self.conn()?;
        Self::insert_playlist(&conn, name)
    }

    fn create_playlist_if_absent(&self, name: &str) -> Result<CreateOutcome, CatalogError> {
        self.ensure_writable()?;
        let mut conn = self.conn()?;

        // IMMEDIATE takes the write lock up front so no other connection can
        // insert the same name between the check and the insert.
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let outcome = match Self::select_playlist_by_name(&tx, name)? {
            Some(existing) => CreateOutcome::Existed(existing),
            None => CreateOutcome::Created(Self::insert_playlist(&tx, name)?),
        };

        tx.commit()
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(outcome)
    }

    fn bulk_insert_memberships(
        &self,
        playlist_id: PlaylistId,
        members: &[NewMembership],
    ) -> Result<usize, CatalogError> {
        self.ensure_writable()?;
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let playlist_exists: bool = tx
            .query_row(
                "SELECT 1 FROM playlists WHERE id = ?",
                params![playlist_id],
                |_| Ok(true),
            )
            .optional()
            .map_err(|e| CatalogError::Database(e.to_string()))?
            .unwrap_or(false);

        if !playlist_exists {
            return Err(CatalogError::NotFound(format!("playlist {}", playlist_id)));
        }

        let mut inserted = 0;
        {
            // Rows referencing unknown items or an already used play order are
            // skipped rather than failing the batch.
            let mut stmt = tx
                .prepare(
                    "INSERT OR IGNORE INTO playlist_members (playlist_id, audio_id, play_order)
                     SELECT ?1, id, ?3 FROM media WHERE id = ?2",
                )
                .map_err(|e| CatalogError::Database(e.to_string()))?;

            for member in members {
                inserted += stmt
                    .execute(params![playlist_id, member.item_id, member.play_order])
                    .map_err(|e| CatalogError::Database(e.to_string()))?;
            }
        }

        tx.commit()
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(inserted)
    }
}
