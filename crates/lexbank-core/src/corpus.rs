//! SQLite-backed store for extracted legislation bodies.
//!
//! One `regulations` table, hand-written SQL over [`rusqlite`]. Records are
//! keyed by name; inserting a name that already exists replaces the stored
//! body. The store reports what was replaced so callers can tell a fresh
//! seed from a re-seed.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A regulation body about to be stored.
#[derive(Debug, Clone)]
pub struct NewRegulation {
    pub name: String,
    pub body: String,
    pub page_count: usize,
    /// Path the body was extracted from, if it came from a file.
    pub source_path: Option<String>,
}

/// A stored regulation record.
#[derive(Debug, Clone, Serialize)]
pub struct Regulation {
    pub id: i64,
    pub name: String,
    pub body: String,
    pub page_count: usize,
    pub source_path: Option<String>,
    /// Unix epoch seconds at insert time.
    pub added_at: u64,
}

/// A listing entry: everything but the body, which can run to megabytes.
#[derive(Debug, Clone, Serialize)]
pub struct RegulationSummary {
    pub id: i64,
    pub name: String,
    pub page_count: usize,
    pub body_chars: usize,
    pub added_at: u64,
}

/// What an insert did: `Inserted` = new name, `Replaced` = an existing body
/// was overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Replaced,
}

/// Open a SQLite connection with WAL mode and standard pragmas.
fn open_sqlite(path: &Path) -> Result<Connection, rusqlite::Error> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags)?;
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA busy_timeout = 5000;",
    )?;
    Ok(conn)
}

fn epoch_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Persistent corpus of extracted legislation bodies.
pub struct CorpusStore {
    conn: Connection,
}

impl CorpusStore {
    /// Open (or create) the corpus database at `path`.
    ///
    /// The parent directory is created if it does not exist.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = open_sqlite(path)?;
        let store = Self::init(conn)?;
        tracing::info!(path = %path.display(), "opened corpus store");
        Ok(store)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS regulations (
                 id          INTEGER PRIMARY KEY,
                 name        TEXT NOT NULL UNIQUE,
                 body        TEXT NOT NULL,
                 page_count  INTEGER NOT NULL,
                 source_path TEXT,
                 added_at    INTEGER NOT NULL
             );",
        )?;
        Ok(Self { conn })
    }

    /// Insert a record, replacing any existing record with the same name.
    pub fn insert(&self, record: &NewRegulation) -> Result<InsertOutcome, StoreError> {
        let previous: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM regulations WHERE name = ?1",
                params![record.name],
                |row| row.get(0),
            )
            .optional()?;

        self.conn.execute(
            "INSERT OR REPLACE INTO regulations (name, body, page_count, source_path, added_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.name,
                record.body,
                record.page_count as i64,
                record.source_path,
                epoch_now(),
            ],
        )?;

        Ok(if previous.is_some() {
            InsertOutcome::Replaced
        } else {
            InsertOutcome::Inserted
        })
    }

    /// Fetch a full record by name.
    pub fn get(&self, name: &str) -> Result<Option<Regulation>, StoreError> {
        let record = self
            .conn
            .query_row(
                "SELECT id, name, body, page_count, source_path, added_at
                 FROM regulations WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Regulation {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        body: row.get(2)?,
                        page_count: row.get::<_, i64>(3)? as usize,
                        source_path: row.get(4)?,
                        added_at: row.get::<_, i64>(5)? as u64,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// List summaries of every record, ordered by name.
    pub fn list(&self) -> Result<Vec<RegulationSummary>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, page_count, length(body), added_at
             FROM regulations ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(RegulationSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                page_count: row.get::<_, i64>(2)? as usize,
                body_chars: row.get::<_, i64>(3)? as usize,
                added_at: row.get::<_, i64>(4)? as u64,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Fetch every full record, ordered by name.
    pub fn all(&self) -> Result<Vec<Regulation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, body, page_count, source_path, added_at
             FROM regulations ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Regulation {
                id: row.get(0)?,
                name: row.get(1)?,
                body: row.get(2)?,
                page_count: row.get::<_, i64>(3)? as usize,
                source_path: row.get(4)?,
                added_at: row.get::<_, i64>(5)? as u64,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Delete a record by name. Returns true if a record was deleted.
    pub fn remove(&self, name: &str) -> Result<bool, StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM regulations WHERE name = ?1", params![name])?;
        Ok(deleted > 0)
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM regulations", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}
