// src/storage/sqlite.rs

use super::DocumentStorage;
use crate::roster::{RosterDocument, RosterMetadata, StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

const METADATA_KEY: &str = "roster_metadata";
const ROW_COUNT_KEY: &str = "row_count";
const COLUMN_COUNT_KEY: &str = "column_count";

/// Roster stored in a SQLite database: a key/value `_Metadata` table and
/// one `Cells` row per non-empty cell.
pub struct SqliteGridStorage;

impl SqliteGridStorage {
    fn open(path: &Path) -> StorageResult<Connection> {
        let conn = Connection::open(path)?;

        let journal_mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        if journal_mode.to_uppercase() != "WAL" {
            warn!(
                "Failed to set WAL mode on roster database {:?}. Current mode: {}",
                path.file_name(),
                journal_mode
            );
        } else {
            debug!("WAL mode activated for roster database {:?}", path.file_name());
        }

        conn.execute_batch(
            "PRAGMA synchronous=NORMAL;
             PRAGMA busy_timeout=5000;
             CREATE TABLE IF NOT EXISTS _Metadata (
                 key TEXT PRIMARY KEY,
                 value TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS Cells (
                 row_index INTEGER NOT NULL,
                 column_index INTEGER NOT NULL,
                 value TEXT NOT NULL,
                 PRIMARY KEY (row_index, column_index)
             );",
        )?;
        Ok(conn)
    }

    fn read_value(conn: &Connection, key: &str) -> StorageResult<Option<String>> {
        Ok(conn
            .query_row("SELECT value FROM _Metadata WHERE key = ?", [key], |row| row.get(0))
            .optional()?)
    }

    fn read_count(conn: &Connection, key: &str) -> StorageResult<usize> {
        let raw = Self::read_value(conn, key)?
            .ok_or_else(|| StorageError::Layout(format!("database has no '{}' entry", key)))?;
        raw.parse()
            .map_err(|_| StorageError::Layout(format!("'{}' is not a count: '{}'", key, raw)))
    }
}

impl DocumentStorage for SqliteGridStorage {
    fn load(&self, path: &Path) -> StorageResult<RosterDocument> {
        // Connection::open would silently create a new database.
        if !path.exists() {
            return Err(StorageError::io(
                path,
                io::Error::new(io::ErrorKind::NotFound, "roster database does not exist"),
            ));
        }
        let conn = Self::open(path)?;

        let metadata_json = Self::read_value(&conn, METADATA_KEY)?.ok_or_else(|| {
            StorageError::Layout(format!("'{}' holds no roster metadata", path.display()))
        })?;
        let metadata: RosterMetadata = serde_json::from_str(&metadata_json)?;
        let rows = Self::read_count(&conn, ROW_COUNT_KEY)?;
        let columns = Self::read_count(&conn, COLUMN_COUNT_KEY)?;

        let mut grid = vec![vec![String::new(); columns]; rows];
        let mut stmt = conn.prepare("SELECT row_index, column_index, value FROM Cells")?;
        let cells = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        for cell in cells {
            let (row, col, value) = cell?;
            let slot = usize::try_from(row)
                .ok()
                .zip(usize::try_from(col).ok())
                .and_then(|(r, c)| grid.get_mut(r).and_then(|cells| cells.get_mut(c)));
            match slot {
                Some(slot) => *slot = value,
                None => {
                    return Err(StorageError::Layout(format!(
                        "cell ({}, {}) lies outside the stored {}x{} grid",
                        row, col, rows, columns
                    )))
                }
            }
        }

        debug!("Loaded roster database '{}' ({}x{}).", path.display(), rows, columns);
        Ok(RosterDocument { metadata, grid })
    }

    fn save(&self, path: &Path, document: &RosterDocument) -> StorageResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
        let mut conn = Self::open(path)?;
        let rows = document.grid.len();
        let columns = document.grid.iter().map(Vec::len).max().unwrap_or(0);

        let tx = conn.transaction()?;
        tx.execute("DELETE FROM Cells", [])?;
        tx.execute("DELETE FROM _Metadata", [])?;
        {
            let mut meta = tx.prepare("INSERT INTO _Metadata (key, value) VALUES (?, ?)")?;
            meta.execute(params![METADATA_KEY, serde_json::to_string(&document.metadata)?])?;
            meta.execute(params![ROW_COUNT_KEY, rows.to_string()])?;
            meta.execute(params![COLUMN_COUNT_KEY, columns.to_string()])?;

            let mut insert =
                tx.prepare("INSERT INTO Cells (row_index, column_index, value) VALUES (?, ?, ?)")?;
            for (r, row) in document.grid.iter().enumerate() {
                for (c, value) in row.iter().enumerate() {
                    if !value.is_empty() {
                        insert.execute(params![r as i64, c as i64, value])?;
                    }
                }
            }
        }
        tx.commit()?;

        info!("Saved roster to database '{}'.", path.display());
        Ok(())
    }
}
