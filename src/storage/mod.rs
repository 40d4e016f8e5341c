// src/storage/mod.rs
// Document storage: the only code that reads or writes roster files.

pub mod json_grid;
pub mod sqlite;
pub mod xlsx_export;

use crate::roster::{RosterDocument, StorageResult};
use std::path::Path;

pub use json_grid::JsonGridStorage;
pub use sqlite::SqliteGridStorage;
pub use xlsx_export::export_xlsx;

/// Loads and persists whole roster documents. Each call is one complete
/// read or one complete write; a failed `save` leaves the previous
/// document in place.
pub trait DocumentStorage {
    fn load(&self, path: &Path) -> StorageResult<RosterDocument>;
    fn save(&self, path: &Path, document: &RosterDocument) -> StorageResult<()>;
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Picks the backend from the file extension: SQLite for `.db`/`.sqlite`,
/// JSON for everything else.
pub fn storage_for_path(path: &Path) -> Box<dyn DocumentStorage> {
    match extension_of(path).as_deref() {
        Some("db") | Some("sqlite") | Some("sqlite3") => Box::new(SqliteGridStorage),
        _ => Box::new(JsonGridStorage),
    }
}

/// True for files a directory scan should treat as rosters.
pub fn is_roster_file(path: &Path) -> bool {
    matches!(
        extension_of(path).as_deref(),
        Some("json") | Some("db") | Some("sqlite") | Some("sqlite3")
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    /// Fresh, empty directory under the system temp dir.
    pub fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rate_roster_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }
}
