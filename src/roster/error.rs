// src/roster/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while loading, persisting or exporting a roster document.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("XLSX export error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("Invalid document layout: {0}")]
    Layout(String),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Outcome kinds of a roster operation. Any of these aborts the current
/// update event before anything is committed.
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Member '{name}' not found in roster")]
    MemberNotFound { name: String },
    #[error("Bucket header in column {column} is not a rate label: '{content}'")]
    MalformedHeader { column: usize, content: String },
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Bucket index {index} out of range ({len} buckets)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type RosterResult<T> = Result<T, RosterError>;
