// src/storage/json_grid.rs

use super::DocumentStorage;
use crate::roster::{RosterDocument, StorageError, StorageResult};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, trace, warn};

/// Roster stored as one pretty-printed JSON document.
pub struct JsonGridStorage;

/// Sibling path used while writing, renamed over the target on success.
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "roster.json".to_string());
    path.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()))
}

impl DocumentStorage for JsonGridStorage {
    fn load(&self, path: &Path) -> StorageResult<RosterDocument> {
        let content = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
        let trimmed = content.trim_start_matches('\u{FEFF}');
        if trimmed.trim().is_empty() {
            return Err(StorageError::Layout(format!(
                "roster file '{}' is empty",
                path.display()
            )));
        }
        let document: RosterDocument = serde_json::from_str(trimmed)?;
        trace!(
            "Loaded roster '{}' ({} rows).",
            path.display(),
            document.grid.len()
        );
        Ok(document)
    }

    fn save(&self, path: &Path, document: &RosterDocument) -> StorageResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let temp_path = temp_path_for(path);
        let written = (|| -> StorageResult<()> {
            let file = File::create(&temp_path).map_err(|e| StorageError::io(&temp_path, e))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, document)?;
            writer.flush().map_err(|e| StorageError::io(&temp_path, e))?;
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| StorageError::io(&temp_path, e))?;
            fs::rename(&temp_path, path).map_err(|e| StorageError::io(path, e))
        })();

        if let Err(e) = written {
            warn!(
                "Failed to save roster '{}'; previous file kept: {}",
                path.display(),
                e
            );
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        info!("Saved roster to '{}'.", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::definitions::LabelSet;
    use crate::roster::RosterMetadata;
    use crate::storage::test_support::scratch_dir;

    fn document() -> RosterDocument {
        RosterDocument {
            metadata: RosterMetadata::new(LabelSet::default(), 20),
            grid: vec![
                vec!["团队目标：10 个人目标：5".to_string()],
                vec![String::new()],
                vec![String::new()],
                vec!["个人达成率0.00%".to_string()],
                vec!["A".to_string()],
                vec!["B".to_string()],
            ],
        }
    }

    #[test]
    fn test_save_then_load_returns_same_cells() {
        let dir = scratch_dir();
        let path = dir.join("team.json");
        JsonGridStorage.save(&path, &document()).unwrap();
        let loaded = JsonGridStorage.load(&path).unwrap();
        assert_eq!(loaded.grid, document().grid);
        assert_eq!(loaded.metadata.labels, LabelSet::default());

        // no temp files left behind
        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_accepts_bom_and_rejects_empty() {
        let dir = scratch_dir();
        let path = dir.join("bom.json");
        let json = serde_json::to_string(&document()).unwrap();
        fs::write(&path, format!("\u{FEFF}{}", json)).unwrap();
        assert_eq!(JsonGridStorage.load(&path).unwrap().grid.len(), 6);

        let empty = dir.join("empty.json");
        fs::write(&empty, "  ").unwrap();
        assert!(matches!(
            JsonGridStorage.load(&empty),
            Err(StorageError::Layout(_))
        ));
        assert!(matches!(
            JsonGridStorage.load(&dir.join("missing.json")),
            Err(StorageError::Io { .. })
        ));
        fs::remove_dir_all(dir).ok();
    }
}
