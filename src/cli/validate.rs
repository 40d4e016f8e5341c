// src/cli/validate.rs
use crate::roster::validation::log_report;
use crate::roster::{layout, validate_grid, RosterError, RosterResult};
use crate::storage::{is_roster_file, storage_for_path};
use std::path::{Path, PathBuf};
use tracing::{error, warn};
use walkdir::WalkDir;

/// Returns the number of rosters that failed to load or reported issues.
pub fn run(path: &Path) -> RosterResult<usize> {
    let targets: Vec<PathBuf> = if path.is_dir() {
        WalkDir::new(path)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    warn!("Skipping unreadable entry under '{}': {}", path.display(), e);
                    None
                }
            })
            .filter(|e| e.file_type().is_file() && is_roster_file(e.path()))
            .map(|e| e.into_path())
            .collect()
    } else {
        vec![path.to_path_buf()]
    };

    if targets.is_empty() {
        println!("No roster files found under {}", path.display());
        return Ok(0);
    }

    let mut failing = 0;
    for target in &targets {
        let label = target.display().to_string();
        let checked = storage_for_path(target)
            .load(target)
            .map_err(RosterError::from)
            .and_then(|document| layout::decode(&document));
        match checked {
            Ok(grid) => {
                let report = validate_grid(&grid);
                log_report(&label, &report);
                if report.has_issues() {
                    failing += 1;
                    println!("⚠ {}", label);
                } else {
                    println!("✓ {}", label);
                }
            }
            Err(e) => {
                error!("Could not read roster '{}': {}", label, e);
                println!("✗ {}: {}", label, e);
                failing += 1;
            }
        }
    }

    println!("\n{} of {} rosters need attention", failing, targets.len());
    Ok(failing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::definitions::{Bucket, Grid, LabelSet, Rate};
    use crate::roster::{create_grid, RosterDocument, RosterMetadata, SortKey};
    use crate::storage::test_support::scratch_dir;

    fn save_grid(path: &Path, grid: &Grid) {
        let mut metadata = RosterMetadata::new(LabelSet::default(), 20);
        let cells = layout::encode(grid, &mut metadata);
        storage_for_path(path)
            .save(path, &RosterDocument { metadata, grid: cells })
            .unwrap();
    }

    #[test]
    fn test_directory_scan_counts_failing_rosters() {
        let dir = scratch_dir();
        let labels = LabelSet::default();
        let clean = create_grid(10.0, &["A".to_string(), "B".to_string()], SortKey::AsGiven, &labels).unwrap();
        save_grid(&dir.join("clean.json"), &clean);

        let doubled = Grid {
            title: "团队目标：10 个人目标：5".to_string(),
            quota: 10.0,
            buckets: vec![
                Bucket::with_members(Rate::from_hundredths(1000), ["A"]),
                Bucket::with_members(Rate::from_hundredths(1000), ["B"]),
            ],
        };
        save_grid(&dir.join("nested").join("doubled.db"), &doubled);

        assert_eq!(run(&dir).unwrap(), 1);
        assert_eq!(run(&dir.join("clean.json")).unwrap(), 0);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_unreadable_roster_counts_as_failing() {
        let dir = scratch_dir();
        assert_eq!(run(&dir.join("missing.json")).unwrap(), 1);
        // an empty directory has nothing to check
        assert_eq!(run(&dir).unwrap(), 0);
        std::fs::remove_dir_all(dir).ok();
    }
}
