// src/roster/engine.rs
//! Bucket maintenance for one update event: locate the member, recompute
//! the rate, merge into or create the target bucket, relocate, retire or
//! compact the source bucket, sort, and resize.

use super::definitions::{Grid, LabelSet, Rate, RosterDocument};
use super::error::{RosterError, RosterResult};
use super::events::{Placement, UpdateEvent, UpdateOutcome};
use super::layout;
use crate::storage::DocumentStorage;
use chrono::Utc;
use std::path::Path;
use tracing::{debug, info, warn};

pub struct RosterEngine {
    labels: LabelSet,
}

impl RosterEngine {
    pub fn new(labels: LabelSet) -> Self {
        RosterEngine { labels }
    }

    /// Applies `event` to `grid` in place. On error the grid may be left
    /// half-edited, so callers must only persist it after `Ok`.
    pub fn apply(&self, grid: &mut Grid, event: &UpdateEvent) -> RosterResult<UpdateOutcome> {
        if !grid.quota.is_finite() || grid.quota <= 0.0 {
            return Err(RosterError::Configuration(format!(
                "roster quota must be a positive number, found {}",
                grid.quota
            )));
        }
        if !event.completed_units.is_finite() {
            return Err(RosterError::Configuration(format!(
                "completed units must be a finite number, found {}",
                event.completed_units
            )));
        }

        let source = grid.find_member(&event.name)?;
        let old_rate = grid.bucket_rate(source.bucket)?;
        let new_rate = Rate::from_fraction(old_rate.as_fraction() + event.completed_units / grid.quota)
            .ok_or_else(|| {
                RosterError::Configuration(format!(
                    "rate for '{}' is out of range after adding {} units",
                    event.name, event.completed_units
                ))
            })?;
        debug!(
            "Member '{}' at column {} row {}: {} -> {}.",
            event.name, source.bucket, source.row, old_rate, new_rate
        );

        if new_rate == old_rate {
            grid.sort_buckets();
            grid.resize_columns(&self.labels);
            return Ok(UpdateOutcome {
                name: event.name.clone(),
                old_rate,
                new_rate,
                placement: Placement::Unchanged,
                retired_source: false,
            });
        }

        let (target, placement) = match grid.find_bucket_by_rate(new_rate, Some(source.bucket)) {
            Some(existing) => (existing, Placement::Merged),
            None => {
                let at = source.bucket + 1;
                grid.insert_bucket(at, new_rate)?;
                (at, Placement::Created)
            }
        };

        grid.move_member(&event.name, source, target)?;

        let retired_source = grid.buckets[source.bucket].is_vacant();
        if retired_source {
            grid.delete_bucket(source.bucket)?;
        } else {
            grid.compact_bucket(source.bucket)?;
        }

        grid.sort_buckets();
        grid.resize_columns(&self.labels);

        Ok(UpdateOutcome {
            name: event.name.clone(),
            old_rate,
            new_rate,
            placement,
            retired_source,
        })
    }
}

/// Loads the roster at `path`, applies `event`, and commits the result.
/// Nothing is written unless every step succeeds.
pub fn process_update_event(
    storage: &dyn DocumentStorage,
    path: &Path,
    event: &UpdateEvent,
) -> RosterResult<UpdateOutcome> {
    let document = storage.load(path)?;
    let mut grid = layout::decode(&document)?;
    let mut metadata = document.metadata;

    let engine = RosterEngine::new(metadata.labels.clone());
    let outcome = engine.apply(&mut grid, event).map_err(|e| {
        warn!(
            "Update for '{}' on '{}' aborted; roster left unchanged: {}",
            event.name,
            path.display(),
            e
        );
        e
    })?;

    metadata.updated_at = Some(Utc::now());
    let cells = layout::encode(&grid, &mut metadata);
    storage.save(
        path,
        &RosterDocument {
            metadata,
            grid: cells,
        },
    )?;

    info!(
        "Updated '{}' in '{}' to {} ({:?}).",
        outcome.name,
        path.display(),
        outcome.new_rate,
        outcome.placement
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::definitions::Bucket;
    use crate::roster::validation::validate_grid;

    fn rate(pct: i64) -> Rate {
        Rate::from_hundredths(pct * 100)
    }

    fn grid(quota: f64, buckets: Vec<Bucket>) -> Grid {
        Grid {
            title: format!("团队目标：{} 个人目标：1", quota),
            quota,
            buckets,
        }
    }

    fn engine() -> RosterEngine {
        RosterEngine::new(LabelSet::default())
    }

    fn shape(grid: &Grid) -> Vec<(Rate, Vec<String>)> {
        grid.buckets
            .iter()
            .map(|b| (b.rate, b.names().map(String::from).collect()))
            .collect()
    }

    fn sorted_names(grid: &Grid) -> Vec<String> {
        let mut names: Vec<String> = grid.member_names().into_iter().map(String::from).collect();
        names.sort();
        names
    }

    #[test]
    fn test_create_bucket_for_new_rate() {
        let mut g = grid(10.0, vec![Bucket::with_members(rate(0), ["A", "B", "C"])]);
        let outcome = engine().apply(&mut g, &UpdateEvent::new("A", 2.0)).unwrap();

        assert_eq!(outcome.placement, Placement::Created);
        assert_eq!(outcome.new_rate, rate(20));
        assert!(!outcome.retired_source);
        assert_eq!(
            shape(&g),
            vec![
                (rate(20), vec!["A".to_string()]),
                (rate(0), vec!["B".to_string(), "C".to_string()]),
            ]
        );
        assert!(!validate_grid(&g).has_issues());
    }

    #[test]
    fn test_merge_into_existing_rate_and_retire_source() {
        let mut g = grid(
            20.0,
            vec![
                Bucket::with_members(rate(40), ["A", "B"]),
                Bucket::with_members(rate(25), ["C"]),
            ],
        );
        let outcome = engine().apply(&mut g, &UpdateEvent::new("C", 3.0)).unwrap();

        assert_eq!(outcome.placement, Placement::Merged);
        assert!(outcome.retired_source);
        assert_eq!(
            shape(&g),
            vec![(rate(40), vec!["A".to_string(), "B".to_string(), "C".to_string()])]
        );
    }

    #[test]
    fn test_merge_compares_displayed_rate() {
        // 1/3 of the quota shows as 33.33%, same as the existing bucket
        let mut g = grid(
            3.0,
            vec![
                Bucket::with_members(Rate::from_hundredths(3333), ["A"]),
                Bucket::with_members(rate(0), ["B"]),
            ],
        );
        let outcome = engine().apply(&mut g, &UpdateEvent::new("B", 1.0)).unwrap();
        assert_eq!(outcome.placement, Placement::Merged);
        assert_eq!(g.buckets.len(), 1);
        assert_eq!(g.buckets[0].member_count(), 2);
    }

    #[test]
    fn test_source_is_compacted_after_middle_removal() {
        let mut g = grid(10.0, vec![Bucket::with_members(rate(0), ["A", "B", "C", "D"])]);
        engine().apply(&mut g, &UpdateEvent::new("B", 1.0)).unwrap();

        let zero = &g.buckets[1];
        assert_eq!(zero.rate, rate(0));
        assert_eq!(
            zero.members,
            vec![Some("A".to_string()), Some("C".to_string()), Some("D".to_string())]
        );
        assert!(validate_grid(&g).interior_gaps.is_empty());
    }

    #[test]
    fn test_zero_units_leaves_structure_unchanged() {
        let mut g = grid(
            10.0,
            vec![
                Bucket::with_members(rate(30), ["A"]),
                Bucket::with_members(rate(0), ["B", "C"]),
            ],
        );
        let before = shape(&g);
        let outcome = engine().apply(&mut g, &UpdateEvent::new("C", 0.0)).unwrap();
        assert_eq!(outcome.placement, Placement::Unchanged);
        assert_eq!(shape(&g), before);
        assert_eq!(g.find_member("C").unwrap().row, 1);
    }

    #[test]
    fn test_rate_may_exceed_one_hundred_percent() {
        let mut g = grid(4.0, vec![Bucket::with_members(rate(0), ["A", "B"])]);
        let outcome = engine().apply(&mut g, &UpdateEvent::new("A", 6.0)).unwrap();
        assert_eq!(outcome.new_rate, rate(150));
        assert_eq!(g.buckets[0].rate, rate(150));
    }

    #[test]
    fn test_fractional_units_accumulate() {
        let mut g = grid(8.0, vec![Bucket::with_members(rate(0), ["A", "B"])]);
        engine().apply(&mut g, &UpdateEvent::new("A", 0.5)).unwrap();
        engine().apply(&mut g, &UpdateEvent::new("A", 0.5)).unwrap();
        assert_eq!(g.bucket_rate(g.find_member("A").unwrap().bucket).unwrap(), Rate::from_hundredths(1250));
        // B catching up merges into A's bucket
        engine().apply(&mut g, &UpdateEvent::new("B", 1.0)).unwrap();
        assert_eq!(shape(&g), vec![(Rate::from_hundredths(1250), vec!["A".to_string(), "B".to_string()])]);
    }

    #[test]
    fn test_new_bucket_is_sorted_into_place() {
        let mut g = grid(
            10.0,
            vec![
                Bucket::with_members(rate(50), ["A"]),
                Bucket::with_members(rate(10), ["B"]),
                Bucket::with_members(rate(0), ["C", "D"]),
            ],
        );
        engine().apply(&mut g, &UpdateEvent::new("D", 3.0)).unwrap();
        let rates: Vec<Rate> = g.buckets.iter().map(|b| b.rate).collect();
        assert_eq!(rates, vec![rate(50), rate(30), rate(10), rate(0)]);
        assert!(g.buckets.iter().all(|b| b.width.is_some()));
    }

    #[test]
    fn test_negative_units_move_member_down() {
        let mut g = grid(
            10.0,
            vec![
                Bucket::with_members(rate(20), ["A"]),
                Bucket::with_members(rate(0), ["B"]),
            ],
        );
        let outcome = engine().apply(&mut g, &UpdateEvent::new("A", -2.0)).unwrap();
        assert_eq!(outcome.placement, Placement::Merged);
        assert!(outcome.retired_source);
        assert_eq!(shape(&g), vec![(rate(0), vec!["B".to_string(), "A".to_string()])]);
    }

    #[test]
    fn test_unknown_member_is_reported() {
        let mut g = grid(10.0, vec![Bucket::with_members(rate(0), ["A"])]);
        let before = g.clone();
        let err = engine().apply(&mut g, &UpdateEvent::new("Nobody", 1.0)).unwrap_err();
        assert!(matches!(err, RosterError::MemberNotFound { ref name } if name == "Nobody"));
        assert_eq!(g, before);
    }

    #[test]
    fn test_zero_quota_is_configuration_error() {
        let mut g = grid(0.0, vec![Bucket::with_members(rate(0), ["A"])]);
        assert!(matches!(
            engine().apply(&mut g, &UpdateEvent::new("A", 1.0)),
            Err(RosterError::Configuration(_))
        ));
        let mut g = grid(10.0, vec![Bucket::with_members(rate(0), ["A"])]);
        assert!(matches!(
            engine().apply(&mut g, &UpdateEvent::new("A", f64::NAN)),
            Err(RosterError::Configuration(_))
        ));
    }

    #[test]
    fn test_event_sequence_keeps_invariants() {
        let names = ["A", "B", "C", "D", "E", "F"];
        let mut g = grid(12.0, vec![Bucket::with_members(rate(0), names)]);
        let before = sorted_names(&g);
        let events = [
            ("C", 1.0),
            ("A", 2.0),
            ("F", 1.0),
            ("C", 1.0),
            ("B", 2.0),
            ("D", 0.0),
            ("E", 3.0),
            ("A", 1.0),
            ("F", 0.5),
            ("F", 0.5),
            ("D", 4.0),
            ("E", -1.0),
        ];
        for (name, units) in events {
            engine().apply(&mut g, &UpdateEvent::new(name, units)).unwrap();
            let report = validate_grid(&g);
            assert!(!report.has_issues(), "after {} +{}: {:?}", name, units, report);
            assert_eq!(sorted_names(&g), before);
        }
    }

    fn saved_roster(storage: &dyn DocumentStorage, path: &Path) {
        let mut metadata = crate::roster::RosterMetadata::new(LabelSet::default(), 20);
        let g = grid(10.0, vec![Bucket::with_members(rate(0), ["A", "B"])]);
        let cells = layout::encode(&g, &mut metadata);
        storage
            .save(path, &RosterDocument { metadata, grid: cells })
            .unwrap();
    }

    #[test]
    fn test_process_update_persists_result() {
        let dir = crate::storage::test_support::scratch_dir();
        let path = dir.join("team.json");
        let storage = crate::storage::JsonGridStorage;
        saved_roster(&storage, &path);

        let title_before = storage.load(&path).unwrap().grid[layout::TITLE_ROW][0].clone();

        let outcome = process_update_event(&storage, &path, &UpdateEvent::new("B", 2.0)).unwrap();
        assert_eq!(outcome.placement, Placement::Created);

        let document = storage.load(&path).unwrap();
        assert!(document.metadata.updated_at.is_some());
        assert_eq!(document.grid[layout::TITLE_ROW][0], title_before);
        let reloaded = layout::decode(&document).unwrap();
        assert_eq!(
            shape(&reloaded),
            vec![(rate(20), vec!["B".to_string()]), (rate(0), vec!["A".to_string()])]
        );

        // merge that retires the 0.00% bucket
        let outcome = process_update_event(&storage, &path, &UpdateEvent::new("A", 2.0)).unwrap();
        assert!(outcome.retired_source);
        let document = storage.load(&path).unwrap();
        assert_eq!(document.grid[layout::TITLE_ROW][0], title_before);
        assert_eq!(
            shape(&layout::decode(&document).unwrap()),
            vec![(rate(20), vec!["B".to_string(), "A".to_string()])]
        );
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_failed_update_leaves_stored_roster_untouched() {
        let dir = crate::storage::test_support::scratch_dir();
        let path = dir.join("team.db");
        let storage = crate::storage::SqliteGridStorage;
        saved_roster(&storage, &path);
        let before = storage.load(&path).unwrap().grid;

        let err = process_update_event(&storage, &path, &UpdateEvent::new("Z", 1.0)).unwrap_err();
        assert!(matches!(err, RosterError::MemberNotFound { .. }));
        assert_eq!(storage.load(&path).unwrap().grid, before);
        std::fs::remove_dir_all(dir).ok();
    }
}
