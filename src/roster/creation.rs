// src/roster/creation.rs
// Initial population of a new roster.

use super::definitions::{normalize_name, Bucket, Grid, LabelSet, Rate};
use super::error::{RosterError, RosterResult};
use super::layout::format_title;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

/// Order of names in the initial 0.00% bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Stable sort on the first character only.
    #[default]
    FirstChar,
    /// Full string comparison.
    Lexical,
    /// Keep the order the names were given in.
    AsGiven,
}

/// Builds a fresh grid: every member in one bucket at 0.00%.
pub fn create_grid(
    quota: f64,
    names: &[String],
    sort: SortKey,
    labels: &LabelSet,
) -> RosterResult<Grid> {
    if !quota.is_finite() || quota < 0.0 {
        return Err(RosterError::Configuration(format!(
            "team quota must be a non-negative number, found {}",
            quota
        )));
    }

    let mut members: Vec<String> = Vec::with_capacity(names.len());
    let mut seen = HashSet::new();
    for raw in names {
        let name = normalize_name(raw);
        if name.is_empty() {
            return Err(RosterError::Configuration(
                "member names must not be empty".to_string(),
            ));
        }
        if !seen.insert(name.clone()) {
            return Err(RosterError::Configuration(format!(
                "member '{}' is listed more than once",
                name
            )));
        }
        members.push(name);
    }

    match sort {
        SortKey::FirstChar => members.sort_by_key(|n| n.chars().next()),
        SortKey::Lexical => members.sort(),
        SortKey::AsGiven => {}
    }

    let title = format_title(labels, quota, members.len());
    let buckets = if members.is_empty() {
        Vec::new()
    } else {
        vec![Bucket::with_members(Rate::ZERO, members)]
    };
    let mut grid = Grid {
        title,
        quota,
        buckets,
    };
    grid.resize_columns(labels);

    info!(
        "Created roster with {} member(s), quota {}.",
        grid.member_names().len(),
        quota
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_char_sort_is_stable() {
        let grid = create_grid(
            10.0,
            &names(&["Bob", "Anna", "Bea", "Al"]),
            SortKey::FirstChar,
            &LabelSet::default(),
        )
        .unwrap();
        assert_eq!(grid.buckets.len(), 1);
        assert_eq!(grid.buckets[0].rate, Rate::ZERO);
        assert_eq!(
            grid.buckets[0].names().collect::<Vec<_>>(),
            vec!["Anna", "Al", "Bob", "Bea"]
        );
        assert_eq!(grid.title, "团队目标：10 个人目标：2.5");
        assert!(grid.buckets[0].width.is_some());
    }

    #[test]
    fn test_lexical_and_as_given_orders() {
        let list = names(&["Bob", "Anna", "Al"]);
        let labels = LabelSet::default();
        let lexical = create_grid(3.0, &list, SortKey::Lexical, &labels).unwrap();
        assert_eq!(lexical.member_names(), vec!["Al", "Anna", "Bob"]);
        let given = create_grid(3.0, &list, SortKey::AsGiven, &labels).unwrap();
        assert_eq!(given.member_names(), vec!["Bob", "Anna", "Al"]);
    }

    #[test]
    fn test_empty_roster_has_zero_share() {
        let grid = create_grid(10.0, &[], SortKey::FirstChar, &LabelSet::default()).unwrap();
        assert!(grid.buckets.is_empty());
        assert_eq!(grid.title, "团队目标：10 个人目标：0");
    }

    #[test]
    fn test_rejects_duplicates_and_bad_quota() {
        let labels = LabelSet::default();
        assert!(matches!(
            create_grid(10.0, &names(&["A", " A "]), SortKey::AsGiven, &labels),
            Err(RosterError::Configuration(_))
        ));
        assert!(matches!(
            create_grid(f64::NAN, &names(&["A"]), SortKey::AsGiven, &labels),
            Err(RosterError::Configuration(_))
        ));
        assert!(matches!(
            create_grid(-1.0, &names(&["A"]), SortKey::AsGiven, &labels),
            Err(RosterError::Configuration(_))
        ));
    }
}
