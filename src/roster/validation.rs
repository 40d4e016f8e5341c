// src/roster/validation.rs

use super::definitions::{Grid, Rate};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// Structural problems found in a roster grid.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationReport {
    /// Displayed rates carried by more than one bucket.
    pub duplicate_rates: Vec<Rate>,
    /// Names occupying more than one slot.
    pub duplicate_members: Vec<String>,
    /// Bucket indices with no members.
    pub empty_buckets: Vec<usize>,
    /// Bucket indices whose rate is higher than the bucket to their left.
    pub unsorted_at: Vec<usize>,
    /// Bucket indices with an empty slot above an occupied one.
    pub interior_gaps: Vec<usize>,
}

impl ValidationReport {
    pub fn has_issues(&self) -> bool {
        !(self.duplicate_rates.is_empty()
            && self.duplicate_members.is_empty()
            && self.empty_buckets.is_empty()
            && self.unsorted_at.is_empty()
            && self.interior_gaps.is_empty())
    }
}

pub fn validate_grid(grid: &Grid) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut seen_rates: HashSet<Rate> = HashSet::new();
    let mut name_counts: HashMap<&str, usize> = HashMap::new();

    for (idx, bucket) in grid.buckets.iter().enumerate() {
        if !seen_rates.insert(bucket.rate) && !report.duplicate_rates.contains(&bucket.rate) {
            report.duplicate_rates.push(bucket.rate);
        }
        if bucket.is_vacant() {
            report.empty_buckets.push(idx);
        }
        if idx > 0 && grid.buckets[idx - 1].rate < bucket.rate {
            report.unsorted_at.push(idx);
        }
        let last_occupied = bucket.members.iter().rposition(Option::is_some);
        if let Some(last) = last_occupied {
            if bucket.members[..last].iter().any(Option::is_none) {
                report.interior_gaps.push(idx);
            }
        }
        for name in bucket.names() {
            *name_counts.entry(name).or_insert(0) += 1;
        }
    }

    let mut duplicates: Vec<String> = name_counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name.to_string())
        .collect();
    duplicates.sort();
    report.duplicate_members = duplicates;
    report
}

/// Logs a summary of `report` for the roster called `label`.
pub fn log_report(label: &str, report: &ValidationReport) {
    if !report.has_issues() {
        info!("✓ {}: all roster invariants hold", label);
        return;
    }
    warn!("⚠ {}: roster invariants violated", label);
    for rate in &report.duplicate_rates {
        warn!("  duplicate bucket rate {}", rate);
    }
    for name in &report.duplicate_members {
        warn!("  member '{}' appears in more than one slot", name);
    }
    for idx in &report.empty_buckets {
        warn!("  bucket at column {} has no members", idx);
    }
    for idx in &report.unsorted_at {
        warn!("  bucket at column {} is out of rate order", idx);
    }
    for idx in &report.interior_gaps {
        warn!("  bucket at column {} has an interior gap", idx);
    }
}
