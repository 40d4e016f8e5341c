// src/roster/layout.rs
//! Cell layout of a persisted roster and the label codec.
//!
//! ```text
//! row 0   | <title, merged across rows 0-1 and the title span>
//! row 1   |
//! row 2   | (blank)
//! row 3   | <prefix>40.00% | <prefix>25.00% | <prefix>0.00% | ...
//! row 4.. | name           | name           | name          | ...
//! ```

use super::definitions::{normalize_name, Bucket, Grid, LabelSet, Rate, RosterDocument, RosterMetadata};
use super::error::{RosterError, RosterResult, StorageError};
use tracing::{debug, warn};

pub const TITLE_ROW: usize = 0;
pub const TITLE_BLOCK_ROWS: usize = 2;
pub const HEADER_ROW: usize = 3;
pub const FIRST_MEMBER_ROW: usize = 4;

pub fn format_rate_label(labels: &LabelSet, rate: Rate) -> String {
    format!("{}{}", labels.rate_label_prefix, rate)
}

/// Parses `"<prefix><percent>%"` back into a rate. `column` is only used
/// for error context.
pub fn parse_rate_label(labels: &LabelSet, column: usize, content: &str) -> RosterResult<Rate> {
    let malformed = || RosterError::MalformedHeader {
        column,
        content: content.to_string(),
    };
    let number = content
        .trim()
        .strip_prefix(labels.rate_label_prefix.as_str())
        .ok_or_else(malformed)?
        .trim()
        .strip_suffix('%')
        .ok_or_else(malformed)?
        .trim();
    let percent: f64 = number.parse().map_err(|_| malformed())?;
    Rate::from_percent(percent).ok_or_else(malformed)
}

/// Writes integral values without a fractional part (`10`, not `10.0`).
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

pub fn format_title(labels: &LabelSet, quota: f64, member_count: usize) -> String {
    let share = if member_count > 0 {
        quota / member_count as f64
    } else {
        0.0
    };
    format!(
        "{}{}{}{}",
        labels.team_label,
        format_number(quota),
        labels.individual_label,
        format_number(share)
    )
}

/// Extracts the team quota from `"<team><quota><individual><share>"`.
pub fn parse_quota(labels: &LabelSet, title: &str) -> RosterResult<f64> {
    let invalid = || RosterError::Configuration(format!("title does not encode a quota: '{}'", title));
    let after_team = title
        .split_once(labels.team_label.as_str())
        .map(|(_, rest)| rest)
        .ok_or_else(invalid)?;
    let quota_text = match after_team.split_once(labels.individual_label.as_str()) {
        Some((quota, _)) => quota,
        None => after_team,
    };
    let quota: f64 = quota_text.trim().parse().map_err(|_| invalid())?;
    if !quota.is_finite() {
        return Err(invalid());
    }
    Ok(quota)
}

/// Number of columns the merged title block covers.
pub fn title_span(metadata: &RosterMetadata, bucket_count: usize) -> usize {
    metadata.min_title_span.max(bucket_count).max(1)
}

/// Renders the grid as literal cells and records column widths in `metadata`.
pub fn encode(grid: &Grid, metadata: &mut RosterMetadata) -> Vec<Vec<String>> {
    let columns = grid.buckets.len().max(1);
    let depth = grid
        .buckets
        .iter()
        .map(|b| b.members.len())
        .max()
        .unwrap_or(0);

    let mut cells = vec![vec![String::new(); columns]; FIRST_MEMBER_ROW + depth];
    cells[TITLE_ROW][0] = grid.title.clone();

    for (col, bucket) in grid.buckets.iter().enumerate() {
        cells[HEADER_ROW][col] = format_rate_label(&metadata.labels, bucket.rate);
        for (row, slot) in bucket.members.iter().enumerate() {
            if let Some(name) = slot {
                cells[FIRST_MEMBER_ROW + row][col] = name.clone();
            }
        }
    }

    metadata.column_widths = grid.buckets.iter().map(|b| b.width).collect();
    cells
}

/// Rebuilds the in-memory grid from a stored document.
pub fn decode(document: &RosterDocument) -> RosterResult<Grid> {
    let cells = &document.grid;
    let labels = &document.metadata.labels;
    if cells.len() < FIRST_MEMBER_ROW {
        return Err(StorageError::Layout(format!(
            "expected at least {} rows (title block, blank row, header row), found {}",
            FIRST_MEMBER_ROW,
            cells.len()
        ))
        .into());
    }

    let title = cells[TITLE_ROW].first().cloned().unwrap_or_default();
    let quota = parse_quota(labels, &title)?;

    let columns = cells.iter().map(Vec::len).max().unwrap_or(0);

    let mut buckets = Vec::new();
    for col in 0..columns {
        let mut members: Vec<Option<String>> = (FIRST_MEMBER_ROW..cells.len())
            .map(|row| {
                let value = cell_at(cells, row, col);
                (!value.is_empty()).then(|| normalize_name(value))
            })
            .collect();
        while matches!(members.last(), Some(None)) {
            members.pop();
        }

        let header = cell_at(cells, HEADER_ROW, col);
        if header.is_empty() {
            if members.is_empty() {
                debug!("Skipping blank column {} while decoding roster.", col);
                continue;
            }
            warn!("Column {} holds members but has no bucket header.", col);
        }
        let rate = parse_rate_label(labels, col, header)?;

        // widths are stored per bucket, not per cell column
        let width = document
            .metadata
            .column_widths
            .get(buckets.len())
            .copied()
            .flatten();
        buckets.push(Bucket {
            rate,
            members,
            width,
        });
    }

    Ok(Grid {
        title,
        quota,
        buckets,
    })
}

fn cell_at(cells: &[Vec<String>], row: usize, col: usize) -> &str {
    cells
        .get(row)
        .and_then(|r| r.get(col))
        .map(|s| s.trim())
        .unwrap_or("")
}
