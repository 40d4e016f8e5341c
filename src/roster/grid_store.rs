// src/roster/grid_store.rs
// Addressable row/column primitives over the in-memory roster grid.

use super::definitions::{normalize_name, Bucket, Grid, LabelSet, Rate, SlotRef};
use super::error::{RosterError, RosterResult};
use super::layout::format_rate_label;
use super::width::column_width;
use tracing::{debug, trace};

impl Grid {
    fn check_index(&self, index: usize) -> RosterResult<()> {
        if index < self.buckets.len() {
            Ok(())
        } else {
            Err(RosterError::IndexOutOfRange {
                index,
                len: self.buckets.len(),
            })
        }
    }

    /// Scans buckets left to right and slots top to bottom; first match wins.
    pub fn find_member(&self, name: &str) -> RosterResult<SlotRef> {
        let wanted = normalize_name(name);
        for (bucket_idx, bucket) in self.buckets.iter().enumerate() {
            for (row, slot) in bucket.members.iter().enumerate() {
                if slot.as_deref() == Some(wanted.as_str()) {
                    return Ok(SlotRef {
                        bucket: bucket_idx,
                        row,
                    });
                }
            }
        }
        Err(RosterError::MemberNotFound { name: wanted })
    }

    /// Rate held in the header of bucket `index`.
    pub fn bucket_rate(&self, index: usize) -> RosterResult<Rate> {
        self.check_index(index)?;
        Ok(self.buckets[index].rate)
    }

    /// First bucket (other than `excluding`) whose displayed rate equals `rate`.
    pub fn find_bucket_by_rate(&self, rate: Rate, excluding: Option<usize>) -> Option<usize> {
        self.buckets
            .iter()
            .enumerate()
            .find(|(idx, b)| Some(*idx) != excluding && b.rate == rate)
            .map(|(idx, _)| idx)
    }

    /// Inserts an empty bucket at `at`; buckets at `at..` shift right by one.
    pub fn insert_bucket(&mut self, at: usize, rate: Rate) -> RosterResult<()> {
        if at > self.buckets.len() {
            return Err(RosterError::IndexOutOfRange {
                index: at,
                len: self.buckets.len(),
            });
        }
        debug!("Inserting bucket {} at column {}.", rate, at);
        self.buckets.insert(at, Bucket::new(rate));
        Ok(())
    }

    /// Removes bucket `index`; later buckets shift left by one.
    pub fn delete_bucket(&mut self, index: usize) -> RosterResult<Bucket> {
        self.check_index(index)?;
        let removed = self.buckets.remove(index);
        debug!(
            "Deleted bucket {} at column {} ({} member(s) remained).",
            removed.rate,
            index,
            removed.member_count()
        );
        Ok(removed)
    }

    /// Clears `from` and writes `name` into the first empty slot of
    /// `to_bucket`, appending a slot when none is empty.
    pub fn move_member(&mut self, name: &str, from: SlotRef, to_bucket: usize) -> RosterResult<SlotRef> {
        self.check_index(from.bucket)?;
        self.check_index(to_bucket)?;
        let wanted = normalize_name(name);

        let source_slot = self.buckets[from.bucket]
            .members
            .get_mut(from.row)
            .filter(|slot| slot.as_deref() == Some(wanted.as_str()))
            .ok_or_else(|| RosterError::MemberNotFound { name: wanted.clone() })?;
        let moved = source_slot.take();

        let target = &mut self.buckets[to_bucket].members;
        let row = match target.iter().position(Option::is_none) {
            Some(row) => {
                target[row] = moved;
                row
            }
            None => {
                target.push(moved);
                target.len() - 1
            }
        };
        trace!(
            "Moved '{}' from column {} row {} to column {} row {}.",
            wanted,
            from.bucket,
            from.row,
            to_bucket,
            row
        );
        Ok(SlotRef {
            bucket: to_bucket,
            row,
        })
    }

    /// Shifts occupied slots upward until no empty slot sits between the
    /// header and the last member. Relative order is kept. Returns the
    /// number of empty slots removed.
    pub fn compact_bucket(&mut self, index: usize) -> RosterResult<usize> {
        self.check_index(index)?;
        let members = &mut self.buckets[index].members;
        let mut removed = 0;
        while let Some(gap) = members.iter().position(Option::is_none) {
            members.remove(gap);
            removed += 1;
        }
        if removed > 0 {
            trace!("Compacted column {}: removed {} empty slot(s).", index, removed);
        }
        Ok(removed)
    }

    /// Orders buckets by rate, highest first. Equal rates keep their order.
    pub fn sort_buckets(&mut self) {
        self.buckets.sort_by(|a, b| b.rate.cmp(&a.rate));
    }

    /// Recomputes every column's width from its header label and names.
    pub fn resize_columns(&mut self, labels: &LabelSet) {
        for bucket in &mut self.buckets {
            let label = format_rate_label(labels, bucket.rate);
            bucket.width = Some(column_width(&label, bucket.names()));
        }
    }

    /// All member names in scan order.
    pub fn member_names(&self) -> Vec<&str> {
        self.buckets.iter().flat_map(Bucket::names).collect()
    }
}
