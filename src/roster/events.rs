// src/roster/events.rs
use super::definitions::{normalize_name, Rate};

/// One completion report: `completed_units` more units done by `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEvent {
    pub name: String,
    pub completed_units: f64,
}

impl UpdateEvent {
    pub fn new(name: &str, completed_units: f64) -> Self {
        UpdateEvent {
            name: normalize_name(name),
            completed_units,
        }
    }
}

/// Where the member ended up after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Joined an existing bucket with the same displayed rate.
    Merged,
    /// A new bucket was created for the rate.
    Created,
    /// The rate did not change; the member kept its slot.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub name: String,
    pub old_rate: Rate,
    pub new_rate: Rate,
    pub placement: Placement,
    /// The member's previous bucket became empty and was removed.
    pub retired_source: bool,
}
