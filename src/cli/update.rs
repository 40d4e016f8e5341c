// src/cli/update.rs
use crate::roster::{process_update_event, Placement, RosterResult, UpdateEvent};
use crate::storage::storage_for_path;
use std::path::Path;

pub fn run(path: &Path, name: &str, completed: f64) -> RosterResult<()> {
    let storage = storage_for_path(path);
    let event = UpdateEvent::new(name, completed);
    let outcome = process_update_event(storage.as_ref(), path, &event)?;

    let placement = match outcome.placement {
        Placement::Merged => "joined existing bucket",
        Placement::Created => "new bucket",
        Placement::Unchanged => "no change",
    };
    println!(
        "{}: {} -> {} ({})",
        outcome.name, outcome.old_rate, outcome.new_rate, placement
    );
    if outcome.retired_source {
        println!("  retired empty bucket {}", outcome.old_rate);
    }
    Ok(())
}
