// src/cli/show.rs
use crate::roster::layout::{self, format_rate_label};
use crate::roster::RosterResult;
use crate::storage::storage_for_path;
use std::path::Path;

pub fn run(path: &Path) -> RosterResult<()> {
    let document = storage_for_path(path).load(path)?;
    let grid = layout::decode(&document)?;
    let labels = &document.metadata.labels;

    println!("{}\n", grid.title);
    for (idx, bucket) in grid.buckets.iter().enumerate() {
        println!("[{}] {}", idx, format_rate_label(labels, bucket.rate));
        for name in bucket.names() {
            println!("    {}", name);
        }
    }
    println!(
        "\n{} members in {} buckets",
        grid.member_names().len(),
        grid.buckets.len()
    );
    Ok(())
}
