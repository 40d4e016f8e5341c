// src/cli/create.rs
use crate::roster::{layout, create_grid, RosterDocument, RosterError, RosterMetadata, RosterResult, SortKey};
use crate::settings::AppSettings;
use crate::storage::storage_for_path;
use std::path::Path;
use tracing::info;

pub fn run(
    path: &Path,
    quota: f64,
    names: &[String],
    sort: Option<SortKey>,
    force: bool,
    settings: &AppSettings,
) -> RosterResult<()> {
    if path.exists() && !force {
        return Err(RosterError::Configuration(format!(
            "'{}' already exists; pass --force to replace it",
            path.display()
        )));
    }

    let sort = sort.unwrap_or(settings.default_sort);
    let grid = create_grid(quota, names, sort, &settings.labels)?;

    let mut metadata = RosterMetadata::new(settings.labels.clone(), settings.min_title_span);
    let cells = layout::encode(&grid, &mut metadata);
    storage_for_path(path).save(path, &RosterDocument { metadata, grid: cells })?;

    info!("Created roster '{}' with {} members.", path.display(), names.len());
    println!("Created {}", path.display());
    println!("{}", grid.title);
    Ok(())
}
