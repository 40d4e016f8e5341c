// src/cli/export.rs
use crate::roster::{layout, RosterError, RosterResult};
use crate::storage::{export_xlsx, storage_for_path};
use std::path::Path;

pub fn run(path: &Path, out: &Path) -> RosterResult<()> {
    if path == out {
        return Err(RosterError::Configuration(
            "export target must differ from the roster file".to_string(),
        ));
    }
    let document = storage_for_path(path).load(path)?;
    // refuse to export a document the engine could not read back
    layout::decode(&document)?;
    export_xlsx(&document, out)?;
    println!("Exported {} -> {}", path.display(), out.display());
    Ok(())
}
