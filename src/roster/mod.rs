// src/roster/mod.rs

pub mod creation;
pub mod definitions;
pub mod engine;
pub mod error;
pub mod events;
pub mod grid_store;
pub mod layout;
pub mod validation;
pub mod width;

pub use creation::{create_grid, SortKey};
pub use definitions::{RosterDocument, RosterMetadata};
pub use engine::process_update_event;
pub use error::{RosterError, RosterResult, StorageError, StorageResult};
pub use events::{Placement, UpdateEvent};
pub use validation::validate_grid;
