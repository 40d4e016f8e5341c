// src/cli/config.rs
use crate::roster::{RosterError, RosterResult};
use crate::settings::io::{get_config_path, save_settings_to_file};
use crate::settings::AppSettings;
use std::path::Path;

pub fn run(settings: &AppSettings, config_path: Option<&Path>, init: bool) -> RosterResult<()> {
    let location = match config_path {
        Some(p) => p.to_path_buf(),
        None => get_config_path().map_err(|e| RosterError::Configuration(e.to_string()))?,
    };

    if init {
        let written = save_settings_to_file(settings, Some(&location))
            .map_err(|e| RosterError::Configuration(format!("could not write settings: {}", e)))?;
        println!("Wrote {}", written.display());
    } else {
        println!("# {}", location.display());
    }

    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| RosterError::Configuration(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
