use directories_next::ProjectDirs;
use std::fs;
use std::io::{self, BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "RateRoster";
const APPLICATION: &str = "rate-roster";
const CONFIG_FILE: &str = "settings.json";

pub fn get_config_path() -> io::Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION) {
        Ok(proj_dirs.config_dir().join(CONFIG_FILE))
    } else {
        Err(io::Error::new(io::ErrorKind::NotFound, "Could not determine project directories for settings."))
    }
}

/// Loads settings from `path`, or from the platform config directory when
/// `path` is `None`. A missing file yields defaults.
pub fn load_settings_from_file<T: for<'de> serde::de::Deserialize<'de> + Default>(path: Option<&Path>) -> io::Result<T> {
    let config_file = match path {
        Some(p) => p.to_path_buf(),
        None => get_config_path()?,
    };
    debug!("Settings: Attempting to load settings from {:?}", config_file);
    match fs::File::open(&config_file) {
        Ok(file) => {
            let reader = BufReader::new(file);
            match serde_json::from_reader(reader) {
                Ok(settings) => {
                    debug!("Settings: Successfully deserialized settings.");
                    Ok(settings)
                }
                Err(e) => {
                    error!("Settings: Failed to parse settings file {:?}: {}", &config_file, e);
                    Err(io::Error::new(ErrorKind::InvalidData, format!("Failed to parse settings file {:?}: {}", &config_file, e)))
                }
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Settings: Settings file not found at {:?}. Returning default.", config_file);
            Ok(Default::default())
        }
        Err(e) => {
            error!("Settings: Failed to open settings file {:?}: {}", &config_file, e);
            Err(e)
        }
    }
}

pub fn save_settings_to_file<T: serde::Serialize>(settings: &T, path: Option<&Path>) -> io::Result<PathBuf> {
    let config_file = match path {
        Some(p) => p.to_path_buf(),
        None => get_config_path()?,
    };
    if let Some(dir) = config_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    info!("Settings: Saving settings to {:?}", config_file);
    let file = fs::File::create(&config_file)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, settings).map_err(|e| {
        error!("Settings: Failed to serialize settings to {:?}: {}", &config_file, e);
        io::Error::new(io::ErrorKind::Other, e)
    })?;
    Ok(config_file)
}
