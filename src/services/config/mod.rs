// Config service
// Loads config.toml and resolves where data files live

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
#[cfg(not(debug_assertions))]
use directories::ProjectDirs;

use crate::models::settings::GridConfig;

pub const CONFIG_FILE: &str = "config.toml";
pub const DATABASE_FILE: &str = "slot_grid.db";

#[cfg(not(debug_assertions))]
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "Ken24T", "SlotGrid")
}

/// Read a config file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<GridConfig> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(GridConfig::default());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    let config: GridConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config
        .validate()
        .map_err(|msg| anyhow!("invalid config {}: {}", path.display(), msg))?;
    Ok(config)
}

/// Config from the platform location, falling back to defaults on any error.
pub fn load_config() -> GridConfig {
    let path = config_file_path();
    match load_config_from(&path) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("Failed to load config: {:#}, using defaults", err);
            GridConfig::default()
        }
    }
}

pub fn config_file_path() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        PathBuf::from(CONFIG_FILE)
    }

    #[cfg(not(debug_assertions))]
    {
        match project_dirs() {
            Some(dirs) => dirs.config_dir().join(CONFIG_FILE),
            None => PathBuf::from(CONFIG_FILE),
        }
    }
}

/// Location of a data file: the working directory in debug builds, the
/// platform data directory otherwise. The parent directory is created.
pub fn resolve_data_path(file_name: &str) -> Result<PathBuf> {
    #[cfg(debug_assertions)]
    let path = PathBuf::from(file_name);

    #[cfg(not(debug_assertions))]
    let path = match project_dirs() {
        Some(dirs) => {
            let data_dir = dirs.data_dir();
            fs::create_dir_all(data_dir)
                .with_context(|| format!("failed to create dir {}", data_dir.display()))?;
            data_dir.join(file_name)
        }
        None => {
            log::warn!("Unable to resolve project directory; using current dir for {}", file_name);
            PathBuf::from(file_name)
        }
    };

    Ok(path)
}

/// An explicit override from the config, else the default location.
pub fn data_path_or(override_path: Option<&str>, file_name: &str) -> Result<PathBuf> {
    match override_path {
        Some(path) => Ok(PathBuf::from(path)),
        None => resolve_data_path(file_name),
    }
}
