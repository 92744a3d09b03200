//! Common paths for Plume data storage
//!
//! Plume data is stored under ~/.config/plume/ on all platforms:
//! - config.toml - Stream layout and paging configuration

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the Plume data directory (~/.config/plume/)
pub fn plume_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let plume_dir = home.join(".config").join("plume");
    fs::create_dir_all(&plume_dir).context("Failed to create plume directory")?;
    Ok(plume_dir)
}

/// Get the config file path (~/.config/plume/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(plume_dir()?.join("config.toml"))
}
