// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use rune_cfg::RuneConfig;

pub mod bootstrap;
pub mod model;

use model::IdleTallyConfig;

pub const DEFAULT_CONFIG: &str = include_str!("../../assets/idletally.rune");

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("idletally").join("idletally.rune"))
}

/// Determine which config file to read: `--config`, then the user file,
/// then the system file. `None` means built-in defaults.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(eyre::eyre!("config file {} does not exist", path.display()));
        }
        return Ok(Some(path.to_path_buf()));
    }

    // 1. Check user config first
    if let Some(path) = user_config_path() {
        if path.exists() {
            return Ok(Some(path));
        }
    }

    // 2. Check system config
    let system_path = PathBuf::from("/etc/idletally/idletally.rune");
    if system_path.exists() {
        return Ok(Some(system_path));
    }

    Ok(None)
}

pub fn load_from_path(path: &Path) -> Result<IdleTallyConfig> {
    let cfg = RuneConfig::from_file(&path.to_path_buf())
        .map_err(|e| eyre::eyre!("{e}"))
        .wrap_err_with(|| format!("failed to load config from {}", path.display()))?;
    Ok(IdleTallyConfig::from_rune(&cfg))
}

pub fn load(explicit: Option<&Path>) -> Result<(IdleTallyConfig, Option<PathBuf>)> {
    match resolve_config_path(explicit)? {
        Some(path) => {
            let cfg = load_from_path(&path)?;
            Ok((cfg, Some(path)))
        }
        None => Ok((IdleTallyConfig::default(), None)),
    }
}
