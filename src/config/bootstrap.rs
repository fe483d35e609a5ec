// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{DEFAULT_CONFIG, user_config_path};

/// Writes the commented default config to the user config path, only if missing.
/// Returns the path when a file was created.
pub fn ensure_user_config_exists() -> io::Result<Option<PathBuf>> {
    let Some(path) = user_config_path() else {
        return Ok(None);
    };
    write_default_if_missing(&path)
}

fn write_default_if_missing(path: &Path) -> io::Result<Option<PathBuf>> {
    if path.exists() {
        return Ok(None);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_CONFIG)?;
    Ok(Some(path.to_path_buf()))
}
