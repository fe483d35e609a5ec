// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const DEFAULT_MAX_BYTES: u64 = 1024 * 1024; // 1 MiB
const DEFAULT_KEEP_BACKUPS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogPolicy {
    pub max_bytes: u64,
    pub keep_backups: u32,
}

impl Default for LogPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            keep_backups: DEFAULT_KEEP_BACKUPS,
        }
    }
}

pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("idletally")
        .join("idletally.log")
}

/// Ensures the log directory exists and rotates the file if needed.
/// Returns whether to insert a blank line before the next run header.
pub fn prepare_log_file(path: &Path, policy: LogPolicy) -> io::Result<bool> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if meta.len() == 0 {
        return Ok(false);
    }

    if meta.len() >= policy.max_bytes {
        rotate(path, policy.keep_backups)?;
        return Ok(false);
    }

    Ok(true)
}

pub fn run_header() -> String {
    let pid = std::process::id();
    format!("==================== idletally daemon run start (pid={pid}) ====================")
}

pub fn write_raw_line(path: &Path, line: &str) -> io::Result<()> {
    let mut f = fs::OpenOptions::new().create(true).append(true).open(path)?;
    f.write_all(line.as_bytes())?;
    f.write_all(b"\n")?;
    f.flush()?;
    Ok(())
}

fn rotate(path: &Path, keep_backups: u32) -> io::Result<()> {
    if keep_backups == 0 {
        let _ = fs::remove_file(path);
        return Ok(());
    }

    for i in (1..keep_backups).rev() {
        let from = rotated_name(path, i);
        let to = rotated_name(path, i + 1);
        if from.exists() {
            let _ = fs::rename(from, to);
        }
    }

    fs::rename(path, rotated_name(path, 1))
}

fn rotated_name(base: &Path, n: u32) -> PathBuf {
    PathBuf::from(format!("{}.{}", base.display(), n))
}
