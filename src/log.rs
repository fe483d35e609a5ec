// Author: Dustin Pilgrim
// License: MIT

use std::fmt::Arguments;
use std::fs::OpenOptions;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use once_cell::sync::Lazy;

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum LogLevel {
    Error = 1,
    Warn  = 2,
    Info  = 3,
    Debug = 4,
}

impl LogLevel {
    /// Get ANSI color code for terminal output
    fn color(&self) -> &'static str {
        match self {
            LogLevel::Error => "\x1b[31m", // Red
            LogLevel::Warn  => "\x1b[33m", // Yellow
            LogLevel::Info  => "\x1b[36m", // Cyan
            LogLevel::Debug => "\x1b[90m", // Gray
        }
    }

    fn short(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERR",
            LogLevel::Warn  => "WRN",
            LogLevel::Info  => "INF",
            LogLevel::Debug => "DBG",
        }
    }
}

const RESET_COLOR: &str = "\x1b[0m";

pub struct Config {
    pub level: LogLevel,
    pub use_colors: bool,
    pub console: bool,
    pub file: Option<PathBuf>,
}

pub static GLOBAL_CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| {
    Mutex::new(Config {
        level: LogLevel::Info,
        use_colors: std::io::stdout().is_terminal(),
        console: false,
        file: None,
    })
});

/// Set verbose/debug mode; verbose also echoes every line to the console
pub fn set_verbose(enabled: bool) {
    if let Ok(mut config) = GLOBAL_CONFIG.lock() {
        config.level = if enabled { LogLevel::Debug } else { LogLevel::Info };
        config.console = enabled;
    }
}

/// Start appending log lines to `path`
pub fn set_log_file(path: PathBuf) {
    if let Ok(mut config) = GLOBAL_CONFIG.lock() {
        config.file = Some(path);
    }
}

/// Core logging function
pub fn log_message(level: LogLevel, prefix: &str, args: Arguments) {
    let config = match GLOBAL_CONFIG.lock() {
        Ok(c) => c,
        Err(poisoned) => poisoned.into_inner(),
    };

    if level > config.level {
        return;
    }

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let file_line = format!("[{}][{}][{}] {}", timestamp, level.short(), prefix, args);

    if let Some(path) = &config.file {
        if let Err(e) = write_line_to_log(path, &file_line) {
            eprintln!("Failed to write log: {}", e);
        }
    }

    // Errors always reach the console; everything else only when verbose
    if config.console || level == LogLevel::Error {
        let console_line = if config.use_colors {
            format!("{}●{} [{}][{}] {}", level.color(), RESET_COLOR, timestamp, prefix, args)
        } else {
            file_line
        };

        match level {
            LogLevel::Error => eprintln!("{}", console_line),
            _ => println!("{}", console_line),
        }
    }
}

/// Flexible macro to allow formatted logging
#[macro_export]
macro_rules! slog {
    ($level:expr, $prefix:expr, $($arg:tt)*) => {
        $crate::log::log_message($level, $prefix, format_args!($($arg)*))
    };
}

/// Convenience macros
#[macro_export]
macro_rules! sinfo {
    ($prefix:expr, $($arg:tt)*) => { $crate::slog!($crate::log::LogLevel::Info, $prefix, $($arg)*) };
}

#[macro_export]
macro_rules! swarn {
    ($prefix:expr, $($arg:tt)*) => { $crate::slog!($crate::log::LogLevel::Warn, $prefix, $($arg)*) };
}

#[macro_export]
macro_rules! serror {
    ($prefix:expr, $($arg:tt)*) => { $crate::slog!($crate::log::LogLevel::Error, $prefix, $($arg)*) };
}

#[macro_export]
macro_rules! sdebug {
    ($prefix:expr, $($arg:tt)*) => { $crate::slog!($crate::log::LogLevel::Debug, $prefix, $($arg)*) };
}

fn write_line_to_log(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    writeln!(file, "{}", line)?;
    Ok(())
}
