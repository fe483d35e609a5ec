// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A preference store write could not be persisted.
    ///
    /// Examples:
    /// - the prefs file directory cannot be created
    /// - the temp file cannot be renamed over the prefs file
    Store(StoreError),

    /// A wire command that names neither an action nor a notification.
    UnknownCommand(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    Io(String),

    /// The backing file exists but is not a flat JSON object.
    Malformed(String),
}

// ---------------- Display ----------------

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(e) => write!(f, "{e}"),
            Error::UnknownCommand(name) => write!(f, "Unknown command '{name}'"),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(msg) =>
                write!(f, "preference store I/O error: {msg}"),
            StoreError::Malformed(msg) =>
                write!(f, "preference store is malformed: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
impl std::error::Error for StoreError {}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Store(err)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}
