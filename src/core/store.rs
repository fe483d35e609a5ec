// Author: Dustin Pilgrim
// License: MIT

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Number, Value};

use crate::core::error::StoreError;

/// One mutation inside a `PrefStore::apply` batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrefWrite<'a> {
    Float(&'a str, f64),
    Bool(&'a str, bool),
    Delete(&'a str),
}

/// Flat string-keyed preference store.
///
/// Reads never fail: a missing (or differently typed) key yields the default.
/// A failed write leaves the store exactly as it was before the call.
pub trait PrefStore: Send {
    fn get_float(&self, key: &str) -> f64;
    fn set_float(&mut self, key: &str, value: f64) -> Result<(), StoreError>;
    fn get_bool(&self, key: &str, default: bool) -> bool;
    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError>;
    fn delete_key(&mut self, key: &str) -> Result<(), StoreError>;
    fn has_key(&self, key: &str) -> bool;

    /// Applies every write or none of them. The default runs them in order,
    /// which only holds for stores whose single writes cannot fail.
    fn apply(&mut self, writes: &[PrefWrite<'_>]) -> Result<(), StoreError> {
        for write in writes {
            match *write {
                PrefWrite::Float(key, value) => self.set_float(key, value)?,
                PrefWrite::Bool(key, value) => self.set_bool(key, value)?,
                PrefWrite::Delete(key) => self.delete_key(key)?,
            }
        }
        Ok(())
    }
}

impl<T: PrefStore + ?Sized> PrefStore for Box<T> {
    fn get_float(&self, key: &str) -> f64 {
        (**self).get_float(key)
    }

    fn set_float(&mut self, key: &str, value: f64) -> Result<(), StoreError> {
        (**self).set_float(key, value)
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        (**self).get_bool(key, default)
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        (**self).set_bool(key, value)
    }

    fn delete_key(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).delete_key(key)
    }

    fn has_key(&self, key: &str) -> bool {
        (**self).has_key(key)
    }

    fn apply(&mut self, writes: &[PrefWrite<'_>]) -> Result<(), StoreError> {
        (**self).apply(writes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Pref {
    Float(f64),
    Bool(bool),
}

/// Volatile store, used by tests and as a fallback when no prefs file can be opened.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Pref>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for MemoryStore {
    fn get_float(&self, key: &str) -> f64 {
        match self.entries.get(key) {
            Some(Pref::Float(v)) => *v,
            _ => 0.0,
        }
    }

    fn set_float(&mut self, key: &str, value: f64) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), Pref::Float(value));
        Ok(())
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.entries.get(key) {
            Some(Pref::Bool(v)) => *v,
            _ => default,
        }
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), Pref::Bool(value));
        Ok(())
    }

    fn delete_key(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

/// Store persisted as one flat JSON object, written through on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Map::new(),
            Ok(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    return Err(StoreError::Malformed(format!(
                        "{} does not hold a JSON object",
                        path.display()
                    )));
                }
                Err(e) => {
                    return Err(StoreError::Malformed(format!("{}: {e}", path.display())));
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let text = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let tmp = tmp_path(&self.path);
        {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(text.as_bytes())?;
            f.write_all(b"\n")?;
            f.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.tmp", path.display()))
}

impl PrefStore for JsonFileStore {
    fn get_float(&self, key: &str) -> f64 {
        self.entries.get(key).and_then(Value::as_f64).unwrap_or(0.0)
    }

    fn set_float(&mut self, key: &str, value: f64) -> Result<(), StoreError> {
        self.apply(&[PrefWrite::Float(key, value)])
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.entries.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.apply(&[PrefWrite::Bool(key, value)])
    }

    fn delete_key(&mut self, key: &str) -> Result<(), StoreError> {
        self.apply(&[PrefWrite::Delete(key)])
    }

    fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // Writes go to a copy; memory only changes once the file does.
    fn apply(&mut self, writes: &[PrefWrite<'_>]) -> Result<(), StoreError> {
        let mut next = self.entries.clone();
        let mut changed = false;

        for write in writes {
            match *write {
                PrefWrite::Float(key, value) => {
                    // JSON has no NaN/inf; those collapse to zero like an unset key.
                    let num = Number::from_f64(value).unwrap_or_else(|| Number::from(0));
                    next.insert(key.to_string(), Value::Number(num));
                    changed = true;
                }
                PrefWrite::Bool(key, value) => {
                    next.insert(key.to_string(), Value::Bool(value));
                    changed = true;
                }
                PrefWrite::Delete(key) => {
                    changed |= next.remove(key).is_some();
                }
            }
        }

        if changed {
            self.flush(&next)?;
            self.entries = next;
        }
        Ok(())
    }
}

/// Default location of the prefs file.
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("idletally")
        .join("prefs.json")
}
