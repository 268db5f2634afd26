//! Key/value storage behind the session store
//!
//! Backends hold plain string entries. Writes arrive as a batch and are
//! applied atomically, so a reader sees either the state before a batch or
//! the state after it. Readers that need several entries take one snapshot.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Result, SessionError};

/// One change in a write batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Set(&'static str, String),
    Remove(&'static str),
}

/// Durable key/value storage
pub trait StorageBackend: Send + Sync {
    /// Read every entry at once
    fn snapshot(&self) -> Result<BTreeMap<String, String>>;

    /// Read one entry
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.snapshot()?.remove(key))
    }

    /// Apply a batch of changes atomically
    fn apply(&self, ops: Vec<WriteOp>) -> Result<()>;

    /// Human-readable location, for status output
    fn location(&self) -> String;
}

/// In-process storage; contents are lost when the process exits.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
}

#[cfg(test)]
impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl StorageBackend for MemoryBackend {
    fn snapshot(&self) -> Result<BTreeMap<String, String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.clone())
    }

    fn apply(&self, ops: Vec<WriteOp>) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        for op in ops {
            match op {
                WriteOp::Set(key, value) => {
                    entries.insert(key.to_string(), value);
                }
                WriteOp::Remove(key) => {
                    entries.remove(key);
                }
            }
        }
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// JSON object in a single file.
///
/// Each batch is written to a sibling temp file and renamed over the target.
/// The file is removed once it holds no entries.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(SessionError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                ))
                .into());
            }
        };

        serde_json::from_str(&contents).map_err(|e| {
            SessionError::Storage(format!("Failed to parse {}: {}", self.path.display(), e)).into()
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if entries.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            };
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("tmp");
        let contents = serde_json::to_string_pretty(entries)?;
        let mut file = create_private(&tmp_path)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// Create a fresh file readable only by the owner (0600 on Unix).
///
/// A leftover file at `path` is removed first so its permissions are not
/// inherited.
fn create_private(path: &Path) -> Result<std::fs::File> {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    Ok(options.open(path)?)
}

impl StorageBackend for FileBackend {
    fn snapshot(&self) -> Result<BTreeMap<String, String>> {
        self.read_entries()
    }

    fn apply(&self, ops: Vec<WriteOp>) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        // An unreadable file is replaced rather than merged into
        let mut entries = self.read_entries().unwrap_or_else(|e| {
            log::warn!("Discarding unreadable session file: {}", e);
            BTreeMap::new()
        });

        for op in ops {
            match op {
                WriteOp::Set(key, value) => {
                    entries.insert(key.to_string(), value);
                }
                WriteOp::Remove(key) => {
                    entries.remove(key);
                }
            }
        }

        self.write_entries(&entries)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
