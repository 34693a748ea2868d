//! File-backed key-value store
//!
//! Each key lives in its own file inside the data directory. Writes go through
//! a temporary file that is renamed into place, and the previous value is kept
//! as a `.bak` copy so a bad write can be recovered.
//!
//! A tasks file that no longer decodes is moved aside as `.corrupt` and the
//! backup is frozen until `restore` runs, so the last good collection survives
//! later writes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use ticklist_core::persist::{KeyValueStore, TASKS_KEY, decode_tasks};
use ticklist_core::{CoreError, Result};

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File holding the value for `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        if key == TASKS_KEY {
            self.dir.join(format!("{}.json", key))
        } else {
            self.dir.join(key)
        }
    }

    pub fn backup_path(&self, key: &str) -> PathBuf {
        let mut name = self.path_for(key).into_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }

    pub fn backup_exists(&self, key: &str) -> bool {
        self.backup_path(key).exists()
    }

    /// Where an undecodable tasks file is kept
    pub fn corrupt_path(&self, key: &str) -> PathBuf {
        let mut name = self.path_for(key).into_os_string();
        name.push(".corrupt");
        PathBuf::from(name)
    }

    /// Replace the value of `key` with its backup, returning the restored text
    pub fn restore(&mut self, key: &str) -> Result<String> {
        let backup = self.backup_path(key);
        if !backup.exists() {
            return Err(CoreError::storage("Backup file not found"));
        }

        let raw = fs::read_to_string(&backup).map_err(|e| {
            CoreError::storage_with_source(format!("Failed to read {}", backup.display()), e)
        })?;
        self.write_atomic(&self.path_for(key), &raw)?;

        let corrupt = self.corrupt_path(key);
        if corrupt.exists() {
            fs::remove_file(&corrupt).map_err(|e| {
                CoreError::storage_with_source(format!("Failed to remove {}", corrupt.display()), e)
            })?;
        }
        debug!(key, "restored from backup");
        Ok(raw)
    }

    fn backup(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }

        if key == TASKS_KEY {
            let corrupt = self.corrupt_path(key);
            if corrupt.exists() {
                debug!(file = %corrupt.display(), "backup frozen until recovery");
                return Ok(());
            }

            let raw = fs::read_to_string(&path).map_err(|e| {
                CoreError::storage_with_source(format!("Failed to read {}", path.display()), e)
            })?;
            if decode_tasks(&raw).is_err() {
                fs::copy(&path, &corrupt).map_err(|e| {
                    CoreError::storage_with_source(
                        format!("Failed to preserve {}", path.display()),
                        e,
                    )
                })?;
                warn!(
                    file = %corrupt.display(),
                    "tasks file was unreadable, kept a copy and left the backup untouched"
                );
                return Ok(());
            }
        }

        fs::copy(&path, self.backup_path(key)).map_err(|e| {
            CoreError::storage_with_source(format!("Failed to back up {}", path.display()), e)
        })?;
        Ok(())
    }

    fn write_atomic(&self, path: &Path, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            CoreError::storage_with_source(format!("Failed to create {}", self.dir.display()), e)
        })?;

        let write_err =
            |e: std::io::Error| CoreError::storage_with_source(format!("Failed to write {}", path.display()), e);

        let mut temp = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        temp.write_all(value.as_bytes()).map_err(write_err)?;
        temp.flush().map_err(write_err)?;
        temp.persist(path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&path).map(Some).map_err(|e| {
            CoreError::storage_with_source(format!("Failed to read {}", path.display()), e)
        })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.backup(key)?;
        let path = self.path_for(key);
        self.write_atomic(&path, value)?;
        debug!(file = %path.display(), bytes = value.len(), "wrote value");
        Ok(())
    }
}
