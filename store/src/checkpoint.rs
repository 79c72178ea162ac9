//! File-backed checkpoint.
//!
//! The subtangle is bincode-encoded and written to a sibling temporary file,
//! then renamed over the checkpoint path so a reader never observes a
//! half-written snapshot.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use subgen_types::{Record, Subtangle};

use crate::{CheckpointStore, StoreError};

/// Where the generator keeps its checkpoint unless configured otherwise.
pub const DEFAULT_CHECKPOINT_PATH: &str = "./subtangle.snap";

#[derive(Clone, Debug)]
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("subtangle.snap"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Default for FileCheckpointStore {
    fn default() -> Self {
        Self::new(DEFAULT_CHECKPOINT_PATH)
    }
}

fn remove_if_present(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn load(&self) -> Result<Option<Subtangle>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let subtangle: Subtangle = bincode::deserialize(&bytes).map_err(|e| {
            StoreError::Corruption(format!("{}: {e}", self.path.display()))
        })?;
        tracing::debug!(
            path = %self.path.display(),
            records = subtangle.len(),
            "loaded checkpoint"
        );
        Ok(Some(subtangle))
    }

    fn save(&self, records: &[Record]) -> Result<(), StoreError> {
        remove_if_present(&self.path)?;

        let bytes =
            bincode::serialize(records).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let temp = self.temp_path();
        fs::write(&temp, &bytes).map_err(|e| StoreError::io(&temp, e))?;
        fs::rename(&temp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            bytes = bytes.len(),
            "wrote checkpoint"
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        remove_if_present(&self.temp_path())?;
        remove_if_present(&self.path)
    }
}
