//! Nullable checkpoint store: in-memory, with call counters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use subgen_store::{CheckpointStore, StoreError};
use subgen_types::{Record, Subtangle};

/// An in-memory checkpoint for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullCheckpointStore {
    slot: Mutex<Option<Subtangle>>,
    corrupted: bool,
    fail_saves: bool,
    loads: AtomicUsize,
    saves: AtomicUsize,
    clears: AtomicUsize,
}

impl NullCheckpointStore {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            corrupted: false,
            fail_saves: false,
            loads: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
            clears: AtomicUsize::new(0),
        }
    }

    /// Start with an existing checkpoint, as if a previous run was cut short.
    pub fn with_checkpoint(records: Subtangle) -> Self {
        let store = Self::new();
        *store.slot.lock().unwrap() = Some(records);
        store
    }

    /// A checkpoint that exists but cannot be decoded.
    pub fn corrupted() -> Self {
        Self {
            corrupted: true,
            ..Self::new()
        }
    }

    /// Make every `save` fail as a full disk would.
    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    /// The currently stored subtangle.
    pub fn snapshot(&self) -> Option<Subtangle> {
        self.slot.lock().unwrap().clone()
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl Default for NullCheckpointStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckpointStore for NullCheckpointStore {
    fn load(&self) -> Result<Option<Subtangle>, StoreError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.corrupted {
            return Err(StoreError::Corruption("null checkpoint marked corrupted".into()));
        }
        Ok(self.slot.lock().unwrap().clone())
    }

    fn save(&self, records: &[Record]) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let mut slot = self.slot.lock().unwrap();
        *slot = None;
        if self.fail_saves {
            return Err(StoreError::Backend("null store refuses writes".into()));
        }
        *slot = Some(records.to_vec());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}
