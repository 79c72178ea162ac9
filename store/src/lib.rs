//! Checkpoint storage for the subtangle generator.
//!
//! A checkpoint is a durable snapshot of a built but not yet published
//! subtangle. Every backend (the file store, the in-memory store used in
//! tests) implements [`CheckpointStore`]; the rest of the workspace depends
//! only on the trait.

pub mod checkpoint;
pub mod error;

pub use checkpoint::{FileCheckpointStore, DEFAULT_CHECKPOINT_PATH};
pub use error::StoreError;

use subgen_types::{Record, Subtangle};

/// Single-slot storage for one subtangle.
///
/// At most one checkpoint exists at a time. Its presence means a previously
/// built fragment was never published.
pub trait CheckpointStore {
    /// Load the stored subtangle. A missing checkpoint is `Ok(None)`; a
    /// checkpoint that cannot be decoded is [`StoreError::Corruption`].
    fn load(&self) -> Result<Option<Subtangle>, StoreError>;

    /// Replace any prior checkpoint with `records`.
    fn save(&self, records: &[Record]) -> Result<(), StoreError>;

    /// Remove the checkpoint. Succeeds when none exists.
    fn clear(&self) -> Result<(), StoreError>;
}
