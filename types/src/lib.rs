//! Fundamental types for the subtangle generator.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! record hashes, records, tags, frontier references and timestamps.

pub mod error;
pub mod frontier;
pub mod hash;
pub mod record;
pub mod tag;
pub mod time;

pub use error::TypesError;
pub use frontier::Frontier;
pub use hash::{blake2b_256, blake2b_256_multi, RecordHash};
pub use record::{PreparedRecord, Record};
pub use tag::Tag;
pub use time::Timestamp;

/// An ordered run of records; insertion order is causal creation order.
pub type Subtangle = Vec<Record>;
