//! Nullable infrastructure for deterministic testing.
//!
//! The engine reaches the ledger network and the filesystem only through the
//! `LedgerClient` and `CheckpointStore` traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be scripted to fail
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod ledger;
pub mod store;

pub use ledger::{BroadcastPolicy, NullLedgerClient};
pub use store::NullCheckpointStore;
