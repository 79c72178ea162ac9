//! Ledger node client.
//!
//! [`LedgerClient`] is the seam between the subtangle engine and the ledger
//! network: tip selection, transfer preparation, attachment, wire conversion
//! and broadcast. [`HttpLedgerClient`] talks to a node's JSON command API;
//! tests substitute the deterministic client from `subgen-nullables`.

pub mod attach;
pub mod error;
pub mod http;
pub mod prepare;
pub mod wire;

pub use attach::attach_locally;
pub use error::ClientError;
pub use http::{HttpLedgerClient, PowMode};
pub use prepare::{prepare_zero_value, PrepareOptions, Transfer};
pub use wire::{records_to_wire, WireRecord};

use std::future::Future;

use subgen_types::{Frontier, PreparedRecord, Record, RecordHash};

/// Seed of the anonymous, zero-balance sender used for every generated record.
pub const ANONYMOUS_SEED: &str =
    "999999999999999999999999999999999999999999999999999999999999999999999999999999999";

/// Address every zero-value transfer is sent to.
pub const NULL_ADDRESS: &str = ANONYMOUS_SEED;

/// Minimum weight magnitude requested when attaching records.
pub const MIN_WEIGHT_MAGNITUDE: u8 = 14;

/// Depth passed to the node's tip selection.
pub const TIP_SELECTION_DEPTH: u32 = 3;

/// Operations the generator needs from a ledger node.
pub trait LedgerClient {
    /// Ask the node for two tips to approve.
    fn get_transactions_to_approve(
        &self,
        depth: u32,
    ) -> impl Future<Output = Result<Frontier, ClientError>> + Send;

    /// Turn transfers into unattached record payloads.
    fn prepare_transfers(
        &self,
        seed: &str,
        transfers: &[Transfer],
        options: &PrepareOptions,
    ) -> impl Future<Output = Result<Vec<PreparedRecord>, ClientError>> + Send;

    /// Attach prepared payloads on top of `trunk` and `branch`.
    fn attach_to_tangle(
        &self,
        trunk: RecordHash,
        branch: RecordHash,
        min_weight_magnitude: u8,
        prepared: Vec<PreparedRecord>,
    ) -> impl Future<Output = Result<Vec<Record>, ClientError>> + Send;

    /// Convert records to their transport form, preserving order.
    fn to_wire(&self, records: &[Record]) -> Result<Vec<WireRecord>, ClientError>;

    /// Submit one record to the network.
    fn broadcast_transactions(
        &self,
        record: &WireRecord,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}
