//! Proof-of-work for locally attached records.
//!
//! When the node does not attach records on our behalf, the client searches a
//! nonce whose Blake2b work value over the record essence clears the threshold
//! implied by the network's minimum weight magnitude.

pub mod error;
pub mod generator;
pub mod thresholds;
pub mod validator;

pub use error::WorkError;
pub use generator::WorkGenerator;
pub use thresholds::difficulty_for_weight;
pub use validator::{validate_work, work_value};

/// The result of PoW generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkNonce(pub u64);
