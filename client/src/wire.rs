//! Wire representation of records.
//!
//! Records travel to and from the node as hex strings of their bincode
//! encoding, one string per record.

use serde::{Deserialize, Serialize};
use std::fmt;

use subgen_types::{PreparedRecord, Record};

use crate::ClientError;

/// One record (or prepared payload) in transport form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireRecord(String);

impl WireRecord {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn encode_record(record: &Record) -> Result<Self, ClientError> {
        encode(record)
    }

    pub fn decode_record(&self) -> Result<Record, ClientError> {
        decode(&self.0)
    }

    pub fn encode_prepared(prepared: &PreparedRecord) -> Result<Self, ClientError> {
        encode(prepared)
    }

    pub fn decode_prepared(&self) -> Result<PreparedRecord, ClientError> {
        decode(&self.0)
    }
}

impl fmt::Display for WireRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn encode<T: Serialize>(value: &T) -> Result<WireRecord, ClientError> {
    let bytes = bincode::serialize(value).map_err(|e| ClientError::Wire(e.to_string()))?;
    Ok(WireRecord(hex::encode(bytes)))
}

fn decode<T: serde::de::DeserializeOwned>(encoded: &str) -> Result<T, ClientError> {
    let bytes = hex::decode(encoded).map_err(|e| ClientError::Wire(e.to_string()))?;
    bincode::deserialize(&bytes).map_err(|e| ClientError::Wire(e.to_string()))
}

/// Convert records to wire form, preserving order.
pub fn records_to_wire(records: &[Record]) -> Result<Vec<WireRecord>, ClientError> {
    records.iter().map(WireRecord::encode_record).collect()
}
