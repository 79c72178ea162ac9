//! Ledger records.
//!
//! A [`PreparedRecord`] is the unattached payload produced by transfer
//! preparation. Attaching it to two parents (and finding a nonce) yields an
//! immutable [`Record`] whose hash is derived from its content.

use serde::{Deserialize, Serialize};

use crate::{blake2b_256_multi, RecordHash, Tag, Timestamp};

/// An unattached record payload: who it pays, how much, and its tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedRecord {
    pub address: String,
    pub value: u64,
    pub tag: Tag,
    pub created_at: Timestamp,
}

/// A record attached to the tangle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub hash: RecordHash,
    pub trunk: RecordHash,
    pub branch: RecordHash,
    pub address: String,
    pub value: u64,
    pub tag: Tag,
    pub created_at: Timestamp,
    pub attached_at: Timestamp,
    pub nonce: u64,
}

impl Record {
    /// Digest of everything the nonce has to commit to.
    pub fn essence_digest(
        prepared: &PreparedRecord,
        trunk: &RecordHash,
        branch: &RecordHash,
        attached_at: Timestamp,
    ) -> [u8; 32] {
        blake2b_256_multi(&[
            trunk.as_bytes(),
            branch.as_bytes(),
            prepared.address.as_bytes(),
            &prepared.value.to_le_bytes(),
            prepared.tag.padded().as_bytes(),
            &prepared.created_at.as_millis().to_le_bytes(),
            &attached_at.as_millis().to_le_bytes(),
        ])
    }

    /// Build the attached record for `prepared`, deriving its hash.
    pub fn attach(
        prepared: PreparedRecord,
        trunk: RecordHash,
        branch: RecordHash,
        attached_at: Timestamp,
        nonce: u64,
    ) -> Self {
        let essence = Self::essence_digest(&prepared, &trunk, &branch, attached_at);
        let hash = RecordHash::new(blake2b_256_multi(&[&essence, &nonce.to_le_bytes()]));
        Self {
            hash,
            trunk,
            branch,
            address: prepared.address,
            value: prepared.value,
            tag: prepared.tag,
            created_at: prepared.created_at,
            attached_at,
            nonce,
        }
    }

    /// Recompute the content hash and compare it with the stored one.
    pub fn verify_hash(&self) -> bool {
        let prepared = PreparedRecord {
            address: self.address.clone(),
            value: self.value,
            tag: self.tag.clone(),
            created_at: self.created_at,
        };
        let essence = Self::essence_digest(&prepared, &self.trunk, &self.branch, self.attached_at);
        self.hash == RecordHash::new(blake2b_256_multi(&[&essence, &self.nonce.to_le_bytes()]))
    }

    pub fn parents(&self) -> (RecordHash, RecordHash) {
        (self.trunk, self.branch)
    }
}
