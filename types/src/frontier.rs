//! Frontier references: the network's current unapproved tips.

use serde::{Deserialize, Serialize};

use crate::RecordHash;

/// A pair of tips returned by the network's tip selection.
///
/// Consumed as the parents of the first record of a fresh build, and (trunk
/// only) as the network-side parent of the closing record at publication.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frontier {
    pub trunk: RecordHash,
    pub branch: RecordHash,
}

impl Frontier {
    pub fn new(trunk: RecordHash, branch: RecordHash) -> Self {
        Self { trunk, branch }
    }

    /// Whether `hash` is one of the two tips.
    pub fn contains(&self, hash: &RecordHash) -> bool {
        self.trunk == *hash || self.branch == *hash
    }
}
