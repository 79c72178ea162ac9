//! Record identifiers and the Blake2b digest they are derived from.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

type Blake2b256 = Blake2b<U32>;

/// A 32-byte content-derived record identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordHash([u8; 32]);

impl Default for RecordHash {
    fn default() -> Self {
        Self::ZERO
    }
}

impl RecordHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for RecordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordHash(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

impl fmt::Display for RecordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for RecordHash {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| TypesError::InvalidHash(format!("{s:?}: {e}")))?;
        Ok(Self(bytes))
    }
}

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_then_parse_is_identity() {
        let hash = RecordHash::new([0xAB; 32]);
        let text = hash.to_string();
        assert_eq!(text.len(), 64);
        assert_eq!(text.parse::<RecordHash>().unwrap(), hash);
    }

    #[test]
    fn parse_rejects_short_input() {
        let err = "abcd".parse::<RecordHash>().unwrap_err();
        assert!(matches!(err, TypesError::InvalidHash(_)));
    }

    #[test]
    fn parse_rejects_non_hex() {
        let input = "zz".repeat(32);
        assert!(input.parse::<RecordHash>().is_err());
    }

    #[test]
    fn debug_is_abbreviated() {
        let hash = RecordHash::new([0x01; 32]);
        assert_eq!(format!("{hash:?}"), "RecordHash(01010101\u{2026})");
    }

    #[test]
    fn blake2b_multi_equivalent() {
        let single = blake2b_256(b"helloworld");
        let multi = blake2b_256_multi(&[b"hello", b"world"]);
        assert_eq!(single, multi);
    }

    #[test]
    fn blake2b_different_inputs() {
        assert_ne!(blake2b_256(b"trunk"), blake2b_256(b"branch"));
    }
}
