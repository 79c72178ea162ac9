//! PoW validation.

use subgen_types::blake2b_256_multi;

/// The work value a nonce achieves over a record essence.
pub fn work_value(essence: &[u8; 32], nonce: u64) -> u64 {
    let hash = blake2b_256_multi(&[essence, &nonce.to_le_bytes()]);
    u64::from_be_bytes([
        hash[0], hash[1], hash[2], hash[3], hash[4], hash[5], hash[6], hash[7],
    ])
}

/// Validate that a work nonce meets the minimum difficulty for a given essence.
pub fn validate_work(essence: &[u8; 32], nonce: u64, min_difficulty: u64) -> bool {
    work_value(essence, nonce) >= min_difficulty
}
