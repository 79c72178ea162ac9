//! PoW generation (multi-threaded CPU).

use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;

use crate::validator::work_value;
use crate::{WorkError, WorkNonce};

/// Searches record nonces using all available CPU cores.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkGenerator;

/// Batch size per thread before checking the found flag.
const BATCH_SIZE: u64 = 4096;

impl WorkGenerator {
    /// Find a nonce whose work value over `essence` meets `min_difficulty`.
    ///
    /// Splits the nonce space across rayon's threads; the first thread to
    /// find a valid nonce signals the others to stop.
    pub fn generate(&self, essence: &[u8; 32], min_difficulty: u64) -> Result<WorkNonce, WorkError> {
        if min_difficulty == 0 {
            return Ok(WorkNonce(0));
        }

        let found = AtomicU64::new(u64::MAX);
        let num_threads = rayon::current_num_threads().max(1);
        let stride = num_threads as u64;

        (0..num_threads).into_par_iter().for_each(|thread_id| {
            let mut nonce = thread_id as u64;

            loop {
                if found.load(Ordering::Relaxed) != u64::MAX {
                    return;
                }

                let end = nonce.saturating_add(BATCH_SIZE * stride);
                while nonce < end {
                    if work_value(essence, nonce) >= min_difficulty {
                        found.store(nonce, Ordering::Relaxed);
                        return;
                    }
                    nonce = nonce.wrapping_add(stride);
                }
                if end == u64::MAX {
                    return;
                }
            }
        });

        match found.load(Ordering::Relaxed) {
            u64::MAX => Err(WorkError::Cancelled),
            nonce => Ok(WorkNonce(nonce)),
        }
    }
}
