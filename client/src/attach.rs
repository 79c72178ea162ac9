//! Local attachment: parent linking and nonce search without the node.

use subgen_types::{PreparedRecord, Record, RecordHash, Timestamp};
use subgen_work::{difficulty_for_weight, WorkGenerator};

use crate::ClientError;

/// Attach `prepared` payloads on top of `trunk` and `branch`.
///
/// The first payload approves the given parents; each following payload
/// approves its predecessor (trunk) and the original trunk (branch), keeping
/// the payloads of one call chained together.
pub fn attach_locally(
    generator: &WorkGenerator,
    trunk: RecordHash,
    branch: RecordHash,
    min_weight_magnitude: u8,
    prepared: Vec<PreparedRecord>,
) -> Result<Vec<Record>, ClientError> {
    let difficulty = difficulty_for_weight(min_weight_magnitude)?;
    let mut attached: Vec<Record> = Vec::with_capacity(prepared.len());

    for payload in prepared {
        let (t, b) = match attached.last() {
            Some(previous) => (previous.hash, trunk),
            None => (trunk, branch),
        };
        let attached_at = Timestamp::now();
        let essence = Record::essence_digest(&payload, &t, &b, attached_at);
        let nonce = generator.generate(&essence, difficulty)?;
        attached.push(Record::attach(payload, t, b, attached_at, nonce.0));
    }

    Ok(attached)
}
