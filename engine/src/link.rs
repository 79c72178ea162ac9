use subgen_client::{
    ClientError, LedgerClient, PrepareOptions, Transfer, ANONYMOUS_SEED, MIN_WEIGHT_MAGNITUDE,
};
use subgen_types::{Record, RecordHash, Tag};

/// Prepare a zero-value record carrying `tag` and attach it on `trunk`/`branch`.
pub(crate) async fn link<C: LedgerClient>(
    client: &C,
    trunk: RecordHash,
    branch: RecordHash,
    tag: &Tag,
) -> Result<Record, ClientError> {
    let prepared = client
        .prepare_transfers(
            ANONYMOUS_SEED,
            &[Transfer::empty(tag.clone())],
            &PrepareOptions::default(),
        )
        .await?;
    let attached = client
        .attach_to_tangle(trunk, branch, MIN_WEIGHT_MAGNITUDE, prepared)
        .await?;
    attached
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::InvalidResponse("attachToTangle returned no records".into()))
}
