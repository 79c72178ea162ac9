//! Subtangle builder: windowed-random tip selection.
//!
//! The first record approves the network frontier; every later record approves
//! two records drawn uniformly at random from the most recent `window` records
//! of the fragment itself. The result is a self-contained DAG fragment that
//! touches the real tangle exactly once at its base.

use rand::Rng;

use subgen_client::LedgerClient;
use subgen_store::CheckpointStore;
use subgen_types::{Frontier, Subtangle, Tag};

use crate::link::link;
use crate::progress;
use crate::signal::StopSignal;
use crate::BuildError;

/// Record count standing in for "until interrupted".
pub const UNBOUNDED_RECORDS: usize = 1_000_000;

/// How many records to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Count(usize),
    /// Build until the stop signal fires (capped at [`UNBOUNDED_RECORDS`]).
    Unbounded,
}

impl Target {
    pub fn limit(&self) -> usize {
        match self {
            Target::Count(n) => *n,
            Target::Unbounded => UNBOUNDED_RECORDS,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BuildParams {
    pub target: Target,
    pub window: usize,
    pub tag: Tag,
}

/// Draw trunk and branch indices for the next record of a fragment of `len`
/// records.
///
/// Both indices are independent and uniform over `[len - window, len)`, or over
/// `[0, len)` while the fragment is shorter than the window. They may be equal.
///
/// Requires `len >= 1` and `window >= 1`.
pub fn select_parent_indices<R: Rng + ?Sized>(
    len: usize,
    window: usize,
    rng: &mut R,
) -> (usize, usize) {
    debug_assert!(len > 0 && window > 0);
    let low = len.saturating_sub(window);
    (rng.gen_range(low..len), rng.gen_range(low..len))
}

pub struct SubtangleBuilder<'a, C, S> {
    client: &'a C,
    store: &'a S,
    params: BuildParams,
}

impl<'a, C: LedgerClient, S: CheckpointStore> SubtangleBuilder<'a, C, S> {
    pub fn new(client: &'a C, store: &'a S, params: BuildParams) -> Self {
        Self {
            client,
            store,
            params,
        }
    }

    /// Build a subtangle on top of `frontier`.
    ///
    /// Stops after the target count, or before the next record once `stop`
    /// has fired. Whatever was built is checkpointed before returning, also
    /// when a link request fails.
    pub async fn build<R: Rng + ?Sized>(
        &self,
        frontier: Frontier,
        rng: &mut R,
        stop: Option<&mut StopSignal>,
    ) -> Result<Subtangle, BuildError> {
        if self.params.window == 0 {
            return Err(BuildError::ZeroWindow);
        }

        let mut subtangle = Subtangle::with_capacity(self.params.target.limit().min(1024));
        let outcome = self.grow(&mut subtangle, frontier, rng, stop).await;
        self.persist(&subtangle);
        outcome.map(|()| subtangle)
    }

    async fn grow<R: Rng + ?Sized>(
        &self,
        subtangle: &mut Subtangle,
        frontier: Frontier,
        rng: &mut R,
        mut stop: Option<&mut StopSignal>,
    ) -> Result<(), BuildError> {
        let limit = self.params.target.limit();

        for index in 0..limit {
            if stop.as_mut().is_some_and(|s| s.is_fired()) {
                tracing::info!(records = index, "generation interrupted");
                break;
            }

            let (trunk, branch) = if subtangle.is_empty() {
                (frontier.trunk, frontier.branch)
            } else {
                let (t, b) = select_parent_indices(subtangle.len(), self.params.window, rng);
                (subtangle[t].hash, subtangle[b].hash)
            };

            let record = link(self.client, trunk, branch, &self.params.tag)
                .await
                .map_err(|source| BuildError::Link { index, source })?;
            tracing::trace!(index, hash = %record.hash, %trunk, %branch, "linked record");
            subtangle.push(record);

            let current = index + 1;
            if progress::is_due(current, limit) {
                match self.params.target {
                    Target::Count(total) => {
                        tracing::info!(current, total, "generating records")
                    }
                    Target::Unbounded => tracing::info!(current, "generating records"),
                }
            }
        }

        Ok(())
    }

    fn persist(&self, subtangle: &Subtangle) {
        if subtangle.is_empty() {
            return;
        }
        match self.store.save(subtangle) {
            Ok(()) => tracing::debug!(records = subtangle.len(), "checkpointed subtangle"),
            Err(e) => tracing::warn!(error = %e, "unable to write checkpoint, continuing in memory"),
        }
    }
}
