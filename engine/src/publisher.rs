//! Subtangle publisher.
//!
//! Closes the fragment with one record that approves a fresh network tip and
//! the fragment's last record, then broadcasts every record in sequence order.
//! Broadcasting is best-effort: a record that keeps failing is reported and
//! skipped. The checkpoint is removed whenever `publish` returns.

use std::time::Duration;

use subgen_client::{LedgerClient, WireRecord, TIP_SELECTION_DEPTH};
use subgen_store::CheckpointStore;
use subgen_types::{Subtangle, Tag};

use crate::link::link;
use crate::progress;
use crate::PublishError;

/// Attempts per record before it is given up on. Retries are immediate.
pub const MAX_BROADCAST_ATTEMPTS: usize = 5;

#[derive(Clone, Debug)]
pub struct PublishSettings {
    /// Pause after each record's broadcast attempts.
    pub interval: Duration,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Records the network accepted.
    pub published: usize,
    /// Records still rejected after [`MAX_BROADCAST_ATTEMPTS`] attempts.
    pub failed: usize,
}

impl PublishReport {
    pub fn total(&self) -> usize {
        self.published + self.failed
    }
}

/// Clears the checkpoint when dropped.
struct ClearOnExit<'a, S: CheckpointStore>(&'a S);

impl<S: CheckpointStore> Drop for ClearOnExit<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.0.clear() {
            tracing::warn!(error = %e, "failed to remove checkpoint after publishing");
        }
    }
}

pub struct Publisher<'a, C, S> {
    client: &'a C,
    store: &'a S,
    settings: PublishSettings,
}

impl<'a, C: LedgerClient, S: CheckpointStore> Publisher<'a, C, S> {
    pub fn new(client: &'a C, store: &'a S, settings: PublishSettings) -> Self {
        Self {
            client,
            store,
            settings,
        }
    }

    pub async fn publish(&self, mut subtangle: Subtangle) -> Result<PublishReport, PublishError> {
        let _cleanup = ClearOnExit(self.store);

        let last = subtangle.last().map(|r| r.hash).ok_or(PublishError::Empty)?;
        let tips = self
            .client
            .get_transactions_to_approve(TIP_SELECTION_DEPTH)
            .await
            .map_err(PublishError::Tips)?;
        let closing = link(self.client, tips.trunk, last, &Tag::default())
            .await
            .map_err(PublishError::Close)?;
        tracing::debug!(hash = %closing.hash, trunk = %tips.trunk, branch = %last, "closed subtangle");
        subtangle.push(closing);

        let wire = self.client.to_wire(&subtangle).map_err(PublishError::Wire)?;
        if wire.len() != subtangle.len() {
            tracing::warn!(
                records = subtangle.len(),
                units = wire.len(),
                "wire conversion changed the record count, submitting matched units only"
            );
        }
        let total = wire.len().min(subtangle.len());
        let mut report = PublishReport::default();

        for (index, (unit, record)) in wire.iter().zip(&subtangle).enumerate() {
            if self.submit(unit).await {
                report.published += 1;
            } else {
                report.failed += 1;
                tracing::warn!(
                    index,
                    hash = %record.hash,
                    attempts = MAX_BROADCAST_ATTEMPTS,
                    "giving up on record"
                );
            }

            let current = index + 1;
            if progress::is_due(current, total) {
                tracing::info!(current, total, "broadcasting records");
            }
            tokio::time::sleep(self.settings.interval).await;
        }

        tracing::info!(
            records = subtangle.len(),
            published = report.published,
            failed = report.failed,
            "published subtangle to the tangle"
        );
        Ok(report)
    }

    async fn submit(&self, unit: &WireRecord) -> bool {
        for attempt in 1..=MAX_BROADCAST_ATTEMPTS {
            match self.client.broadcast_transactions(unit).await {
                Ok(()) => return true,
                Err(e) => tracing::debug!(attempt, error = %e, "broadcast attempt failed"),
            }
        }
        false
    }
}
