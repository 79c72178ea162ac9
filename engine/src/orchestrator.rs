//! Run orchestration: resume an unpublished checkpoint, or build fresh.

use rand::rngs::StdRng;
use rand::SeedableRng;

use subgen_client::{LedgerClient, TIP_SELECTION_DEPTH};
use subgen_store::CheckpointStore;

use crate::builder::{BuildParams, SubtangleBuilder};
use crate::publisher::{PublishReport, PublishSettings, Publisher};
use crate::signal::StopSignal;
use crate::{EngineError, GeneratorConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// A checkpoint was found and published without building.
    Resume,
    /// A new subtangle was built and published.
    Fresh,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub mode: RunMode,
    /// Records handed to the publisher, excluding the closing record.
    pub records: usize,
    pub report: PublishReport,
}

pub struct Orchestrator<C, S> {
    client: C,
    store: S,
    build: BuildParams,
    publish: PublishSettings,
    rng: StdRng,
}

impl<C: LedgerClient, S: CheckpointStore> Orchestrator<C, S> {
    pub fn new(config: &GeneratorConfig, client: C, store: S) -> Result<Self, EngineError> {
        Ok(Self {
            client,
            store,
            build: config.build_params()?,
            publish: config.publish_settings(),
            rng: StdRng::from_entropy(),
        })
    }

    /// Use a fixed seed for parent selection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Publish the checkpoint if there is one; otherwise build, then publish.
    pub async fn run(&mut self, mut stop: Option<StopSignal>) -> Result<RunOutcome, EngineError> {
        let (mode, subtangle) = match self.store.load()? {
            Some(existing) if !existing.is_empty() => {
                tracing::info!(records = existing.len(), "resuming unpublished checkpoint");
                (RunMode::Resume, existing)
            }
            loaded => {
                if loaded.is_some() {
                    tracing::warn!("ignoring empty checkpoint");
                }
                let frontier = self
                    .client
                    .get_transactions_to_approve(TIP_SELECTION_DEPTH)
                    .await
                    .map_err(EngineError::Tips)?;
                tracing::info!(
                    trunk = %frontier.trunk,
                    branch = %frontier.branch,
                    window = self.build.window,
                    "building subtangle"
                );
                let builder = SubtangleBuilder::new(&self.client, &self.store, self.build.clone());
                let subtangle = builder.build(frontier, &mut self.rng, stop.as_mut()).await?;
                (RunMode::Fresh, subtangle)
            }
        };

        let records = subtangle.len();
        let report = Publisher::new(&self.client, &self.store, self.publish.clone())
            .publish(subtangle)
            .await?;

        Ok(RunOutcome {
            mode,
            records,
            report,
        })
    }
}
