use thiserror::Error;

use subgen_client::ClientError;
use subgen_store::StoreError;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("window width must be at least 1")]
    ZeroWindow,

    /// `index` records were built (and kept) before the failure.
    #[error("linking record {index} failed: {source}")]
    Link {
        index: usize,
        #[source]
        source: ClientError,
    },
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("cannot publish an empty subtangle")]
    Empty,

    #[error("fetching tips for the closing record failed: {0}")]
    Tips(#[source] ClientError),

    #[error("attaching the closing record failed: {0}")]
    Close(#[source] ClientError),

    #[error("converting records to wire form failed: {0}")]
    Wire(#[source] ClientError),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("config error: {0}")]
    Config(String),

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] StoreError),

    #[error("fetching initial tips failed: {0}")]
    Tips(#[source] ClientError),

    #[error("build error: {0}")]
    Build(#[from] BuildError),

    #[error("publish error: {0}")]
    Publish(#[from] PublishError),
}
