use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("node unreachable: {0}")]
    Unreachable(String),

    #[error("request to node failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from node: {0}")]
    InvalidResponse(String),

    #[error("node rejected {command}: {message}")]
    Rejected { command: &'static str, message: String },

    #[error("wire encoding error: {0}")]
    Wire(String),

    #[error("local proof-of-work failed: {0}")]
    Work(#[from] subgen_work::WorkError),

    #[error("{0}")]
    Other(String),
}
