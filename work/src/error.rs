use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkError {
    #[error("minimum weight magnitude {0} exceeds 64 bits")]
    InvalidWeight(u8),

    #[error("work generation cancelled")]
    Cancelled,
}
