//! Checkpoint error types.

use thiserror::Error;

/// Errors surfaced by checkpoint save/load operations.
///
/// Every failure is fatal to the calling operation; nothing here is
/// retried or downgraded.
#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("checkpoint I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed checkpoint: {0}")]
    Format(#[from] serde_json::Error),

    #[error("checkpoint state has no parameter `{0}`")]
    MissingParameter(String),

    #[error("checkpoint state has unexpected parameter `{0}`")]
    UnexpectedParameter(String),

    #[error("shape mismatch for `{name}`: checkpoint has {found:?}, model expects {expected:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<i64>,
        found: Vec<i64>,
    },

    #[error("tensor operation failed: {0}")]
    Tensor(#[from] tch::TchError),
}
