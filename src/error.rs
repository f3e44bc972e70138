//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, McmcError>;

#[derive(Error, Debug)]
pub enum McmcError {
    /// Observation or variance sequences are malformed. Raised before sampling starts.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// Bad proposal widths, initial guess, sample/burn-in counts, chain count or proposal cap.
    #[error("invalid sampler configuration: {0}")]
    InvalidConfig(String),

    /// The proposal cap was hit before the chain collected `target` accepted samples.
    #[error(
        "chain did not reach {target} accepted samples within {proposals} proposals \
         (accepted {accepted})"
    )]
    NonConvergence {
        accepted: usize,
        target: usize,
        proposals: u64,
    },

    #[error("failed to read configuration")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration")]
    Json(#[from] serde_json::Error),
}
