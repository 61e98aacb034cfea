//! Unified error type for the surebet scanner.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate allocation: stake_a={stake_a:.2} stake_b={stake_b:.2} (odds are not arbitrable)")]
    DegenerateAllocation { stake_a: f64, stake_b: f64 },

    #[error("Invalid projection: {0}")]
    InvalidProjection(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error came from rejected caller input rather than from
    /// the environment (files, config, parsing).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_)
                | Error::DegenerateAllocation { .. }
                | Error::InvalidProjection(_)
        )
    }
}
