//! Error types for a calibration session

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Frequency out of policy range, non-numeric, or otherwise unusable
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid confirmation {0:?}, expected 'y' or 'n'")]
    InvalidConfirmation(String),

    #[error("Invalid acknowledgment {0:?}, expected 'e'")]
    InvalidAcknowledgment(String),

    /// The sample source failed to produce a complete buffer
    #[error("Sample generation failed: {0}")]
    Generation(String),

    #[error("Sample generation did not complete within {timeout_ms}ms")]
    Timeout { timeout_ms: u128 },

    /// The analysis collaborator failed or returned something unusable
    #[error("Analysis failed: {0}")]
    Analysis(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
