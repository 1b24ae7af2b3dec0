//! Error types specific to APDU commands

use thiserror::Error;

/// Error for APDU command encoding and parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Raw command bytes do not form a valid APDU
    #[error("Invalid command length: {0}")]
    InvalidLength(usize),

    /// Data field longer than an extended APDU can carry
    #[error("Data too long: {0} bytes (max {1})")]
    DataTooLong(usize, usize),

    /// Expected length outside the range an APDU can express
    #[error("Invalid expected length: {0} (expected 1..={1})")]
    InvalidExpectedLength(u32, u32),
}

impl CommandError {
    /// Create a data too long error
    pub const fn data_too_long(actual: usize, max: usize) -> Self {
        Self::DataTooLong(actual, max)
    }
}
