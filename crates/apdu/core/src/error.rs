//! Core error type for APDU operations
//!
//! Every failure of the transport, of command encoding, of response parsing or
//! of a protocol command sequence surfaces as an [`Error`].

use crate::command::CommandError;
use crate::response::ResponseError;
use crate::response::status::StatusWord;
use crate::transport::TransportError;

/// Core error type that encompasses all possible errors in the crate
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// Transport failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Command could not be encoded
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Response could not be parsed
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// A command of a sequence answered with a status word other than 90 00
    #[error("Command failed: \"{description}\", SW: {sw:04x} ({message})", sw = .status.to_u16())]
    CommandFailed {
        /// Description of the failing command
        description: String,
        /// Status word returned by the card
        status: StatusWord,
        /// Message from the command's error table, empty when unknown
        message: String,
    },

    /// The same key occurs twice in one command sequence
    #[error("Duplicate command key: {0}")]
    DuplicateKey(String),

    /// No response was recorded for a key
    #[error("Missing response for command: {0}")]
    MissingResponse(String),
}

impl Error {
    /// Status word of a failed command, if this is a command failure
    pub const fn status_word(&self) -> Option<StatusWord> {
        match self {
            Self::CommandFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for APDU operations
pub type Result<T> = std::result::Result<T, Error>;
