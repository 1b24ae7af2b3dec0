use idemix_apdu_core::StatusWord;
use idemix_apdu_core::transport::TransportError;

use crate::constants::messages;
use crate::types::IssuanceProtocolValue;

/// Result type for idemix card operations
pub type Result<T> = std::result::Result<T, Error>;

/// An integer did not fit the width the protocol mandates for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// Value wider than its field
    #[error("Value of {actual} bits does not fit in {bits} bits")]
    Overflow {
        /// Mandated width in bits
        bits: usize,
        /// Bit length of the value
        actual: u64,
    },
}

/// Failure to establish or use the channel to the idemix application
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// The card reader or link failed, whichever call hit it
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The card refused the application selection
    #[error("Could not select the idemix application, SW: {0}")]
    SelectFailed(StatusWord),

    /// No application selected yet, or the session was closed
    #[error("Channel is not open")]
    NotOpen,
}

/// Error type for idemix card operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value does not fit its protocol width
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Channel not usable
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// APDU level failure, including command sequences aborted by a status word
    ///
    /// Transport failures never land here; they convert to [`ChannelError::Transport`].
    #[error(transparent)]
    Apdu(idemix_apdu_core::Error),

    /// PC/SC reader selection or connection failed
    #[cfg(feature = "pcsc")]
    #[error(transparent)]
    Pcsc(#[from] idemix_apdu_transport_pcsc::PcscError),

    /// The proof specification is not a single CL predicate
    #[error("Unsupported proof specification: {0}")]
    UnsupportedPredicate(String),

    /// An attribute of the credential has no identifier in the predicate
    #[error("No identifier for attribute {0}")]
    MissingIdentifier(String),

    /// A sequence result lacks the response of a command
    #[error("No response recorded for {0}")]
    MissingResponse(String),

    /// An attribute of the structure has no value
    #[error("No value for attribute {0}")]
    MissingAttributeValue(String),

    /// The public key has fewer R elements than the structure needs
    #[error("Issuer public key has no element R@index {0}")]
    MissingPublicKeyElement(usize),

    /// An issuer message lacks a required value
    #[error("Issuance message lacks {0}")]
    MissingIssuanceElement(IssuanceProtocolValue),

    /// An issuer message lacks its proof
    #[error("Issuance message carries no proof")]
    MissingProof,

    /// A proof lacks a required s-value
    #[error("Proof lacks s-value {0}")]
    MissingSValue(String),

    /// Attribute names or key indices clash, or an index is out of range
    #[error("Invalid credential structure: {0}")]
    InvalidStructure(String),
}

/// A command of a sequence that the card refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFailure<'a> {
    /// Description of the refused command
    pub description: &'a str,
    /// Status word the card answered with
    pub status: StatusWord,
    /// Explanation from the command's error table, empty when unknown
    pub message: &'a str,
}

impl From<idemix_apdu_core::Error> for Error {
    fn from(error: idemix_apdu_core::Error) -> Self {
        match error {
            idemix_apdu_core::Error::Transport(e) => Self::Channel(ChannelError::Transport(e)),
            e => Self::Apdu(e),
        }
    }
}

impl Error {
    /// Details of the refused command, if the card refused one
    pub fn command_failure(&self) -> Option<CommandFailure<'_>> {
        match self {
            Self::Apdu(idemix_apdu_core::Error::CommandFailed {
                description,
                status,
                message,
            }) => Some(CommandFailure {
                description,
                status: *status,
                message,
            }),
            _ => None,
        }
    }

    /// Status word returned by the refused command
    pub fn status_word(&self) -> Option<StatusWord> {
        self.command_failure().map(|failure| failure.status)
    }

    /// The card already holds a credential in the requested slot
    pub fn is_credential_already_issued(&self) -> bool {
        self.command_failure()
            .is_some_and(|failure| failure.message == messages::CREDENTIAL_ALREADY_ISSUED)
    }

    /// The card holds no credential in the requested slot
    pub fn is_credential_not_found(&self) -> bool {
        self.command_failure()
            .is_some_and(|failure| failure.message == messages::CREDENTIAL_NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(status: u16, message: &str) -> Error {
        idemix_apdu_core::Error::CommandFailed {
            description: "Start credential issuance.".to_string(),
            status: status.into(),
            message: message.to_string(),
        }
        .into()
    }

    #[test]
    fn test_credential_already_issued() {
        let error = failed(0x6986, messages::CREDENTIAL_ALREADY_ISSUED);
        assert!(error.is_credential_already_issued());
        assert!(!error.is_credential_not_found());
        assert_eq!(error.status_word(), Some(StatusWord::new(0x69, 0x86)));
        assert_eq!(
            error.to_string(),
            "Command failed: \"Start credential issuance.\", SW: 6986 (Credential already issued.)"
        );
    }

    #[test]
    fn test_non_command_errors() {
        let error = Error::from(ChannelError::NotOpen);
        assert!(error.command_failure().is_none());
        assert!(!error.is_credential_not_found());

        let error = Error::from(EncodingError::Overflow { bits: 80, actual: 81 });
        assert_eq!(error.to_string(), "Value of 81 bits does not fit in 80 bits");
    }

    #[test]
    fn test_transport_errors_are_channel_errors() {
        let error = Error::from(idemix_apdu_core::Error::Transport(TransportError::Timeout));
        assert!(matches!(
            error,
            Error::Channel(ChannelError::Transport(TransportError::Timeout))
        ));
        assert!(error.command_failure().is_none());
    }
}
