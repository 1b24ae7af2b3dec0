use idemix_apdu_core::{Command, ErrorTable, ProtocolCommand, StatusWord};

use crate::constants::{CLA_IDEMIX, INS_GENERATE_SECRET, messages};

/// Let the card generate its master secret
///
/// A card only ever holds one master secret; a second attempt answers `69 86`.
pub fn generate_master_secret_command() -> ProtocolCommand {
    ProtocolCommand::new(
        "generatesecret",
        "Generate master secret",
        Command::new(CLA_IDEMIX, INS_GENERATE_SECRET, 0x00, 0x00),
    )
    .with_errors(ErrorTable::new().with(
        StatusWord::new(0x69, 0x86),
        messages::MASTER_SECRET_ALREADY_SET,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_master_secret() {
        let command = generate_master_secret_command();
        assert_eq!(command.command().to_bytes().as_ref(), [0x80, 0x01, 0x00, 0x00]);
        assert_eq!(
            command.error_message(StatusWord::new(0x69, 0x86)),
            "Master secret already set."
        );
    }
}
