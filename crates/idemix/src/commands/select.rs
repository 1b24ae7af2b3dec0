use idemix_apdu_core::{Command, ProtocolCommand};

use crate::constants::{CLA_ISO7816, INS_SELECT, P1_SELECT_BY_NAME};

/// SELECT the application with the given AID
///
/// Le is 256 (`00`), which the applet requires.
pub fn select_application_command(aid: &[u8]) -> ProtocolCommand {
    ProtocolCommand::new(
        "select",
        "Select the idemix application",
        Command::new_with_data_and_le(
            CLA_ISO7816,
            INS_SELECT,
            P1_SELECT_BY_NAME,
            0x00,
            aid.to_vec(),
            256,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::IDEMIX_AID;
    use hex_literal::hex;

    #[test]
    fn test_select_bytes() {
        let command = select_application_command(IDEMIX_AID);
        assert_eq!(command.key(), "select");
        assert_eq!(
            command.command().to_bytes().as_ref(),
            hex!("00A4040006 6964656D6978 00")
        );
    }
}
