use idemix_apdu_core::{Command, ErrorTable, ProtocolCommand, StatusWord};

use crate::constants::{CLA_ISO7816, INS_VERIFY, messages};

/// ISO VERIFY with the card holder's PIN
pub fn verify_pin_command(pin: &[u8]) -> ProtocolCommand {
    ProtocolCommand::new(
        "sendpin",
        "Authorize using PIN",
        Command::new_with_data(CLA_ISO7816, INS_VERIFY, 0x00, 0x00, pin.to_vec()),
    )
    .with_errors(pin_errors())
}

fn pin_errors() -> ErrorTable {
    let table = ErrorTable::new()
        .with(StatusWord::new(0x63, 0xC0), messages::PIN_BLOCKED)
        .with(StatusWord::new(0x69, 0x83), messages::PIN_BLOCKED);

    (1..=0x0F).fold(table, |table, tries: u8| {
        table.with(
            StatusWord::new(0x63, 0xC0 | tries),
            format!("Wrong PIN, {tries} tries remaining."),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_verify_pin_bytes() {
        let command = verify_pin_command(b"0000");
        assert_eq!(command.key(), "sendpin");
        assert_eq!(
            command.command().to_bytes().as_ref(),
            hex!("00200000 04 30303030")
        );
    }

    #[test]
    fn test_remaining_tries_message() {
        let command = verify_pin_command(b"1234");
        assert_eq!(
            command.error_message(StatusWord::new(0x63, 0xC2)),
            "Wrong PIN, 2 tries remaining."
        );
        assert_eq!(command.error_message(StatusWord::new(0x63, 0xC0)), "PIN blocked.");
        assert_eq!(command.error_message(StatusWord::new(0x6A, 0x80)), "");
    }
}
