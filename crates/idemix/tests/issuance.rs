//! Issuance against a scripted card

mod common;

use common::{StubCard, attribute_values, issuance_spec};
use hex_literal::hex;
use idemix_apdu_core::StatusWord;
use idemix_card::constants::names;
use idemix_card::issuance::{
    process_round1_responses, round1_commands, round3_commands,
    set_issuance_specification_commands,
};
use idemix_card::{
    Error, IdemixCard, IdemixConfig, IssuanceMessage, IssuanceProtocolValue, Proof, Recipient,
    SValue, Values,
};
use num_bigint::BigUint;

const U: [u8; 4] = hex!("0a0b0c0d");
const CHALLENGE: [u8; 3] = hex!("00c0de");
const V_HAT_PRIME: [u8; 2] = hex!("beef");
const S_A: [u8; 2] = hex!("5a5a");
const N2: [u8; 3] = hex!("ffeedd");

fn round1_card() -> StubCard {
    StubCard::new()
        .with_data(0x16, 0x00, U)
        .with_data(0x17, 0x00, CHALLENGE)
        .with_data(0x17, 0x01, V_HAT_PRIME)
        .with_data(0x17, 0x02, S_A)
        .with_data(0x18, 0x00, N2)
}

fn issuer_first_message() -> IssuanceMessage {
    IssuanceMessage::default().with_value(IssuanceProtocolValue::NonceRecipient, 0x1234u32)
}

fn issuer_second_message() -> IssuanceMessage {
    let mut proof = Proof::new(BigUint::from(77u8));
    proof
        .s_values
        .insert(names::S_E.to_string(), SValue::Value(BigUint::from(99u8)));

    IssuanceMessage::default()
        .with_value(IssuanceProtocolValue::CapA, 11u32)
        .with_value(IssuanceProtocolValue::E, 12u32)
        .with_value(IssuanceProtocolValue::VPrimePrime, 13u32)
        .with_proof(proof)
}

#[test]
fn test_full_issuance() {
    let spec = issuance_spec(&["age", "name", "city"]);
    let config = IdemixConfig::new().with_credential_id(4);
    let mut card = IdemixCard::with_config(round1_card(), config);

    card.open().unwrap();
    card.set_issuance_specification(&spec).unwrap();
    card.set_attributes(&spec, &attribute_values(&spec)).unwrap();
    let response = card.round1(&spec, &issuer_first_message()).unwrap();
    card.round3(&spec, &issuer_second_message()).unwrap();

    let stub = card.transport();
    let sent = stub.protocol_commands();
    // start, n, Z, R0..R3, three attributes, five round 1 and seven round 3 commands
    assert_eq!(sent.len(), 1 + 2 + 4 + 3 + 5 + 7);
    assert_eq!(
        stub.instructions(),
        [
            0x10, 0x11, 0x12, 0x14, 0x14, 0x14, 0x14, 0x15, 0x15, 0x15, 0x16, 0x17, 0x17, 0x17,
            0x18, 0x19, 0x19, 0x19, 0x19, 0x1A, 0x1A, 0x1A,
        ]
    );

    let start = sent[0];
    assert_eq!((start.cla, start.p1, start.p2), (0x80, 0x00, 0x04));
    assert_eq!(start.data().map(<[u8]>::len), Some(32));

    // Public key elements are l_n wide
    for command in &sent[1..7] {
        assert_eq!(command.data().map(<[u8]>::len), Some(256));
    }

    let attributes = &sent[7..10];
    assert_eq!(attributes[0].p1, 1);
    assert_eq!(attributes[2].p1, 3);
    assert_eq!(&attributes[0].data().unwrap()[30..], hex!("0521"));

    assert_eq!(
        response.get(IssuanceProtocolValue::CapU),
        Some(&BigUint::from_bytes_be(&U))
    );
    assert_eq!(
        response.get(IssuanceProtocolValue::NonceRecipient),
        Some(&BigUint::from_bytes_be(&N2))
    );
    let proof = response.require_proof().unwrap();
    assert_eq!(proof.challenge, BigUint::from(0xC0DEu32));
    assert_eq!(proof.common_value(names::V_HAT_PRIME), Some(&BigUint::from(0xBEEFu32)));
    assert_eq!(
        proof.s_value(names::MASTER_SECRET).and_then(SValue::value),
        Some(&BigUint::from(0x5A5Au32))
    );
}

#[test]
fn test_every_built_key_answered_once() {
    let spec = issuance_spec(&["age"]);
    let mut commands = set_issuance_specification_commands(&spec, 4).unwrap();
    commands.extend(round1_commands(&spec, &issuer_first_message()).unwrap());

    let mut card = IdemixCard::new(round1_card());
    card.open().unwrap();
    let responses = card.execute(&commands).unwrap();

    assert_eq!(responses.len(), commands.len());
    for key in commands.keys() {
        assert!(responses.contains_key(key), "no response for {key}");
    }

    let decoded = process_round1_responses(&responses).unwrap();
    assert_eq!(
        decoded.get(IssuanceProtocolValue::CapU),
        Some(&BigUint::from(0x0A0B0C0Du32))
    );
}

#[test]
fn test_credential_already_issued() {
    let spec = issuance_spec(&["age", "name"]);
    let mut card = IdemixCard::new(StubCard::new().with_status(0x80, 0x10, 0x6986));
    card.open().unwrap();

    let err = card.set_issuance_specification(&spec).unwrap_err();
    assert!(err.is_credential_already_issued());

    let failure = err.command_failure().unwrap();
    assert_eq!(failure.description, "Start credential issuance.");
    assert_eq!(failure.status, StatusWord::new(0x69, 0x86));
    assert_eq!(
        err.to_string(),
        r#"Command failed: "Start credential issuance.", SW: 6986 (Credential already issued.)"#
    );

    // Nothing follows the refused command
    assert_eq!(card.transport().instructions(), [0x10]);
}

#[test]
fn test_unknown_status_has_empty_message() {
    let spec = issuance_spec(&["age"]);
    let mut card = IdemixCard::new(StubCard::new().with_status(0x80, 0x12, 0x6A80));
    card.open().unwrap();

    let err = card.set_issuance_specification(&spec).unwrap_err();
    let failure = err.command_failure().unwrap();
    assert_eq!(failure.description, "Set public key (Z)");
    assert_eq!(failure.message, "");
    assert_eq!(card.transport().instructions(), [0x10, 0x11, 0x12]);
}

#[test]
fn test_round3_wire_format() {
    let spec = issuance_spec(&["age"]);
    let mut card = IdemixCard::new(StubCard::new());
    card.open().unwrap();
    card.round3(&spec, &issuer_second_message()).unwrap();

    let sent = card.transport().protocol_commands();
    let layout: Vec<(u8, u8, Option<usize>)> = sent
        .iter()
        .map(|command| (command.ins, command.p1, command.data().map(<[u8]>::len)))
        .collect();
    // A at l_n, e at l_e, v'' at l_v, c' at l_h and s_e at l_n
    assert_eq!(
        layout,
        [
            (0x19, 0x00, Some(256)),
            (0x19, 0x01, Some(75)),
            (0x19, 0x02, Some(341)),
            (0x19, 0x03, None),
            (0x1A, 0x00, Some(32)),
            (0x1A, 0x01, Some(256)),
            (0x1A, 0x02, None),
        ]
    );

    // v'' does not fit a short Lc
    assert_eq!(&sent[2].to_bytes()[..7], hex!("80190200 000155"));
    assert_eq!(sent[2].data().unwrap()[340], 13);
    assert_eq!(sent[5].data().unwrap()[255], 99);
}

#[test]
fn test_round3_rejects_incomplete_message_without_sending() {
    let spec = issuance_spec(&["age"]);
    let mut card = IdemixCard::new(StubCard::new());
    card.open().unwrap();

    let mut message = issuer_second_message();
    message.values.remove(&IssuanceProtocolValue::E);
    assert!(matches!(
        card.round3(&spec, &message),
        Err(Error::MissingIssuanceElement(IssuanceProtocolValue::E))
    ));

    let mut message = issuer_second_message();
    message.proof = None;
    assert!(matches!(card.round3(&spec, &message), Err(Error::MissingProof)));
    assert!(matches!(
        round3_commands(&spec, &message),
        Err(Error::MissingProof)
    ));

    assert!(card.transport().instructions().is_empty());
}

#[test]
fn test_missing_attribute_value_sends_nothing() {
    let spec = issuance_spec(&["age", "name"]);
    let mut card = IdemixCard::new(StubCard::new());
    card.open().unwrap();

    let values = Values::new().with("age", 30u8);
    assert!(matches!(
        card.set_attributes(&spec, &values),
        Err(Error::MissingAttributeValue(name)) if name == "name"
    ));
    assert!(card.transport().instructions().is_empty());
}
