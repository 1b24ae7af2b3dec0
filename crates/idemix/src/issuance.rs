//! Command sequences of the credential issuance protocol
//!
//! Issuance runs in three card visible phases:
//!
//! 1. setup: [`set_issuance_specification_commands`] opens an issuance context
//!    for a credential slot and loads the issuer public key, then
//!    [`set_attributes_commands`] loads the attribute values;
//! 2. round 1: [`round1_commands`] sends the recipient nonce and fetches the
//!    commitment and its correctness proof, decoded by
//!    [`process_round1_responses`];
//! 3. round 3: [`round3_commands`] delivers the blind signature with its proof
//!    and lets the card verify both.
//!
//! Builders are pure. Every value is length fixed before any command is
//! returned, so an encoding failure never leaves a half-built sequence.

use std::collections::BTreeMap;

use idemix_apdu_core::{
    Command, ErrorTable, ProtocolCommand, ProtocolCommands, ProtocolResponses, StatusWord,
};
use num_bigint::BigUint;

use crate::codec::{fixed_length, response_integer};
use crate::constants::*;
use crate::error::{Error, Result};
use crate::types::{IssuanceMessage, IssuanceProtocolValue, IssuanceSpec, Proof, SValue, Values};

/// Open the issuance context for credential slot `id`
pub fn start_issuance_command(spec: &IssuanceSpec, id: u16) -> Result<ProtocolCommand> {
    let [p1, p2] = id.to_be_bytes();
    let context = fixed_length(&spec.context, spec.system_parameters.l_h)?;

    Ok(ProtocolCommand::new(
        "start_issuance",
        "Start credential issuance.",
        Command::new_with_data(CLA_IDEMIX, INS_ISSUE_CREDENTIAL, p1, p2, context),
    )
    .with_errors(ErrorTable::new().with(
        StatusWord::new(0x69, 0x86),
        messages::CREDENTIAL_ALREADY_ISSUED,
    )))
}

/// Load n, Z and one R element per attribute plus the master secret
pub fn public_key_commands(spec: &IssuanceSpec) -> Result<ProtocolCommands> {
    let key = &spec.public_key;
    let l_n = spec.system_parameters.l_n;
    let elements = spec.credential_structure.len() + 1;

    let mut commands = ProtocolCommands::new();
    commands.push(ProtocolCommand::new(
        "publickey_n",
        "Set public key (n)",
        Command::new_with_data(
            CLA_IDEMIX,
            INS_ISSUE_PUBLIC_KEY_N,
            0x00,
            0x00,
            fixed_length(&key.n, l_n)?,
        ),
    ));
    commands.push(ProtocolCommand::new(
        "publickey_z",
        "Set public key (Z)",
        Command::new_with_data(
            CLA_IDEMIX,
            INS_ISSUE_PUBLIC_KEY_Z,
            0x00,
            0x00,
            fixed_length(&key.capital_z, l_n)?,
        ),
    ));

    for i in 0..elements {
        let element = key.r(i).ok_or(Error::MissingPublicKeyElement(i))?;
        // Bounded by the structure: at most 255 attributes plus the master secret
        let p1 = i as u8;
        commands.push(ProtocolCommand::new(
            format!("publickey_element{i}"),
            format!("Set public key element (R@index {i})"),
            Command::new_with_data(
                CLA_IDEMIX,
                INS_ISSUE_PUBLIC_KEY_R,
                p1,
                0x00,
                fixed_length(element, l_n)?,
            ),
        ));
    }

    Ok(commands)
}

/// Setup phase: start issuance for slot `id` and load the public key
pub fn set_issuance_specification_commands(
    spec: &IssuanceSpec,
    id: u16,
) -> Result<ProtocolCommands> {
    let mut commands = ProtocolCommands::single(start_issuance_command(spec, id)?);
    commands.extend(public_key_commands(spec)?);
    Ok(commands)
}

/// Load the attribute values, P1 counting from 1 in structure order
pub fn set_attributes_commands(spec: &IssuanceSpec, values: &Values) -> Result<ProtocolCommands> {
    let l_m = spec.system_parameters.l_m;

    spec.credential_structure
        .attributes()
        .iter()
        .zip(1..=u8::MAX)
        .map(|(attribute, i)| -> Result<ProtocolCommand> {
            let value = values
                .get(&attribute.name)
                .ok_or_else(|| Error::MissingAttributeValue(attribute.name.clone()))?;
            Ok(ProtocolCommand::new(
                format!("setattr{i}"),
                format!("Set attribute (m@index{i})"),
                Command::new_with_data(
                    CLA_IDEMIX,
                    INS_ISSUE_ATTRIBUTES,
                    i,
                    0x00,
                    fixed_length(value, l_m)?,
                ),
            ))
        })
        .collect()
}

/// Round 1: send the recipient nonce, fetch U, its proof and the issuer nonce
pub fn round1_commands(spec: &IssuanceSpec, msg: &IssuanceMessage) -> Result<ProtocolCommands> {
    let nonce = msg.issuance_element(IssuanceProtocolValue::NonceRecipient)?;
    let nonce = fixed_length(nonce, spec.system_parameters.l_phi)?;

    Ok(ProtocolCommands::from_iter([
        ProtocolCommand::new(
            "nonce_n1",
            "Issue nonce n1",
            Command::new_with_data(CLA_IDEMIX, INS_ISSUE_NONCE_1, 0x00, 0x00, nonce),
        ),
        ProtocolCommand::new(
            "proof_c",
            "Issue proof c",
            Command::new(CLA_IDEMIX, INS_ISSUE_PROOF_U, P1_PROOF_U_C, 0x00),
        ),
        ProtocolCommand::new(
            "vHatPrime",
            "Issue proof v^'",
            Command::new(CLA_IDEMIX, INS_ISSUE_PROOF_U, P1_PROOF_U_VPRIMEHAT, 0x00),
        ),
        ProtocolCommand::new(
            "proof_s_A",
            "Issue proof s_A",
            Command::new(CLA_IDEMIX, INS_ISSUE_PROOF_U, P1_PROOF_U_S_A, 0x00),
        ),
        ProtocolCommand::new(
            "nonce_n2",
            "Issue nonce n2",
            Command::new(CLA_IDEMIX, INS_ISSUE_NONCE_2, 0x00, 0x00),
        ),
    ]))
}

/// Decode the round 1 responses into the message for the issuer
pub fn process_round1_responses(responses: &ProtocolResponses) -> Result<IssuanceMessage> {
    let values = BTreeMap::from([
        (IssuanceProtocolValue::CapU, response_integer(responses, "nonce_n1")?),
        (IssuanceProtocolValue::NonceRecipient, response_integer(responses, "nonce_n2")?),
    ]);

    let mut proof = Proof::new(response_integer(responses, "proof_c")?);
    proof
        .common_values
        .insert(names::V_HAT_PRIME.to_string(), response_integer(responses, "vHatPrime")?);
    proof.s_values.insert(
        names::MASTER_SECRET.to_string(),
        SValue::Value(response_integer(responses, "proof_s_A")?),
    );

    Ok(IssuanceMessage::new(values, Some(proof)))
}

/// Round 3: deliver signature (A, e, v'') and its proof (c', s_e), verifying both
pub fn round3_commands(spec: &IssuanceSpec, msg: &IssuanceMessage) -> Result<ProtocolCommands> {
    let params = &spec.system_parameters;
    let encode = |name: IssuanceProtocolValue, bits: usize| -> Result<_> {
        Ok(fixed_length(msg.issuance_element(name)?, bits)?)
    };

    let capital_a = encode(IssuanceProtocolValue::CapA, params.l_n)?;
    let e = encode(IssuanceProtocolValue::E, params.l_e)?;
    let v_prime_prime = encode(IssuanceProtocolValue::VPrimePrime, params.l_v)?;

    let proof = msg.require_proof()?;
    let challenge = fixed_length(&proof.challenge, params.l_h)?;
    let s_e: &BigUint = proof.require_value(names::S_E)?;
    let s_e = fixed_length(s_e, params.l_n)?;

    Ok(ProtocolCommands::from_iter([
        ProtocolCommand::new(
            "signature_A",
            "Issue signature A",
            Command::new_with_data(
                CLA_IDEMIX,
                INS_ISSUE_SIGNATURE,
                P1_SIGNATURE_A,
                0x00,
                capital_a,
            ),
        ),
        ProtocolCommand::new(
            "signature_e",
            "Issue signature e",
            Command::new_with_data(CLA_IDEMIX, INS_ISSUE_SIGNATURE, P1_SIGNATURE_E, 0x00, e),
        ),
        ProtocolCommand::new(
            "vPrimePrime",
            "Issue signature v''",
            Command::new_with_data(
                CLA_IDEMIX,
                INS_ISSUE_SIGNATURE,
                P1_SIGNATURE_V,
                0x00,
                v_prime_prime,
            ),
        ),
        ProtocolCommand::new(
            "verify",
            "Verify issued signature",
            Command::new(CLA_IDEMIX, INS_ISSUE_SIGNATURE, P1_SIGNATURE_VERIFY, 0x00),
        ),
        ProtocolCommand::new(
            "proof_c",
            "Issue proof c'",
            Command::new_with_data(
                CLA_IDEMIX,
                INS_ISSUE_PROOF_A,
                P1_PROOF_A_C,
                0x00,
                challenge,
            ),
        ),
        ProtocolCommand::new(
            "proof_s_e",
            "Issue proof s_e",
            Command::new_with_data(CLA_IDEMIX, INS_ISSUE_PROOF_A, P1_PROOF_A_S_E, 0x00, s_e),
        ),
        ProtocolCommand::new(
            "proof_verify",
            "Verify proof",
            Command::new(CLA_IDEMIX, INS_ISSUE_PROOF_A, P1_PROOF_A_VERIFY, 0x00),
        ),
    ]))
}
