//! Command sequence of the selective disclosure protocol
//!
//! Only a proof specification with a single CL predicate is supported. For
//! every attribute of the credential the card is asked either for the plain
//! value (revealed) or for its response value (hidden), at the attribute's key
//! index. The same indices make up the selection sent up front, so both must be
//! derived from the one structure.

use idemix_apdu_core::{
    Command, ErrorTable, ProtocolCommand, ProtocolCommands, ProtocolResponses, StatusWord,
};
use num_bigint::BigUint;
use tracing::debug;

use crate::codec::{fixed_length, response_integer};
use crate::constants::*;
use crate::error::{Error, Result};
use crate::types::{ClPredicate, Identifier, Predicate, Proof, ProofSpec, SValue};

/// The single CL predicate of a proof specification
pub fn cl_predicate(spec: &ProofSpec) -> Result<&ClPredicate> {
    match spec.predicates.as_slice() {
        [Predicate::Cl(predicate)] => Ok(predicate),
        [other] => Err(Error::UnsupportedPredicate(format!(
            "{} predicate",
            other.predicate_type()
        ))),
        predicates => Err(Error::UnsupportedPredicate(format!(
            "expected exactly one predicate, found {}",
            predicates.len()
        ))),
    }
}

/// Each attribute of the credential paired with its identifier
fn identified_attributes(predicate: &ClPredicate) -> Result<Vec<(&str, u8, &Identifier)>> {
    predicate
        .structure
        .attributes()
        .iter()
        .map(|attribute| {
            predicate
                .identifier(&attribute.name)
                .map(|identifier| (attribute.name.as_str(), attribute.key_index, identifier))
                .ok_or_else(|| Error::MissingIdentifier(attribute.name.clone()))
        })
        .collect()
}

/// Ascending key indices of the revealed attributes
pub fn disclosure_selection(predicate: &ClPredicate) -> Result<Vec<u8>> {
    let mut selection: Vec<u8> = identified_attributes(predicate)?
        .into_iter()
        .filter(|(_, _, identifier)| identifier.revealed)
        .map(|(_, index, _)| index)
        .collect();
    selection.sort_unstable();
    Ok(selection)
}

/// Start a proof for credential slot `id`
pub fn start_proof_command(spec: &ProofSpec, id: u16) -> Result<ProtocolCommand> {
    let [p1, p2] = id.to_be_bytes();
    let context = fixed_length(&spec.context, spec.system_parameters.l_h)?;

    Ok(ProtocolCommand::new(
        "startprove",
        "Start credential proof.",
        Command::new_with_data(CLA_IDEMIX, INS_PROVE_CREDENTIAL, p1, p2, context),
    )
    .with_errors(ErrorTable::new().with(
        StatusWord::new(0x6A, 0x88),
        messages::CREDENTIAL_NOT_FOUND,
    )))
}

/// Full proof sequence for credential slot `id` against the verifier's nonce
pub fn build_proof_commands(
    nonce: &BigUint,
    spec: &ProofSpec,
    id: u16,
) -> Result<ProtocolCommands> {
    let predicate = cl_predicate(spec)?;
    let attributes = identified_attributes(predicate)?;
    let selection = disclosure_selection(predicate)?;
    let nonce = fixed_length(nonce, spec.system_parameters.l_phi)?;

    debug!(
        credential_id = id,
        attributes = attributes.len(),
        revealed = selection.len(),
        "Building proof commands"
    );

    let mut commands = ProtocolCommands::single(start_proof_command(spec, id)?);
    commands.extend([
        ProtocolCommand::new(
            "disclosure_d",
            "Attribute disclosure selection",
            Command::new_with_data(CLA_IDEMIX, INS_PROVE_SELECTION, 0x00, 0x00, selection),
        ),
        ProtocolCommand::new(
            "challenge_c",
            "Send challenge n1",
            Command::new_with_data(CLA_IDEMIX, INS_PROVE_NONCE, 0x00, 0x00, nonce),
        ),
        ProtocolCommand::new(
            "signature_A",
            "Get random signature A",
            Command::new(CLA_IDEMIX, INS_PROVE_SIGNATURE, P1_SIGNATURE_A, 0x00),
        ),
        ProtocolCommand::new(
            "signature_e",
            "Get random signature e^",
            Command::new(CLA_IDEMIX, INS_PROVE_SIGNATURE, P1_SIGNATURE_E, 0x00),
        ),
        ProtocolCommand::new(
            "signature_v",
            "Get random signature v^",
            Command::new(CLA_IDEMIX, INS_PROVE_SIGNATURE, P1_SIGNATURE_V, 0x00),
        ),
        ProtocolCommand::new(
            "master",
            "Get random value (@index 0).",
            Command::new(CLA_IDEMIX, INS_PROVE_RESPONSE, MASTER_SECRET_INDEX, 0x00),
        ),
    ]);

    commands.extend(attributes.into_iter().map(|(name, index, identifier)| {
        if identifier.revealed {
            ProtocolCommand::new(
                format!("attr_{name}"),
                format!("Get disclosed attribute (@index {index})"),
                Command::new(CLA_IDEMIX, INS_PROVE_ATTRIBUTE, index, 0x00),
            )
        } else {
            ProtocolCommand::new(
                format!("attr_{name}"),
                format!("Get random value (@index {index})."),
                Command::new(CLA_IDEMIX, INS_PROVE_RESPONSE, index, 0x00),
            )
        }
    }));

    Ok(commands)
}

/// Assemble the proof from the responses of [`build_proof_commands`]
pub fn process_build_proof_responses(
    responses: &ProtocolResponses,
    spec: &ProofSpec,
) -> Result<Proof> {
    let predicate = cl_predicate(spec)?;
    let attributes = identified_attributes(predicate)?;
    let name = &predicate.temp_cred_name;

    let mut proof = Proof::new(response_integer(responses, "challenge_c")?);
    proof
        .common_values
        .insert(name.clone(), response_integer(responses, "signature_A")?);
    proof.s_values.insert(
        name.clone(),
        SValue::Cl {
            e_hat: response_integer(responses, "signature_e")?,
            v_hat: response_integer(responses, "signature_v")?,
        },
    );
    proof.s_values.insert(
        names::MASTER_SECRET.to_string(),
        SValue::Value(response_integer(responses, "master")?),
    );

    for (attribute, _, identifier) in attributes {
        let value = response_integer(responses, &format!("attr_{attribute}"))?;
        proof
            .s_values
            .insert(identifier.name.clone(), SValue::Value(value));
    }

    Ok(proof)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::types::{CredentialStructure, SystemParameters};
    use idemix_apdu_core::{ProtocolResponse, Response};

    fn spec(revealed: &[&str]) -> ProofSpec {
        let structure = CredentialStructure::sequential(["a", "b", "c", "d", "e"]).unwrap();
        let identifiers: BTreeMap<String, Identifier> = structure
            .attributes()
            .iter()
            .map(|attribute| {
                let id = format!("id_{}", attribute.name);
                let identifier = if revealed.contains(&attribute.name.as_str()) {
                    Identifier::revealed(id)
                } else {
                    Identifier::hidden(id)
                };
                (attribute.name.clone(), identifier)
            })
            .collect();

        ProofSpec {
            system_parameters: SystemParameters::default(),
            context: BigUint::from(7u8),
            predicates: vec![Predicate::Cl(ClPredicate {
                temp_cred_name: "cred".to_string(),
                structure,
                identifiers,
            })],
        }
    }

    #[test]
    fn test_selection_is_ascending_indices() {
        let spec = spec(&["e", "b"]);
        let predicate = cl_predicate(&spec).unwrap();
        assert_eq!(disclosure_selection(predicate).unwrap(), [2, 5]);

        let commands = build_proof_commands(&BigUint::from(1u8), &spec, 2).unwrap();
        assert_eq!(commands[1].key(), "disclosure_d");
        assert_eq!(commands[1].command().data(), Some(&[2u8, 5][..]));
    }

    #[test]
    fn test_sequence_keys_and_instructions() {
        let spec = spec(&["b"]);
        let commands = build_proof_commands(&BigUint::from(1u8), &spec, 0x0203).unwrap();

        assert_eq!(
            commands.keys().collect::<Vec<_>>(),
            [
                "startprove",
                "disclosure_d",
                "challenge_c",
                "signature_A",
                "signature_e",
                "signature_v",
                "master",
                "attr_a",
                "attr_b",
                "attr_c",
                "attr_d",
                "attr_e",
            ]
        );
        assert_eq!(commands.duplicate_key(), None);

        let start = commands[0].command();
        assert_eq!((start.ins, start.p1, start.p2), (0x20, 0x02, 0x03));
        assert_eq!(commands[2].command().data().unwrap().len(), 10);

        // Hidden attributes ask for a response, revealed ones for the value
        let attr_a = commands[7].command();
        assert_eq!((attr_a.ins, attr_a.p1), (INS_PROVE_RESPONSE, 1));
        let attr_b = commands[8].command();
        assert_eq!((attr_b.ins, attr_b.p1), (INS_PROVE_ATTRIBUTE, 2));
        assert_eq!(commands[8].description(), "Get disclosed attribute (@index 2)");
    }

    #[test]
    fn test_decode_requires_every_attribute_response() {
        let spec = spec(&["b"]);
        let commands = build_proof_commands(&BigUint::from(1u8), &spec, 1).unwrap();
        let mut responses = ProtocolResponses::new();
        for key in commands.keys().filter(|key| *key != "attr_d") {
            responses.insert(ProtocolResponse::new(key, Response::success(vec![0x07])));
        }

        assert!(matches!(
            process_build_proof_responses(&responses, &spec),
            Err(Error::MissingResponse(key)) if key == "attr_d"
        ));

        responses.insert(ProtocolResponse::new("attr_d", Response::success(vec![0x08])));
        let proof = process_build_proof_responses(&responses, &spec).unwrap();
        assert_eq!(proof.require_value("id_d").unwrap(), &BigUint::from(8u8));
    }

    #[test]
    fn test_rejects_unsupported_predicates() {
        let mut spec = spec(&[]);
        spec.predicates.push(Predicate::Pseudonym);
        assert!(matches!(
            build_proof_commands(&BigUint::from(1u8), &spec, 1),
            Err(Error::UnsupportedPredicate(_))
        ));

        spec.predicates = vec![Predicate::Inequality];
        assert!(matches!(
            cl_predicate(&spec),
            Err(Error::UnsupportedPredicate(reason)) if reason == "inequality predicate"
        ));

        spec.predicates.clear();
        assert!(matches!(cl_predicate(&spec), Err(Error::UnsupportedPredicate(_))));
    }

    #[test]
    fn test_rejects_missing_identifier() {
        let mut spec = spec(&[]);
        if let Predicate::Cl(predicate) = &mut spec.predicates[0] {
            predicate.identifiers.remove("c");
        }
        assert!(matches!(
            build_proof_commands(&BigUint::from(1u8), &spec, 1),
            Err(Error::MissingIdentifier(name)) if name == "c"
        ));
    }
}
