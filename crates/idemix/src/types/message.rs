use std::collections::BTreeMap;

use derive_more::Display;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use super::Proof;
use crate::error::{Error, Result};

/// Named values of an issuance protocol flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
pub enum IssuanceProtocolValue {
    /// Commitment to the hidden attributes
    #[serde(rename = "capU")]
    #[display("capU")]
    CapU,
    /// Nonce chosen by the receiving side
    #[serde(rename = "nonce_recipient")]
    #[display("nonce_recipient")]
    NonceRecipient,
    /// Signature element A
    #[serde(rename = "capA")]
    #[display("capA")]
    CapA,
    /// Signature exponent
    #[serde(rename = "e")]
    #[display("e")]
    E,
    /// Issuer part of the signature blinding
    #[serde(rename = "vPrimePrime")]
    #[display("vPrimePrime")]
    VPrimePrime,
}

/// One flow of the issuance protocol
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceMessage {
    /// Protocol values carried by this flow
    pub values: BTreeMap<IssuanceProtocolValue, BigUint>,
    /// Proof of correctness, when the flow carries one
    #[serde(default)]
    pub proof: Option<Proof>,
}

impl IssuanceMessage {
    /// Message from its values and optional proof
    pub const fn new(
        values: BTreeMap<IssuanceProtocolValue, BigUint>,
        proof: Option<Proof>,
    ) -> Self {
        Self { values, proof }
    }

    /// Builder form for setting a value
    pub fn with_value(mut self, name: IssuanceProtocolValue, value: impl Into<BigUint>) -> Self {
        self.values.insert(name, value.into());
        self
    }

    /// Builder form for attaching a proof
    pub fn with_proof(mut self, proof: Proof) -> Self {
        self.proof = Some(proof);
        self
    }

    /// Value by name
    pub fn get(&self, name: IssuanceProtocolValue) -> Option<&BigUint> {
        self.values.get(&name)
    }

    /// Value by name, failing when absent
    pub fn issuance_element(&self, name: IssuanceProtocolValue) -> Result<&BigUint> {
        self.get(name).ok_or(Error::MissingIssuanceElement(name))
    }

    /// Attached proof, failing when absent
    pub fn require_proof(&self) -> Result<&Proof> {
        self.proof.as_ref().ok_or(Error::MissingProof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_keys_use_protocol_names() {
        let message = IssuanceMessage::default()
            .with_value(IssuanceProtocolValue::NonceRecipient, 7u32)
            .with_value(IssuanceProtocolValue::CapU, 1u32);
        let json = serde_json::to_value(&message).unwrap();
        assert!(json["values"].get("nonce_recipient").is_some());
        assert!(json["values"].get("capU").is_some());

        let parsed: IssuanceMessage = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, message);
    }

    #[test]
    fn test_missing_element() {
        let message = IssuanceMessage::default();
        assert!(matches!(
            message.issuance_element(IssuanceProtocolValue::CapA),
            Err(Error::MissingIssuanceElement(IssuanceProtocolValue::CapA))
        ));
        assert!(matches!(message.require_proof(), Err(Error::MissingProof)));
    }
}
