use std::collections::BTreeMap;

use derive_more::Display;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use super::{CredentialStructure, IssuerPublicKey, SystemParameters};

/// Everything the card needs to know about a credential being issued
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceSpec {
    /// Bit lengths of the encoded values
    #[serde(default)]
    pub system_parameters: SystemParameters,
    /// Key the credential is signed under
    pub public_key: IssuerPublicKey,
    /// Attributes of the credential and their key indices
    pub credential_structure: CredentialStructure,
    /// Binds the issuance run to the issuer and credential type
    pub context: BigUint,
}

/// Disclosure policy of a proof request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofSpec {
    /// Bit lengths of the encoded values
    #[serde(default)]
    pub system_parameters: SystemParameters,
    /// Binds the proof to its verifier, sent at l_h bits
    pub context: BigUint,
    /// Statements to prove; the card supports a single CL predicate
    pub predicates: Vec<Predicate>,
}

/// Whether an attribute is revealed, under its name in the proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    /// Name of the value in the proof's s-values
    pub name: String,
    /// Whether the verifier learns the value
    pub revealed: bool,
}

impl Identifier {
    /// Identifier of a revealed attribute
    pub fn revealed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            revealed: true,
        }
    }

    /// Identifier of a hidden attribute
    pub fn hidden(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            revealed: false,
        }
    }
}

/// Possession of a credential, revealing some of its attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClPredicate {
    /// Name the proof uses for this credential
    pub temp_cred_name: String,
    /// Attributes of the credential
    pub structure: CredentialStructure,
    /// Identifiers by attribute name
    pub identifiers: BTreeMap<String, Identifier>,
}

impl ClPredicate {
    /// Identifier for the named attribute
    pub fn identifier(&self, attribute: &str) -> Option<&Identifier> {
        self.identifiers.get(attribute)
    }
}

/// A statement in a proof specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    /// Possession of a credential
    Cl(ClPredicate),
    /// Range statement over an attribute
    Inequality,
    /// Opening of a commitment
    Commitment,
    /// Knowledge of a representation
    Representation,
    /// Pseudonym of the master secret
    Pseudonym,
    /// Pseudonym scoped to a domain
    DomainPseudonym,
    /// Verifiable encryption of an attribute
    VerEnc,
    /// Signed message
    Message,
}

/// Kind of a [`Predicate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[allow(missing_docs)]
pub enum PredicateType {
    #[display("CL")]
    Cl,
    #[display("inequality")]
    Inequality,
    #[display("commitment")]
    Commitment,
    #[display("representation")]
    Representation,
    #[display("pseudonym")]
    Pseudonym,
    #[display("domain pseudonym")]
    DomainPseudonym,
    #[display("verifiable encryption")]
    VerEnc,
    #[display("message")]
    Message,
}

impl Predicate {
    /// Kind of this predicate, without its payload
    pub const fn predicate_type(&self) -> PredicateType {
        match self {
            Self::Cl(_) => PredicateType::Cl,
            Self::Inequality => PredicateType::Inequality,
            Self::Commitment => PredicateType::Commitment,
            Self::Representation => PredicateType::Representation,
            Self::Pseudonym => PredicateType::Pseudonym,
            Self::DomainPseudonym => PredicateType::DomainPseudonym,
            Self::VerEnc => PredicateType::VerEnc,
            Self::Message => PredicateType::Message,
        }
    }
}
