//! Protocol values exchanged with the external proof engine
//!
//! All types serialize with serde so the engine can hand them over as JSON.

mod message;
mod params;
mod proof;
mod public_key;
mod spec;
mod structure;
mod values;

pub use message::{IssuanceMessage, IssuanceProtocolValue};
pub use params::SystemParameters;
pub use proof::{Proof, SValue};
pub use public_key::IssuerPublicKey;
pub use spec::{ClPredicate, Identifier, IssuanceSpec, Predicate, PredicateType, ProofSpec};
pub use structure::{AttributeStructure, CredentialStructure};
pub use values::Values;
