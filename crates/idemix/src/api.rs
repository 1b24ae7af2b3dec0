//! Roles a card plays towards issuers and verifiers

use num_bigint::BigUint;

use crate::error::Result;
use crate::types::{IssuanceMessage, IssuanceSpec, Proof, ProofSpec};

/// Receives a credential from an issuer
///
/// Issuance is not idempotent: a failed round leaves the card in whatever
/// state the last accepted command put it in.
pub trait Recipient {
    /// Answer the issuer's first message with the commitment and its proof
    fn round1(&mut self, spec: &IssuanceSpec, msg: &IssuanceMessage) -> Result<IssuanceMessage>;

    /// Hand the signature to the card, which verifies and stores it
    fn round3(&mut self, spec: &IssuanceSpec, msg: &IssuanceMessage) -> Result<()>;
}

/// Proves possession of a credential to a verifier
pub trait Prover {
    /// Build a proof for `spec`, bound to the verifier's `nonce`
    fn build_proof(&mut self, nonce: &BigUint, spec: &ProofSpec) -> Result<Proof>;
}
