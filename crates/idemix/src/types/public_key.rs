use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Public key of the credential issuer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerPublicKey {
    /// Modulus
    pub n: BigUint,
    /// Z
    pub capital_z: BigUint,
    /// S
    ///
    /// Kept for the proof engine. The applet derives S itself, so issuance
    /// sends n, Z and R but never S.
    pub capital_s: BigUint,
    /// R elements; index 0 belongs to the master secret
    pub capital_r: Vec<BigUint>,
}

impl IssuerPublicKey {
    /// R element at `index`
    pub fn r(&self, index: usize) -> Option<&BigUint> {
        self.capital_r.get(index)
    }
}
