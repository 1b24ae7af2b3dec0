use serde::{Deserialize, Serialize};

/// Bit lengths of the values exchanged with the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemParameters {
    /// Modulus length
    pub l_n: usize,
    /// Hash challenge length
    pub l_h: usize,
    /// Attribute length
    pub l_m: usize,
    /// Statistical zero-knowledge length, used for nonces
    pub l_phi: usize,
    /// Signature exponent length
    pub l_e: usize,
    /// Signature blinding length
    pub l_v: usize,
}

impl Default for SystemParameters {
    fn default() -> Self {
        Self {
            l_n: 2048,
            l_h: 256,
            l_m: 256,
            l_phi: 80,
            l_e: 597,
            l_v: 2724,
        }
    }
}

impl SystemParameters {
    /// Set the modulus length
    pub const fn with_l_n(mut self, l_n: usize) -> Self {
        self.l_n = l_n;
        self
    }

    /// Set the hash challenge length
    pub const fn with_l_h(mut self, l_h: usize) -> Self {
        self.l_h = l_h;
        self
    }

    /// Set the attribute length
    pub const fn with_l_m(mut self, l_m: usize) -> Self {
        self.l_m = l_m;
        self
    }
}
