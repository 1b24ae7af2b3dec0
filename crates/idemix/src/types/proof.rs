use std::collections::BTreeMap;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Response value of a proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SValue {
    /// Response for a single hidden value, or a disclosed value
    Value(BigUint),
    /// Responses for the randomized exponent and blinding of a CL signature
    Cl {
        /// Response for e
        e_hat: BigUint,
        /// Response for v
        v_hat: BigUint,
    },
}

impl SValue {
    /// The single value, if this is not a CL pair
    pub const fn value(&self) -> Option<&BigUint> {
        match self {
            Self::Value(value) => Some(value),
            Self::Cl { .. } => None,
        }
    }
}

impl From<BigUint> for SValue {
    fn from(value: BigUint) -> Self {
        Self::Value(value)
    }
}

/// Zero-knowledge proof as exchanged with the proof engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Fiat-Shamir challenge
    pub challenge: BigUint,
    /// Response values by identifier name
    #[serde(default)]
    pub s_values: BTreeMap<String, SValue>,
    /// Common values, such as randomized signatures, by name
    #[serde(default)]
    pub common_values: BTreeMap<String, BigUint>,
}

impl Proof {
    /// Proof with a challenge and no values yet
    pub const fn new(challenge: BigUint) -> Self {
        Self {
            challenge,
            s_values: BTreeMap::new(),
            common_values: BTreeMap::new(),
        }
    }

    /// Response value by name
    pub fn s_value(&self, name: &str) -> Option<&SValue> {
        self.s_values.get(name)
    }

    /// Single s-value by name, failing when absent or a CL pair
    pub fn require_value(&self, name: &str) -> Result<&BigUint> {
        self.s_value(name)
            .and_then(SValue::value)
            .ok_or_else(|| Error::MissingSValue(name.to_string()))
    }

    /// Common value by name
    pub fn common_value(&self, name: &str) -> Option<&BigUint> {
        self.common_values.get(name)
    }
}
