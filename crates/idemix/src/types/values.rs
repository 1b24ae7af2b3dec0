use std::collections::BTreeMap;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Attribute values of a credential being issued, by attribute name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Values(BTreeMap<String, BigUint>);

impl Values {
    /// Create an empty set of values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of an attribute
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<BigUint>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder form of [`Values::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<BigUint>) -> Self {
        self.insert(name, value);
        self
    }

    /// Value of an attribute
    pub fn get(&self, name: &str) -> Option<&BigUint> {
        self.0.get(name)
    }
}

impl<K: Into<String>, V: Into<BigUint>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (name, value) in iter {
            values.insert(name, value);
        }
        values
    }
}
