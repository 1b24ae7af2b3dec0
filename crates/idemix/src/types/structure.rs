use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::MASTER_SECRET_INDEX;
use crate::error::Error;

/// One attribute of a credential and its position on the card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeStructure {
    /// Attribute name
    pub name: String,
    /// Position of the attribute in the credential
    pub key_index: u8,
}

impl AttributeStructure {
    /// Create a new attribute description
    pub fn new(name: impl Into<String>, key_index: u8) -> Self {
        Self {
            name: name.into(),
            key_index,
        }
    }
}

/// Ordered attribute list of a credential type
///
/// Key indices are distinct and never 0, which is taken by the master secret.
/// Names are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AttributeStructure>", into = "Vec<AttributeStructure>")]
pub struct CredentialStructure {
    attributes: Vec<AttributeStructure>,
}

impl CredentialStructure {
    /// Validate and wrap an attribute list
    pub fn new(attributes: Vec<AttributeStructure>) -> Result<Self, Error> {
        let mut indices = HashSet::with_capacity(attributes.len());
        let mut names = HashSet::with_capacity(attributes.len());

        for attribute in &attributes {
            if attribute.key_index == MASTER_SECRET_INDEX {
                return Err(Error::InvalidStructure(format!(
                    "attribute {} uses the master secret index 0",
                    attribute.name
                )));
            }
            if !indices.insert(attribute.key_index) {
                return Err(Error::InvalidStructure(format!(
                    "key index {} used twice",
                    attribute.key_index
                )));
            }
            if !names.insert(attribute.name.as_str()) {
                return Err(Error::InvalidStructure(format!(
                    "attribute name {} used twice",
                    attribute.name
                )));
            }
        }

        Ok(Self { attributes })
    }

    /// Structure with attributes at key indices 1, 2, ... in the given order
    pub fn sequential<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Result<Self, Error> {
        let attributes = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let index = u8::try_from(i + 1).map_err(|_| {
                    Error::InvalidStructure("more than 255 attributes".to_string())
                })?;
                Ok(AttributeStructure::new(name, index))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Self::new(attributes)
    }

    /// Attributes in structure order
    pub fn attributes(&self) -> &[AttributeStructure] {
        &self.attributes
    }

    /// Number of attributes, not counting the master secret
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the structure has no attributes
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl TryFrom<Vec<AttributeStructure>> for CredentialStructure {
    type Error = Error;

    fn try_from(attributes: Vec<AttributeStructure>) -> Result<Self, Error> {
        Self::new(attributes)
    }
}

impl From<CredentialStructure> for Vec<AttributeStructure> {
    fn from(structure: CredentialStructure) -> Self {
        structure.attributes
    }
}
