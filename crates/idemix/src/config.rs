//! Configuration of the idemix card facade

use serde::{Deserialize, Serialize};

use crate::constants::IDEMIX_AID;

/// Settings for talking to an idemix applet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdemixConfig {
    /// AID selected when the session opens, hex encoded in JSON
    #[serde(with = "hex")]
    pub aid: Vec<u8>,
    /// Credential slot used for issuance and disclosure
    pub credential_id: u16,
}

impl Default for IdemixConfig {
    fn default() -> Self {
        Self {
            aid: IDEMIX_AID.to_vec(),
            credential_id: 1,
        }
    }
}

impl IdemixConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application identifier
    pub fn with_aid(mut self, aid: impl Into<Vec<u8>>) -> Self {
        self.aid = aid.into();
        self
    }

    /// Set the credential slot
    pub const fn with_credential_id(mut self, credential_id: u16) -> Self {
        self.credential_id = credential_id;
        self
    }

    /// Parse a configuration from JSON, filling absent fields with defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
