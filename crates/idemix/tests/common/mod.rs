//! Common test utilities

#![allow(dead_code, unreachable_pub)]

use std::collections::HashMap;

use idemix_apdu_core::transport::TransportError;
use idemix_apdu_core::{Bytes, CardTransport, Command, StatusWord};
use idemix_card::{
    CredentialStructure, IssuanceSpec, IssuerPublicKey, SystemParameters, Values,
};
use num_bigint::BigUint;

/// Scripted card: answers by instruction, records every command it receives
#[derive(Debug, Default)]
pub struct StubCard {
    open: bool,
    /// Commands received, parsed back from the wire bytes
    pub sent: Vec<Command>,
    /// Status word returned for a (CLA, INS) pair instead of 9000
    statuses: HashMap<(u8, u8), StatusWord>,
    /// Response data for an (INS, P1) pair, sent with 9000
    data: HashMap<(u8, u8), Vec<u8>>,
    /// Instruction at which the link drops
    broken_at: Option<u8>,
    pub closes: usize,
}

impl StubCard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `cla ins` with `status`
    pub fn with_status(mut self, cla: u8, ins: u8, status: u16) -> Self {
        self.statuses.insert((cla, ins), StatusWord::from_u16(status));
        self
    }

    /// Answer `ins p1` with `data` followed by 9000
    pub fn with_data(mut self, ins: u8, p1: u8, data: impl Into<Vec<u8>>) -> Self {
        self.data.insert((ins, p1), data.into());
        self
    }

    /// Fail the transmission of any command with instruction `ins`
    pub fn failing_at(mut self, ins: u8) -> Self {
        self.broken_at = Some(ins);
        self
    }

    /// Refuse the application selection with `status`
    pub fn refusing_select(self, status: u16) -> Self {
        self.with_status(0x00, 0xA4, status)
    }

    /// Instructions of the received commands, selection excluded
    pub fn instructions(&self) -> Vec<u8> {
        self.sent
            .iter()
            .filter(|command| command.ins != 0xA4)
            .map(|command| command.ins)
            .collect()
    }

    /// Received commands, selection excluded
    pub fn protocol_commands(&self) -> Vec<&Command> {
        self.sent.iter().filter(|command| command.ins != 0xA4).collect()
    }
}

impl CardTransport for StubCard {
    fn open(&mut self) -> Result<(), TransportError> {
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.open = false;
        self.closes += 1;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        if !self.open {
            return Err(TransportError::NotOpen);
        }

        let command = Command::from_bytes(command)
            .map_err(|e| TransportError::other(format!("unparsable command: {e}")))?;
        if self.broken_at == Some(command.ins) {
            return Err(TransportError::Transmission);
        }

        let mut response = Vec::new();
        let status = match self.statuses.get(&(command.cla, command.ins)) {
            Some(status) => *status,
            None => {
                if let Some(data) = self.data.get(&(command.ins, command.p1)) {
                    response.extend_from_slice(data);
                }
                StatusWord::new(0x90, 0x00)
            }
        };
        response.extend_from_slice(&status.to_u16().to_be_bytes());

        self.sent.push(command);
        Ok(Bytes::from(response))
    }
}

/// System parameters small enough to read in assertions
pub fn parameters() -> SystemParameters {
    SystemParameters::default().with_l_n(2048).with_l_h(256)
}

/// Issuance of a credential with the given attribute names, numbered from 1
pub fn issuance_spec(attributes: &[&str]) -> IssuanceSpec {
    let n = BigUint::from(1u8) << 2047u32;
    IssuanceSpec {
        system_parameters: parameters(),
        public_key: IssuerPublicKey {
            capital_z: &n + 1u8,
            capital_s: &n + 2u8,
            capital_r: (0..=attributes.len() as u32).map(|i| &n + 10u32 + i).collect(),
            n,
        },
        credential_structure: CredentialStructure::sequential(attributes.iter().copied())
            .expect("valid structure"),
        context: BigUint::from(0xC0FFEEu32),
    }
}

/// Values 1313, 1314, ... for the attributes of `spec`
pub fn attribute_values(spec: &IssuanceSpec) -> Values {
    spec.credential_structure
        .attributes()
        .iter()
        .zip(1313u32..)
        .map(|(attribute, value)| (attribute.name.clone(), BigUint::from(value)))
        .collect()
}
