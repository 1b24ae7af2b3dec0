//! Idemix card application
//!
//! [`IdemixCard`] ties a session to its configuration and runs the issuance
//! and disclosure engines against it. Every operation builds its whole command
//! sequence before the first byte is sent, so input errors never leave the
//! card half way through a protocol step.

use idemix_apdu_core::{
    CardExecutor, CardTransport, ProtocolCommands, ProtocolResponses, TransmitObserver,
};
use num_bigint::BigUint;
use tracing::{debug, instrument};

use crate::api::{Prover, Recipient};
use crate::commands::{generate_master_secret_command, verify_pin_command};
use crate::config::IdemixConfig;
use crate::disclosure::{build_proof_commands, process_build_proof_responses};
use crate::error::Result;
use crate::issuance::{
    process_round1_responses, round1_commands, round3_commands, set_attributes_commands,
    set_issuance_specification_commands,
};
use crate::session::IdemixSession;
use crate::types::{IssuanceMessage, IssuanceSpec, Proof, ProofSpec, Values};

/// Idemix application on a card reached through `T`
#[derive(Debug)]
pub struct IdemixCard<T: CardTransport> {
    session: IdemixSession<T>,
    config: IdemixConfig,
}

impl<T: CardTransport> IdemixCard<T> {
    /// Card with the default configuration
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, IdemixConfig::default())
    }

    /// Card with a custom configuration
    pub fn with_config(transport: T, config: IdemixConfig) -> Self {
        let session =
            IdemixSession::with_executor(CardExecutor::new(transport), config.aid.clone());
        Self { session, config }
    }

    /// Card reporting every exchange to `observer`
    pub fn with_observer(
        transport: T,
        config: IdemixConfig,
        observer: impl TransmitObserver + 'static,
    ) -> Self {
        let session = IdemixSession::with_observer(transport, config.aid.clone(), observer);
        Self { session, config }
    }

    /// Open the channel and select the application
    pub fn open(&mut self) -> Result<()> {
        self.session.open()
    }

    /// Close the channel; safe to call more than once
    pub fn close(&mut self) -> Result<()> {
        self.session.close()
    }

    /// Whether the application is selected
    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    /// Configuration the card was created with
    pub const fn config(&self) -> &IdemixConfig {
        &self.config
    }

    /// Session carrying the commands
    pub const fn session(&self) -> &IdemixSession<T> {
        &self.session
    }

    /// Get a reference to the underlying transport
    pub const fn transport(&self) -> &T {
        self.session.transport()
    }

    /// Take ownership of the transport and return it
    pub fn into_transport(self) -> T {
        self.session.into_transport()
    }

    /// Let the card generate its master secret
    ///
    /// Fails with "Master secret already set." on a personalized card.
    pub fn generate_master_secret(&mut self) -> Result<()> {
        self.execute(&ProtocolCommands::single(generate_master_secret_command()))?;
        Ok(())
    }

    /// Authorize the following commands with the card holder's PIN
    pub fn verify_pin(&mut self, pin: &[u8]) -> Result<()> {
        self.execute(&ProtocolCommands::single(verify_pin_command(pin)))?;
        Ok(())
    }

    /// Start issuance in the configured slot and load the issuer public key
    #[instrument(skip_all, fields(credential_id = self.config.credential_id))]
    pub fn set_issuance_specification(&mut self, spec: &IssuanceSpec) -> Result<()> {
        let commands = set_issuance_specification_commands(spec, self.config.credential_id)?;
        self.execute(&commands)?;
        Ok(())
    }

    /// Load the attribute values of the credential being issued
    #[instrument(skip_all)]
    pub fn set_attributes(&mut self, spec: &IssuanceSpec, values: &Values) -> Result<()> {
        let commands = set_attributes_commands(spec, values)?;
        self.execute(&commands)?;
        Ok(())
    }

    /// Run a command sequence fail-fast on the open session
    pub fn execute(&mut self, commands: &ProtocolCommands) -> Result<ProtocolResponses> {
        debug!(commands = commands.len(), "Executing command sequence");
        self.session.execute(commands)
    }
}

impl<T: CardTransport> Recipient for IdemixCard<T> {
    #[instrument(skip_all)]
    fn round1(&mut self, spec: &IssuanceSpec, msg: &IssuanceMessage) -> Result<IssuanceMessage> {
        let commands = round1_commands(spec, msg)?;
        let responses = self.execute(&commands)?;
        process_round1_responses(&responses)
    }

    #[instrument(skip_all)]
    fn round3(&mut self, spec: &IssuanceSpec, msg: &IssuanceMessage) -> Result<()> {
        let commands = round3_commands(spec, msg)?;
        self.execute(&commands)?;
        debug!(credential_id = self.config.credential_id, "Credential stored");
        Ok(())
    }
}

impl<T: CardTransport> Prover for IdemixCard<T> {
    #[instrument(skip_all, fields(credential_id = self.config.credential_id))]
    fn build_proof(&mut self, nonce: &BigUint, spec: &ProofSpec) -> Result<Proof> {
        let commands = build_proof_commands(nonce, spec, self.config.credential_id)?;
        let responses = self.execute(&commands)?;
        process_build_proof_responses(&responses, spec)
    }
}

#[cfg(feature = "pcsc")]
impl IdemixCard<idemix_apdu_transport_pcsc::PcscTransport> {
    /// Pick a PC/SC reader by `strategy` and open the application on it
    pub fn connect(
        strategy: idemix_apdu_transport_pcsc::ConnectStrategy,
        config: IdemixConfig,
    ) -> Result<Self> {
        let manager = idemix_apdu_transport_pcsc::PcscDeviceManager::new()?;
        let transport = manager.connect_strategy(strategy, Default::default())?;
        let mut card = Self::with_config(transport, config);
        card.open()?;
        Ok(card)
    }
}
