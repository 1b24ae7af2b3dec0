//! PC/SC transport implementation

use std::ffi::CString;
use std::fmt;

use bytes::Bytes;
use idemix_apdu_core::transport::{CardTransport, TransportError};
use pcsc::{Card, Context, Disposition, MAX_BUFFER_SIZE_EXTENDED};
use tracing::{debug, warn};

use crate::config::PcscConfig;
use crate::error::PcscError;

/// Transport implementation using PC/SC
pub struct PcscTransport {
    context: Context,
    card: Option<Card>,
    reader_name: CString,
    config: PcscConfig,
}

impl fmt::Debug for PcscTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscTransport")
            .field("reader_name", &self.reader_name)
            .field("open", &self.card.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl PcscTransport {
    pub(crate) fn new(
        context: Context,
        reader_name: &str,
        config: PcscConfig,
    ) -> Result<Self, PcscError> {
        let reader_name = CString::new(reader_name)
            .map_err(|_| PcscError::ReaderNotFound(reader_name.to_string()))?;

        Ok(Self {
            context,
            card: None,
            reader_name,
            config,
        })
    }

    /// Get the reader name
    pub fn reader_name(&self) -> String {
        self.reader_name.to_string_lossy().into_owned()
    }

    /// Get the configuration
    pub const fn config(&self) -> &PcscConfig {
        &self.config
    }

    /// Get the ATR of the connected card
    pub fn atr(&self) -> Result<Vec<u8>, PcscError> {
        let card = self
            .card
            .as_ref()
            .ok_or_else(|| PcscError::NoCard(self.reader_name()))?;
        Ok(card.get_attribute_owned(pcsc::Attribute::AtrString)?)
    }

    fn connect_card(&mut self) -> Result<(), PcscError> {
        if self.card.is_some() {
            return Ok(());
        }

        match self.context.connect(
            &self.reader_name,
            self.config.share_mode.into(),
            self.config.protocols,
        ) {
            Ok(card) => {
                debug!(reader = %self.reader_name(), "Connected to card");
                self.card = Some(card);
                Ok(())
            }
            Err(pcsc::Error::NoSmartcard) => Err(PcscError::NoCard(self.reader_name())),
            Err(pcsc::Error::UnknownReader) => Err(PcscError::ReaderNotFound(self.reader_name())),
            Err(e) => Err(e.into()),
        }
    }

    fn transmit_command(&mut self, command: &[u8]) -> Result<Bytes, PcscError> {
        let card = self.card.as_mut().ok_or(PcscError::CardRemoved)?;

        let mut buffer = vec![0u8; MAX_BUFFER_SIZE_EXTENDED];
        match card.transmit(command, &mut buffer) {
            Ok(response) => Ok(Bytes::copy_from_slice(response)),
            Err(e @ (pcsc::Error::ResetCard | pcsc::Error::RemovedCard)) => {
                warn!(reader = %self.reader_name(), error = %e, "Card connection lost");
                self.card = None;
                Err(if e == pcsc::Error::ResetCard {
                    PcscError::CardReset
                } else {
                    PcscError::CardRemoved
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl CardTransport for PcscTransport {
    fn open(&mut self) -> Result<(), TransportError> {
        self.connect_card().map_err(Into::into)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if let Some(card) = self.card.take() {
            debug!(reader = %self.reader_name(), "Disconnecting from card");
            card.disconnect(Disposition::LeaveCard)
                .map_err(|(_, e)| PcscError::from(e))?;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.card.is_some()
    }

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        if self.card.is_none() {
            return Err(TransportError::NotOpen);
        }
        self.transmit_command(command).map_err(Into::into)
    }
}

impl Drop for PcscTransport {
    fn drop(&mut self) {
        if let Some(card) = self.card.take() {
            let _ = card.disconnect(Disposition::LeaveCard);
        }
    }
}
