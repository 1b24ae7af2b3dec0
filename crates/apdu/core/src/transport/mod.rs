//! Transport traits for APDU communication with cards
//!
//! A transport moves raw APDU bytes to a card and back. It knows nothing about
//! command structure or the protocol running on top of it.

pub mod error;

use std::fmt;

use bytes::Bytes;
pub use error::TransportError;
use tracing::{debug, trace};

/// Trait for basic card transports
///
/// Timeout and reconnection policy belong to the implementation; callers treat
/// [`CardTransport::transmit_raw`] as a single blocking exchange.
pub trait CardTransport: Send + fmt::Debug {
    /// Establish the connection to the card
    ///
    /// Opening an already open transport is a no-op.
    fn open(&mut self) -> Result<(), TransportError>;

    /// Release the connection to the card
    ///
    /// Must be safe to call in any state, including repeatedly.
    fn close(&mut self) -> Result<(), TransportError>;

    /// Whether the transport currently holds an open connection
    fn is_open(&self) -> bool;

    /// Send raw APDU bytes to the card and return the response bytes
    ///
    /// The response includes the trailing status word.
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        trace!(command = ?hex::encode(command), "Transmitting raw command");
        let result = self.do_transmit_raw(command);
        match &result {
            Ok(response) => {
                trace!(response = ?hex::encode(response), "Received raw response");
            }
            Err(e) => {
                debug!(error = ?e, "Transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_raw
    /// This is the method that concrete implementations should override
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError>;
}

impl<T: CardTransport + ?Sized> CardTransport for Box<T> {
    fn open(&mut self) -> Result<(), TransportError> {
        (**self).open()
    }

    fn close(&mut self) -> Result<(), TransportError> {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        (**self).transmit_raw(command)
    }

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        (**self).do_transmit_raw(command)
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Default)]
#[allow(missing_docs, unreachable_pub)]
pub struct MockTransport {
    /// Responses returned in order; the last one repeats
    pub responses: Vec<Bytes>,
    /// Commands that were sent
    pub commands: Vec<Bytes>,
    /// Whether the transport is open
    pub open: bool,
}

#[cfg(test)]
#[allow(unreachable_pub)]
impl MockTransport {
    /// Create a new open mock transport with the given responses
    pub fn new(responses: Vec<Bytes>) -> Self {
        Self {
            responses,
            commands: Vec::new(),
            open: true,
        }
    }

    /// Create a new mock transport that always returns success (90 00)
    pub fn with_success() -> Self {
        Self::new(vec![Bytes::from_static(&[0x90, 0x00])])
    }
}

#[cfg(test)]
impl CardTransport for MockTransport {
    fn open(&mut self) -> Result<(), TransportError> {
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        if !self.open {
            return Err(TransportError::NotOpen);
        }

        self.commands.push(Bytes::copy_from_slice(command));

        match self.responses.len() {
            0 => Err(TransportError::Transmission),
            1 => Ok(self.responses[0].clone()),
            _ => Ok(self.responses.remove(0)),
        }
    }
}
