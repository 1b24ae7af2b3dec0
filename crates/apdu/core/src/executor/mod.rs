//! Executor for APDU command execution
//!
//! An [`Executor`] sends single commands and runs whole protocol sequences.
//! Sequences are strictly fail-fast: the first command answering with anything
//! other than `90 00` aborts the run and nothing after it is sent.

pub mod observer;

use std::fmt;
use std::time::Instant;

use tracing::{debug, instrument, trace, warn};

use crate::command::Command;
use crate::protocol::{ProtocolCommands, ProtocolResponse, ProtocolResponses};
use crate::response::Response;
use crate::transport::CardTransport;
use crate::{Error, Result};

use observer::{Exchange, TracingObserver, TransmitObserver};

/// Trait for APDU command execution
pub trait Executor: Send + fmt::Debug {
    /// Transmit a single command and parse its response
    ///
    /// The status word is not interpreted here.
    #[instrument(
        level = "trace",
        skip_all,
        fields(executor = std::any::type_name::<Self>(), ins = command.ins)
    )]
    fn transmit(&mut self, command: &Command) -> Result<Response> {
        let response = self.do_transmit(command);
        match &response {
            Ok(response) => {
                trace!(status = %response.status(), "Received response");
            }
            Err(err) => {
                debug!(error = ?err, "Error during transmission");
            }
        }
        response
    }

    /// Internal implementation of transmit
    fn do_transmit(&mut self, command: &Command) -> Result<Response>;

    /// Run a command sequence in order and collect the responses by key
    ///
    /// Fails with [`Error::DuplicateKey`] before sending anything when two
    /// commands share a key, and with [`Error::CommandFailed`] at the first
    /// command that does not answer `90 00`.
    fn execute(&mut self, commands: &ProtocolCommands) -> Result<ProtocolResponses> {
        if let Some(key) = commands.duplicate_key() {
            return Err(Error::DuplicateKey(key.to_string()));
        }

        let mut responses = ProtocolResponses::new();
        for command in commands {
            debug!(
                key = command.key(),
                description = command.description(),
                "Executing protocol command"
            );

            let response = self.transmit(command.command())?;
            let status = response.status();
            if !status.is_success() {
                let message = command.error_message(status);
                warn!(
                    key = command.key(),
                    status = %status,
                    error_message = message,
                    "Protocol command failed"
                );
                return Err(Error::CommandFailed {
                    description: command.description().to_string(),
                    status,
                    message: message.to_string(),
                });
            }

            responses.insert(ProtocolResponse::new(command.key(), response));
        }

        Ok(responses)
    }
}

/// Executor talking to a card through a [`CardTransport`]
#[derive(Debug)]
pub struct CardExecutor<T: CardTransport> {
    /// The transport used for communication
    transport: T,
    /// Receives every exchange
    observer: Box<dyn TransmitObserver>,
    /// The last response received
    last_response: Option<Response>,
}

impl<T: CardTransport> CardExecutor<T> {
    /// Create a new card executor logging exchanges through `tracing`
    pub fn new(transport: T) -> Self {
        Self::with_observer(transport, TracingObserver)
    }

    /// Create a new card executor reporting exchanges to `observer`
    pub fn with_observer(transport: T, observer: impl TransmitObserver + 'static) -> Self {
        Self {
            transport,
            observer: Box::new(observer),
            last_response: None,
        }
    }

    /// Get a reference to the underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Take ownership of the transport and return it
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Get the last response received
    pub const fn last_response(&self) -> Option<&Response> {
        self.last_response.as_ref()
    }
}

impl<T: CardTransport> Executor for CardExecutor<T> {
    fn do_transmit(&mut self, command: &Command) -> Result<Response> {
        command.validate()?;
        let command_bytes = command.to_bytes();

        let started = Instant::now();
        let raw = self.transport.transmit_raw(&command_bytes)?;
        self.observer.on_exchange(&Exchange {
            command: &command_bytes,
            response: &raw,
            duration: started.elapsed(),
        });

        let response = Response::from_bytes(&raw)?;
        self.last_response = Some(response.clone());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use bytes::Bytes;
    use hex_literal::hex;

    use super::*;
    use crate::protocol::{ErrorTable, ProtocolCommand};
    use crate::response::status::StatusWord;
    use crate::transport::MockTransport;

    #[derive(Debug, Default, Clone)]
    struct Recorder(Arc<Mutex<Vec<Vec<u8>>>>);

    impl TransmitObserver for Recorder {
        fn on_exchange(&mut self, exchange: &Exchange<'_>) {
            self.0.lock().unwrap().push(exchange.command.to_vec());
        }
    }

    fn step(key: &str, ins: u8) -> ProtocolCommand {
        ProtocolCommand::new(key, format!("Step {key}"), Command::new(0x80, ins, 0x00, 0x00))
            .with_errors(ErrorTable::new().with(0x6986u16, "Not now."))
    }

    #[test]
    fn test_execute_collects_responses() {
        let transport = MockTransport::new(vec![
            Bytes::from_static(&hex!("0102 9000")),
            Bytes::from_static(&hex!("9000")),
        ]);
        let mut executor = CardExecutor::new(transport);

        let commands: ProtocolCommands = [step("a", 0x16), step("b", 0x18)].into_iter().collect();
        let responses = executor.execute(&commands).unwrap();

        assert_eq!(responses.len(), 2);
        assert_eq!(responses.data("a").unwrap().as_ref(), hex!("0102"));
        assert!(responses.data("b").unwrap().is_empty());
        assert_eq!(executor.transport().commands.len(), 2);
    }

    #[test]
    fn test_execute_stops_at_first_failure() {
        let transport = MockTransport::new(vec![
            Bytes::from_static(&hex!("9000")),
            Bytes::from_static(&hex!("9000")),
            Bytes::from_static(&hex!("6986")),
            Bytes::from_static(&hex!("9000")),
        ]);
        let recorder = Recorder::default();
        let mut executor = CardExecutor::with_observer(transport, recorder.clone());

        let commands: ProtocolCommands = [
            step("one", 0x11),
            step("two", 0x12),
            step("three", 0x14),
            step("four", 0x15),
        ]
        .into_iter()
        .collect();

        let err = executor.execute(&commands).unwrap_err();
        assert_eq!(
            err,
            Error::CommandFailed {
                description: "Step three".to_string(),
                status: StatusWord::new(0x69, 0x86),
                message: "Not now.".to_string(),
            }
        );

        let sent = &executor.transport().commands;
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[2].as_ref(), hex!("80140000"));
        assert_eq!(recorder.0.lock().unwrap().len(), 3);
        assert_eq!(
            executor.last_response().map(Response::status),
            Some(StatusWord::new(0x69, 0x86))
        );
    }

    #[test]
    fn test_unknown_status_resolves_to_empty_message() {
        let transport = MockTransport::new(vec![Bytes::from_static(&hex!("6A80"))]);
        let mut executor = CardExecutor::with_observer(transport, observer::NoopObserver);

        let err = executor
            .execute(&ProtocolCommands::single(step("only", 0x10)))
            .unwrap_err();
        assert!(matches!(err, Error::CommandFailed { ref message, .. } if message.is_empty()));
    }

    #[test]
    fn test_duplicate_keys_rejected_before_transmit() {
        let mut executor = CardExecutor::new(MockTransport::with_success());
        let commands: ProtocolCommands = [step("proof_c", 0x17), step("proof_c", 0x1A)]
            .into_iter()
            .collect();

        assert_eq!(
            executor.execute(&commands).unwrap_err(),
            Error::DuplicateKey("proof_c".to_string())
        );
        assert!(executor.transport().commands.is_empty());
    }

    #[test]
    fn test_transport_error_propagates() {
        let mut transport = MockTransport::with_success();
        transport.open = false;
        let mut executor = CardExecutor::new(transport);

        assert_eq!(
            executor.transmit(&Command::new(0x80, 0x18, 0x00, 0x00)),
            Err(Error::Transport(crate::transport::TransportError::NotOpen))
        );
    }
}
