//! Channel session towards the idemix application
//!
//! A session is `Closed` until [`IdemixSession::open`] has opened the transport
//! and selected the application. Only a selected session sends commands.

use bytes::Bytes;
use idemix_apdu_core::{
    CardExecutor, CardTransport, Command, Executor, ProtocolCommands, ProtocolResponses, Response,
    TransmitObserver,
};
use tracing::debug;

use crate::commands::select_application_command;
use crate::constants::IDEMIX_AID;
use crate::error::{ChannelError, Result};

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing selected; commands are refused without reaching the card
    Closed,
    /// Transport open and application selected
    Selected,
}

/// Exclusive connection to the idemix application on one card
#[derive(Debug)]
pub struct IdemixSession<T: CardTransport> {
    executor: CardExecutor<T>,
    aid: Bytes,
    state: SessionState,
}

impl<T: CardTransport> IdemixSession<T> {
    /// Session selecting the default idemix AID
    pub fn new(transport: T) -> Self {
        Self::with_executor(CardExecutor::new(transport), IDEMIX_AID)
    }

    /// Session selecting `aid`, reporting exchanges to `observer`
    pub fn with_observer(
        transport: T,
        aid: impl Into<Bytes>,
        observer: impl TransmitObserver + 'static,
    ) -> Self {
        Self::with_executor(CardExecutor::with_observer(transport, observer), aid)
    }

    /// Session on top of an existing executor
    pub fn with_executor(executor: CardExecutor<T>, aid: impl Into<Bytes>) -> Self {
        Self {
            executor,
            aid: aid.into(),
            state: SessionState::Closed,
        }
    }

    /// Open the transport if needed and select the application
    ///
    /// Opening a selected session selects the application again.
    pub fn open(&mut self) -> Result<()> {
        let transport = self.executor.transport_mut();
        if !transport.is_open() {
            debug!("Opening transport");
            transport.open().map_err(ChannelError::Transport)?;
        }

        let select = select_application_command(&self.aid);
        let response = self.executor.transmit(select.command())?;

        if !response.is_success() {
            debug!(status = %response.status(), "Application selection refused");
            self.state = SessionState::Closed;
            return Err(ChannelError::SelectFailed(response.status()).into());
        }

        debug!(aid = %hex::encode(&self.aid), "Selected idemix application");
        self.state = SessionState::Selected;
        Ok(())
    }

    /// Close the session and its transport
    ///
    /// Safe in any state; closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.state == SessionState::Selected {
            debug!("Closing idemix session");
        }
        self.state = SessionState::Closed;
        self.executor
            .transport_mut()
            .close()
            .map_err(ChannelError::Transport)?;
        Ok(())
    }

    /// Current lifecycle state
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the application is selected
    pub fn is_open(&self) -> bool {
        self.state == SessionState::Selected
    }

    /// Send one command; the status word is returned, not interpreted
    ///
    /// Transport failures surface as [`ChannelError::Transport`], as in [`Self::open`].
    pub fn transmit(&mut self, command: &Command) -> Result<Response> {
        self.ensure_open()?;
        Ok(self.executor.transmit(command)?)
    }

    /// Run a command sequence fail-fast, collecting the responses by key
    pub fn execute(&mut self, commands: &ProtocolCommands) -> Result<ProtocolResponses> {
        self.ensure_open()?;
        Ok(self.executor.execute(commands)?)
    }

    /// AID selected on open
    pub fn aid(&self) -> &[u8] {
        &self.aid
    }

    /// Get a reference to the underlying transport
    pub const fn transport(&self) -> &T {
        self.executor.transport()
    }

    /// Take ownership of the transport and return it
    pub fn into_transport(self) -> T {
        self.executor.into_transport()
    }

    fn ensure_open(&self) -> std::result::Result<(), ChannelError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(ChannelError::NotOpen)
        }
    }
}
