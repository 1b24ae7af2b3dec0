//! Device manager for PC/SC operations

use pcsc::{Context, ReaderState, Scope, State};
use tracing::debug;

use crate::config::{ConnectStrategy, PcscConfig};
use crate::error::PcscError;
use crate::reader::PcscReader;
use crate::transport::PcscTransport;
use crate::util::match_atr;

/// Manager for PC/SC device operations
#[allow(missing_debug_implementations)]
pub struct PcscDeviceManager {
    context: Context,
}

impl PcscDeviceManager {
    /// Establish a user scoped PC/SC context
    pub fn new() -> Result<Self, PcscError> {
        let context = Context::establish(Scope::User)?;
        Ok(Self { context })
    }

    /// List all available card readers with their card state
    pub fn list_readers(&self) -> Result<Vec<PcscReader>, PcscError> {
        let names = self.context.list_readers_owned()?;
        if names.is_empty() {
            return Err(PcscError::NoReadersAvailable);
        }

        let mut states: Vec<ReaderState> = names
            .iter()
            .map(|name| ReaderState::new(name.as_c_str(), State::UNAWARE))
            .collect();

        let readers = match self.context.get_status_change(None, &mut states) {
            Ok(()) => states.iter().map(PcscReader::from_reader_state).collect(),
            Err(e) => {
                debug!(error = %e, "Reader status unavailable, assuming no cards");
                names
                    .iter()
                    .map(|name| PcscReader::new(name.to_string_lossy().into_owned(), false, None))
                    .collect()
            }
        };

        Ok(readers)
    }

    /// Create a transport for a reader; the card is connected on `open`
    pub fn open_reader(&self, reader_name: &str) -> Result<PcscTransport, PcscError> {
        self.open_reader_with_config(reader_name, PcscConfig::default())
    }

    /// Create a transport for a reader with custom configuration
    pub fn open_reader_with_config(
        &self,
        reader_name: &str,
        config: PcscConfig,
    ) -> Result<PcscTransport, PcscError> {
        PcscTransport::new(self.context.clone(), reader_name, config)
    }

    /// Pick a reader using the specified strategy
    pub fn connect_strategy(
        &self,
        strategy: ConnectStrategy,
        config: PcscConfig,
    ) -> Result<PcscTransport, PcscError> {
        let reader = match strategy {
            ConnectStrategy::Reader(name) => return self.open_reader_with_config(&name, config),
            ConnectStrategy::AnyCard => self
                .list_readers()?
                .into_iter()
                .find(PcscReader::has_card)
                .ok_or_else(|| PcscError::NoCard("any reader".to_string()))?,
            ConnectStrategy::CardWithAtr { atr, mask } => self
                .list_readers()?
                .into_iter()
                .find(|reader| {
                    reader
                        .atr()
                        .is_some_and(|found| match_atr(found, &atr, mask.as_deref()))
                })
                .ok_or_else(|| PcscError::NoCard("reader with matching ATR".to_string()))?,
            ConnectStrategy::FirstAvailable => self
                .list_readers()?
                .into_iter()
                .next()
                .ok_or(PcscError::NoReadersAvailable)?,
        };

        debug!(reader = reader.name(), "Selected reader");
        self.open_reader_with_config(reader.name(), config)
    }
}
