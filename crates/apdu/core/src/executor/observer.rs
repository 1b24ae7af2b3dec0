//! Per-exchange observation hooks
//!
//! A [`CardExecutor`](super::CardExecutor) reports every command/response pair
//! to its [`TransmitObserver`]. Observers are owned by the executor, so two
//! executors never share logging state.

use std::fmt;
use std::time::Duration;

use tracing::debug;

/// One completed command/response round trip
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    /// Encoded command as sent
    pub command: &'a [u8],
    /// Raw response including the status word
    pub response: &'a [u8],
    /// Time between sending and receiving
    pub duration: Duration,
}

/// Receives every exchange performed by an executor
pub trait TransmitObserver: fmt::Debug + Send {
    /// Called once per transmitted command, after the response arrived
    fn on_exchange(&mut self, exchange: &Exchange<'_>);
}

/// Logs each exchange at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TransmitObserver for TracingObserver {
    fn on_exchange(&mut self, exchange: &Exchange<'_>) {
        debug!(
            command = %hex::encode(exchange.command),
            response = %hex::encode(exchange.response),
            duration_ms = exchange.duration.as_secs_f64() * 1000.0,
            "APDU exchange"
        );
    }
}

/// Ignores all exchanges
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TransmitObserver for NoopObserver {
    fn on_exchange(&mut self, _exchange: &Exchange<'_>) {}
}
