//! Core traits and types for APDU (Application Protocol Data Unit) operations
//!
//! This crate provides the foundational types for talking to smart card applets
//! according to ISO/IEC 7816-4, plus the named command sequences that multi-step
//! card protocols are built from.
//!
//! ## Overview
//!
//! - [`Command`] and [`Response`] model a single APDU exchange, including the
//!   extended length encoding needed for large data fields.
//! - [`CardTransport`] is the byte-level seam towards a physical or emulated card.
//! - [`ProtocolCommand`] pairs a command with a key, a human readable description
//!   and an [`ErrorTable`]; [`ProtocolCommands`] is an ordered sequence of them.
//! - [`Executor`] runs a sequence fail-fast and collects [`ProtocolResponses`]
//!   keyed by command key. [`CardExecutor`] is the transport-backed implementation
//!   and reports every exchange to a caller-supplied [`TransmitObserver`].
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

// Main modules
pub mod command;
pub mod executor;
pub mod protocol;
pub mod response;
pub mod transport;

// Core error types
mod error;
pub use error::{Error, Result};

// Re-exports for common types
pub use command::{Command, ExpectedLength};
pub use executor::observer::{Exchange, NoopObserver, TracingObserver, TransmitObserver};
pub use executor::{CardExecutor, Executor};
pub use protocol::{
    ErrorTable, ProtocolCommand, ProtocolCommands, ProtocolResponse, ProtocolResponses,
};
pub use response::Response;
pub use response::status::StatusWord;
pub use transport::CardTransport;

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        Bytes, BytesMut, Command, Error, ErrorTable, ProtocolCommand, ProtocolCommands,
        ProtocolResponse, ProtocolResponses, Response, Result,
        executor::{CardExecutor, Executor},
        response::status::{StatusWord, common as status},
        transport::{CardTransport, TransportError},
    };
}
