//! Host side of the idemix smart card applet
//!
//! The card holds the master secret and the credentials issued to it, and
//! takes part in the issuance and selective disclosure protocols through a
//! fixed set of APDUs. This crate builds those command sequences, runs them
//! over any [`CardTransport`](idemix_apdu_core::CardTransport) and turns the
//! responses into protocol messages and proofs.
//!
//! - [`issuance`] and [`disclosure`] are pure: they map specifications to
//!   [`ProtocolCommands`](idemix_apdu_core::ProtocolCommands) and responses
//!   back to values, without touching a card.
//! - [`IdemixSession`] owns the channel and selects the application.
//! - [`IdemixCard`] combines both and implements [`Recipient`] and [`Prover`].
//!
//! ```no_run
//! # #[cfg(feature = "pcsc")]
//! # fn main() -> idemix_card::Result<()> {
//! use idemix_apdu_transport_pcsc::ConnectStrategy;
//! use idemix_card::{IdemixCard, IdemixConfig};
//!
//! let mut card = IdemixCard::connect(ConnectStrategy::AnyCard, IdemixConfig::default())?;
//! card.verify_pin(b"0000")?;
//! card.close()?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "pcsc"))]
//! # fn main() {}
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod api;
mod application;
pub mod codec;
pub mod commands;
mod config;
pub mod constants;
pub mod disclosure;
mod error;
pub mod issuance;
mod session;
pub mod types;

pub use api::{Prover, Recipient};
pub use application::IdemixCard;
pub use config::IdemixConfig;
pub use error::{ChannelError, CommandFailure, EncodingError, Error, Result};
pub use session::{IdemixSession, SessionState};
pub use types::*;
