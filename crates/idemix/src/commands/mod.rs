//! Single-command operations of the idemix applet

mod pin;
mod secret;
mod select;

pub use pin::verify_pin_command;
pub use secret::generate_master_secret_command;
pub use select::select_application_command;
