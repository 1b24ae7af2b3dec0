//! APDU command definitions
//!
//! This module provides the [`Command`] type and its ISO/IEC 7816-4 encoding.
//! Commands switch to the extended length format automatically when the data
//! field exceeds 255 bytes or more than 256 response bytes are expected.

pub mod error;

use bytes::{BufMut, Bytes, BytesMut};

pub use error::CommandError;

/// Number of response bytes expected (Ne)
///
/// A value of 256 is sent as `00` in the short format, 65536 as `00 00` in the
/// extended format.
pub type ExpectedLength = u32;

/// Largest data field a short APDU can carry
pub const MAX_SHORT_DATA_LENGTH: usize = 255;
/// Largest data field an extended APDU can carry
pub const MAX_EXTENDED_DATA_LENGTH: usize = 65535;
/// Largest expected length a short APDU can express
pub const MAX_SHORT_EXPECTED_LENGTH: ExpectedLength = 256;
/// Largest expected length an extended APDU can express
pub const MAX_EXTENDED_EXPECTED_LENGTH: ExpectedLength = 65536;

/// Generic APDU command structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data (optional)
    pub data: Option<Bytes>,
    /// Expected length (optional)
    pub le: Option<ExpectedLength>,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Create a new command with expected response length (Le)
    pub const fn new_with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: ExpectedLength) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: Some(le),
        }
    }

    /// Create a new command with data payload
    pub fn new_with_data<T: Into<Bytes>>(cla: u8, ins: u8, p1: u8, p2: u8, data: T) -> Self {
        Self::new(cla, ins, p1, p2).with_data(data)
    }

    /// Create a new command with both data and expected length
    pub fn new_with_data_and_le<T: Into<Bytes>>(
        cla: u8,
        ins: u8,
        p1: u8,
        p2: u8,
        data: T,
        le: ExpectedLength,
    ) -> Self {
        Self::new(cla, ins, p1, p2).with_data(data).with_le(le)
    }

    /// Set the data field
    pub fn with_data<T: Into<Bytes>>(mut self, data: T) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the expected length field
    pub const fn with_le(mut self, le: ExpectedLength) -> Self {
        self.le = Some(le);
        self
    }

    /// Data field, if present and non-empty
    ///
    /// An empty data field is encoded exactly like an absent one.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref().filter(|data| !data.is_empty())
    }

    /// Whether this command needs the extended length format
    pub fn is_extended(&self) -> bool {
        self.data().is_some_and(|data| data.len() > MAX_SHORT_DATA_LENGTH)
            || self.le.is_some_and(|le| le > MAX_SHORT_EXPECTED_LENGTH)
    }

    /// Check that the data field and expected length fit in an APDU
    pub fn validate(&self) -> Result<(), CommandError> {
        if let Some(data) = self.data() {
            if data.len() > MAX_EXTENDED_DATA_LENGTH {
                return Err(CommandError::data_too_long(
                    data.len(),
                    MAX_EXTENDED_DATA_LENGTH,
                ));
            }
        }
        match self.le {
            Some(le) if le == 0 || le > MAX_EXTENDED_EXPECTED_LENGTH => Err(
                CommandError::InvalidExpectedLength(le, MAX_EXTENDED_EXPECTED_LENGTH),
            ),
            _ => Ok(()),
        }
    }

    /// Convert to raw APDU bytes
    ///
    /// The command is assumed to pass [`Command::validate`].
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(self.command_length());
        let extended = self.is_extended();

        // Header: CLA, INS, P1, P2
        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        // Lc and data
        if let Some(data) = self.data() {
            if extended {
                buffer.put_u8(0x00);
                buffer.put_u16(data.len() as u16);
            } else {
                buffer.put_u8(data.len() as u8);
            }
            buffer.put_slice(data);
        }

        // Le
        if let Some(le) = self.le {
            if extended {
                if self.data().is_none() {
                    buffer.put_u8(0x00);
                }
                // 65536 wraps to 00 00
                buffer.put_u16(le as u16);
            } else {
                // 256 wraps to 00
                buffer.put_u8(le as u8);
            }
        }

        buffer.freeze()
    }

    /// Calculate length of serialized command
    pub fn command_length(&self) -> usize {
        // Header (CLA, INS, P1, P2) is always 4 bytes
        let mut length = 4;
        let extended = self.is_extended();

        if let Some(data) = self.data() {
            length += data.len() + if extended { 3 } else { 1 };
        }

        if self.le.is_some() {
            length += match (extended, self.data().is_some()) {
                (false, _) => 1,
                (true, true) => 2,
                (true, false) => 3,
            };
        }

        length
    }

    /// Parse a command from raw bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, CommandError> {
        if data.len() < 4 {
            return Err(CommandError::InvalidLength(data.len()));
        }

        let mut command = Self::new(data[0], data[1], data[2], data[3]);
        let body = &data[4..];

        match body {
            // Case 1: header only
            [] => {}
            // Case 2 short: Le only
            [le] => command.le = Some(short_le(*le)),
            // Extended cases start with a zero byte
            [0x00, b1, b2, rest @ ..] if !rest.is_empty() || data.len() == 7 => {
                let n = u16::from_be_bytes([*b1, *b2]);
                if rest.is_empty() {
                    // Case 2 extended
                    command.le = Some(extended_le(n));
                } else {
                    let lc = n as usize;
                    match rest.len().checked_sub(lc) {
                        Some(0) => command.data = Some(Bytes::copy_from_slice(rest)),
                        Some(2) => {
                            command.data = Some(Bytes::copy_from_slice(&rest[..lc]));
                            command.le =
                                Some(extended_le(u16::from_be_bytes([rest[lc], rest[lc + 1]])));
                        }
                        _ => return Err(CommandError::InvalidLength(data.len())),
                    }
                }
            }
            // Short cases 3 and 4
            [lc, rest @ ..] => {
                let lc = *lc as usize;
                match rest.len().checked_sub(lc) {
                    Some(0) => command.data = Some(Bytes::copy_from_slice(rest)),
                    Some(1) => {
                        command.data = Some(Bytes::copy_from_slice(&rest[..lc]));
                        command.le = Some(short_le(rest[lc]));
                    }
                    _ => return Err(CommandError::InvalidLength(data.len())),
                }
            }
        }

        Ok(command)
    }
}

const fn short_le(byte: u8) -> ExpectedLength {
    if byte == 0 {
        MAX_SHORT_EXPECTED_LENGTH
    } else {
        byte as ExpectedLength
    }
}

const fn extended_le(value: u16) -> ExpectedLength {
    if value == 0 {
        MAX_EXTENDED_EXPECTED_LENGTH
    } else {
        value as ExpectedLength
    }
}

impl From<&Command> for Bytes {
    fn from(command: &Command) -> Self {
        command.to_bytes()
    }
}
