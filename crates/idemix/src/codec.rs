//! Fixed-width big-endian encoding of protocol integers
//!
//! Every integer the applet consumes has a width fixed by the system
//! parameters. Values are sent as exactly `ceil(bits / 8)` bytes, left padded
//! with zeros. A value wider than its mandated width is an error, never
//! truncated.

use bytes::{Bytes, BytesMut};
use idemix_apdu_core::ProtocolResponses;
use num_bigint::BigUint;

use crate::error::{EncodingError, Error, Result};

/// Number of bytes needed to hold `bits` bits
pub const fn byte_length(bits: usize) -> usize {
    bits.div_ceil(8)
}

/// Minimal big-endian magnitude bytes, empty for zero
pub fn to_unsigned_bytes(value: &BigUint) -> Vec<u8> {
    if value.bits() == 0 {
        Vec::new()
    } else {
        value.to_bytes_be()
    }
}

/// Interpret bytes as a big-endian unsigned magnitude
pub fn from_unsigned_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Encode `value` as exactly `byte_length(bits)` big-endian bytes
pub fn fixed_length(value: &BigUint, bits: usize) -> std::result::Result<Bytes, EncodingError> {
    let actual = value.bits();
    if actual > bits as u64 {
        return Err(EncodingError::Overflow { bits, actual });
    }

    let magnitude = to_unsigned_bytes(value);
    let length = byte_length(bits);
    let mut fixed = BytesMut::zeroed(length);
    fixed[length - magnitude.len()..].copy_from_slice(&magnitude);
    Ok(fixed.freeze())
}

/// Decode the response payload stored under `key`
pub(crate) fn response_integer(responses: &ProtocolResponses, key: &str) -> Result<BigUint> {
    responses
        .data(key)
        .map(|data| from_unsigned_bytes(data))
        .ok_or_else(|| Error::MissingResponse(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_byte_length() {
        assert_eq!(byte_length(0), 0);
        assert_eq!(byte_length(1), 1);
        assert_eq!(byte_length(80), 10);
        assert_eq!(byte_length(597), 75);
        assert_eq!(byte_length(2724), 341);
    }

    #[test]
    fn test_fixed_length_pads_left() {
        let value = BigUint::from(0x0102u32);
        assert_eq!(fixed_length(&value, 32).unwrap().as_ref(), hex!("00000102"));

        let zero = BigUint::from(0u32);
        assert_eq!(fixed_length(&zero, 80).unwrap().as_ref(), [0u8; 10]);
        assert!(to_unsigned_bytes(&zero).is_empty());
    }

    #[test]
    fn test_fixed_length_has_no_sign_byte() {
        // Top bit set: a signed encoding would prepend 00
        let value = BigUint::from(0xFFu8);
        assert_eq!(to_unsigned_bytes(&value), vec![0xFF]);
        assert_eq!(fixed_length(&value, 8).unwrap().as_ref(), [0xFF]);
    }

    #[test]
    fn test_round_trip() {
        let cases: [(BigUint, usize); 6] = [
            (BigUint::from(0u8), 8),
            (BigUint::from(1313u32), 256),
            (BigUint::from(u64::MAX), 64),
            (BigUint::from(u64::MAX), 597),
            ((BigUint::from(1u8) << 2047u32) + 7u32, 2048),
            ((BigUint::from(1u8) << 79u32) - 1u32, 80),
        ];

        for (value, bits) in cases {
            let encoded = fixed_length(&value, bits).unwrap();
            assert_eq!(encoded.len(), byte_length(bits));
            assert_eq!(from_unsigned_bytes(&encoded), value);
        }
    }

    #[test]
    fn test_overflow_is_an_error() {
        let value = BigUint::from(1u8) << 80u32;
        assert_eq!(
            fixed_length(&value, 80),
            Err(EncodingError::Overflow { bits: 80, actual: 81 })
        );

        // Fits the byte count but not the bit width
        let value = BigUint::from(0x1FFFu32);
        assert_eq!(
            fixed_length(&value, 12).unwrap_err(),
            EncodingError::Overflow { bits: 12, actual: 13 }
        );
    }
}
