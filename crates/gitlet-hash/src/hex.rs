//! Hex rendering of digests.
//!
//! Encoding always produces lowercase; decoding accepts either case.

use crate::HashError;

/// ASCII byte → nibble value, 0xff for non-hex bytes.
const NIBBLE: [u8; 256] = {
    let mut table = [0xffu8; 256];
    let mut i = 0;
    while i < 256 {
        let c = i as u8;
        table[i] = match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            b'A'..=b'F' => c - b'A' + 10,
            _ => 0xff,
        };
        i += 1;
    }
    table
};

const DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Hex-encode `bytes` to a new `String`.
pub fn hex_to_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(DIGITS[usize::from(b >> 4)]));
        out.push(char::from(DIGITS[usize::from(b & 0x0f)]));
    }
    out
}

/// Decode `hex` into `buf`; `hex` must be exactly `buf.len() * 2` characters.
pub fn hex_decode(hex: &str, buf: &mut [u8]) -> Result<(), HashError> {
    let hex = hex.as_bytes();
    if hex.len() != buf.len() * 2 {
        return Err(HashError::InvalidHexLength {
            expected: buf.len() * 2,
            actual: hex.len(),
        });
    }
    for (i, out) in buf.iter_mut().enumerate() {
        let hi = nibble(hex, i * 2)?;
        let lo = nibble(hex, i * 2 + 1)?;
        *out = (hi << 4) | lo;
    }
    Ok(())
}

fn nibble(hex: &[u8], position: usize) -> Result<u8, HashError> {
    match NIBBLE[usize::from(hex[position])] {
        0xff => Err(HashError::InvalidHex {
            position,
            character: char::from(hex[position]),
        }),
        v => Ok(v),
    }
}
