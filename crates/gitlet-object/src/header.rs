//! The `"<tag> <size>\0"` header that prefixes every canonical encoding.

use bstr::ByteSlice;

use crate::{ObjectError, ObjectType};

/// A parsed header. The tag is left raw so that callers decide when an
/// unknown tag becomes an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub tag: &'a [u8],
    /// Declared payload length.
    pub size: usize,
    /// Length of the header including the NUL separator.
    pub len: usize,
}

/// Parse the header at the front of `data`.
///
/// Only the header structure is checked here; whether `size` matches the
/// payload and whether the tag is known are left to the caller.
pub fn parse_header(data: &[u8]) -> Result<Header<'_>, ObjectError> {
    let nul = data
        .find_byte(0)
        .ok_or_else(|| ObjectError::CorruptedHeader("missing NUL separator".into()))?;
    let header = &data[..nul];

    let (tag, size) = header
        .split_once_str(" ")
        .ok_or_else(|| ObjectError::CorruptedHeader("missing space in header".into()))?;
    if tag.is_empty() || size.is_empty() {
        return Err(ObjectError::CorruptedHeader(format!(
            "empty field in header '{}'",
            header.as_bstr()
        )));
    }

    Ok(Header {
        tag,
        size: parse_size(size)?,
        len: nul + 1,
    })
}

fn parse_size(digits: &[u8]) -> Result<usize, ObjectError> {
    let invalid = || ObjectError::CorruptedHeader(format!("invalid size '{}'", digits.as_bstr()));
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    // All-digit input is valid UTF-8; only overflow can fail here.
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid)
}

/// Write a header: `"<tag> <size>\0"`.
pub fn write_header(obj_type: ObjectType, size: usize) -> Vec<u8> {
    format!("{obj_type} {size}\0").into_bytes()
}

/// The payload of a canonical encoding, without decoding it.
pub fn strip_header(data: &[u8]) -> Result<&[u8], ObjectError> {
    let hdr = parse_header(data)?;
    Ok(&data[hdr.len..])
}
