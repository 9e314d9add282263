//! Zlib envelope for stored objects.
//!
//! Compression only wraps the canonical encoding for persistence; digests are
//! always taken over the uncompressed bytes.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

/// Errors from the compression envelope.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("corrupt zlib stream: {0}")]
    CorruptStream(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Zlib-compress `data` at `level` (0-9).
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>, CodecError> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 2 + 16),
        Compression::new(level),
    );
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Inflate a complete zlib stream.
///
/// The stream must be well formed from header to Adler-32 trailer; a bad
/// header, a checksum mismatch, or input that ends before the stream does is
/// a [`CodecError::CorruptStream`]. Bytes after the end of the stream are
/// ignored.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(data.len().saturating_mul(2).max(64));

    loop {
        let consumed = inflater.total_in() as usize;
        let status = inflater
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::Finish)
            .map_err(|e| CodecError::CorruptStream(e.to_string()))?;

        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError if out.len() == out.capacity() => {
                out.reserve(out.capacity());
            }
            Status::Ok | Status::BufError => {
                return Err(CodecError::CorruptStream(format!(
                    "stream truncated after {} of {} input bytes",
                    inflater.total_in(),
                    data.len()
                )));
            }
        }
    }
}
