//! The block codec: one chunk of raw bytes in, one self-contained compressed
//! block out, and back.
//!
//! The entropy coding itself (run-length, Burrows-Wheeler, Huffman) is
//! delegated to libbz2 through the `bzip2` crate.  Each call to
//! [`encode_block`] produces a complete stream — header, payload, end-of-
//! stream marker, checksum — so concatenating the outputs yields a valid
//! archive with no further framing work.
//!
//! [`decode_block`] enforces the one-block contract from the other side: the
//! input must be consumed exactly.  Unconsumed trailing bytes mean the caller
//! sliced a boundary wrong or the archive is corrupt, and either one is fatal.

use std::io::{self, Read};

use bzip2::read::{BzDecoder, BzEncoder};
use bzip2::Compression;

use crate::format;

/// Compresses one chunk into a self-contained block.
///
/// The returned bytes begin with the stream header for `level` and end with
/// the encoder's end-of-stream marker, so the block is decodable on its own.
pub fn encode_block(raw: &[u8], level: u32) -> io::Result<Vec<u8>> {
    debug_assert!(format::is_valid_level(level));
    let mut encoder = BzEncoder::new(raw, Compression::new(level));
    let mut block = Vec::new();
    encoder.read_to_end(&mut block)?;
    Ok(block)
}

/// Decompresses exactly one block.
///
/// Fails with [`io::ErrorKind::InvalidData`] when the decoder reaches its
/// end-of-stream marker before consuming all of `block` — the slicing that
/// produced `block` only guarantees exact boundaries if this never happens.
/// Truncated or corrupt payloads surface as the decoder's own error.
pub fn decode_block(block: &[u8]) -> io::Result<Vec<u8>> {
    let mut decoder = BzDecoder::new(block);
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;

    let consumed = decoder.total_in() as usize;
    if consumed < block.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "{} trailing bytes after end of compressed block",
                block.len() - consumed
            ),
        ));
    }
    Ok(raw)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
