//! The on-disk contract shared by the compression and decompression paths.
//!
//! An archive is a plain concatenation of independently compressed bzip2
//! streams ("blocks").  Each block begins with a 10-byte stream header:
//! the ASCII magic `BZh`, one ASCII digit encoding the compression level,
//! and the six-byte block magic `1AY&SY`.  There is no outer container, no
//! length table, and no end-of-archive marker; a block ends where the next
//! stream header begins (or at end of input).
//!
//! [`StreamHeader`] captures the exact header byte sequence for one archive.
//! The level digit is constant across a valid archive, so once the first
//! header has been parsed the remaining boundaries are found by searching
//! for that fixed pattern.

use std::io;

/// Byte length of a stream header: `"BZh"` + level digit + `"1AY&SY"`.
pub const HEADER_LEN: usize = 10;

/// Leading magic of every stream header.
pub const MAGIC_PREFIX: &[u8; 3] = b"BZh";

/// Block magic that follows the level digit (the bits of pi, byte-aligned
/// only at a stream start).
pub const BLOCK_MAGIC: &[u8; 6] = b"1AY&SY";

/// Conventional filename suffix for archives in this format.
pub const BZ2_EXTENSION: &str = ".bz2";

/// Read-buffer size for the decompression path: the largest compressed size
/// a level-9 block normally reaches, plus margin.  A block that compresses
/// larger than this (pathological input) is still handled — the scanner just
/// needs more than one read to see its terminating header.
pub const MAX_BLOCK_BUFSIZE: usize = 9 * 100 * 1024 + 600;

/// Returns `true` for a usable compression level (1–9).
pub fn is_valid_level(level: u32) -> bool {
    (1..=9).contains(&level)
}

/// Raw bytes submitted to the encoder per block: `level × 100 KiB`.
///
/// The level is chosen once per archive and is not recorded anywhere except
/// the header digit, so the decoder can only recover this value through the
/// same formula.
pub fn chunk_size(level: u32) -> usize {
    debug_assert!(is_valid_level(level));
    level as usize * 100 * 1024
}

// ---------------------------------------------------------------------------
// StreamHeader
// ---------------------------------------------------------------------------

/// The fixed 10-byte header of every block in one archive.
///
/// Constructed either from a chosen level ([`StreamHeader::for_level`]) or by
/// parsing the first bytes of an archive ([`StreamHeader::parse`]), which
/// also recovers the level.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    bytes: [u8; HEADER_LEN],
    level: u32,
}

impl StreamHeader {
    /// Header for a freshly chosen compression level.
    pub fn for_level(level: u32) -> StreamHeader {
        debug_assert!(is_valid_level(level));
        let mut bytes = [0u8; HEADER_LEN];
        bytes[..3].copy_from_slice(MAGIC_PREFIX);
        bytes[3] = b'0' + level as u8;
        bytes[4..].copy_from_slice(BLOCK_MAGIC);
        StreamHeader { bytes, level }
    }

    /// Parses the header at the start of `input`, fixing the level for the
    /// rest of the archive.
    ///
    /// Fails with [`io::ErrorKind::InvalidData`] when `input` is shorter than
    /// a header, the magic bytes do not match, or the level digit is outside
    /// `1`–`9`.
    pub fn parse(input: &[u8]) -> io::Result<StreamHeader> {
        if input.len() < HEADER_LEN
            || &input[..3] != MAGIC_PREFIX
            || &input[4..HEADER_LEN] != BLOCK_MAGIC
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "input does not start with a bzip2 stream header",
            ));
        }
        let digit = input[3];
        if !digit.is_ascii_digit() || digit == b'0' {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid compression level digit {:?} in stream header", digit as char),
            ));
        }
        Ok(StreamHeader::for_level((digit - b'0') as u32))
    }

    /// The compression level this header encodes.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// The exact header byte sequence.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Position of the next occurrence of this header in `haystack`, looking
    /// at offsets `from..`.
    ///
    /// Callers pass `from >= HEADER_LEN` so the header a buffer starts with
    /// is never matched against itself.
    pub fn find_next(&self, haystack: &[u8], from: usize) -> Option<usize> {
        if from >= haystack.len() {
            return None;
        }
        haystack[from..]
            .windows(HEADER_LEN)
            .position(|w| w == self.bytes)
            .map(|i| from + i)
    }
}

impl std::fmt::Debug for StreamHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StreamHeader({:?}, level {})",
            String::from_utf8_lossy(&self.bytes),
            self.level
        )
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
