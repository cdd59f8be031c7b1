//! Public API surface for archive stream I/O.
//!
//! This module assembles the I/O sub-modules and re-exports the symbols
//! consumed by the CLI and library users: the compression path (chunk,
//! encode, append), the decompression path (scan, slice, decode), the file
//! plumbing around both, and the [`Prefs`] configuration they share.

pub mod compress;
pub mod decompress;
pub mod file_io;
pub mod prefs;

// ── Core type re-exports ─────────────────────────────────────────────────────
pub use prefs::{Prefs, DEFAULT_LEVEL};

// ── Special I/O sentinels ────────────────────────────────────────────────────
pub use file_io::{STDIN_MARK, STDOUT_MARK};

// ── Compression public API ───────────────────────────────────────────────────
pub use compress::{compress_filename, compress_multiple_filenames, compress_stream};

// ── Decompression public API ─────────────────────────────────────────────────
pub use decompress::{decompress_filename, decompress_multiple_filenames, decompress_stream};

// ---------------------------------------------------------------------------
// Shared result type
// ---------------------------------------------------------------------------

/// Statistics produced by one successful archive pass, compression or
/// decompression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Blocks written (compression) or decoded (decompression).
    pub blocks: u64,
    /// Total bytes read from the source stream.
    pub bytes_read: u64,
    /// Total bytes written to the destination stream.
    pub bytes_written: u64,
}
