// bzchunk — chunked bzip2 compression and streaming block deframing

pub mod cli;
pub mod codec;
pub mod format;
pub mod io;

// ── Version constants ─────────────────────────────────────────────────────────
pub const BZCHUNK_VERSION_MAJOR: u32 = 0;
pub const BZCHUNK_VERSION_MINOR: u32 = 1;
pub const BZCHUNK_VERSION_RELEASE: u32 = 0;
pub const VERSION_STRING: &str = "0.1.0";

/// Returns the runtime version string.
pub fn version_string() -> &'static str {
    VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use format::StreamHeader;
pub use io::{compress_stream, decompress_stream, Prefs, StreamStats};
