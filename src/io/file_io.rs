//! File I/O primitives for the streaming pipeline.
//!
//! Two entry points used by the higher-level compression/decompression
//! orchestration:
//!
//! - [`open_src_file`] — resolves a path string to a `Box<dyn Read>`,
//!   handling the `"stdin"` sentinel and rejecting directories.
//! - [`open_dst_file`] — resolves a path string to a `Box<dyn Write>`,
//!   handling the `"stdout"` sentinel and enforcing the overwrite policy
//!   from [`Prefs`].
//!
//! [`read_up_to`] is the shared read primitive: both passes need "fill this
//! buffer unless the input ends first" semantics, because a plain `read` may
//! return short for reasons that have nothing to do with end of input.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use crate::io::prefs::Prefs;

// ---------------------------------------------------------------------------
// Sentinel strings
// ---------------------------------------------------------------------------

/// Sentinel: read from standard input.
pub const STDIN_MARK: &str = "stdin";

/// Sentinel: write to standard output.
pub const STDOUT_MARK: &str = "stdout";

// ---------------------------------------------------------------------------
// Read primitive
// ---------------------------------------------------------------------------

/// Reads until `buf` is full or the input ends, retrying interrupted reads.
///
/// Returns the number of bytes placed in `buf`.  A return value shorter than
/// `buf.len()` means end of input was reached during this fill — the only
/// reliable end-of-input signal for the streaming loops, since an individual
/// `read` may return short at any time.
pub fn read_up_to<R: Read>(src: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0usize;
    while total < buf.len() {
        match src.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

// ---------------------------------------------------------------------------
// Source file
// ---------------------------------------------------------------------------

/// Opens a source for reading, returning a boxed [`Read`].
///
/// - The sentinel `"stdin"` resolves to standard input.
/// - A directory is rejected with [`io::ErrorKind::InvalidInput`].
/// - Anything else opens as a file wrapped in a [`BufReader`].
pub fn open_src_file(path: &str, prefs: &Prefs) -> io::Result<Box<dyn Read>> {
    if path == STDIN_MARK {
        if prefs.verbose(3) {
            eprintln!("using stdin for input");
        }
        return Ok(Box::new(io::stdin()));
    }

    if Path::new(path).is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: is a directory", path),
        ));
    }

    let f = File::open(path).map_err(|e| {
        io::Error::new(e.kind(), format!("{}: {}", path, e))
    })?;
    Ok(Box::new(BufReader::new(f)))
}

// ---------------------------------------------------------------------------
// Destination file
// ---------------------------------------------------------------------------

/// Opens a destination for writing, returning a boxed [`Write`].
///
/// - The sentinel `"stdout"` resolves to standard output.
/// - When `prefs.overwrite` is false and the file already exists, the call
///   fails with [`io::ErrorKind::AlreadyExists`] before anything is touched;
///   there is no interactive prompt.
pub fn open_dst_file(path: &str, prefs: &Prefs) -> io::Result<Box<dyn Write>> {
    if path == STDOUT_MARK {
        if prefs.verbose(3) {
            eprintln!("using stdout for output");
        }
        return Ok(Box::new(io::stdout()));
    }

    if !prefs.overwrite && Path::new(path).exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{}: already exists; use --force to overwrite", path),
        ));
    }

    let f = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path, e)))?;
    Ok(Box::new(f))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
