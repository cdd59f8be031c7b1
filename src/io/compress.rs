//! The compression path: split raw input into level-sized chunks and append
//! one self-contained compressed block per chunk.
//!
//! Blocks carry no cross-block state, so this loop is all there is to the
//! format on the write side: read a chunk, encode it, write the block,
//! repeat.  The resulting archive is a plain concatenation that the
//! decompression path re-splits by scanning for stream headers.
//!
//! [`compress_stream`] is the core loop over any `Read`/`Write` pair;
//! [`compress_filename`] and [`compress_multiple_filenames`] add the file
//! plumbing around it.

use std::io::{self, Read, Write};

use crate::codec;
use crate::format::{self, BZ2_EXTENSION};
use crate::io::file_io::{open_dst_file, open_src_file, read_up_to, STDOUT_MARK};
use crate::io::prefs::Prefs;
use crate::io::StreamStats;

// ---------------------------------------------------------------------------
// Core loop
// ---------------------------------------------------------------------------

/// Compresses `src` into `dst` at `level`, one chunk per block.
///
/// Chunks are exactly `level × 100 KiB` except the last, which holds
/// whatever remains.  Each block is written as soon as it is produced; no
/// more than one chunk is in flight at a time.  Empty input produces an
/// empty archive with zero blocks.
///
/// Fails with [`io::ErrorKind::InvalidInput`] when `level` is outside 1–9;
/// any other failure is an I/O error from the underlying streams, which
/// propagates unchanged.
pub fn compress_stream<R: Read, W: Write>(
    src: &mut R,
    dst: &mut W,
    level: u32,
    prefs: &Prefs,
) -> io::Result<StreamStats> {
    if !format::is_valid_level(level) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("compression level {} out of range 1-9", level),
        ));
    }

    let chunk_size = format::chunk_size(level);
    let mut chunk = vec![0u8; chunk_size];
    let mut stats = StreamStats::default();

    loop {
        let n = read_up_to(src, &mut chunk)?;
        if n == 0 {
            break;
        }
        stats.bytes_read += n as u64;

        let block = codec::encode_block(&chunk[..n], level)?;
        dst.write_all(&block)?;
        stats.bytes_written += block.len() as u64;

        if prefs.verbose(2) {
            eprintln!("chunk {}: {} in, {} out", stats.blocks, n, block.len());
        }
        stats.blocks += 1;

        // A short fill means the input ended inside this chunk.
        if n < chunk_size {
            break;
        }
    }

    dst.flush()?;
    Ok(stats)
}

// ---------------------------------------------------------------------------
// File-level wrappers
// ---------------------------------------------------------------------------

/// Compresses a single file (or the `"stdin"` sentinel) to `dst` (or the
/// `"stdout"` sentinel), reporting a summary line at verbosity ≥ 1.
pub fn compress_filename(src: &str, dst: &str, prefs: &Prefs) -> io::Result<StreamStats> {
    let mut reader = open_src_file(src, prefs)?;
    let mut writer = open_dst_file(dst, prefs)?;
    let stats = compress_stream(&mut reader, &mut writer, prefs.level, prefs)?;
    display_compress_summary(prefs, &stats);
    Ok(stats)
}

/// Compresses a batch of files, each to `<input>.bz2`, or all to stdout when
/// `to_stdout` is set.
///
/// The first failure aborts the batch; files after it are left untouched.
pub fn compress_multiple_filenames(
    srcs: &[&str],
    prefs: &Prefs,
    to_stdout: bool,
) -> io::Result<()> {
    let name_width = srcs.iter().map(|s| s.len()).max().unwrap_or(0);

    for &src in srcs {
        let dst: String = if to_stdout {
            STDOUT_MARK.to_owned()
        } else {
            format!("{}{}", src, BZ2_EXTENSION)
        };

        if prefs.verbose(1) {
            eprint!("  {:<width$}: ", src, width = name_width);
        }
        compress_filename(src, &dst, prefs)?;
    }
    Ok(())
}

/// Prints the `ratio, bits/byte, % saved` summary line at verbosity ≥ 1.
fn display_compress_summary(prefs: &Prefs, stats: &StreamStats) {
    if !prefs.verbose(1) {
        return;
    }
    if stats.bytes_read == 0 {
        eprintln!("empty input, {} out.", stats.bytes_written);
        return;
    }
    let ibytes = stats.bytes_read as f64;
    let obytes = stats.bytes_written as f64;
    eprintln!(
        "{:.3}:1, {:.3} bits/byte, {:.2}% saved, {} in, {} out.",
        ibytes / obytes,
        8.0 * obytes / ibytes,
        100.0 * (ibytes - obytes) / ibytes,
        stats.bytes_read,
        stats.bytes_written,
    );
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
