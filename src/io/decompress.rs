//! The decompression path: scan a byte stream for stream headers, slice out
//! exact per-block payloads, and decode them one at a time.
//!
//! Blocks carry no length prefix, so the only way to find where one ends is
//! to find where the next begins.  Reads land in a carry buffer; complete
//! blocks are sliced off its front as their terminating header arrives, and
//! whatever remains — a partial block, possibly a partial header — waits for
//! the next read.  A header may straddle two reads; the scanner's resume
//! point backs up accordingly so no boundary is ever missed and no byte is
//! scanned more than a bounded number of times.
//!
//! End of input is detected by the fill loop reaching EOF, never by a single
//! short `read`.  When the input happens to end exactly on a buffer-sized
//! fill, one extra zero-byte fill follows and the buffered tail is still
//! flushed as the final block — the tail is never silently dropped.
//!
//! Every violation of the framing invariants is a fatal
//! [`io::ErrorKind::InvalidData`] error: resynchronising on corrupt framing
//! would risk emitting wrong output instead of detecting the corruption.

use std::io::{self, Read, Write};

use bytes::BytesMut;

use crate::codec;
use crate::format::{StreamHeader, BZ2_EXTENSION, HEADER_LEN, MAX_BLOCK_BUFSIZE};
use crate::io::file_io::{open_dst_file, open_src_file, read_up_to, STDOUT_MARK};
use crate::io::prefs::Prefs;
use crate::io::StreamStats;

// ---------------------------------------------------------------------------
// Carry buffer
// ---------------------------------------------------------------------------

/// Bytes read from input but not yet attributable to a complete block.
///
/// Invariant: empty, or starts with the archive's fixed stream header.
/// Grows by `push`, shrinks as `take_block` slices complete blocks off the
/// front.
struct CarryBuffer {
    header: StreamHeader,
    buf: BytesMut,
    /// Offsets below this are known to hold no header start; the next search
    /// resumes here, backed up enough to catch a header straddling the
    /// previous tail.
    scanned: usize,
}

impl CarryBuffer {
    fn new(header: StreamHeader) -> Self {
        CarryBuffer {
            header,
            buf: BytesMut::with_capacity(2 * MAX_BLOCK_BUFSIZE),
            scanned: 0,
        }
    }

    fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Slices the next complete block off the front, or the whole remainder
    /// when `last` marks the final read.
    ///
    /// Returns `Ok(None)` when the buffer is empty, or when it holds only an
    /// unterminated block and more input is still to come.
    fn take_block(&mut self, last: bool) -> io::Result<Option<BytesMut>> {
        if self.buf.is_empty() {
            return Ok(None);
        }
        if self.buf.len() < HEADER_LEN {
            if !last {
                // Could still be the prefix of a header; wait for more input.
                return Ok(None);
            }
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "corrupt archive: truncated stream header at end of input",
            ));
        }
        if !self.buf.starts_with(self.header.as_bytes()) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("corrupt archive: block boundary is not a {:?}", self.header),
            ));
        }

        let from = self.scanned.max(HEADER_LEN);
        if let Some(pos) = self.header.find_next(&self.buf, from) {
            // Bytes past `pos` have not been examined yet.
            self.scanned = 0;
            return Ok(Some(self.buf.split_to(pos)));
        }

        self.scanned = self.buf.len().saturating_sub(HEADER_LEN - 1);
        if last {
            self.scanned = 0;
            let len = self.buf.len();
            return Ok(Some(self.buf.split_to(len)));
        }
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// Core loop
// ---------------------------------------------------------------------------

/// Decompresses an archive from `src` into `dst`.
///
/// The compression level is read back from the archive's first header; every
/// subsequent block must repeat that exact header.  A zero-byte input is a
/// valid empty archive.  All framing violations — a malformed first header,
/// a boundary that does not start with the fixed header, trailing bytes
/// after a decoded block — fail with [`io::ErrorKind::InvalidData`] and
/// abort the pass.
pub fn decompress_stream<R: Read, W: Write>(
    src: &mut R,
    dst: &mut W,
    prefs: &Prefs,
) -> io::Result<StreamStats> {
    decode_stream_inner(src, dst, prefs, MAX_BLOCK_BUFSIZE)
}

/// Testable core of [`decompress_stream`]: the read-buffer size is a
/// parameter so the end-of-input edge cases can be exercised with small,
/// exactly-sized fills.
fn decode_stream_inner<R: Read, W: Write>(
    src: &mut R,
    dst: &mut W,
    prefs: &Prefs,
    buffer_size: usize,
) -> io::Result<StreamStats> {
    debug_assert!(buffer_size >= HEADER_LEN);

    let mut stats = StreamStats::default();
    let mut scratch = vec![0u8; buffer_size];

    // First fill: fix the archive's header (and level) or bail out.
    let n = read_up_to(src, &mut scratch)?;
    if prefs.verbose(2) {
        eprintln!("read {}", n);
    }
    if n == 0 {
        dst.flush()?;
        return Ok(stats);
    }
    stats.bytes_read += n as u64;

    let header = StreamHeader::parse(&scratch[..n])?;
    if prefs.verbose(2) {
        eprintln!("detected compression level {}", header.level());
    }

    let mut carry = CarryBuffer::new(header);
    carry.push(&scratch[..n]);
    let mut last = n < buffer_size;

    loop {
        // A single fill may complete several blocks; slice them all.
        while let Some(block) = carry.take_block(last)? {
            let data = codec::decode_block(&block)?;
            if prefs.verbose(3) {
                eprintln!("block {}: {} in, {} out", stats.blocks, block.len(), data.len());
            }
            dst.write_all(&data)?;
            stats.bytes_written += data.len() as u64;
            stats.blocks += 1;
        }

        if last {
            break;
        }

        let n = read_up_to(src, &mut scratch)?;
        if prefs.verbose(2) {
            eprintln!("read {}", n);
        }
        stats.bytes_read += n as u64;
        last = n < buffer_size;
        carry.push(&scratch[..n]);
    }

    // take_block(last=true) drains everything, so this only fires if the
    // slicing logic itself went wrong.
    debug_assert!(carry.is_empty());

    dst.flush()?;
    Ok(stats)
}

// ---------------------------------------------------------------------------
// File-level wrappers
// ---------------------------------------------------------------------------

/// Decompresses a single archive (or the `"stdin"` sentinel) to `dst` (or
/// the `"stdout"` sentinel), reporting `done` at verbosity ≥ 1.
pub fn decompress_filename(src: &str, dst: &str, prefs: &Prefs) -> io::Result<StreamStats> {
    let mut reader = open_src_file(src, prefs)?;
    let mut writer = open_dst_file(dst, prefs)?;
    let stats = decompress_stream(&mut reader, &mut writer, prefs)?;
    if prefs.verbose(1) {
        eprintln!("done");
    }
    Ok(stats)
}

/// Decompresses a batch of archives, each to its name with the `.bz2`
/// suffix stripped, or all to stdout when `to_stdout` is set.
///
/// Every input filename must end in `.bz2` (even when writing to stdout);
/// the first failure aborts the batch.
pub fn decompress_multiple_filenames(
    srcs: &[&str],
    prefs: &Prefs,
    to_stdout: bool,
) -> io::Result<()> {
    let name_width = srcs.iter().map(|s| s.len()).max().unwrap_or(0);

    for &src in srcs {
        let base = match src.strip_suffix(BZ2_EXTENSION) {
            Some(base) if !base.is_empty() => base,
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{}: filename does not end in {}", src, BZ2_EXTENSION),
                ))
            }
        };
        let dst: String = if to_stdout {
            STDOUT_MARK.to_owned()
        } else {
            base.to_owned()
        };

        if prefs.verbose(1) {
            eprint!("  {:<width$}: ", src, width = name_width);
        }
        decompress_filename(src, &dst, prefs)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
