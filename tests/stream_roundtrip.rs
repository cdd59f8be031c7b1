// Stream-level properties of the chunked archive format:
//   - round-trips across all levels and a range of input sizes
//   - block counts derived from the chunk size
//   - independence from how the underlying reader chunks its bytes
//   - concatenation of independently produced archives
//   - fail-fast behaviour on truncated or tampered archives

use std::io::{self, Cursor, Read};

use bzchunk::format::{chunk_size, StreamHeader, HEADER_LEN};
use bzchunk::io::{compress_stream, decompress_stream, Prefs, StreamStats};

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn compress_to_vec(data: &[u8], level: u32) -> Vec<u8> {
    let prefs = Prefs::default();
    let mut src = Cursor::new(data.to_vec());
    let mut dst = Vec::new();
    compress_stream(&mut src, &mut dst, level, &prefs).expect("compress_stream failed");
    dst
}

fn decompress_to_vec(archive: &[u8]) -> io::Result<(Vec<u8>, StreamStats)> {
    let prefs = Prefs::default();
    let mut src = Cursor::new(archive.to_vec());
    let mut dst = Vec::new();
    let stats = decompress_stream(&mut src, &mut dst, &prefs)?;
    Ok((dst, stats))
}

/// Deterministic mixed-compressibility test data: runs of repeated bytes
/// interleaved with pseudo-random stretches.
fn test_data(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut state: u32 = 0x2545_F491;
    while out.len() < len {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let byte = (state >> 24) as u8;
        if state & 0x3 == 0 {
            // a compressible run
            let run = 1 + ((state >> 16) & 0x3F) as usize;
            out.extend(std::iter::repeat(byte).take(run.min(len - out.len())));
        } else {
            out.push(byte);
        }
    }
    out
}

/// Hands out at most one byte per `read` call.
struct ByteByByteReader {
    bytes: Vec<u8>,
    pos: usize,
}

impl Read for ByteByByteReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.bytes.len() || buf.is_empty() {
            return Ok(0);
        }
        buf[0] = self.bytes[self.pos];
        self.pos += 1;
        Ok(1)
    }
}

/// Hands out reads whose sizes cycle through an arbitrary pattern, so block
/// boundaries land at every possible offset within a read.
struct ChunkedReader {
    bytes: Vec<u8>,
    pos: usize,
    sizes: Vec<usize>,
    next_size: usize,
}

impl ChunkedReader {
    fn new(bytes: Vec<u8>, sizes: Vec<usize>) -> Self {
        ChunkedReader {
            bytes,
            pos: 0,
            sizes,
            next_size: 0,
        }
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.bytes.len() || buf.is_empty() {
            return Ok(0);
        }
        let want = self.sizes[self.next_size % self.sizes.len()];
        self.next_size += 1;
        let n = want.min(buf.len()).min(self.bytes.len() - self.pos);
        buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Round trips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn round_trip_all_levels() {
    let original = test_data(10 * 1024);
    for level in 1..=9u32 {
        let archive = compress_to_vec(&original, level);
        // The level digit written into the archive is the one we asked for.
        assert_eq!(
            StreamHeader::parse(&archive).unwrap().level(),
            level,
            "level {}",
            level
        );
        let (out, stats) = decompress_to_vec(&archive).unwrap();
        assert_eq!(out, original, "level {}", level);
        assert_eq!(stats.blocks, 1);
        assert_eq!(stats.bytes_written, original.len() as u64);
    }
}

#[test]
fn round_trip_empty_input_all_levels() {
    for level in 1..=9u32 {
        let archive = compress_to_vec(b"", level);
        assert!(archive.is_empty(), "empty input produces zero blocks");
        let (out, stats) = decompress_to_vec(&archive).unwrap();
        assert!(out.is_empty());
        assert_eq!(stats, StreamStats::default());
    }
}

#[test]
fn round_trip_one_byte() {
    for level in [1u32, 9] {
        let archive = compress_to_vec(b"x", level);
        let (out, stats) = decompress_to_vec(&archive).unwrap();
        assert_eq!(out, b"x");
        assert_eq!(stats.blocks, 1);
    }
}

#[test]
fn round_trip_multi_megabyte_level_one() {
    let original = test_data(3 * 1024 * 1024);
    let archive = compress_to_vec(&original, 1);
    let (out, stats) = decompress_to_vec(&archive).unwrap();
    assert_eq!(out, original);
    let expected_blocks = (original.len() + chunk_size(1) - 1) / chunk_size(1);
    assert_eq!(stats.blocks, expected_blocks as u64);
}

#[test]
fn round_trip_multi_megabyte_level_nine() {
    let original = test_data(2 * 1024 * 1024);
    let archive = compress_to_vec(&original, 9);
    let (out, stats) = decompress_to_vec(&archive).unwrap();
    assert_eq!(out, original);
    let expected_blocks = (original.len() + chunk_size(9) - 1) / chunk_size(9);
    assert_eq!(stats.blocks, expected_blocks as u64);
}

// ─────────────────────────────────────────────────────────────────────────────
// Block counting
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn block_count_is_ceil_for_various_sizes() {
    for level in [1u32, 2] {
        let cs = chunk_size(level);
        for len in [1usize, cs - 1, cs, cs + 1, 2 * cs + cs / 2] {
            let original = test_data(len);
            let archive = compress_to_vec(&original, level);

            // Count headers in the raw archive bytes.
            let header = StreamHeader::for_level(level);
            let mut headers = 1; // position 0, by construction
            let mut from = HEADER_LEN;
            while let Some(p) = header.find_next(&archive, from) {
                headers += 1;
                from = p + HEADER_LEN;
            }

            let expected = (len + cs - 1) / cs;
            assert_eq!(headers, expected, "level {} len {}", level, len);

            let (_, stats) = decompress_to_vec(&archive).unwrap();
            assert_eq!(stats.blocks, expected as u64, "level {} len {}", level, len);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reader-chunking independence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn decode_survives_one_byte_reads() {
    let original = test_data(5 * 1024);
    let archive = compress_to_vec(&original, 1);

    let prefs = Prefs::default();
    let mut src = ByteByByteReader {
        bytes: archive.clone(),
        pos: 0,
    };
    let mut out = Vec::new();
    let stats = decompress_stream(&mut src, &mut out, &prefs).unwrap();
    assert_eq!(out, original);
    assert_eq!(stats.bytes_read, archive.len() as u64);
}

#[test]
fn decode_survives_arbitrary_read_chunking() {
    // Multi-block archive so block boundaries fall inside odd-sized reads.
    let original = test_data(2 * chunk_size(1) + 777);
    let archive = compress_to_vec(&original, 1);

    for sizes in [
        vec![1usize, 2, 3, 5, 7, 11, 13],
        vec![4096],
        vec![1, 65536],
        vec![9, 10, 11],
    ] {
        let prefs = Prefs::default();
        let mut src = ChunkedReader::new(archive.clone(), sizes.clone());
        let mut out = Vec::new();
        let stats = decompress_stream(&mut src, &mut out, &prefs).unwrap();
        assert_eq!(out, original, "sizes {:?}", sizes);
        assert_eq!(stats.blocks, 3, "sizes {:?}", sizes);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Concatenated archives
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn concatenation_of_independent_archives_decodes_in_order() {
    let part_one = test_data(40 * 1024);
    let part_two = b"a short trailing archive".to_vec();

    let mut archive = compress_to_vec(&part_one, 5);
    archive.extend_from_slice(&compress_to_vec(&part_two, 5));

    let (out, stats) = decompress_to_vec(&archive).unwrap();
    let mut expected = part_one.clone();
    expected.extend_from_slice(&part_two);
    assert_eq!(out, expected);
    assert_eq!(stats.blocks, 2);
}

#[test]
fn triple_concatenation_decodes_in_order() {
    let parts: Vec<Vec<u8>> = vec![test_data(1000), test_data(30_000), b"tail".to_vec()];
    let mut archive = Vec::new();
    let mut expected = Vec::new();
    for part in &parts {
        archive.extend_from_slice(&compress_to_vec(part, 2));
        expected.extend_from_slice(part);
    }

    let (out, stats) = decompress_to_vec(&archive).unwrap();
    assert_eq!(out, expected);
    assert_eq!(stats.blocks, 3);
}

// ─────────────────────────────────────────────────────────────────────────────
// Corruption detection
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn truncation_is_detected_not_silently_decoded() {
    let original = test_data(50 * 1024);
    let archive = compress_to_vec(&original, 9);

    for cut in [1usize, 7, archive.len() / 2] {
        let truncated = &archive[..archive.len() - cut];
        assert!(
            decompress_to_vec(truncated).is_err(),
            "cutting {} bytes must fail",
            cut
        );
    }
}

#[test]
fn tampered_first_header_is_rejected() {
    let mut archive = compress_to_vec(b"data", 9);
    archive[0] = b'X';
    let err = decompress_to_vec(&archive).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);

    let mut archive = compress_to_vec(b"data", 9);
    archive[3] = b'0'; // level digit outside 1-9
    assert!(decompress_to_vec(&archive).is_err());
}

#[test]
fn tampered_mid_archive_header_digit_is_rejected() {
    let original = test_data(chunk_size(1) + 50);
    let mut archive = compress_to_vec(&original, 1);

    let header = StreamHeader::for_level(1);
    let second = header
        .find_next(&archive, HEADER_LEN)
        .expect("expected a second block header");
    archive[second + 3] = b'3';

    let err = decompress_to_vec(&archive).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn not_an_archive_at_all_is_rejected() {
    assert!(decompress_to_vec(b"plain text, no magic anywhere").is_err());
    assert!(decompress_to_vec(&[0u8; 4096]).is_err());
    // Shorter than a header.
    assert!(decompress_to_vec(b"BZh9").is_err());
}
