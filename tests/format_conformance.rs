//! Byte-level checks of the artifact layout.
//!
//! Validates the header fields the decoder relies on: big-endian symbol
//! counts, two-byte symbol ids, the explicit triple count, and the empty
//! artifact shape.

use lzpak::bits::BitReader;
use lzpak::{compress, compress_with_stats, decompress};

/// An empty input produces exactly two empty Huffman headers followed by
/// a zero triple count.
#[test]
fn test_empty_artifact_layout() {
    let artifact = compress(&[]).unwrap();
    assert_eq!(artifact, vec![0u8; 8]);
    assert_eq!(decompress(&artifact).unwrap(), Vec::<u8>::new());
}

/// Single-byte input: both alphabets contain only the symbol 0 with a
/// 1-bit code, and the artifact carries exactly one triple.
#[test]
fn test_single_byte_artifact_layout() {
    let artifact = compress(b"a").unwrap();

    let mut reader = BitReader::new(&artifact);

    // Offset header: one symbol, id 0, code length 1, one code bit.
    assert_eq!(reader.read_u16().unwrap(), 1);
    assert_eq!(reader.read_u16().unwrap(), 0);
    assert_eq!(reader.read_u8().unwrap(), 1);
    let _offset_code = reader.read_bits(1).unwrap();

    // Length header has the same shape.
    assert_eq!(reader.read_u16().unwrap(), 1);
    assert_eq!(reader.read_u16().unwrap(), 0);
    assert_eq!(reader.read_u8().unwrap(), 1);
    let _length_code = reader.read_bits(1).unwrap();

    // Triple count, then one triple: offset code, length code, literal.
    assert_eq!(reader.read_u32().unwrap(), 1);
    let _ = reader.read_bits(2).unwrap();
    assert_eq!(reader.read_u8().unwrap(), b'a');
}

/// Symbol counts are written big-endian: force an offset alphabet larger
/// than 255 symbols and check the high byte of the count.
#[test]
fn test_symbol_count_is_big_endian() {
    // Pairs "<x><y><x><y>..." with ~300 distinct separations produce a
    // wide spread of offsets; simpler: concatenate blocks that each repeat
    // at a distinct distance. Use a single long seeded pseudo-random
    // low-alphabet buffer, which yields hundreds of distinct offsets.
    let mut state = 0x12345678u32;
    let data: Vec<u8> = (0..60_000)
        .map(|_| {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            (state >> 24) as u8 & 0x03
        })
        .collect();

    let artifact = compress(&data).unwrap();
    let count = u16::from_be_bytes([artifact[0], artifact[1]]) as usize;
    assert!(count > 255, "expected a wide offset alphabet, got {}", count);
    assert!(count <= 2049);

    assert_eq!(decompress(&artifact).unwrap(), data);
}

/// The artifact never stores an offset symbol above the search buffer
/// size or a length symbol above the look-ahead size.
#[test]
fn test_header_symbols_in_range() {
    let data = b"alpha beta gamma alpha beta gamma alpha beta".repeat(100);
    let artifact = compress(&data).unwrap();

    let mut reader = BitReader::new(&artifact);
    let offset_count = reader.read_u16().unwrap();
    for _ in 0..offset_count {
        let symbol = reader.read_u16().unwrap();
        assert!(symbol <= 2048);
        let length = reader.read_u8().unwrap();
        assert!(length >= 1);
        let _ = reader.read_bits(length).unwrap();
    }

    let length_count = reader.read_u16().unwrap();
    for _ in 0..length_count {
        let symbol = reader.read_u16().unwrap();
        assert!(symbol <= 255);
        let length = reader.read_u8().unwrap();
        assert!(length >= 1);
        let _ = reader.read_bits(length).unwrap();
    }

    let triple_count = reader.read_u32().unwrap();
    assert!(triple_count > 0);
}

/// Headers alone (with a triple count claiming content) must produce
/// a truncation error, not garbage output.
#[test]
fn test_missing_content_is_truncation() {
    let artifact = compress(b"abcabcabc").unwrap();
    let (_, stats) = compress_with_stats(b"abcabcabc").unwrap();
    assert!(stats.triple_count > 0);

    // Keep the headers and count, drop all content bits. Finding the
    // exact content start is fiddly; dropping the last byte is enough to
    // make the final triple unreadable.
    assert!(decompress(&artifact[..artifact.len() - 1]).is_err());
}
