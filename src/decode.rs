//! Decoder pipeline: header parsing, triple decoding, byte replay.
//!
//! The decoder rebuilds the two Huffman decode tables from the headers,
//! reads the triple count, then walks the bitstream decoding one offset
//! code, one length code, and one literal byte per triple, replaying each
//! into the output buffer. Matches are copied byte by byte so overlapping
//! back-references (offset smaller than length) reproduce correctly.

use crate::bits::BitReader;
use crate::error::{Error, Result};
use crate::huffman;
use crate::lz77::{LOOKAHEAD_SIZE, SEARCH_BUFFER_SIZE};

/// Decompress an artifact produced by [`crate::compress`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(data);

    let offset_table = huffman::read_table(&mut reader, SEARCH_BUFFER_SIZE as u16)?;
    let length_table = huffman::read_table(&mut reader, LOOKAHEAD_SIZE as u16)?;
    let triple_count = reader.read_u32()?;

    let mut output = Vec::new();
    for _ in 0..triple_count {
        let offset = offset_table.decode_symbol(&mut reader)? as usize;
        let length = length_table.decode_symbol(&mut reader)? as usize;
        let literal = reader.read_u8()?;

        if length > 0 {
            if offset == 0 || offset > output.len() {
                return Err(Error::InvalidBackreference {
                    offset,
                    available: output.len(),
                });
            }
            let start = output.len() - offset;
            for i in 0..length {
                let byte = output[start + i];
                output.push(byte);
            }
        } else if offset != 0 {
            return Err(Error::InvalidBackreference {
                offset,
                available: output.len(),
            });
        }
        output.push(literal);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::compress;

    #[test]
    fn test_decompress_empty_artifact() {
        let artifact = compress(&[]).unwrap();
        assert_eq!(decompress(&artifact).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_round_trip_overlapping_match() {
        let data = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        let artifact = compress(data).unwrap();
        assert_eq!(decompress(&artifact).unwrap(), data);
    }

    #[test]
    fn test_truncated_artifact() {
        let data = b"some compressible data, some compressible data";
        let artifact = compress(data).unwrap();

        // Chopping off the tail must fail cleanly, not panic.
        let truncated = &artifact[..artifact.len() - 2];
        assert!(decompress(truncated).is_err());
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            decompress(&[0x00]),
            Err(Error::TruncatedStream)
        ));
    }

    #[test]
    fn test_corrupt_header_detected() {
        // count=1 but a zero code length follows.
        let artifact = [0x00, 0x01, 0x00, 0x05, 0x00, 0x00, 0x00];
        assert!(matches!(
            decompress(&artifact),
            Err(Error::CorruptHeader(_))
        ));
    }

    #[test]
    fn test_invalid_backreference_detected() {
        // Build headers for offset alphabet {0, 8} and length alphabet
        // {0, 4}, then emit a triple claiming a match 8 bytes back when
        // no output exists yet.
        use crate::bits::BitWriter;
        use crate::huffman::{build_codes, write_table};

        let mut offset_freqs = vec![0u32; 2049];
        offset_freqs[0] = 1;
        offset_freqs[8] = 1;
        let mut length_freqs = vec![0u32; 256];
        length_freqs[0] = 1;
        length_freqs[4] = 1;

        let offset_codes = build_codes(&offset_freqs);
        let length_codes = build_codes(&length_freqs);

        let mut writer = BitWriter::new();
        write_table(&mut writer, &offset_codes).unwrap();
        write_table(&mut writer, &length_codes).unwrap();
        writer.write_u32(1).unwrap();
        let oc = offset_codes[8];
        let lc = length_codes[4];
        writer.write_bits(oc.code, oc.length).unwrap();
        writer.write_bits(lc.code, lc.length).unwrap();
        writer.write_u8(b'x').unwrap();
        let artifact = writer.finish();

        assert!(matches!(
            decompress(&artifact),
            Err(Error::InvalidBackreference {
                offset: 8,
                available: 0
            })
        ));
    }
}
