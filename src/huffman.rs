//! Huffman coding over the offset and length alphabets.
//!
//! The encoder builds a tree by repeatedly merging the two lowest-frequency
//! nodes (ties broken by symbol order so the build is deterministic), then
//! assigns canonical codes from the resulting code lengths. Canonical
//! assignment keeps the artifact byte-identical across runs and lets the
//! decoder rebuild the exact code set from the persisted header.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::bits::{BitReader, BitWriter, MAX_READ_BITS};
use crate::error::{Error, Result};

/// Upper bound accepted for a persisted code length.
///
/// Code lengths are bounded by the depth of the Huffman tree, which cannot
/// reach 64 for any frequency table the encoder can produce; anything
/// larger in a header is corruption.
pub const MAX_CODE_LENGTH: u8 = 64;

/// Huffman code: bit pattern plus its length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HuffmanCode {
    /// The code bits (right-aligned, MSB-first when written).
    pub code: u64,
    /// Number of bits in the code. Zero means the symbol is absent.
    pub length: u8,
}

/// Huffman tree node for construction.
#[derive(Debug, Clone, Eq, PartialEq)]
struct Node {
    frequency: u64,
    symbol: Option<u16>,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Compare by frequency, then by symbol for stability
        self.frequency
            .cmp(&other.frequency)
            .then_with(|| self.symbol.cmp(&other.symbol))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Build Huffman codes from symbol frequencies.
///
/// Returns a vector where index is the symbol and value is its code.
/// Symbols with zero frequency get the default zero-length code. A
/// single-symbol alphabet gets a 1-bit code, since a zero-length code
/// cannot appear in a bitstream.
pub fn build_codes(frequencies: &[u32]) -> Vec<HuffmanCode> {
    let num_symbols = frequencies.len();

    let non_zero: Vec<(u16, u32)> = frequencies
        .iter()
        .enumerate()
        .filter_map(|(i, &f)| (f > 0).then_some((i as u16, f)))
        .collect();

    if non_zero.is_empty() {
        return vec![HuffmanCode::default(); num_symbols];
    }

    if non_zero.len() == 1 {
        let mut codes = vec![HuffmanCode::default(); num_symbols];
        codes[non_zero[0].0 as usize] = HuffmanCode { code: 0, length: 1 };
        return codes;
    }

    let mut heap: BinaryHeap<Reverse<Node>> = non_zero
        .iter()
        .map(|&(sym, freq)| {
            Reverse(Node {
                frequency: freq as u64,
                symbol: Some(sym),
                left: None,
                right: None,
            })
        })
        .collect();

    while heap.len() > 1 {
        let Reverse(left) = heap.pop().unwrap();
        let Reverse(right) = heap.pop().unwrap();

        let parent = Node {
            frequency: left.frequency + right.frequency,
            symbol: None,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        };

        heap.push(Reverse(parent));
    }

    let root = heap.pop().unwrap().0;
    let mut code_lengths = vec![0u8; num_symbols];
    extract_lengths(&root, 0, &mut code_lengths);

    generate_canonical_codes(&code_lengths)
}

/// Extract code lengths from the Huffman tree via DFS.
fn extract_lengths(node: &Node, depth: u8, lengths: &mut [u8]) {
    if let Some(symbol) = node.symbol {
        lengths[symbol as usize] = depth.max(1);
    } else {
        if let Some(ref left) = node.left {
            extract_lengths(left, depth + 1, lengths);
        }
        if let Some(ref right) = node.right {
            extract_lengths(right, depth + 1, lengths);
        }
    }
}

/// Generate canonical Huffman codes from code lengths.
///
/// Canonical codes are assigned such that shorter codes come before longer
/// codes, and codes of the same length follow symbol order.
pub fn generate_canonical_codes(lengths: &[u8]) -> Vec<HuffmanCode> {
    let num_symbols = lengths.len();
    let mut codes = vec![HuffmanCode::default(); num_symbols];

    let max_len = *lengths.iter().max().unwrap_or(&0) as usize;
    if max_len == 0 {
        return codes;
    }

    // Count codes of each length
    let mut bl_count = vec![0u64; max_len + 1];
    for &length in lengths {
        if length > 0 {
            bl_count[length as usize] += 1;
        }
    }

    // Calculate starting code for each length
    let mut next_code = vec![0u64; max_len + 1];
    let mut code = 0u64;
    for bits in 1..=max_len {
        code = (code + bl_count[bits - 1]) << 1;
        next_code[bits] = code;
    }

    // Assign codes to symbols
    for (symbol, &length) in lengths.iter().enumerate() {
        if length > 0 {
            codes[symbol] = HuffmanCode {
                code: next_code[length as usize],
                length,
            };
            next_code[length as usize] += 1;
        }
    }

    codes
}

/// Serialize a code table as a self-describing header.
///
/// Layout: `symbol_count: u16`, then for every present symbol in ascending
/// symbol order: `symbol: u16`, `code_length: u8`, `code_bits: code_length
/// bits`. Symbol ids are two bytes so the offset alphabet (0..=2048) fits.
pub fn write_table(writer: &mut BitWriter, codes: &[HuffmanCode]) -> Result<()> {
    let count = codes.iter().filter(|c| c.length > 0).count();
    if count > u16::MAX as usize {
        return Err(Error::Range {
            value: count as u64,
            bits: 16,
        });
    }
    writer.write_u16(count as u16)?;

    for (symbol, code) in codes.iter().enumerate() {
        if code.length == 0 {
            continue;
        }
        writer.write_u16(symbol as u16)?;
        writer.write_u8(code.length)?;
        writer.write_bits(code.code, code.length)?;
    }
    Ok(())
}

/// Decode table rebuilt from a persisted header.
///
/// Decoding walks the stream one bit at a time against the code map, the
/// same way the header-declared codes were written.
pub struct DecodeTable {
    map: HashMap<(u8, u64), u16>,
    max_len: u8,
}

impl DecodeTable {
    /// Number of symbols in the table.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True for the empty table written for empty inputs.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Consume bits until a full code matches and return its symbol.
    pub fn decode_symbol(&self, reader: &mut BitReader<'_>) -> Result<u16> {
        let mut code = 0u64;
        let mut length = 0u8;
        loop {
            let bit = reader.read_bit()?;
            code = (code << 1) | bit as u64;
            length += 1;
            if let Some(&symbol) = self.map.get(&(length, code)) {
                return Ok(symbol);
            }
            if length >= self.max_len {
                return Err(Error::UnknownCode);
            }
        }
    }
}

/// Parse a Huffman header and rebuild the decode map.
///
/// `max_symbol` bounds the alphabet (2048 for offsets, 255 for lengths).
/// Fails with [`Error::CorruptHeader`] on any table no encoder of this
/// format could have written: zero or oversized code lengths, out-of-range
/// or repeated symbols, duplicate codes, or a code set that is not
/// prefix-free.
pub fn read_table(reader: &mut BitReader<'_>, max_symbol: u16) -> Result<DecodeTable> {
    let count = reader.read_u16()? as usize;
    let mut map = HashMap::with_capacity(count);
    let mut seen = vec![false; max_symbol as usize + 1];
    let mut max_len = 0u8;

    for _ in 0..count {
        let symbol = reader.read_u16()?;
        if symbol > max_symbol {
            return Err(Error::CorruptHeader("symbol out of range"));
        }
        if seen[symbol as usize] {
            return Err(Error::CorruptHeader("repeated symbol"));
        }
        seen[symbol as usize] = true;

        let length = reader.read_u8()?;
        if length == 0 {
            return Err(Error::CorruptHeader("zero code length"));
        }
        if length > MAX_CODE_LENGTH {
            return Err(Error::CorruptHeader("code length too large"));
        }

        let code = read_code_bits(reader, length)?;
        if map.insert((length, code), symbol).is_some() {
            return Err(Error::CorruptHeader("duplicate code"));
        }
        max_len = max_len.max(length);
    }

    ensure_prefix_free(&map)?;
    Ok(DecodeTable { map, max_len })
}

/// Read `length` code bits, splitting reads that exceed the reader's
/// single-call limit.
fn read_code_bits(reader: &mut BitReader<'_>, length: u8) -> Result<u64> {
    if length <= MAX_READ_BITS {
        reader.read_bits(length)
    } else {
        let low_bits = length - 32;
        let high = reader.read_bits(32)?;
        let low = reader.read_bits(low_bits)?;
        Ok((high << low_bits) | low)
    }
}

/// Verify no code is a prefix of another code in the same table.
fn ensure_prefix_free(map: &HashMap<(u8, u64), u16>) -> Result<()> {
    for &(len_a, code_a) in map.keys() {
        for &(len_b, code_b) in map.keys() {
            if len_a < len_b && (code_b >> (len_b - len_a)) == code_a {
                return Err(Error::CorruptHeader("code set is not prefix-free"));
            }
        }
    }
    Ok(())
}
