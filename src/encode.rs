//! Encoder pipeline: match finding, alphabet statistics, serialization.
//!
//! Encoding is three passes over in-memory data. Pass 1 runs the match
//! engine to completion, collecting the triple sequence and frequency
//! tables for the offset and length value alphabets. Pass 2 builds one
//! Huffman coder per alphabet. Pass 3 writes the two headers, the triple
//! count, and the entropy-coded triple stream.

use std::io::{self, Write};

use crate::bits::BitWriter;
use crate::error::{Error, Result};
use crate::huffman;
use crate::lz77::{MatchFinder, Triple, LOOKAHEAD_SIZE, SEARCH_BUFFER_SIZE};

/// Offset alphabet size: every integer an offset can take, 0..=2048.
pub const OFFSET_ALPHABET: usize = SEARCH_BUFFER_SIZE + 1;

/// Length alphabet size: every integer a length can take, 0..=255.
pub const LENGTH_ALPHABET: usize = LOOKAHEAD_SIZE + 1;

/// Statistics gathered during one encode pass.
#[derive(Debug, Clone)]
pub struct EncodeStats {
    /// Input size in bytes.
    pub input_size: usize,
    /// Artifact size in bytes, headers included.
    pub output_size: usize,
    /// Total triples emitted.
    pub triple_count: usize,
    /// Triples that carried a back-reference.
    pub match_count: usize,
    /// Literal-only triples.
    pub literal_count: usize,
    /// Occurrences of each byte value in the input.
    pub symbol_counts: [u64; 256],
}

impl EncodeStats {
    /// Compressed size as a fraction of the input size.
    pub fn ratio(&self) -> f64 {
        if self.input_size == 0 {
            return 0.0;
        }
        self.output_size as f64 / self.input_size as f64
    }

    /// Probability of each byte value seen in the input.
    ///
    /// Probabilities over the distinct symbols sum to 1.
    pub fn symbol_probabilities(&self) -> Vec<(u8, f64)> {
        let total: u64 = self.symbol_counts.iter().sum();
        if total == 0 {
            return Vec::new();
        }
        self.symbol_counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count as f64 / total as f64))
            .collect()
    }

    /// Shannon entropy of the input byte distribution, in bits per symbol.
    pub fn entropy(&self) -> f64 {
        self.symbol_probabilities()
            .iter()
            .map(|(_, p)| -p * p.log2())
            .sum()
    }

    /// Average emitted bits per input symbol.
    pub fn average_rate(&self) -> f64 {
        if self.input_size == 0 {
            return 0.0;
        }
        (self.output_size * 8) as f64 / self.input_size as f64
    }

    /// Dump the symbol table as `symbol,count,probability` CSV rows, for
    /// histogram plotting. Diagnostic only; not part of the file format.
    pub fn write_probability_csv<W: Write>(&self, mut sink: W) -> io::Result<()> {
        writeln!(sink, "symbol,count,probability")?;
        for (symbol, probability) in self.symbol_probabilities() {
            writeln!(
                sink,
                "{},{},{}",
                symbol, self.symbol_counts[symbol as usize], probability
            )?;
        }
        Ok(())
    }
}

/// Compress a byte buffer into the bespoke artifact format.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    compress_with_stats(data).map(|(out, _)| out)
}

/// Compress a byte buffer, also returning encode statistics.
pub fn compress_with_stats(data: &[u8]) -> Result<(Vec<u8>, EncodeStats)> {
    // Pass 1: run the match engine to completion.
    let mut triples: Vec<Triple> = Vec::new();
    let mut offset_freqs = vec![0u32; OFFSET_ALPHABET];
    let mut length_freqs = vec![0u32; LENGTH_ALPHABET];
    let mut symbol_counts = [0u64; 256];
    let mut match_count = 0usize;

    for &byte in data {
        symbol_counts[byte as usize] += 1;
    }

    let mut finder = MatchFinder::new(data);
    while let Some(triple) = finder.next_triple() {
        offset_freqs[triple.offset as usize] += 1;
        length_freqs[triple.length as usize] += 1;
        if !triple.is_literal() {
            match_count += 1;
        }
        triples.push(triple);
    }

    if triples.len() > u32::MAX as usize {
        return Err(Error::Range {
            value: triples.len() as u64,
            bits: 32,
        });
    }

    // Pass 2: one Huffman coder per value alphabet.
    let offset_codes = huffman::build_codes(&offset_freqs);
    let length_codes = huffman::build_codes(&length_freqs);

    // Pass 3: headers, triple count, then the entropy-coded stream.
    let mut writer = BitWriter::with_capacity(data.len() / 2 + 64);
    huffman::write_table(&mut writer, &offset_codes)?;
    huffman::write_table(&mut writer, &length_codes)?;
    writer.write_u32(triples.len() as u32)?;

    for triple in &triples {
        let offset_code = offset_codes[triple.offset as usize];
        let length_code = length_codes[triple.length as usize];
        writer.write_bits(offset_code.code, offset_code.length)?;
        writer.write_bits(length_code.code, length_code.length)?;
        writer.write_u8(triple.literal)?;
    }

    let output = writer.finish();
    let stats = EncodeStats {
        input_size: data.len(),
        output_size: output.len(),
        triple_count: triples.len(),
        match_count,
        literal_count: triples.len() - match_count,
        symbol_counts,
    };
    Ok((output, stats))
}
