//! Bit-level I/O for the compressed file format.
//!
//! The format is bit-packed MSB-first: the first bit written lands in the
//! most significant bit of the first byte. Fixed-width header fields are
//! big-endian. The final partial byte is padded with zero bits.

use crate::error::{Error, Result};

/// Longest run of bits `BitReader::read_bits` can return at once.
///
/// Huffman codes are consumed bit by bit, so this only bounds the fixed
/// width header fields (at most 32 bits).
pub const MAX_READ_BITS: u8 = 56;

/// A bit writer that packs bits into bytes, MSB first.
#[derive(Debug)]
pub struct BitWriter {
    buffer: Vec<u8>,
    current_byte: u8,
    bit_position: u8, // Counts from 8 down to 0
}

impl BitWriter {
    /// Create a new bit writer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new bit writer with specified byte capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            current_byte: 0,
            bit_position: 8,
        }
    }

    /// Write the low `num_bits` of `value`, MSB first.
    ///
    /// Fails with [`Error::Range`] if `value` needs more than `num_bits`
    /// bits, so a header field can never be silently truncated.
    pub fn write_bits(&mut self, value: u64, num_bits: u8) -> Result<()> {
        debug_assert!(num_bits >= 1 && num_bits <= 64);
        if num_bits < 64 && (value >> num_bits) != 0 {
            return Err(Error::Range {
                value,
                bits: num_bits,
            });
        }

        let mut remaining = num_bits;
        while remaining > 0 {
            let space = self.bit_position;
            let to_write = remaining.min(space);

            // Take the top `to_write` bits of what is left of the value
            // and place them at the current byte position.
            let shift = remaining - to_write;
            let mask = (1u64 << to_write) - 1;
            let bits = ((value >> shift) & mask) as u8;

            self.bit_position -= to_write;
            self.current_byte |= bits << self.bit_position;
            remaining -= to_write;

            if self.bit_position == 0 {
                self.buffer.push(self.current_byte);
                self.current_byte = 0;
                self.bit_position = 8;
            }
        }
        Ok(())
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.write_bits(bit as u64, 1)
    }

    /// Write one byte.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_bits(value as u64, 8)
    }

    /// Write two bytes, big-endian.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_bits(value as u64, 16)
    }

    /// Write four bytes, big-endian.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_bits(value as u64, 32)
    }

    /// Flush any remaining bits, padding the last byte with zeros.
    pub fn flush(&mut self) {
        if self.bit_position < 8 {
            self.buffer.push(self.current_byte);
            self.current_byte = 0;
            self.bit_position = 8;
        }
    }

    /// Consume the writer and return the packed bytes.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.flush();
        self.buffer
    }

    /// Returns length in bytes (not counting the partial byte).
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && self.bit_position == 8
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Bit reader for MSB-first bit streams.
///
/// Maintains a bit buffer filled from the input byte stream. Running out
/// of input mid-read yields [`Error::TruncatedStream`].
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    bit_buf: u64,
    bits_in_buf: u8,
}

impl<'a> BitReader<'a> {
    /// Create a new bit reader over a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            bit_buf: 0,
            bits_in_buf: 0,
        }
    }

    /// Ensure at least `n` bits are buffered.
    #[inline]
    fn ensure(&mut self, n: u8) -> Result<()> {
        while self.bits_in_buf < n {
            if self.pos >= self.data.len() {
                return Err(Error::TruncatedStream);
            }
            // MSB-first: the new byte goes below the buffered bits.
            self.bit_buf = (self.bit_buf << 8) | (self.data[self.pos] as u64);
            self.pos += 1;
            self.bits_in_buf += 8;
        }
        Ok(())
    }

    /// Read `n` bits MSB-first (`n` at most [`MAX_READ_BITS`]).
    #[inline]
    pub fn read_bits(&mut self, n: u8) -> Result<u64> {
        debug_assert!(n >= 1 && n <= MAX_READ_BITS);
        self.ensure(n)?;
        self.bits_in_buf -= n;
        let value = (self.bit_buf >> self.bits_in_buf) & ((1u64 << n) - 1);
        Ok(value)
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bits(8).map(|v| v as u8)
    }

    /// Read two bytes, big-endian.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_bits(16).map(|v| v as u16)
    }

    /// Read four bytes, big-endian.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_bits(32).map(|v| v as u32)
    }

    /// True once every input byte has been pulled into the buffer.
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len() && self.bits_in_buf == 0
    }

    /// Current byte position in the input.
    pub fn position(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_writer_single_bits() {
        let mut writer = BitWriter::new();
        for bit in [true, false, true, true, false, true, false, false] {
            writer.write_bit(bit).unwrap();
        }
        let result = writer.finish();
        assert_eq!(result, vec![0b10110100]);
    }

    #[test]
    fn test_bit_writer_multi_bits() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3).unwrap();
        writer.write_bits(0b11, 2).unwrap();
        writer.write_bits(0b001, 3).unwrap();

        let result = writer.finish();
        // MSB first: 101 | 11 | 001
        assert_eq!(result, vec![0b10111001]);
    }

    #[test]
    fn test_bit_writer_partial_byte_zero_padded() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3).unwrap();
        let result = writer.finish();
        assert_eq!(result, vec![0b10100000]);
    }

    #[test]
    fn test_bit_writer_range_check() {
        let mut writer = BitWriter::new();
        assert!(matches!(
            writer.write_bits(0b100, 2),
            Err(Error::Range { value: 4, bits: 2 })
        ));
        // The failed write must not disturb the stream.
        writer.write_bits(0b11, 2).unwrap();
        assert_eq!(writer.finish(), vec![0b11000000]);
    }

    #[test]
    fn test_bit_writer_big_endian_fields() {
        let mut writer = BitWriter::new();
        writer.write_u16(0x0102).unwrap();
        writer.write_u32(0xDEADBEEF).unwrap();
        let result = writer.finish();
        assert_eq!(result, vec![0x01, 0x02, 0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_bit_writer_cross_byte() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xFF, 8).unwrap();
        writer.write_bits(0x0F, 4).unwrap();
        let result = writer.finish();
        assert_eq!(result, vec![0xFF, 0xF0]);
    }

    #[test]
    fn test_bit_writer_len_and_is_empty() {
        let mut writer = BitWriter::new();
        assert!(writer.is_empty());
        assert_eq!(writer.len(), 0);

        writer.write_u8(0xFF).unwrap();
        assert!(!writer.is_empty());
        assert_eq!(writer.len(), 1);
    }

    #[test]
    fn test_bit_reader_basic() {
        let data = [0b10110100, 0b11001010];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(4).unwrap(), 0b1011);
        assert_eq!(reader.read_bits(4).unwrap(), 0b0100);
        assert_eq!(reader.read_bits(8).unwrap(), 0b11001010);
    }

    #[test]
    fn test_bit_reader_single_bits() {
        let data = [0b10110100];
        let mut reader = BitReader::new(&data);
        let expected = [true, false, true, true, false, true, false, false];
        for bit in expected {
            assert_eq!(reader.read_bit().unwrap(), bit);
        }
    }

    #[test]
    fn test_bit_reader_cross_byte() {
        let data = [0b11110000, 0b00001111];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(6).unwrap(), 0b111100);
        assert_eq!(reader.read_bits(6).unwrap(), 0b000000);
        assert_eq!(reader.read_bits(4).unwrap(), 0b1111);
    }

    #[test]
    fn test_bit_reader_truncated() {
        let data = [0xFF];
        let mut reader = BitReader::new(&data);

        reader.read_bits(8).unwrap();
        assert!(matches!(reader.read_bit(), Err(Error::TruncatedStream)));
    }

    #[test]
    fn test_bit_reader_empty() {
        let mut reader = BitReader::new(&[]);
        assert!(reader.is_exhausted());
        assert!(matches!(reader.read_bit(), Err(Error::TruncatedStream)));
    }

    #[test]
    fn test_bit_reader_fixed_width_fields() {
        let data = [0x01, 0x02, 0xDE, 0xAD, 0xBE, 0xEF];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_u16().unwrap(), 0x0102);
        assert_eq!(reader.read_u32().unwrap(), 0xDEADBEEF);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_writer_reader_round_trip() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b1, 1).unwrap();
        writer.write_u16(2048).unwrap();
        writer.write_bits(0b010101, 6).unwrap();
        writer.write_u8(0xAB).unwrap();
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_bits(1).unwrap(), 0b1);
        assert_eq!(reader.read_u16().unwrap(), 2048);
        assert_eq!(reader.read_bits(6).unwrap(), 0b010101);
        assert_eq!(reader.read_u8().unwrap(), 0xAB);
    }
}
