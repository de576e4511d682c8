//! Error types for the lzpak library.

use std::fmt;
use std::io;

/// Result type alias for lzpak operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during compression or decompression.
#[derive(Debug)]
pub enum Error {
    /// An underlying file read or write failed.
    Io(io::Error),
    /// An integer does not fit in the declared bit width.
    ///
    /// This indicates an internal invariant violation in the encoder,
    /// never a property of the input data.
    Range {
        /// The value that was to be written.
        value: u64,
        /// The declared bit width.
        bits: u8,
    },
    /// A Huffman header in the compressed stream is malformed.
    CorruptHeader(&'static str),
    /// The bitstream contains a code absent from the decode table.
    UnknownCode,
    /// The compressed stream ended before a complete triple could be read.
    TruncatedStream,
    /// A match triple references data before the start of the output.
    InvalidBackreference {
        /// The offset the triple asked for.
        offset: usize,
        /// How many bytes of output existed at that point.
        available: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Range { value, bits } => {
                write!(f, "Value {} does not fit in {} bits", value, bits)
            }
            Error::CorruptHeader(msg) => write!(f, "Corrupt Huffman header: {}", msg),
            Error::UnknownCode => write!(f, "Bitstream contains an unknown Huffman code"),
            Error::TruncatedStream => write!(f, "Compressed stream ended mid-triple"),
            Error::InvalidBackreference { offset, available } => {
                write!(
                    f,
                    "Back-reference offset {} exceeds {} bytes of produced output",
                    offset, available
                )
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
