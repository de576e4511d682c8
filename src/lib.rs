//! # lzpak
//!
//! A minimal-dependency, from-scratch LZ77 file compressor.
//!
//! lzpak converts arbitrary bytes into a sequence of (offset, length,
//! literal) triples found by a sliding-window match engine, then entropy
//! codes the offset and length streams with two independent Huffman
//! coders and writes a self-describing binary artifact. Decompression
//! reverses the process bit for bit.
//!
//! The wire format is bespoke to this crate; it is deliberately not
//! compatible with DEFLATE or any other standard container.
//!
//! ## Artifact layout
//!
//! ```text
//! [Offset Huffman header]
//!   symbol_count : 2 bytes (big-endian)
//!   repeated symbol_count times:
//!     symbol      : 2 bytes
//!     code_length : 1 byte
//!     code_bits   : code_length bits
//! [Length Huffman header]   (same shape)
//! [Triple count]            4 bytes (big-endian)
//! [Content]
//!   repeated per triple:
//!     offset_code : variable bits
//!     length_code : variable bits
//!     literal     : 1 byte
//!   trailing zero-bit padding to the next byte boundary
//! ```
//!
//! ## Example
//!
//! ```rust
//! let data = b"banana bandana banana bandana";
//! let artifact = lzpak::compress(data).unwrap();
//! let restored = lzpak::decompress(&artifact).unwrap();
//! assert_eq!(&restored, data);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bits;
pub mod decode;
pub mod encode;
pub mod error;
pub mod huffman;
pub mod lz77;

pub use decode::decompress;
pub use encode::{compress, compress_with_stats, EncodeStats};
pub use error::{Error, Result};
