//! # bwthuff
//!
//! A lossless text compressor over the printable-ASCII alphabet `[36, 126]`.
//! The pipeline is, in order: Burrows-Wheeler Transform (via an online
//! Ukkonen suffix tree), run-length encoding, Huffman coding, and Elias gamma
//! coding of every length-prefixed integer.
//!
//! * `suffix_tree` builds the suffix array the BWT stage needs.
//! * `bwt` performs the forward and inverse Burrows-Wheeler Transform.
//! * `rle` groups the BWT output into (symbol, run) pairs.
//! * `huffman` builds and serializes a self-describing Huffman table.
//! * `elias` codes positive integers as Elias gamma.
//! * `bits` is the MSB-first bit-stream plumbing all of the above share.
//! * `codec` assembles/parses the full `encode`/`decode` wire format.
//!
//! ## Buffer Example
//!
//! ```
//! use bwthuff::codec;
//! let original = b"banana$";
//! let compressed = codec::encode(original).expect("encode failed");
//! let expanded = codec::decode(&compressed).expect("decode failed");
//! assert_eq!(expanded, original);
//! ```

pub mod alphabet;
pub mod bits;
pub mod bwt;
pub mod codec;
pub mod elias;
pub mod huffman;
pub mod rle;
pub mod suffix_tree;

pub use codec::{decode, encode};

/// Errors produced by the compression/decompression pipeline.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The encoder was given a byte outside `[36, 126]`.
    #[error("byte {0:#04x} is outside the printable ASCII alphabet [36, 126]")]
    InvalidSymbol(u8),
    /// The encoder was given zero bytes.
    #[error("input is empty")]
    EmptyInput,
    /// The decoder ran out of bits before finishing the header or the data.
    #[error("bit stream ended before the declared content was fully read")]
    TruncatedStream,
    /// The decoder parsed a structurally nonsensical header field.
    #[error("header is malformed: {0}")]
    MalformedHeader(&'static str),
    /// The header declared the same symbol twice.
    #[error("symbol {0:#04x} appears twice in the header")]
    DuplicateSymbolInHeader(u8),
    /// The header's codewords are not prefix-free.
    #[error("header defines a codeword that is a prefix of another")]
    CodewordCollision,
}

pub type DYNERR = Box<dyn std::error::Error>;
pub type STDRESULT = Result<(), DYNERR>;
