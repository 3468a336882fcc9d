//! Byte buffer utilities for graphpack.
//!
//! This crate provides the primitive codec every graphpack adapter writes
//! through: fixed-width integers, variable-length integers and
//! length-prefixed UTF-8 strings.
//!
//! # Overview
//!
//! - [`Writer`] - Writes binary data to an auto-growing buffer
//! - [`Reader`] - Reads binary data from a byte slice with cursor tracking
//! - [`HexPreview`] - Lazy hex rendering for diagnostics
//! - [`zigzag_encode`] / [`zigzag_decode`] - Signed to unsigned mapping used by varints
//!
//! Sizes, indices, ordinals and identifiers are always written with the
//! unsigned ("optimized positive") varint; signed scalars go through zig-zag
//! first.
//!
//! # Example
//!
//! ```
//! use graphpack_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.var_usize(3);
//! writer.var_i64(-2);
//! writer.str("hello");
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.var_usize().unwrap(), 3);
//! assert_eq!(reader.var_i64().unwrap(), -2);
//! assert_eq!(reader.str().unwrap(), "hello");
//! assert_eq!(reader.size(), 0);
//! ```

mod hex_preview;
mod reader;
mod varint;
mod writer;

pub use hex_preview::HexPreview;
pub use reader::Reader;
pub use varint::{var_u64_len, zigzag_decode, zigzag_encode, MAX_VARINT_LEN};
pub use writer::Writer;

/// Error type for buffer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer,
    /// Invalid UTF-8 sequence.
    InvalidUtf8,
    /// A length or value does not fit the target integer type.
    Overflow,
    /// A varint ran longer than ten bytes or overflowed 64 bits.
    VarintOverflow,
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer => write!(f, "end of buffer"),
            BufferError::InvalidUtf8 => write!(f, "invalid UTF-8 sequence"),
            BufferError::Overflow => write!(f, "integer overflow"),
            BufferError::VarintOverflow => write!(f, "malformed varint"),
        }
    }
}

impl std::error::Error for BufferError {}
