//! Binary buffer reader with cursor tracking.

use std::str;

use crate::varint::{zigzag_decode, MAX_VARINT_LEN};
use crate::BufferError;

/// A binary buffer reader that reads data from a byte slice.
///
/// The reader maintains a cursor position. Every read is bounds-checked:
/// running past `end` yields [`BufferError::EndOfBuffer`] and leaves the
/// cursor where it was.
///
/// # Example
///
/// ```
/// use graphpack_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03, 0xac, 0x02];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8().unwrap(), 0x01);
/// assert_eq!(reader.u16().unwrap(), 0x0203);
/// assert_eq!(reader.var_u64().unwrap(), 300);
/// assert!(reader.u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        let end = uint8.len();
        Self { uint8, x: 0, end }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end - self.x
    }

    /// Peeks at the current byte without advancing the cursor.
    pub fn peek(&self) -> Result<u8, BufferError> {
        if self.x < self.end {
            Ok(self.uint8[self.x])
        } else {
            Err(BufferError::EndOfBuffer)
        }
    }

    fn take(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        if size > self.size() {
            return Err(BufferError::EndOfBuffer);
        }
        let start = self.x;
        self.x += size;
        Ok(&self.uint8[start..self.x])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let bytes = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Advances the cursor by the given number of bytes.
    pub fn skip(&mut self, length: usize) -> Result<(), BufferError> {
        self.take(length).map(|_| ())
    }

    /// Returns a subarray of the given size and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.take(size)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        let val = self.peek()?;
        self.x += 1;
        Ok(val)
    }

    /// Reads a boolean; any non-zero byte is `true`.
    #[inline]
    pub fn bool(&mut self) -> Result<bool, BufferError> {
        Ok(self.u8()? != 0)
    }

    /// Reads an unsigned 16-bit integer (big-endian).
    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    /// Reads an unsigned 32-bit integer (big-endian).
    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    /// Reads an unsigned 64-bit integer (big-endian).
    #[inline]
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        Ok(u64::from_be_bytes(self.array()?))
    }

    /// Reads a signed 64-bit integer (big-endian).
    #[inline]
    pub fn i64(&mut self) -> Result<i64, BufferError> {
        Ok(i64::from_be_bytes(self.array()?))
    }

    /// Reads a 64-bit floating point number (big-endian).
    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        Ok(f64::from_be_bytes(self.array()?))
    }

    /// Reads an unsigned LEB128 varint.
    ///
    /// The cursor is restored when the varint is truncated or malformed.
    pub fn var_u64(&mut self) -> Result<u64, BufferError> {
        let start = self.x;
        let mut result: u64 = 0;
        for i in 0..MAX_VARINT_LEN {
            let b = match self.u8() {
                Ok(b) => b,
                Err(err) => {
                    self.x = start;
                    return Err(err);
                }
            };
            let part = u64::from(b & 0x7f);
            // The tenth byte may only carry the single top bit.
            if i == MAX_VARINT_LEN - 1 && b > 0x01 {
                self.x = start;
                return Err(BufferError::VarintOverflow);
            }
            result |= part << (7 * i);
            if b & 0x80 == 0 {
                return Ok(result);
            }
        }
        self.x = start;
        Err(BufferError::VarintOverflow)
    }

    /// Reads a size, index or ordinal.
    pub fn var_usize(&mut self) -> Result<usize, BufferError> {
        usize::try_from(self.var_u64()?).map_err(|_| BufferError::Overflow)
    }

    pub fn var_u32(&mut self) -> Result<u32, BufferError> {
        u32::try_from(self.var_u64()?).map_err(|_| BufferError::Overflow)
    }

    /// Reads a zig-zag varint.
    pub fn var_i64(&mut self) -> Result<i64, BufferError> {
        Ok(zigzag_decode(self.var_u64()?))
    }

    /// Reads a UTF-8 string of the given byte size.
    pub fn utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        let bytes = self.take(size)?;
        str::from_utf8(bytes).map_err(|_| BufferError::InvalidUtf8)
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn str(&mut self) -> Result<&'a str, BufferError> {
        let size = self.var_usize()?;
        self.utf8(size)
    }

    /// Reads a string written by [`Writer::str_opt`](crate::Writer::str_opt).
    pub fn str_opt(&mut self) -> Result<Option<&'a str>, BufferError> {
        match self.var_usize()? {
            0 => Ok(None),
            n => self.utf8(n - 1).map(Some),
        }
    }
}
