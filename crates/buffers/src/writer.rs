//! Auto-growing binary buffer writer.

use crate::varint::zigzag_encode;

/// A binary buffer writer.
///
/// Multi-byte fixed-width integers are written big-endian. Variable-length
/// integers and strings follow the layout [`Reader`](crate::Reader) expects.
///
/// # Example
///
/// ```
/// use graphpack_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.u16(0x0203);
/// writer.var_u64(300);
/// assert_eq!(writer.flush(), vec![0x01, 0x02, 0x03, 0xac, 0x02]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Writer {
    uint8: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty writer with at least `capacity` bytes preallocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written since the last reset.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    /// Returns `true` when nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Discards everything written so far.
    pub fn reset(&mut self) {
        self.uint8.clear();
    }

    /// Returns the written bytes and resets the writer.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    /// Borrows the bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    #[inline]
    pub fn bool(&mut self, val: bool) {
        self.uint8.push(u8::from(val));
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes raw bytes.
    pub fn buf(&mut self, data: &[u8]) {
        self.uint8.extend_from_slice(data);
    }

    /// Writes an unsigned LEB128 varint.
    pub fn var_u64(&mut self, mut val: u64) {
        while val >= 0x80 {
            self.uint8.push((val as u8 & 0x7f) | 0x80);
            val >>= 7;
        }
        self.uint8.push(val as u8);
    }

    /// Writes a size, index or ordinal.
    #[inline]
    pub fn var_usize(&mut self, val: usize) {
        self.var_u64(val as u64);
    }

    #[inline]
    pub fn var_u32(&mut self, val: u32) {
        self.var_u64(u64::from(val));
    }

    /// Writes a signed integer as a zig-zag varint.
    #[inline]
    pub fn var_i64(&mut self, val: i64) {
        self.var_u64(zigzag_encode(val));
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn str(&mut self, s: &str) {
        self.var_usize(s.len());
        self.uint8.extend_from_slice(s.as_bytes());
    }

    /// Writes an optional string: the prefix is `len + 1`, `0` marks absence.
    pub fn str_opt(&mut self, s: Option<&str>) {
        match s {
            None => self.u8(0),
            Some(s) => {
                self.var_u64(s.len() as u64 + 1);
                self.uint8.extend_from_slice(s.as_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_layout() {
        let mut w = Writer::new();
        w.var_u64(0);
        w.var_u64(127);
        w.var_u64(128);
        assert_eq!(w.flush(), vec![0x00, 0x7f, 0x80, 0x01]);
    }

    #[test]
    fn zigzag_layout() {
        let mut w = Writer::new();
        w.var_i64(-1);
        w.var_i64(1);
        w.var_i64(-64);
        assert_eq!(w.flush(), vec![0x01, 0x02, 0x7f]);
    }

    #[test]
    fn string_layout() {
        let mut w = Writer::new();
        w.str("hi");
        w.str_opt(None);
        w.str_opt(Some(""));
        assert_eq!(w.flush(), vec![0x02, b'h', b'i', 0x00, 0x01]);
    }

    #[test]
    fn flush_resets() {
        let mut w = Writer::new();
        w.u32(7);
        assert_eq!(w.len(), 4);
        let _ = w.flush();
        assert!(w.is_empty());
    }
}
