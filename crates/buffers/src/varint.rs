//! Variable-length integer helpers.
//!
//! Unsigned values use little-endian base-128 groups: seven payload bits per
//! byte, high bit set on every byte but the last. A `u64` therefore takes at
//! most [`MAX_VARINT_LEN`] bytes.

/// Longest encoding of a `u64` varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Maps a signed integer onto an unsigned one so that small magnitudes stay
/// small: `0, -1, 1, -2, 2, ...` become `0, 1, 2, 3, 4, ...`.
#[inline]
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
#[inline]
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Number of bytes [`Writer::var_u64`](crate::Writer::var_u64) emits for `value`.
///
/// # Example
///
/// ```
/// use graphpack_buffers::var_u64_len;
///
/// assert_eq!(var_u64_len(0), 1);
/// assert_eq!(var_u64_len(127), 1);
/// assert_eq!(var_u64_len(128), 2);
/// assert_eq!(var_u64_len(u64::MAX), 10);
/// ```
pub fn var_u64_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}
