//! Lazy hex rendering of byte slices for log fields and error messages.

use std::fmt;

/// Formats at most `max` bytes of a slice as space separated hex octets.
///
/// Formatting happens only when the value is displayed, so it can be handed
/// to a disabled log statement for free.
///
/// # Example
///
/// ```
/// use graphpack_buffers::HexPreview;
///
/// assert_eq!(HexPreview::new(&[0x01, 0x0a, 0xff]).to_string(), "01 0a ff");
/// assert_eq!(HexPreview::with_max(&[1, 2, 3], 2).to_string(), "01 02 ... (1 more)");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HexPreview<'a> {
    octets: &'a [u8],
    max: usize,
}

impl<'a> HexPreview<'a> {
    pub const DEFAULT_MAX: usize = 16;

    pub fn new(octets: &'a [u8]) -> Self {
        Self::with_max(octets, Self::DEFAULT_MAX)
    }

    pub fn with_max(octets: &'a [u8], max: usize) -> Self {
        Self { octets, max }
    }
}

impl fmt::Display for HexPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.octets.iter().take(self.max).enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        if self.octets.len() > self.max {
            write!(f, " ... ({} more)", self.octets.len() - self.max)?;
        }
        Ok(())
    }
}
