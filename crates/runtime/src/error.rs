use thiserror::Error;

/// Errors raised by runtime container operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("capacity of {capacity} exceeded")]
    CapacityExceeded { capacity: usize },
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("invalid range {from}..{to} for length {len}")]
    InvalidRange { from: usize, to: usize, len: usize },
    #[error("{0} does not provide the required capability: {1}")]
    MissingCapability(&'static str, &'static str),
    #[error("{found} is not an element of enum {expected}")]
    WrongElementType {
        expected: &'static str,
        found: &'static str,
    },
}
