//! Wire constants.

use crate::GraphError;

/// Leading byte of every generic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    Null = 0,
    False = 1,
    True = 2,
    Int = 3,
    Float = 4,
    Str = 5,
    /// Followed by the class id (generic values only) and the adapter record.
    Object = 6,
    /// Followed by a reference id.
    Reference = 7,
}

impl TryFrom<u8> for Tag {
    type Error = GraphError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Ok(match byte {
            0 => Tag::Null,
            1 => Tag::False,
            2 => Tag::True,
            3 => Tag::Int,
            4 => Tag::Float,
            5 => Tag::Str,
            6 => Tag::Object,
            7 => Tag::Reference,
            other => return Err(GraphError::InvalidTag(other)),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> u8 {
        tag as u8
    }
}

/// Default bound on nesting while walking a graph.
pub const DEFAULT_MAX_DEPTH: usize = 512;
