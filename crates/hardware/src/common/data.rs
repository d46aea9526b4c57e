//! Memory Access Types.
//!
//! Classifies the requests that flow through the hierarchy. The same type is
//! used for trace records, for sub-requests a level issues to the level
//! below it (fetches are reads, evictions are writes), and for statistics.

use std::fmt;

/// Type of memory request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Data read. A miss fetches the block from the next level.
    Read,

    /// Data write. Marks the block dirty; a miss allocates the block first.
    Write,
}

impl AccessType {
    /// Returns `true` for [`AccessType::Write`].
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }

    /// Parses the single-letter trace tag (`r` or `w`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "r" => Some(Self::Read),
            "w" => Some(Self::Write),
            _ => None,
        }
    }

    /// Single-letter trace tag for this access.
    pub const fn tag(self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'w',
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}
