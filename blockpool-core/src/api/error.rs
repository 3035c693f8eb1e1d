//! The error taxonomy of the pool.
//!
//! All errors are raised synchronously at the point of detection; the pool never retries internally. Any retry or
//! compaction policy belongs to the caller.

use core::fmt;

/// Error
///
/// The ways a pool operation may fail.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Error {
    /// A null pointer was supplied, either as the region base or as the target of `free`.
    NullPointer,
    /// A structurally invalid argument; the message names the offence.
    InvalidArgument(&'static str),
    /// The free list is exhausted; every slot of the region is currently allocated.
    OutOfMemory,
    /// A sentinel check failed: a write was performed past the end of an allocated block.
    CorruptedMemory,
    /// The region cannot be represented by the pool's internal slot indices.
    Internal(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::NullPointer => write!(f, "null pointer"),
            Error::InvalidArgument(message) => write!(f, "invalid argument: {}", message),
            Error::OutOfMemory => write!(f, "out of memory"),
            Error::CorruptedMemory => write!(f, "corrupted memory: write past the end of an allocated block"),
            Error::Internal(message) => write!(f, "internal limit: {}", message),
        }
    }
}

/// The `Result` of pool operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

// mod tests
