//! Pool
//!
//! The Pool trait is the capability interface of fixed-size block allocation over caller-owned memory. There is one
//! concrete strategy today, `BlockPool`; abstracting the interface leaves room for others without committing callers
//! to a particular free-slot bookkeeping.

use core::ptr::NonNull;

use super::Result;

/// Abstraction of fixed-size block allocation over a borrowed memory region.
pub trait Pool {
    /// Allocates one block, returning a pointer to its payload.
    ///
    /// The payload is exactly `block_size` bytes; writing past it is the corruption the diagnostics mode detects.
    ///
    /// #   Errors
    ///
    /// -   `Error::OutOfMemory` if every slot is currently allocated.
    fn allocate(&mut self) -> Result<NonNull<u8>>;

    /// Releases a block previously returned by `allocate`.
    ///
    /// #   Errors
    ///
    /// -   `Error::NullPointer` if `pointer` is null.
    /// -   `Error::InvalidArgument` if `pointer` does not designate a currently allocated block of this pool; this
    ///     rejects double frees, foreign pointers, and misaligned pointers.
    /// -   `Error::CorruptedMemory` (diagnostics mode) if a write past the end of the block is detected.
    fn free(&mut self, pointer: *mut u8) -> Result<()>;
}
