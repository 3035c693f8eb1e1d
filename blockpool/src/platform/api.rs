//! Platform
//!
//! The Platform trait is used to request raw memory directly from the OS, to back an owned pool. By abstracting the
//! underlying platform, it becomes possible to easily port the code to a different OS, or even to a bare-metal
//! target.

use core::ptr::NonNull;

/// Abstraction of platform specific memory mapping and unmapping.
pub(crate) trait Platform {
    /// Returns the granularity of platform allocations, in bytes.
    fn page_size(&self) -> usize;

    /// Maps a fresh span of `size` readable and writable bytes.
    ///
    /// May return None if the request cannot be satisfied.
    ///
    /// The caller may assume that if a pointer is returned, at least `size` bytes are usable and exclusively theirs.
    fn allocate(&self, size: usize) -> Option<NonNull<u8>>;

    /// Unmaps the supplied span of memory.
    ///
    /// #   Safety
    ///
    /// -   Assumes that `pointer` and `size` come from a prior call to `allocate` on this instance.
    /// -   Assumes that the span is no longer in use.
    unsafe fn deallocate(&self, pointer: NonNull<u8>, size: usize);
}
