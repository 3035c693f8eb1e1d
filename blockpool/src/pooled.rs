//! MappedPool
//!
//! The owning convenience over `BlockPool`: maps a fresh memory region from the OS, carves it into a pool, and
//! returns the region to the OS when dropped.

use core::ptr::NonNull;

use blockpool_core::{BlockPool, Error, Mode, Pool, Result};

use crate::platform::{OsPlatform, Platform};

/// MappedPool.
///
/// A `BlockPool` over a region mapped from the OS, rather than supplied by the caller. The mapping is rounded up to
/// the page size, so the pool's capacity may exceed the requested number of blocks.
///
/// In diagnostics mode, dropping the pool runs the integrity scan before the region is unmapped, and panics on
/// corruption, exactly as `BlockPool` does.
pub struct MappedPool {
    //  Declared before `mapping`: the pool's teardown scan must run whilst the region is still mapped.
    pool: BlockPool,
    mapping: Mapping,
}

impl MappedPool {
    /// Maps a region large enough for at least `blocks` blocks of `block_size` bytes, and carves it into a pool.
    ///
    /// #   Errors
    ///
    /// -   `Error::InvalidArgument` if `block_size` or `blocks` is zero.
    /// -   `Error::Internal` if the region size overflows.
    /// -   `Error::OutOfMemory` if the OS cannot map the region.
    pub fn with_capacity(block_size: usize, blocks: usize, mode: Mode) -> Result<MappedPool> {
        if blocks == 0 {
            return Err(Error::InvalidArgument("block count is zero"));
        }

        let platform = OsPlatform::new();
        let page_size = platform.page_size();

        let wanted = BlockPool::slot_size(block_size).checked_mul(blocks)
            .ok_or(Error::Internal("region size overflows"))?;
        let size = wanted.checked_add(page_size - 1)
            .ok_or(Error::Internal("region size overflows"))?
            / page_size * page_size;

        let base = platform.allocate(size).ok_or(Error::OutOfMemory)?;

        //  Safety:
        //  -   The mapping spans `size` bytes, freshly mapped, hence exclusively accessed.
        let pool = match unsafe { BlockPool::with_mode(base.as_ptr(), size, block_size, mode) } {
            Ok(pool) => pool,
            Err(error) => {
                //  Safety:
                //  -   The mapping is no longer in use.
                unsafe { platform.deallocate(base, size) };

                return Err(error);
            },
        };

        Ok(MappedPool { pool, mapping: Mapping { base, size } })
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &BlockPool { &self.pool }

    /// Returns a mutable reference to the underlying pool.
    pub fn pool_mut(&mut self) -> &mut BlockPool { &mut self.pool }

    /// Allocates one block, returning a pointer to its payload.
    ///
    /// See [`BlockPool::allocate`].
    pub fn allocate(&mut self) -> Result<NonNull<u8>> { self.pool.allocate() }

    /// Releases a block previously returned by `allocate`.
    ///
    /// See [`BlockPool::free`].
    pub fn free(&mut self, pointer: *mut u8) -> Result<()> { self.pool.free(pointer) }
}

impl Pool for MappedPool {
    fn allocate(&mut self) -> Result<NonNull<u8>> { MappedPool::allocate(self) }

    fn free(&mut self, pointer: *mut u8) -> Result<()> { MappedPool::free(self, pointer) }
}

//  The mapped span, returned to the OS on drop.
struct Mapping {
    base: NonNull<u8>,
    size: usize,
}

impl Drop for Mapping {
    fn drop(&mut self) {
        //  Safety:
        //  -   `base` and `size` come from `OsPlatform::allocate`.
        //  -   The pool borrowing the span was dropped first, by field order.
        unsafe { OsPlatform::new().deallocate(self.base, self.size) };
    }
}
