//! BlockPool
//!
//! A fixed-block allocator: carves a caller-supplied memory region into equal-sized slots and serves `allocate` and
//! `free` in O(1) from an intrusive free list, without ever calling into a general-purpose allocator.

use core::ptr::NonNull;

use crate::{Error, Mode, Pool, Result};
use crate::internals::free_list::FreeList;
use crate::internals::layout::SlotLayout;
use crate::internals::region::Region;
use crate::internals::slot::AllocatedSlot;

/// BlockPool.
///
/// Serves fixed-size blocks from a borrowed memory region. Construction validates the region, partitions it into
/// slots of `block_size` plus a fixed overhead, and threads every slot onto the free list as one initial run.
///
/// The pool is single-threaded by construction: `allocate` and `free` take `&mut self`. No operation blocks, and
/// every operation is O(1) except the diagnostics-only integrity scan.
///
/// In diagnostics mode, dropping the pool scans every slot for corruption and panics on the first end-sentinel
/// mismatch; use [`BlockPool::check_integrity`] beforehand for the `Result` form. The drop itself transitions no
/// slot, it only inspects them.
pub struct BlockPool {
    region: Region,
    layout: SlotLayout,
    free: FreeList,
    mode: Mode,
}

impl BlockPool {
    /// Returns the number of bytes one slot occupies for `block_size` payload bytes.
    ///
    /// Useful to size a region for a desired number of blocks: a region of `n * slot_size(block_size)` bytes yields
    /// a pool of capacity `n`.
    pub const fn slot_size(block_size: usize) -> usize { block_size + SlotLayout::OVERHEAD }

    /// Creates a pool over the `size` bytes starting at `base`, with the default mode.
    ///
    /// See [`BlockPool::with_mode`] for the errors and the safety contract.
    ///
    /// #   Safety
    ///
    /// -   As per [`BlockPool::with_mode`].
    pub unsafe fn new(base: *mut u8, size: usize, block_size: usize) -> Result<BlockPool> {
        Self::with_mode(base, size, block_size, Mode::default())
    }

    /// Creates a pool over the `size` bytes starting at `base`, serving blocks of `block_size` bytes.
    ///
    /// The caller allocates and retains ownership of the buffer; the pool borrows it and never frees it. In
    /// diagnostics mode the whole span is stamped with the free fill pattern.
    ///
    /// #   Errors
    ///
    /// -   `Error::NullPointer` if `base` is null.
    /// -   `Error::InvalidArgument` if `size` or `block_size` is zero, if `block_size` exceeds `size`, or if the
    ///     region cannot fit a single slot with overhead.
    /// -   `Error::Internal` if the region holds more slots than a slot index can address.
    ///
    /// #   Safety
    ///
    /// -   Assumes that `base`, if non-null, points to `size` bytes of memory.
    /// -   Assumes that the span is not read, written, or repurposed by anyone but the pool for the pool's entire
    ///     lifetime.
    pub unsafe fn with_mode(base: *mut u8, size: usize, block_size: usize, mode: Mode) -> Result<BlockPool> {
        let region = Region::new(base, size, block_size, mode)?;
        let layout = SlotLayout::new(&region)?;

        //  Safety:
        //  -   The span is live and exclusively accessed, per this function's contract.
        let free = FreeList::initialize(&region, &layout);

        Ok(BlockPool { region, layout, free, mode })
    }

    /// Returns the mode the pool operates in.
    pub fn mode(&self) -> Mode { self.mode }

    /// Returns the size of the blocks served, in bytes.
    pub fn block_size(&self) -> usize { self.region.block_size() }

    /// Returns the number of blocks the pool can serve simultaneously.
    pub fn capacity(&self) -> usize { self.layout.slot_count() }

    /// Allocates one block, returning a pointer to its payload.
    ///
    /// The slot is popped off the free list and stamped as allocated; in diagnostics mode the payload is filled with
    /// the allocated pattern and the end sentinel is armed. O(1).
    ///
    /// #   Errors
    ///
    /// -   `Error::OutOfMemory` if every slot is currently allocated.
    pub fn allocate(&mut self) -> Result<NonNull<u8>> {
        //  Safety:
        //  -   `region` and `layout` are the ones the list was initialized with.
        let index = unsafe { self.free.pop(&self.region, &self.layout) }.ok_or(Error::OutOfMemory)?;

        let at = self.layout.slot(&self.region, index);

        //  Safety:
        //  -   `at` points to a full slot of the region, off the free list, hence exclusively accessed.
        let slot = unsafe { AllocatedSlot::stamp(at, self.region.block_size(), self.mode) };

        Ok(slot.payload())
    }

    /// Releases the block whose payload starts at `pointer`, returning its slot to the free list.
    ///
    /// The freed slot becomes the new free-list head as a single-slot run; adjacent free slots are not merged. O(1).
    ///
    /// #   Errors
    ///
    /// -   `Error::NullPointer` if `pointer` is null.
    /// -   `Error::InvalidArgument` if `pointer` does not address a block of this pool, or if the block is not
    ///     currently allocated; this rejects double frees, foreign pointers, and misaligned pointers.
    /// -   `Error::CorruptedMemory` (diagnostics mode) if the end sentinel was overwritten whilst the block was
    ///     allocated.
    pub fn free(&mut self, pointer: *mut u8) -> Result<()> {
        if pointer.is_null() {
            return Err(Error::NullPointer);
        }

        let header = AllocatedSlot::header_of_payload(pointer);

        let index = self.layout.index_of(&self.region, header)
            .ok_or(Error::InvalidArgument("pointer does not address a block of this pool"))?;

        let at = self.layout.slot(&self.region, index);

        //  Safety:
        //  -   `at` points to a slot of the live region.
        let slot = unsafe { AllocatedSlot::at(at) }
            .ok_or(Error::InvalidArgument("free of unallocated memory"))?;

        if self.mode.is_diagnostics() {
            //  Safety:
            //  -   The slot was stamped with this pool's block size, in diagnostics mode.
            unsafe { slot.verify(self.region.block_size())? };
        }

        //  Safety:
        //  -   The block size matches; the user relinquished the payload by calling `free`.
        //  -   Slot `index` was allocated, hence off the list.
        unsafe {
            slot.clear(self.region.block_size(), self.mode);
            self.free.push(&self.region, &self.layout, index);
        }

        Ok(())
    }

    /// Walks every slot of the region, verifying the end sentinel of each allocated one.
    ///
    /// A no-op in release mode, where no end sentinel is written. O(slot count).
    ///
    /// #   Errors
    ///
    /// -   `Error::CorruptedMemory` on the first mismatch found.
    pub fn check_integrity(&self) -> Result<()> {
        if !self.mode.is_diagnostics() {
            return Ok(());
        }

        for index in 0..self.layout.slot_count() as u32 {
            let at = self.layout.slot(&self.region, index);

            //  Safety:
            //  -   `at` points to a slot of the live region.
            if let Some(slot) = unsafe { AllocatedSlot::at(at) } {
                //  Safety:
                //  -   Allocated slots are stamped with this pool's block size, in diagnostics mode.
                unsafe { slot.verify(self.region.block_size())? };
            }
        }

        Ok(())
    }
}

impl Pool for BlockPool {
    fn allocate(&mut self) -> Result<NonNull<u8>> { BlockPool::allocate(self) }

    fn free(&mut self, pointer: *mut u8) -> Result<()> { BlockPool::free(self, pointer) }
}

impl Drop for BlockPool {
    fn drop(&mut self) {
        if let Err(error) = self.check_integrity() {
            panic!("integrity scan failed at teardown: {}", error);
        }
    }
}

// mod tests
