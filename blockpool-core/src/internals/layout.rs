//! Slot layout arithmetic.
//!
//! The region is partitioned into `slot_count` slots of `slot_size` bytes each; any trailing bytes beyond
//! `slot_count * slot_size` are unused. Slots are addressed by index relative to the region base, so the layout is
//! well-defined purely from base + index, with no raw addresses stored anywhere.

use core::ptr::NonNull;

use crate::{Error, Result};

use super::free_list::RunHeader;
use super::region::Region;
use super::slot::AllocatedSlot;

/// SlotLayout.
///
/// The partition of a region into fixed-size slots.
pub(crate) struct SlotLayout {
    slot_size: usize,
    slot_count: usize,
}

impl SlotLayout {
    /// Per-slot overhead in bytes beyond the requested block size.
    ///
    /// The larger of the two in-band headers: the allocated form (lead sentinel plus reserved end sentinel) and the
    /// free form (run header).
    pub(crate) const OVERHEAD: usize = max(AllocatedSlot::OVERHEAD, RunHeader::SIZE);

    /// Partitions `region` into slots.
    ///
    /// #   Errors
    ///
    /// -   `Error::InvalidArgument` if the region cannot fit a single slot with overhead.
    /// -   `Error::Internal` if the region holds more slots than a slot index can address.
    pub(crate) fn new(region: &Region) -> Result<SlotLayout> {
        let slot_size = region.block_size() + Self::OVERHEAD;
        let slot_count = region.size() / slot_size;

        if slot_count == 0 {
            return Err(Error::InvalidArgument("memory size is not enough to fit a single block"));
        }

        if slot_count >= RunHeader::NIL as usize {
            return Err(Error::Internal("region holds more slots than the free list can address"));
        }

        Ok(SlotLayout { slot_size, slot_count })
    }

    /// Returns the size of a slot, in bytes.
    pub(crate) fn slot_size(&self) -> usize { self.slot_size }

    /// Returns the number of slots the region holds.
    pub(crate) fn slot_count(&self) -> usize { self.slot_count }

    /// Returns a pointer to the start of slot `index`.
    pub(crate) fn slot(&self, region: &Region, index: u32) -> NonNull<u8> {
        debug_assert!((index as usize) < self.slot_count);

        //  Safety:
        //  -   `index` is within bounds, hence the result is within the region span.
        unsafe { NonNull::new_unchecked(region.base().as_ptr().add(index as usize * self.slot_size)) }
    }

    /// Recovers the index of the slot starting at `at`, if `at` addresses one.
    ///
    /// Returns None for pointers outside the slotted span, and for pointers not on a slot boundary; no memory is
    /// read.
    pub(crate) fn index_of(&self, region: &Region, at: *mut u8) -> Option<u32> {
        let base = region.base().as_ptr() as usize;
        let at = at as usize;

        let offset = at.checked_sub(base)?;

        if offset % self.slot_size != 0 {
            return None;
        }

        let index = offset / self.slot_size;

        if index >= self.slot_count {
            return None;
        }

        Some(index as u32)
    }
}

const fn max(left: usize, right: usize) -> usize {
    if left > right { left } else { right }
}

#[cfg(test)]
mod tests {

use crate::Mode;

use super::*;

fn layout_of(memory: &mut [u8], block_size: usize) -> Result<(usize, usize)> {
    let region = unsafe { Region::new(memory.as_mut_ptr(), memory.len(), block_size, Mode::Release) }.unwrap();

    SlotLayout::new(&region).map(|layout| (layout.slot_size(), layout.slot_count()))
}

#[test]
fn layout_overhead() {
    assert_eq!(8, SlotLayout::OVERHEAD);
}

#[test]
fn layout_single_slot() {
    let mut memory = [0u8; 24];

    assert_eq!(Ok((24, 1)), layout_of(&mut memory, 16));
}

#[test]
fn layout_truncates_trailing_remainder() {
    let mut memory = [0u8; 27];

    assert_eq!(Ok((24, 1)), layout_of(&mut memory, 16));

    let mut memory = [0u8; 40];

    assert_eq!(Ok((12, 3)), layout_of(&mut memory, 4));
}

#[test]
fn layout_rejects_region_too_small_for_one_slot() {
    //  The block alone fits, the overhead does not.
    let mut memory = [0u8; 18];

    assert_eq!(
        Err(Error::InvalidArgument("memory size is not enough to fit a single block")),
        layout_of(&mut memory, 16)
    );
}

#[test]
fn layout_slot_addressing() {
    let mut memory = [0u8; 36];
    let base = memory.as_mut_ptr();

    let region = unsafe { Region::new(base, 36, 4, Mode::Release) }.unwrap();
    let layout = SlotLayout::new(&region).unwrap();

    assert_eq!(3, layout.slot_count());

    for index in 0..3u32 {
        let slot = layout.slot(&region, index);

        assert_eq!(base as usize + index as usize * 12, slot.as_ptr() as usize);
        assert_eq!(Some(index), layout.index_of(&region, slot.as_ptr()));
    }
}

#[test]
fn layout_index_of_rejects_stray_pointers() {
    let mut memory = [0u8; 36];
    let base = memory.as_mut_ptr();

    let region = unsafe { Region::new(base, 36, 4, Mode::Release) }.unwrap();
    let layout = SlotLayout::new(&region).unwrap();

    //  Before the region.
    assert_eq!(None, layout.index_of(&region, (base as usize - 4) as *mut u8));

    //  Off the slot stride.
    assert_eq!(None, layout.index_of(&region, (base as usize + 1) as *mut u8));
    assert_eq!(None, layout.index_of(&region, (base as usize + 13) as *mut u8));

    //  Past the last slot.
    assert_eq!(None, layout.index_of(&region, (base as usize + 36) as *mut u8));
}

} // mod tests
