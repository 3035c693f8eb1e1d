//! Allocated slots.
//!
//! Whilst a slot is allocated, its content past the header is purely in the hands of the user; the header carries a
//! lead sentinel identifying the slot as allocated, and in diagnostics mode an end sentinel follows the payload,
//! catching writes performed past the requested block size.
//!
//! Note: slots are never _constructed_, instead raw memory within the region is stamped and reinterpreted in place.

use core::mem;
use core::ptr::{self, NonNull};

use crate::{Error, Mode, Result};
use crate::utils;

use super::region::{ALLOCATED_PATTERN, FREE_PATTERN};

//  Lead sentinel, identifying a slot as allocated.
const SLOT_ALLOCATED: u32 = 0xdead_beef;

//  End sentinel, written past the payload in diagnostics mode.
const SLOT_END: u32 = 0xdead_2bad;

/// Size of the lead sentinel, in bytes; the payload starts this far into the slot.
pub(crate) const LEAD_SIZE: usize = mem::size_of::<u32>();

/// Size reserved for the end sentinel, in bytes.
pub(crate) const END_SIZE: usize = mem::size_of::<u32>();

/// AllocatedSlot.
///
/// A slot of the region currently stamped as allocated; points at the slot start.
pub(crate) struct AllocatedSlot(NonNull<u8>);

impl AllocatedSlot {
    /// Worst-case header bytes of an allocated slot: lead sentinel plus reserved end sentinel.
    pub(crate) const OVERHEAD: usize = LEAD_SIZE + END_SIZE;

    /// Stamps the slot starting at `at` as allocated.
    ///
    /// In diagnostics mode, also writes the end sentinel past the payload and fills the payload with
    /// `ALLOCATED_PATTERN`.
    ///
    /// #   Safety
    ///
    /// -   Assumes that `at` points to at least `block_size + OVERHEAD` bytes, exclusively accessed.
    pub(crate) unsafe fn stamp(at: NonNull<u8>, block_size: usize, mode: Mode) -> AllocatedSlot {
        utils::write_u32(at, SLOT_ALLOCATED);

        if mode.is_diagnostics() {
            utils::write_u32(utils::offset(at, LEAD_SIZE + block_size), SLOT_END);

            ptr::write_bytes(at.as_ptr().add(LEAD_SIZE), ALLOCATED_PATTERN, block_size);
        }

        AllocatedSlot(at)
    }

    /// Returns the slot starting at `at`, if its lead sentinel identifies it as allocated.
    ///
    /// #   Safety
    ///
    /// -   Assumes that `at` points to a slot within a live region.
    pub(crate) unsafe fn at(at: NonNull<u8>) -> Option<AllocatedSlot> {
        if utils::read_u32(at) == SLOT_ALLOCATED {
            Some(AllocatedSlot(at))
        } else {
            None
        }
    }

    /// Returns the address of the slot header from the payload pointer handed to the caller.
    ///
    /// Pure pointer arithmetic; the result is only meaningful if `payload` was returned by `allocate`.
    pub(crate) fn header_of_payload(payload: *mut u8) -> *mut u8 {
        (payload as usize).wrapping_sub(LEAD_SIZE) as *mut u8
    }

    /// Returns a pointer to the payload, immediately past the lead sentinel.
    pub(crate) fn payload(&self) -> NonNull<u8> {
        //  Safety:
        //  -   The payload lies within the slot.
        unsafe { utils::offset(self.0, LEAD_SIZE) }
    }

    /// Verifies the end sentinel.
    ///
    /// #   Errors
    ///
    /// -   `Error::CorruptedMemory` if the sentinel was overwritten: the user wrote past the block.
    ///
    /// #   Safety
    ///
    /// -   Assumes that the slot was stamped in diagnostics mode, with the same `block_size`.
    pub(crate) unsafe fn verify(&self, block_size: usize) -> Result<()> {
        if utils::read_u32(utils::offset(self.0, LEAD_SIZE + block_size)) == SLOT_END {
            Ok(())
        } else {
            Err(Error::CorruptedMemory)
        }
    }

    /// Returns the slot to the free state.
    ///
    /// In diagnostics mode the whole slot is refilled with `FREE_PATTERN`; otherwise only the lead sentinel is
    /// cleared.
    ///
    /// #   Safety
    ///
    /// -   Assumes that `block_size` matches the one the slot was stamped with.
    /// -   Assumes that the user no longer accesses the payload.
    pub(crate) unsafe fn clear(self, block_size: usize, mode: Mode) {
        if mode.is_diagnostics() {
            ptr::write_bytes(self.0.as_ptr(), FREE_PATTERN, block_size + Self::OVERHEAD);
        } else {
            utils::write_u32(self.0, 0);
        }
    }
}

#[cfg(test)]
mod tests {

use super::*;

const BLOCK_SIZE: usize = 16;

type Slot = [u8; BLOCK_SIZE + AllocatedSlot::OVERHEAD];

fn slot_start(slot: &mut Slot) -> NonNull<u8> { NonNull::new(slot.as_mut_ptr()).unwrap() }

#[test]
fn slot_stamp_diagnostics() {
    let mut memory: Slot = [0; 24];

    let slot = unsafe { AllocatedSlot::stamp(slot_start(&mut memory), BLOCK_SIZE, Mode::Diagnostics) };

    assert_eq!(slot_start(&mut memory).as_ptr() as usize + LEAD_SIZE, slot.payload().as_ptr() as usize);
    assert!(memory[LEAD_SIZE..LEAD_SIZE + BLOCK_SIZE].iter().all(|&byte| byte == ALLOCATED_PATTERN));
}

#[test]
fn slot_stamp_release_skips_end_sentinel() {
    let mut memory: Slot = [0; 24];

    let _slot = unsafe { AllocatedSlot::stamp(slot_start(&mut memory), BLOCK_SIZE, Mode::Release) };

    //  Neither the payload nor the end sentinel bytes were touched.
    assert!(memory[LEAD_SIZE..].iter().all(|&byte| byte == 0));
}

#[test]
fn slot_recognition() {
    let mut memory: Slot = [0; 24];

    assert!(unsafe { AllocatedSlot::at(slot_start(&mut memory)) }.is_none());

    let _slot = unsafe { AllocatedSlot::stamp(slot_start(&mut memory), BLOCK_SIZE, Mode::Diagnostics) };

    assert!(unsafe { AllocatedSlot::at(slot_start(&mut memory)) }.is_some());
}

#[test]
fn slot_verify_detects_overflow_write() {
    let mut memory: Slot = [0; 24];

    let slot = unsafe { AllocatedSlot::stamp(slot_start(&mut memory), BLOCK_SIZE, Mode::Diagnostics) };

    assert_eq!(Ok(()), unsafe { slot.verify(BLOCK_SIZE) });

    //  One byte written past the payload.
    memory[LEAD_SIZE + BLOCK_SIZE] = 0;

    let slot = unsafe { AllocatedSlot::at(slot_start(&mut memory)) }.unwrap();
    assert_eq!(Err(Error::CorruptedMemory), unsafe { slot.verify(BLOCK_SIZE) });
}

#[test]
fn slot_clear_diagnostics_refills() {
    let mut memory: Slot = [0; 24];

    let slot = unsafe { AllocatedSlot::stamp(slot_start(&mut memory), BLOCK_SIZE, Mode::Diagnostics) };

    unsafe { slot.clear(BLOCK_SIZE, Mode::Diagnostics) };

    assert!(memory.iter().all(|&byte| byte == FREE_PATTERN));
    assert!(unsafe { AllocatedSlot::at(slot_start(&mut memory)) }.is_none());
}

#[test]
fn slot_clear_release_zeroes_lead_only() {
    let mut memory: Slot = [0; 24];

    let slot = unsafe { AllocatedSlot::stamp(slot_start(&mut memory), BLOCK_SIZE, Mode::Release) };

    unsafe { slot.clear(BLOCK_SIZE, Mode::Release) };

    assert!(memory[..LEAD_SIZE].iter().all(|&byte| byte == 0));
    assert!(unsafe { AllocatedSlot::at(slot_start(&mut memory)) }.is_none());
}

#[test]
fn slot_header_of_payload() {
    let payload = 0x1000 as *mut u8;

    assert_eq!(0x1000 - LEAD_SIZE, AllocatedSlot::header_of_payload(payload) as usize);
}

} // mod tests
