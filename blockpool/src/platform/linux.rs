//! Implementation of Linux specific calls.

use core::ptr::{self, NonNull};

use super::Platform;

/// Implementation of the Platform trait, for Linux.
#[derive(Default)]
pub(crate) struct OsPlatform;

impl OsPlatform {
    /// Creates an instance.
    pub(crate) const fn new() -> Self { Self }
}

impl Platform for OsPlatform {
    fn page_size(&self) -> usize {
        //  Safety:
        //  -   `sysconf` has no memory-safety precondition.
        let size = unsafe { libc::sysconf(libc::_SC_PAGE_SIZE) };
        assert!(size > 0, "Expected page size, got {}", size);

        size as usize
    }

    fn allocate(&self, size: usize) -> Option<NonNull<u8>> { mmap_allocate(size) }

    unsafe fn deallocate(&self, pointer: NonNull<u8>, size: usize) {
        munmap_deallocate(pointer.as_ptr(), size);
    }
}

//  Wrapper around `mmap`.
//
//  Returns a pointer to `size` bytes of memory; does not guarantee any alignment beyond the page size.
fn mmap_allocate(size: usize) -> Option<NonNull<u8>> {
    let length = size;
    let prot = libc::PROT_READ | libc::PROT_WRITE;
    let flags = libc::MAP_PRIVATE | libc::MAP_ANONYMOUS;

    //  No specific address hint.
    let addr = ptr::null_mut();
    //  When used in conjunction with MAP_ANONYMOUS, fd is mandated to be -1 on some implementations.
    let fd = -1;
    //  When used in conjunction with MAP_ANONYMOUS, offset is mandated to be 0 on some implementations.
    let offset = 0;

    //  Safety:
    //  -   `addr`, `fd`, and `offset` are suitable for MAP_ANONYMOUS.
    let result = unsafe { libc::mmap(addr, length, prot, flags, fd, offset) };

    let result = if result != libc::MAP_FAILED { result as *mut u8 } else { ptr::null_mut() };
    NonNull::new(result)
}

//  Wrapper around `munmap`.
//
//  #   Panics
//
//  If `munmap` returns a non-0 result.
//
//  #   Safety
//
//  -   Assumes that `addr` points to a `mmap`ed area of at least `size` bytes.
//  -   Assumes that the range `[addr, addr + size)` is no longer in use.
unsafe fn munmap_deallocate(addr: *mut u8, size: usize) {
    let result = libc::munmap(addr as *mut libc::c_void, size);
    assert!(result == 0, "Could not munmap {:x}, {}: {}", addr as usize, size, result);
}
