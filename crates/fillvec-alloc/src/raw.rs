//! Low-level OS primitives for mapped storage.
//!
//! Every `unsafe` block in this module carries a `// SAFETY:` comment. On
//! unix the calls go straight to `libc`; elsewhere mapped storage degrades to
//! page-aligned heap blocks with no in-place growth.

#![allow(unsafe_code)]

use std::ptr::NonNull;
use std::sync::OnceLock;

const FALLBACK_PAGE_SIZE: usize = 4096;

static PAGE_SIZE: OnceLock<usize> = OnceLock::new();

/// System page size in bytes.
pub(crate) fn page_size() -> usize {
    *PAGE_SIZE.get_or_init(query_page_size)
}

/// Round `bytes` up to a whole number of pages. `None` on overflow.
pub(crate) fn round_to_pages(bytes: usize) -> Option<usize> {
    let page = page_size();
    bytes.checked_add(page - 1).map(|b| b & !(page - 1))
}

#[cfg(unix)]
fn query_page_size() -> usize {
    // SAFETY: sysconf has no preconditions; it returns -1 on error.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 && (size as usize).is_power_of_two() {
        size as usize
    } else {
        FALLBACK_PAGE_SIZE
    }
}

#[cfg(not(unix))]
fn query_page_size() -> usize {
    FALLBACK_PAGE_SIZE
}

/// Map `len` bytes of private anonymous read/write memory.
///
/// `len` must be a non-zero multiple of the page size.
#[cfg(unix)]
pub(crate) fn map_anonymous(len: usize, populate: bool) -> Option<NonNull<u8>> {
    debug_assert!(len > 0 && len % page_size() == 0);
    #[cfg(target_os = "linux")]
    let flags = if populate {
        libc::MAP_PRIVATE | libc::MAP_ANONYMOUS | libc::MAP_POPULATE
    } else {
        libc::MAP_PRIVATE | libc::MAP_ANONYMOUS
    };
    #[cfg(not(target_os = "linux"))]
    let flags = {
        let _ = populate;
        libc::MAP_PRIVATE | libc::MAP_ANON
    };
    // SAFETY: a fresh anonymous mapping with a null hint aliases nothing.
    let addr = unsafe {
        libc::mmap(
            std::ptr::null_mut(),
            len,
            libc::PROT_READ | libc::PROT_WRITE,
            flags,
            -1,
            0,
        )
    };
    if addr == libc::MAP_FAILED {
        return None;
    }
    NonNull::new(addr.cast::<u8>())
}

/// Unmap a region previously returned by [`map_anonymous`].
///
/// # Safety
///
/// `ptr`/`len` must describe exactly one live mapping from this module.
#[cfg(unix)]
pub(crate) unsafe fn unmap(ptr: NonNull<u8>, len: usize) {
    // SAFETY: caller guarantees the region is a live mapping of `len` bytes.
    let rc = unsafe { libc::munmap(ptr.as_ptr().cast(), len) };
    debug_assert_eq!(rc, 0, "munmap failed");
}

/// Try to extend a mapping from `old_len` to `new_len` bytes without moving it.
///
/// # Safety
///
/// `ptr`/`old_len` must describe a live mapping from this module.
#[cfg(target_os = "linux")]
pub(crate) unsafe fn remap_in_place(ptr: NonNull<u8>, old_len: usize, new_len: usize) -> bool {
    // SAFETY: caller guarantees the mapping; flags 0 forbids relocation, so
    // on success the address is unchanged and on failure nothing changes.
    let addr = unsafe { libc::mremap(ptr.as_ptr().cast(), old_len, new_len, 0) };
    addr != libc::MAP_FAILED && addr.cast::<u8>() == ptr.as_ptr()
}

#[cfg(all(unix, not(target_os = "linux")))]
pub(crate) unsafe fn remap_in_place(_ptr: NonNull<u8>, _old_len: usize, _new_len: usize) -> bool {
    false
}

/// Ask the kernel to back the region with transparent huge pages.
///
/// Advisory only; failure (THP disabled, unsupported kernel) is ignored.
#[cfg(target_os = "linux")]
pub(crate) fn advise_huge_pages(ptr: NonNull<u8>, len: usize) {
    // SAFETY: madvise on a range we own only changes paging policy.
    let _ = unsafe { libc::madvise(ptr.as_ptr().cast(), len, libc::MADV_HUGEPAGE) };
}

#[cfg(not(target_os = "linux"))]
pub(crate) fn advise_huge_pages(_ptr: NonNull<u8>, _len: usize) {}

#[cfg(not(unix))]
pub(crate) fn map_anonymous(len: usize, _populate: bool) -> Option<NonNull<u8>> {
    let layout = std::alloc::Layout::from_size_align(len, page_size()).ok()?;
    // SAFETY: `len` is non-zero per the caller contract.
    NonNull::new(unsafe { std::alloc::alloc_zeroed(layout) })
}

#[cfg(not(unix))]
pub(crate) unsafe fn unmap(ptr: NonNull<u8>, len: usize) {
    // SAFETY: the block came from `map_anonymous` with this exact layout.
    unsafe {
        std::alloc::dealloc(
            ptr.as_ptr(),
            std::alloc::Layout::from_size_align_unchecked(len, page_size()),
        )
    };
}

#[cfg(not(unix))]
pub(crate) unsafe fn remap_in_place(_ptr: NonNull<u8>, _old_len: usize, _new_len: usize) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_power_of_two() {
        assert!(page_size().is_power_of_two());
        assert!(page_size() >= 4096 || cfg!(not(unix)));
    }

    #[test]
    fn round_to_pages_rounds_up() {
        let page = page_size();
        assert_eq!(round_to_pages(0), Some(0));
        assert_eq!(round_to_pages(1), Some(page));
        assert_eq!(round_to_pages(page), Some(page));
        assert_eq!(round_to_pages(page + 1), Some(2 * page));
    }

    #[test]
    fn round_to_pages_overflow_is_none() {
        assert_eq!(round_to_pages(usize::MAX), None);
    }

    #[test]
    fn map_write_unmap() {
        let len = page_size();
        let ptr = map_anonymous(len, false).unwrap();
        // SAFETY: fresh mapping of `len` writable bytes.
        unsafe {
            ptr.as_ptr().write_bytes(0xAB, len);
            assert_eq!(*ptr.as_ptr().add(len - 1), 0xAB);
            unmap(ptr, len);
        }
    }
}
