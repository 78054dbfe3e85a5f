//! General-purpose heap provider.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::error::AllocError;
use crate::provider::MemoryProvider;

/// Provider backed by the global allocator (`std::alloc`).
///
/// Blocks are exactly the requested size. Growth always relocates: the
/// global allocator has no in-place extension primitive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapProvider;

impl HeapProvider {
    /// Create a heap provider.
    pub const fn new() -> Self {
        Self
    }
}

#[allow(unsafe_code)]
// SAFETY: blocks come straight from the global allocator with the caller's
// layout, so alignment, size, and exclusivity are the allocator's guarantees.
unsafe impl MemoryProvider for HeapProvider {
    #[inline]
    fn acquire(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Err(AllocError::ZeroSized);
        }
        // SAFETY: layout has non-zero size.
        let ptr = unsafe { alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError::OutOfMemory {
            requested: layout.size(),
        })
    }

    #[inline]
    unsafe fn release(&self, block: NonNull<u8>, layout: Layout) {
        // SAFETY: caller guarantees `block` came from `acquire(layout)`;
        // usable_size is exact, so the size matches the allocation.
        unsafe { alloc::dealloc(block.as_ptr(), layout) }
    }

    fn name(&self) -> &'static str {
        "heap"
    }
}
