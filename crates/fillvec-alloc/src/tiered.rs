//! Size-routed provider: heap for small blocks, mappings for large ones.

use std::alloc::Layout;
use std::ptr::NonNull;

use crate::config::MappedConfig;
use crate::error::AllocError;
use crate::heap::HeapProvider;
use crate::mapped::MappedProvider;
use crate::provider::MemoryProvider;

/// Routes each request by its byte size.
///
/// Blocks smaller than `threshold` come from [`HeapProvider`]; the rest from
/// [`MappedProvider`]. Routing depends only on the size, and the heap tier
/// reports exact usable sizes, so `release` always reaches the tier that
/// served the matching `acquire`. A heap block never grows in place, even
/// when the new size would cross into the mapped tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TieredProvider {
    threshold: usize,
    heap: HeapProvider,
    mapped: MappedProvider,
}

impl TieredProvider {
    /// Create a tiered provider with the given threshold in bytes.
    ///
    /// A threshold of zero routes everything to the mapped tier.
    pub const fn new(threshold: usize) -> Self {
        Self::with_config(threshold, MappedConfig::new())
    }

    /// Create a tiered provider whose mapped tier uses `config`.
    pub const fn with_config(threshold: usize, config: MappedConfig) -> Self {
        Self {
            threshold,
            heap: HeapProvider::new(),
            mapped: MappedProvider::with_config(config),
        }
    }

    /// Smallest block size served by the mapped tier.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    fn is_mapped(&self, size: usize) -> bool {
        size >= self.threshold
    }
}

#[allow(unsafe_code)]
// SAFETY: each call is forwarded to the tier that owns the block, and both
// tiers uphold the provider contract.
unsafe impl MemoryProvider for TieredProvider {
    fn acquire(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if self.is_mapped(layout.size()) {
            self.mapped.acquire(layout)
        } else {
            self.heap.acquire(layout)
        }
    }

    unsafe fn release(&self, block: NonNull<u8>, layout: Layout) {
        // SAFETY: `layout.size()` routes to the tier that acquired `block`.
        unsafe {
            if self.is_mapped(layout.size()) {
                self.mapped.release(block, layout)
            } else {
                self.heap.release(block, layout)
            }
        }
    }

    unsafe fn grow_in_place(&self, block: NonNull<u8>, old: Layout, new_size: usize) -> bool {
        if !self.is_mapped(old.size()) {
            return false;
        }
        // SAFETY: `old` routes to the mapped tier, which owns `block`.
        unsafe { self.mapped.grow_in_place(block, old, new_size) }
    }

    fn usable_size(&self, layout: Layout) -> usize {
        if self.is_mapped(layout.size()) {
            self.mapped.usable_size(layout)
        } else {
            self.heap.usable_size(layout)
        }
    }

    fn name(&self) -> &'static str {
        "tiered"
    }
}
