//! Virtual-memory mapped provider for large blocks.
//!
//! Each block is its own private anonymous mapping, rounded up to whole
//! pages. Large arrays therefore never fragment the heap, can be backed by
//! transparent huge pages, and on Linux can grow in place with `mremap`
//! when the address space after the mapping is free.

use std::alloc::Layout;
use std::ptr::NonNull;

use crate::config::{HugePages, MappedConfig};
use crate::error::AllocError;
use crate::provider::MemoryProvider;
use crate::raw;

/// Provider backed by anonymous memory mappings.
///
/// Alignment is the page size; requests for a larger alignment fail with
/// [`AllocError::UnsupportedAlignment`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MappedProvider {
    config: MappedConfig,
}

impl MappedProvider {
    /// Create a mapped provider with default configuration.
    pub const fn new() -> Self {
        Self {
            config: MappedConfig::new(),
        }
    }

    /// Create a mapped provider with the given configuration.
    pub const fn with_config(config: MappedConfig) -> Self {
        Self { config }
    }

    /// The configuration this provider was created with.
    pub fn config(&self) -> &MappedConfig {
        &self.config
    }

    fn mapping_len(layout: Layout) -> Result<usize, AllocError> {
        raw::round_to_pages(layout.size()).ok_or(AllocError::OutOfMemory {
            requested: layout.size(),
        })
    }

    fn advise(&self, block: NonNull<u8>, len: usize) {
        if self.config.huge_pages == HugePages::Advise {
            raw::advise_huge_pages(block, len);
        }
    }
}

#[allow(unsafe_code)]
// SAFETY: every block is a fresh private mapping (page aligned, exclusively
// owned, `round_to_pages(size)` bytes long), which is what `usable_size`
// reports; `mremap` without MAYMOVE never relocates.
unsafe impl MemoryProvider for MappedProvider {
    fn acquire(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Err(AllocError::ZeroSized);
        }
        let page = raw::page_size();
        if layout.align() > page {
            return Err(AllocError::UnsupportedAlignment {
                align: layout.align(),
                max: page,
            });
        }
        let len = Self::mapping_len(layout)?;
        let block = raw::map_anonymous(len, self.config.populate).ok_or(
            AllocError::OutOfMemory {
                requested: layout.size(),
            },
        )?;
        self.advise(block, len);
        Ok(block)
    }

    unsafe fn release(&self, block: NonNull<u8>, layout: Layout) {
        // Any size in [requested, usable] rounds to the same page count.
        let len = raw::round_to_pages(layout.size()).unwrap_or(layout.size());
        // SAFETY: caller guarantees `block` is a live mapping of `len` bytes.
        unsafe { raw::unmap(block, len) }
    }

    unsafe fn grow_in_place(&self, block: NonNull<u8>, old: Layout, new_size: usize) -> bool {
        let (Some(old_len), Some(new_len)) = (
            raw::round_to_pages(old.size()),
            raw::round_to_pages(new_size),
        ) else {
            return false;
        };
        if new_len <= old_len {
            return true;
        }
        // SAFETY: caller guarantees `block` is a live mapping of `old_len` bytes.
        let grown = unsafe { raw::remap_in_place(block, old_len, new_len) };
        if grown {
            self.advise(block, new_len);
        }
        grown
    }

    fn usable_size(&self, layout: Layout) -> usize {
        raw::round_to_pages(layout.size()).unwrap_or(layout.size())
    }

    fn name(&self) -> &'static str {
        "mapped"
    }
}
