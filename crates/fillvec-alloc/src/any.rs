//! Runtime-selected provider.

use std::alloc::Layout;
use std::ptr::NonNull;

use crate::error::AllocError;
use crate::heap::HeapProvider;
use crate::mapped::MappedProvider;
use crate::provider::MemoryProvider;
use crate::tiered::TieredProvider;

/// One of the built-in providers, chosen at runtime.
///
/// Built by [`ProviderConfig::build`](crate::ProviderConfig::build). Dispatch
/// is a `match`, so containers stay monomorphic over a single type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnyProvider {
    /// General-purpose heap.
    Heap(HeapProvider),
    /// Anonymous mappings.
    Mapped(MappedProvider),
    /// Size-routed heap/mapped.
    Tiered(TieredProvider),
}

impl Default for AnyProvider {
    fn default() -> Self {
        Self::Heap(HeapProvider::new())
    }
}

impl From<HeapProvider> for AnyProvider {
    fn from(p: HeapProvider) -> Self {
        Self::Heap(p)
    }
}

impl From<MappedProvider> for AnyProvider {
    fn from(p: MappedProvider) -> Self {
        Self::Mapped(p)
    }
}

impl From<TieredProvider> for AnyProvider {
    fn from(p: TieredProvider) -> Self {
        Self::Tiered(p)
    }
}

#[allow(unsafe_code)]
// SAFETY: the variant never changes after construction, so every call on a
// block reaches the provider that acquired it.
unsafe impl MemoryProvider for AnyProvider {
    #[inline]
    fn acquire(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        match self {
            Self::Heap(p) => p.acquire(layout),
            Self::Mapped(p) => p.acquire(layout),
            Self::Tiered(p) => p.acquire(layout),
        }
    }

    #[inline]
    unsafe fn release(&self, block: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded caller contract.
        unsafe {
            match self {
                Self::Heap(p) => p.release(block, layout),
                Self::Mapped(p) => p.release(block, layout),
                Self::Tiered(p) => p.release(block, layout),
            }
        }
    }

    #[inline]
    unsafe fn grow_in_place(&self, block: NonNull<u8>, old: Layout, new_size: usize) -> bool {
        // SAFETY: forwarded caller contract.
        unsafe {
            match self {
                Self::Heap(p) => p.grow_in_place(block, old, new_size),
                Self::Mapped(p) => p.grow_in_place(block, old, new_size),
                Self::Tiered(p) => p.grow_in_place(block, old, new_size),
            }
        }
    }

    #[inline]
    fn usable_size(&self, layout: Layout) -> usize {
        match self {
            Self::Heap(p) => p.usable_size(layout),
            Self::Mapped(p) => p.usable_size(layout),
            Self::Tiered(p) => p.usable_size(layout),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Heap(p) => p.name(),
            Self::Mapped(p) => p.name(),
            Self::Tiered(p) => p.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_impls_select_variant() {
        assert_eq!(AnyProvider::from(HeapProvider).name(), "heap");
        assert_eq!(AnyProvider::from(MappedProvider::new()).name(), "mapped");
        assert_eq!(AnyProvider::from(TieredProvider::new(64)).name(), "tiered");
    }

    #[test]
    fn usable_size_follows_variant() {
        let layout = Layout::array::<u8>(10).unwrap();
        assert_eq!(AnyProvider::default().usable_size(layout), 10);
        assert_eq!(
            AnyProvider::from(MappedProvider::new()).usable_size(layout),
            crate::page_size()
        );
    }
}
