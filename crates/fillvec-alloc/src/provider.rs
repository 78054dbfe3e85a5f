//! The [`MemoryProvider`] strategy trait.

use std::alloc::Layout;
use std::ptr::NonNull;

use crate::error::AllocError;

/// A stateless strategy for acquiring and releasing raw storage blocks.
///
/// Containers hold one provider for their whole lifetime and call it only on
/// growth and drop. Providers take `&self` everywhere and keep no mutable
/// cross-call state, so one instance can serve any number of containers
/// (a shared reference `&P` is itself a provider).
///
/// # Safety
///
/// Implementors must guarantee that a block returned by
/// [`acquire`](Self::acquire):
///
/// - is aligned to at least `layout.align()`,
/// - is valid for reads and writes of [`usable_size(layout)`](Self::usable_size)
///   bytes, which is never less than `layout.size()`,
/// - is not aliased by any other live block until it is released.
///
/// The same guarantees must hold for the grown block after
/// [`grow_in_place`](Self::grow_in_place) returns `true`.
#[allow(unsafe_code)]
pub unsafe trait MemoryProvider {
    /// Acquire a block for `layout`.
    ///
    /// # Errors
    ///
    /// - [`AllocError::ZeroSized`] if `layout.size() == 0`.
    /// - [`AllocError::UnsupportedAlignment`] if the alignment cannot be met.
    /// - [`AllocError::OutOfMemory`] if the request cannot be satisfied.
    fn acquire(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Release a block.
    ///
    /// # Safety
    ///
    /// `block` must have been returned by `acquire` on this provider (or an
    /// equivalent copy of it) and not released since. `layout.align()` must
    /// match the acquire call and `layout.size()` must lie between the size
    /// originally requested (or last grown to) and the matching
    /// [`usable_size`](Self::usable_size).
    unsafe fn release(&self, block: NonNull<u8>, layout: Layout);

    /// Try to extend `block` to `new_size` bytes without moving it.
    ///
    /// Returns `false` when the extension cannot be satisfied at the current
    /// address; the block is then untouched and the caller falls back to
    /// acquire, move, release. The default never grows in place.
    ///
    /// # Safety
    ///
    /// Same preconditions on `block` and `old` as [`release`](Self::release),
    /// and `new_size > old.size()`. On `true`, the block must afterwards be
    /// released with a layout sized for `new_size`.
    unsafe fn grow_in_place(&self, block: NonNull<u8>, old: Layout, new_size: usize) -> bool {
        let _ = (block, old, new_size);
        false
    }

    /// Bytes actually usable in a block acquired for `layout`.
    ///
    /// Page-granular providers round up; the default is exact.
    fn usable_size(&self, layout: Layout) -> usize {
        layout.size()
    }

    /// Short strategy name for diagnostics.
    fn name(&self) -> &'static str;
}

#[allow(unsafe_code)]
// SAFETY: every method forwards to `P`, which upholds the contract.
unsafe impl<P: MemoryProvider + ?Sized> MemoryProvider for &P {
    #[inline]
    fn acquire(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).acquire(layout)
    }

    #[inline]
    unsafe fn release(&self, block: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded caller contract.
        unsafe { (**self).release(block, layout) }
    }

    #[inline]
    unsafe fn grow_in_place(&self, block: NonNull<u8>, old: Layout, new_size: usize) -> bool {
        // SAFETY: forwarded caller contract.
        unsafe { (**self).grow_in_place(block, old, new_size) }
    }

    #[inline]
    fn usable_size(&self, layout: Layout) -> usize {
        (**self).usable_size(layout)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
