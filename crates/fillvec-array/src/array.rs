//! The [`DynArray`] container.
//!
//! One block from the provider, a live prefix `[0, len)`, and uninitialised
//! slots `[len, capacity)` that are only ever written, never read as `T`.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use fillvec_alloc::{AllocError, HeapProvider, MemoryProvider};

use crate::fill::FillCursor;
use crate::growth;
use crate::metrics::GrowthMetrics;

/// A growable contiguous array that allocates through a [`MemoryProvider`].
///
/// Behaves like a `Vec<T>` for appends, reservation, and resizing, with two
/// differences that matter for bulk-fill throughput:
///
/// - Storage comes from `P`, fixed at construction (heap, mapped, ...).
/// - [`resize_and_overwrite`](Self::resize_and_overwrite) and
///   [`resize_and_fill`](Self::resize_and_fill) let the caller construct new
///   elements directly in uninitialised storage, each slot exactly once.
///
/// Every fallible operation either succeeds or leaves the array unchanged.
///
/// # Example
///
/// ```
/// use fillvec_alloc::MappedProvider;
/// use fillvec_array::DynArray;
///
/// let mut squares = DynArray::new(MappedProvider::new());
/// squares.resize_and_fill(8, |cursor| cursor.fill_with(|i| (i * i) as u32))?;
/// assert_eq!(squares[3], 9);
/// squares.push_back(64)?;
/// assert_eq!(squares.len(), 9);
/// # Ok::<(), fillvec_alloc::AllocError>(())
/// ```
pub struct DynArray<T, P: MemoryProvider = HeapProvider> {
    /// Block start; dangling while `cap == 0`.
    ptr: NonNull<T>,
    /// Live elements.
    len: usize,
    /// Slots backed by the block. Always 0 for zero-sized `T`.
    cap: usize,
    provider: P,
    metrics: GrowthMetrics,
    _owns: PhantomData<T>,
}

// SAFETY: the array owns its elements and its block exclusively.
unsafe impl<T: Send, P: MemoryProvider + Send> Send for DynArray<T, P> {}
// SAFETY: `&DynArray` only hands out `&T` and `&P`.
unsafe impl<T: Sync, P: MemoryProvider + Sync> Sync for DynArray<T, P> {}

impl<T> DynArray<T, HeapProvider> {
    /// Empty array on the global heap.
    pub const fn new_heap() -> Self {
        Self::new(HeapProvider::new())
    }
}

impl<T> Default for DynArray<T, HeapProvider> {
    fn default() -> Self {
        Self::new_heap()
    }
}

impl<T, P: MemoryProvider> DynArray<T, P> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Empty array (capacity 0, no block) allocating through `provider`.
    pub const fn new(provider: P) -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            cap: 0,
            provider,
            metrics: GrowthMetrics::new(),
            _owns: PhantomData,
        }
    }

    /// Empty array with room for at least `capacity` elements.
    ///
    /// # Errors
    ///
    /// Whatever the provider reports for the single allocation.
    pub fn with_capacity(capacity: usize, provider: P) -> Result<Self, AllocError> {
        let mut array = Self::new(provider);
        array.reserve(capacity)?;
        Ok(array)
    }

    // ── queries ─────────────────────────────────────────────────────

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no live elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots backed by storage. `usize::MAX` for zero-sized `T`.
    #[inline]
    pub fn capacity(&self) -> usize {
        if Self::IS_ZST {
            usize::MAX
        } else {
            self.cap
        }
    }

    /// Pointer to the first slot, or null while no block is held.
    ///
    /// Valid until the next operation that changes capacity.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        if self.cap == 0 && !Self::IS_ZST {
            ptr::null()
        } else {
            self.ptr.as_ptr()
        }
    }

    /// Mutable pointer to the first slot, or null while no block is held.
    ///
    /// Writing past `len` does not make elements live; use
    /// [`resize_and_overwrite`](Self::resize_and_overwrite) for that.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        if self.cap == 0 && !Self::IS_ZST {
            ptr::null_mut()
        } else {
            self.ptr.as_ptr()
        }
    }

    /// The live elements.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` are live; `ptr` is aligned and non-null even
        // when dangling.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// The live elements, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, and `&mut self` makes the borrow unique.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// The provider this array allocates through.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Growth counters since construction.
    pub fn metrics(&self) -> &GrowthMetrics {
        &self.metrics
    }

    // ── appends and capacity ────────────────────────────────────────

    /// Append `value`, growing capacity by 1.5x when full.
    ///
    /// # Errors
    ///
    /// If growth fails the array is unchanged and `value` is dropped.
    #[inline]
    pub fn push_back(&mut self, value: T) -> Result<(), AllocError> {
        if self.len == self.capacity() {
            self.grow_amortized(1)?;
        }
        // SAFETY: len < capacity, so the slot is inside the block and dead.
        unsafe { self.ptr.as_ptr().add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Ensure `capacity() >= n` with at most one allocation.
    ///
    /// `n` is an absolute element count. Never shrinks; a no-op when the
    /// capacity already suffices. Does not change `len`.
    ///
    /// # Errors
    ///
    /// On failure the array is unchanged.
    pub fn reserve(&mut self, n: usize) -> Result<(), AllocError> {
        if n <= self.capacity() {
            return Ok(());
        }
        self.reallocate(n)
    }

    /// Tell the optimiser that an append will not need to grow.
    ///
    /// Meant for hot loops right after [`reserve`](Self::reserve):
    ///
    /// ```
    /// # use fillvec_array::DynArray;
    /// let mut v = DynArray::<u64>::default();
    /// v.reserve(1024)?;
    /// for i in 0..1024 {
    ///     // SAFETY: 1024 slots were reserved and only i < 1024 are live.
    ///     unsafe { v.assume_spare_capacity() };
    ///     v.push_back(i)?;
    /// }
    /// # Ok::<(), fillvec_alloc::AllocError>(())
    /// ```
    ///
    /// # Safety
    ///
    /// `len() < capacity()` must hold. Calling this when it does not is
    /// undefined behaviour.
    #[inline(always)]
    pub unsafe fn assume_spare_capacity(&self) {
        // SAFETY: upheld by the caller.
        unsafe { std::hint::assert_unchecked(self.len < self.capacity()) }
    }

    /// Clone every element of `items` onto the end.
    ///
    /// Grows at most once, geometrically. If a clone panics, the elements
    /// cloned so far stay live.
    ///
    /// # Errors
    ///
    /// On allocation failure the array is unchanged.
    pub fn try_extend_from_slice(&mut self, items: &[T]) -> Result<(), AllocError>
    where
        T: Clone,
    {
        if items.len() > self.capacity() - self.len {
            self.grow_amortized(items.len())?;
        }
        for item in items {
            let value = item.clone();
            // SAFETY: capacity covers len + items.len().
            unsafe { self.ptr.as_ptr().add(self.len).write(value) };
            self.len += 1;
        }
        Ok(())
    }

    // ── resizing ────────────────────────────────────────────────────

    /// Set the length to `n`, default-constructing new elements or dropping
    /// trailing ones.
    ///
    /// Growth reserves exactly `n`. New elements are fully constructed and
    /// safe to read immediately.
    ///
    /// # Errors
    ///
    /// On allocation failure the array is unchanged.
    pub fn resize(&mut self, n: usize) -> Result<(), AllocError>
    where
        T: Default,
    {
        self.resize_with(n, T::default)
    }

    /// Set the length to `n`, constructing new elements with `f`.
    ///
    /// # Errors
    ///
    /// On allocation failure the array is unchanged.
    pub fn resize_with<F>(&mut self, n: usize, mut f: F) -> Result<(), AllocError>
    where
        F: FnMut() -> T,
    {
        if n <= self.len {
            self.truncate(n);
            return Ok(());
        }
        self.reserve(n)?;
        while self.len < n {
            let value = f();
            // SAFETY: len < n <= capacity.
            unsafe { self.ptr.as_ptr().add(self.len).write(value) };
            self.len += 1;
        }
        Ok(())
    }

    /// Direct-fill resize: hand the caller `n` raw slots and adopt the
    /// number it reports as constructed.
    ///
    /// Ensures `capacity() >= n` (live elements survive any relocation),
    /// drops the elements at `[n, len)`, then calls `filler` with the slots
    /// `[0, n)`. The filler returns `k`, the length of the now-live prefix,
    /// and the array sets `len = k`.
    ///
    /// The first `min(len, n)` slots still hold the previous elements when
    /// the filler runs. The filler owns them from that point: it may read
    /// them, overwrite them (their destructors do not run), or keep them
    /// by including them in `k`. Any value left in `[k, n)` is forgotten
    /// without being dropped. While the filler runs the array's length is
    /// zero, so a panicking filler leaks elements rather than dropping
    /// them twice.
    ///
    /// For types without drop glue this is a plain memory fill with no
    /// construction overhead.
    ///
    /// # Safety
    ///
    /// When `filler` returns `k`, every slot in `[0, k)` must hold an
    /// initialised `T`.
    ///
    /// # Panics
    ///
    /// If `filler` returns `k > n` (it claimed slots outside the region it
    /// was given).
    ///
    /// # Errors
    ///
    /// On allocation failure the array is unchanged and `filler` is not
    /// called.
    pub unsafe fn resize_and_overwrite<F>(&mut self, n: usize, filler: F) -> Result<(), AllocError>
    where
        F: FnOnce(&mut [MaybeUninit<T>]) -> usize,
    {
        self.reserve(n)?;
        self.truncate(n);
        self.len = 0;
        // SAFETY: capacity >= n; `MaybeUninit<T>` has the layout of `T` and
        // any bit pattern, live or not, is a valid `MaybeUninit<T>`.
        let slots =
            unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr().cast::<MaybeUninit<T>>(), n) };
        let k = filler(slots);
        assert!(
            k <= n,
            "invalid filler result: {k} elements claimed live, only {n} slots provided"
        );
        self.len = k;
        Ok(())
    }

    /// Safe direct-fill: clear the array, then construct up to `n` elements
    /// in place through a [`FillCursor`].
    ///
    /// The length always equals the number of elements written, including
    /// when `filler` panics.
    ///
    /// # Errors
    ///
    /// On allocation failure the array is unchanged and `filler` is not
    /// called.
    pub fn resize_and_fill<F>(&mut self, n: usize, filler: F) -> Result<(), AllocError>
    where
        F: FnOnce(&mut FillCursor<'_, T>),
    {
        self.reserve(n)?;
        self.clear();
        let mut cursor = FillCursor::new(self.ptr, n, &mut self.len);
        filler(&mut cursor);
        Ok(())
    }

    // ── removal ─────────────────────────────────────────────────────

    /// Remove and return the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot was live and is now outside `[0, len)`.
        Some(unsafe { self.ptr.as_ptr().add(self.len).read() })
    }

    /// Drop every element at index `n` and above. Capacity is kept.
    pub fn truncate(&mut self, n: usize) {
        if n >= self.len {
            return;
        }
        // SAFETY: `[n, len)` are live; shrinking len first means a panicking
        // destructor leaks the rest instead of dropping anything twice.
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.ptr.as_ptr().add(n), self.len - n);
            self.len = n;
            ptr::drop_in_place(tail);
        }
    }

    /// Drop every element. Capacity is kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Deep copy through a clone of the provider.
    ///
    /// # Errors
    ///
    /// Whatever the provider reports for the copy's single allocation.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        T: Clone,
        P: Clone,
    {
        let mut copy = Self::with_capacity(self.len, self.provider.clone())?;
        copy.try_extend_from_slice(self.as_slice())?;
        Ok(copy)
    }

    // ── growth internals ────────────────────────────────────────────

    /// Grow so that `additional` more elements fit, by at least the ratio.
    #[cold]
    #[inline(never)]
    fn grow_amortized(&mut self, additional: usize) -> Result<(), AllocError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(AllocError::CapacityOverflow {
                elements: usize::MAX,
                element_size: mem::size_of::<T>(),
            })?;
        if Self::IS_ZST {
            // Zero-sized capacity is unbounded; only the count can overflow.
            return Ok(());
        }
        self.reallocate(growth::next_capacity(self.cap, required))
    }

    /// Move to storage for at least `new_cap` elements.
    ///
    /// Tries in-place growth first, then acquire, move, release. The new
    /// block is acquired before the old one is touched, so failure leaves
    /// everything as it was.
    fn reallocate(&mut self, new_cap: usize) -> Result<(), AllocError> {
        debug_assert!(!Self::IS_ZST && new_cap > self.cap);
        let new_layout = growth::array_layout::<T>(new_cap)?;

        if self.cap > 0 {
            let old_layout = self.block_layout();
            // SAFETY: the block is live and sized for `old_layout`.
            let grown = unsafe {
                self.provider
                    .grow_in_place(self.ptr.cast(), old_layout, new_layout.size())
            };
            if grown {
                self.cap = growth::usable_capacity::<T>(
                    self.provider.usable_size(new_layout),
                    new_cap,
                );
                self.metrics
                    .record_in_place(new_layout.size() - old_layout.size(), self.cap);
                return Ok(());
            }
        }

        let block = self.provider.acquire(new_layout)?.cast::<T>();
        if self.cap > 0 {
            let old_layout = self.block_layout();
            // SAFETY: the blocks are distinct; the new one holds
            // new_cap > cap >= len elements. After the bitwise move the old
            // slots are dead, so releasing the old block drops nothing.
            unsafe {
                ptr::copy_nonoverlapping(self.ptr.as_ptr(), block.as_ptr(), self.len);
                self.provider.release(self.ptr.cast(), old_layout);
            }
            self.metrics.record_relocation(self.len);
        }
        self.ptr = block;
        self.cap = growth::usable_capacity::<T>(self.provider.usable_size(new_layout), new_cap);
        self.metrics.record_acquire(new_layout.size(), self.cap);
        Ok(())
    }

    /// Layout describing the current block. Only meaningful while `cap > 0`.
    fn block_layout(&self) -> Layout {
        // SAFETY: `cap` always comes from a layout that `Layout::array`
        // accepted (see `usable_capacity`), so the size cannot overflow.
        unsafe {
            Layout::from_size_align_unchecked(self.cap * mem::size_of::<T>(), mem::align_of::<T>())
        }
    }
}

/// Releases a block when dropped, including while unwinding out of an
/// element destructor.
struct ReleaseOnDrop<'a, P: MemoryProvider> {
    provider: &'a P,
    block: NonNull<u8>,
    layout: Layout,
}

impl<P: MemoryProvider> Drop for ReleaseOnDrop<'_, P> {
    fn drop(&mut self) {
        // SAFETY: built only in `DynArray::drop` from the array's live block
        // and its current layout, and dropped exactly once.
        unsafe { self.provider.release(self.block, self.layout) }
    }
}

impl<T, P: MemoryProvider> Drop for DynArray<T, P> {
    fn drop(&mut self) {
        let layout = self.block_layout();
        let _release = (self.cap > 0).then_some(ReleaseOnDrop {
            provider: &self.provider,
            block: self.ptr.cast(),
            layout,
        });
        // SAFETY: `[0, len)` are live and dropped exactly once here. The
        // block outlives them and is released by `_release` afterwards, with
        // a size inside [requested, usable].
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len)) }
    }
}

impl<T, P: MemoryProvider> Deref for DynArray<T, P> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, P: MemoryProvider> DerefMut for DynArray<T, P> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<'a, T, P: MemoryProvider> IntoIterator for &'a DynArray<T, P> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, P: MemoryProvider> IntoIterator for &'a mut DynArray<T, P> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T: fmt::Debug, P: MemoryProvider> fmt::Debug for DynArray<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T, U, P, Q> PartialEq<DynArray<U, Q>> for DynArray<T, P>
where
    T: PartialEq<U>,
    P: MemoryProvider,
    Q: MemoryProvider,
{
    fn eq(&self, other: &DynArray<U, Q>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, P: MemoryProvider> Eq for DynArray<T, P> {}

impl<T: PartialEq<U>, U, P: MemoryProvider> PartialEq<[U]> for DynArray<T, P> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U, P: MemoryProvider> PartialEq<&[U]> for DynArray<T, P> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, P: MemoryProvider, const N: usize> PartialEq<[U; N]> for DynArray<T, P> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fillvec_alloc::{MappedProvider, TieredProvider};

    #[test]
    fn new_is_empty_and_unallocated() {
        let v = DynArray::<u32>::default();
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 0);
        assert!(v.as_ptr().is_null());
        assert!(v.is_empty());
        assert_eq!(v.metrics().acquisitions, 0);
    }

    #[test]
    fn push_back_reads_back_in_order() {
        let mut v = DynArray::new_heap();
        for i in 0..100u32 {
            v.push_back(i).unwrap();
        }
        assert_eq!(v.len(), 100);
        assert!(v.iter().copied().eq(0..100));
        assert!(!v.as_ptr().is_null());
    }

    #[test]
    fn push_back_follows_growth_sequence() {
        let mut v = DynArray::<u8>::default();
        let mut caps = Vec::new();
        for i in 0..30 {
            v.push_back(i).unwrap();
            if caps.last() != Some(&v.capacity()) {
                caps.push(v.capacity());
            }
        }
        assert_eq!(caps, vec![1, 2, 3, 5, 8, 12, 18, 27, 41]);
        assert_eq!(v.metrics().relocations, 8);
    }

    #[test]
    fn reserve_is_exact_and_never_shrinks() {
        let mut v = DynArray::<u64>::default();
        v.reserve(10).unwrap();
        assert_eq!(v.capacity(), 10);
        v.reserve(5).unwrap();
        assert_eq!(v.capacity(), 10);
        assert_eq!(v.len(), 0);
        assert_eq!(v.metrics().acquisitions, 1);
    }

    #[test]
    fn reserve_preserves_contents() {
        let mut v = DynArray::<String>::default();
        v.push_back("a".into()).unwrap();
        v.push_back("b".into()).unwrap();
        v.reserve(1000).unwrap();
        assert_eq!(v, ["a", "b"]);
    }

    #[test]
    fn resize_shrink_then_grow_gives_defaults() {
        let mut v = DynArray::<i32>::default();
        v.resize(10).unwrap();
        for (i, x) in v.iter_mut().enumerate() {
            *x = i as i32 + 1;
        }
        v.resize(4).unwrap();
        assert_eq!(v, [1, 2, 3, 4]);
        v.resize(7).unwrap();
        assert_eq!(v, [1, 2, 3, 4, 0, 0, 0]);
        assert_eq!(v.capacity(), 10);
    }

    #[test]
    fn resize_with_uses_closure() {
        let mut v = DynArray::<u32>::default();
        let mut next = 10;
        v.resize_with(3, || {
            next += 1;
            next
        })
        .unwrap();
        assert_eq!(v, [11, 12, 13]);
    }

    #[test]
    fn resize_and_overwrite_writes_indices() {
        let mut v = DynArray::<usize>::default();
        // SAFETY: every slot in [0, n) is written before returning n.
        unsafe {
            v.resize_and_overwrite(1000, |slots| {
                for (i, slot) in slots.iter_mut().enumerate() {
                    slot.write(i);
                }
                slots.len()
            })
            .unwrap();
        }
        assert_eq!(v.len(), 1000);
        assert!(v.iter().copied().eq(0..1000));
        assert_eq!(v.metrics().acquisitions, 1);
    }

    #[test]
    fn resize_and_overwrite_partial_count() {
        let mut v = DynArray::<u16>::default();
        // SAFETY: only the first 3 slots are claimed and they are written.
        unsafe {
            v.resize_and_overwrite(10, |slots| {
                for (i, slot) in slots[..3].iter_mut().enumerate() {
                    slot.write(i as u16 * 2);
                }
                3
            })
            .unwrap();
        }
        assert_eq!(v, [0, 2, 4]);
        assert!(v.capacity() >= 10);
    }

    #[test]
    fn resize_and_overwrite_sees_previous_prefix() {
        let mut v = DynArray::<u32>::default();
        v.try_extend_from_slice(&[7, 8, 9]).unwrap();
        // SAFETY: slots [0, 3) hold the previous u32s; [3, 5) are written.
        unsafe {
            v.resize_and_overwrite(5, |slots| {
                slots[3].write(10);
                slots[4].write(11);
                5
            })
            .unwrap();
        }
        assert_eq!(v, [7, 8, 9, 10, 11]);
    }

    #[test]
    #[should_panic(expected = "invalid filler result")]
    fn resize_and_overwrite_rejects_overclaim() {
        let mut v = DynArray::<u8>::default();
        // SAFETY: the filler overclaims, which must panic before any read.
        unsafe {
            let _ = v.resize_and_overwrite(4, |_| 5);
        }
    }

    #[test]
    fn resize_and_fill_cursor() {
        let mut v = DynArray::<u64>::default();
        v.push_back(99).unwrap();
        v.resize_and_fill(5, |cursor| {
            assert_eq!(cursor.remaining(), 5);
            cursor.write(1).unwrap();
            assert_eq!(cursor.extend([2, 3]), 2);
            cursor.fill_with(|i| i as u64 * 10);
            assert!(cursor.is_full());
            assert_eq!(cursor.write(7), Err(7));
        })
        .unwrap();
        assert_eq!(v, [1, 2, 3, 30, 40]);
    }

    #[test]
    fn resize_and_fill_may_stop_early() {
        let mut v = DynArray::<u8>::default();
        v.resize_and_fill(100, |cursor| {
            cursor.extend(0..10);
        })
        .unwrap();
        assert_eq!(v.len(), 10);
        assert!(v.capacity() >= 100);
    }

    #[test]
    fn pop_truncate_clear() {
        let mut v = DynArray::<String>::default();
        for s in ["x", "y", "z"] {
            v.push_back(s.to_string()).unwrap();
        }
        assert_eq!(v.pop_back().as_deref(), Some("z"));
        v.truncate(5);
        assert_eq!(v.len(), 2);
        v.clear();
        assert!(v.is_empty());
        assert_eq!(v.pop_back(), None);
        assert!(v.capacity() >= 3);
    }

    #[test]
    fn try_clone_is_deep() {
        let mut v = DynArray::<String>::default();
        v.push_back("left".into()).unwrap();
        let mut c = v.try_clone().unwrap();
        c[0].push('!');
        assert_eq!(v[0], "left");
        assert_eq!(c[0], "left!");
        assert_eq!(c.capacity(), 1);
    }

    #[test]
    fn zero_sized_elements_never_allocate() {
        let mut v = DynArray::<()>::default();
        for _ in 0..1000 {
            v.push_back(()).unwrap();
        }
        v.resize(5000).unwrap();
        assert_eq!(v.len(), 5000);
        assert_eq!(v.capacity(), usize::MAX);
        assert_eq!(v.metrics().acquisitions, 0);
        assert!(!v.as_ptr().is_null());
    }

    #[test]
    fn mapped_capacity_uses_whole_pages() {
        let page = fillvec_alloc::page_size();
        let mut v = DynArray::<u8, _>::new(MappedProvider::new());
        v.push_back(1).unwrap();
        assert_eq!(v.capacity(), page);
        for i in 0..page {
            v.push_back(i as u8).unwrap();
        }
        assert_eq!(v.len(), page + 1);
        assert_eq!(v.metrics().growth_steps(), 2);
    }

    #[test]
    fn tiered_crosses_threshold() {
        let mut v = DynArray::<u32, _>::new(TieredProvider::new(4096));
        for i in 0..10_000 {
            v.push_back(i).unwrap();
        }
        assert!(v.iter().copied().eq(0..10_000));
    }

    #[test]
    fn equality_across_providers() {
        let mut a = DynArray::<i64>::default();
        let mut b = DynArray::<i64, _>::new(MappedProvider::new());
        for i in 0..50 {
            a.push_back(i).unwrap();
            b.push_back(i).unwrap();
        }
        assert_eq!(a, b);
        a.truncate(3);
        assert_eq!(format!("{a:?}"), "[0, 1, 2]");
    }
}
