//! Safe writer over uninitialised array slots.

#![allow(unsafe_code)]

use std::fmt;
use std::ptr::NonNull;

/// Sequential writer handed out by
/// [`DynArray::resize_and_fill`](crate::DynArray::resize_and_fill).
///
/// Each write constructs one element directly in its final slot and bumps
/// the array's length, so the array always tracks exactly the elements
/// written so far, even if the filler panics part way.
pub struct FillCursor<'a, T> {
    /// Slot 0 of the array's block.
    base: NonNull<T>,
    /// One past the last slot this cursor may write. `end <= capacity`.
    end: usize,
    /// The array's length; also the next slot to write.
    len: &'a mut usize,
}

impl<'a, T> FillCursor<'a, T> {
    /// `base` must be valid for writes of `end` elements, `*len <= end`, and
    /// the slots before `*len` must already be live.
    pub(crate) fn new(base: NonNull<T>, end: usize, len: &'a mut usize) -> Self {
        debug_assert!(*len <= end);
        Self { base, end, len }
    }

    /// Number of elements written so far.
    pub fn written(&self) -> usize {
        *self.len
    }

    /// Number of slots still available.
    pub fn remaining(&self) -> usize {
        self.end - *self.len
    }

    /// Whether every slot has been written.
    pub fn is_full(&self) -> bool {
        *self.len == self.end
    }

    /// Construct the next element in place.
    ///
    /// Returns the value back if the cursor is already full.
    #[inline]
    pub fn write(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            return Err(value);
        }
        // SAFETY: *len < end, so the slot is inside the block and uninitialised.
        unsafe { self.base.as_ptr().add(*self.len).write(value) };
        *self.len += 1;
        Ok(())
    }

    /// Fill every remaining slot with `f(index)`.
    #[inline]
    pub fn fill_with<F>(&mut self, mut f: F)
    where
        F: FnMut(usize) -> T,
    {
        while *self.len < self.end {
            let value = f(*self.len);
            // SAFETY: *len < end, and `f` cannot observe the slot.
            unsafe { self.base.as_ptr().add(*self.len).write(value) };
            *self.len += 1;
        }
    }

    /// Write items from `iter` until it ends or the cursor is full.
    ///
    /// Returns the number of items written.
    pub fn extend<I>(&mut self, iter: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let start = *self.len;
        let mut iter = iter.into_iter();
        while !self.is_full() {
            let Some(value) = iter.next() else {
                break;
            };
            // SAFETY: not full, so *len < end.
            unsafe { self.base.as_ptr().add(*self.len).write(value) };
            *self.len += 1;
        }
        *self.len - start
    }
}

impl<T> fmt::Debug for FillCursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillCursor")
            .field("written", &self.written())
            .field("end", &self.end)
            .finish()
    }
}
