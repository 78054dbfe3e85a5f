//! Capacity growth policy and layout helpers.
//!
//! Appends grow capacity geometrically by 1.5x: the total bytes acquired
//! over a sequence of appends stays within a small constant multiple of the
//! final capacity (the geometric series 1 + 2/3 + 4/9 + ... = 3), while a
//! single growth step over-allocates by at most half.

use std::alloc::Layout;
use std::mem;

use fillvec_alloc::AllocError;

/// Numerator of the growth ratio.
pub const GROWTH_NUMERATOR: usize = 3;

/// Denominator of the growth ratio.
pub const GROWTH_DENOMINATOR: usize = 2;

/// Capacity after one growth step from `current`: `max(1, ceil(current * 1.5))`.
///
/// Saturates at `usize::MAX`; the layout check downstream turns that into
/// [`AllocError::CapacityOverflow`].
pub fn grown_capacity(current: usize) -> usize {
    let extra = current
        .saturating_mul(GROWTH_NUMERATOR - GROWTH_DENOMINATOR)
        .div_ceil(GROWTH_DENOMINATOR);
    current.saturating_add(extra).max(1)
}

/// Capacity to grow to when `required` slots are needed and `current` exist.
pub fn next_capacity(current: usize, required: usize) -> usize {
    grown_capacity(current).max(required)
}

/// Layout of `n` contiguous `T`s.
pub(crate) fn array_layout<T>(n: usize) -> Result<Layout, AllocError> {
    Layout::array::<T>(n).map_err(|_| AllocError::CapacityOverflow {
        elements: n,
        element_size: mem::size_of::<T>(),
    })
}

/// Element capacity of a block with `usable_bytes`, never below `requested`.
///
/// Page-granular providers hand back slack; turning it into capacity saves
/// later growth steps.
pub(crate) fn usable_capacity<T>(usable_bytes: usize, requested: usize) -> usize {
    let cap = usable_bytes / mem::size_of::<T>();
    if cap > requested && Layout::array::<T>(cap).is_ok() {
        cap
    } else {
        requested
    }
}
