//! Benchmark scenarios for fillvec containers.
//!
//! Each scenario builds an array of `n` elements where element `i` is
//! [`Element::from_index(i)`](Element::from_index), and returns it so the
//! benches can `black_box` the result and the tests can compare contents.
//!
//! - Append: [`push_back_from_empty`], [`reserve_then_push`],
//!   [`reserve_then_push_assume`], [`mapped_reserve_then_push`]
//! - Fill: [`resize_then_write`], [`overwrite_assign`],
//!   [`overwrite_construct`], [`mapped_overwrite`], [`fill_cursor`]
//! - Baselines: [`std_vec_push`], [`std_vec_geometric`]

#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::fmt::Debug;
use std::mem::MaybeUninit;

use fillvec_alloc::{HeapProvider, MappedProvider, MemoryProvider};
use fillvec_array::DynArray;

/// Element counts every scenario is measured at.
pub const BENCH_SIZES: [usize; 6] = [4, 16, 1024, 4096, 16384, 5_242_880];

/// Element types the scenarios are instantiated for.
pub trait Element: Copy + Default + PartialEq + Debug {
    /// The value stored at index `i` (truncating for narrow types).
    fn from_index(i: usize) -> Self;
}

impl Element for u8 {
    #[inline]
    fn from_index(i: usize) -> Self {
        i as u8
    }
}

impl Element for i32 {
    #[inline]
    fn from_index(i: usize) -> Self {
        i as i32
    }
}

/// The contents every scenario must produce.
pub fn expected<T: Element>(n: usize) -> Vec<T> {
    (0..n).map(T::from_index).collect()
}

// ── append scenarios ───────────────────────────────────────────────

/// `n` appends into an empty array, growing by 1.5x.
pub fn push_back_from_empty<T: Element>(n: usize) -> DynArray<T> {
    let mut v = DynArray::new_heap();
    for i in 0..n {
        must(v.push_back(T::from_index(i)));
    }
    v
}

/// Reserve `n`, then `n` appends with no further growth.
pub fn reserve_then_push<T: Element, P: MemoryProvider>(provider: P, n: usize) -> DynArray<T, P> {
    let mut v = DynArray::new(provider);
    must(v.reserve(n));
    for i in 0..n {
        must(v.push_back(T::from_index(i)));
    }
    v
}

/// As [`reserve_then_push`], with the spare-capacity hint before each append.
#[allow(unsafe_code)]
pub fn reserve_then_push_assume<T: Element>(n: usize) -> DynArray<T> {
    let mut v = DynArray::new_heap();
    must(v.reserve(n));
    for i in 0..n {
        // SAFETY: n slots are reserved and only i < n are live.
        unsafe { v.assume_spare_capacity() };
        must(v.push_back(T::from_index(i)));
    }
    v
}

/// [`reserve_then_push`] on the mapped provider.
pub fn mapped_reserve_then_push<T: Element>(n: usize) -> DynArray<T, MappedProvider> {
    reserve_then_push(MappedProvider::new(), n)
}

// ── fill scenarios ─────────────────────────────────────────────────

/// Default-construct `n` elements, then overwrite them through the slice.
pub fn resize_then_write<T: Element>(n: usize) -> DynArray<T> {
    let mut v = DynArray::new_heap();
    must(v.resize(n));
    for (i, x) in v.as_mut_slice().iter_mut().enumerate() {
        *x = T::from_index(i);
    }
    v
}

/// Direct fill, assigning whole `MaybeUninit` values into the slots.
#[allow(unsafe_code)]
pub fn overwrite_assign<T: Element>(n: usize) -> DynArray<T> {
    let mut v = DynArray::new_heap();
    // SAFETY: every slot in [0, n) is assigned before returning n.
    must(unsafe {
        v.resize_and_overwrite(n, |slots| {
            for (i, slot) in slots.iter_mut().enumerate() {
                *slot = MaybeUninit::new(T::from_index(i));
            }
            slots.len()
        })
    });
    v
}

/// Direct fill, constructing each element in place.
pub fn overwrite_construct<T: Element>(n: usize) -> DynArray<T> {
    overwrite_into(HeapProvider::new(), n)
}

/// [`overwrite_construct`] on the mapped provider.
pub fn mapped_overwrite<T: Element>(n: usize) -> DynArray<T, MappedProvider> {
    overwrite_into(MappedProvider::new(), n)
}

#[allow(unsafe_code)]
fn overwrite_into<T: Element, P: MemoryProvider>(provider: P, n: usize) -> DynArray<T, P> {
    let mut v = DynArray::new(provider);
    // SAFETY: every slot in [0, n) is written before returning n.
    must(unsafe {
        v.resize_and_overwrite(n, |slots| {
            for (i, slot) in slots.iter_mut().enumerate() {
                slot.write(T::from_index(i));
            }
            slots.len()
        })
    });
    v
}

/// Safe direct fill through the cursor.
pub fn fill_cursor<T: Element>(n: usize) -> DynArray<T> {
    let mut v = DynArray::new_heap();
    must(v.resize_and_fill(n, |cursor| cursor.fill_with(T::from_index)));
    v
}

// ── baselines ──────────────────────────────────────────────────────

/// `n` pushes onto a `Vec` with its own growth policy.
pub fn std_vec_push<T: Element>(n: usize) -> Vec<T> {
    let mut v = Vec::new();
    for i in 0..n {
        v.push(T::from_index(i));
    }
    v
}

/// Hand-driven 1.5x growth on a `Vec`, filling each new stretch as it
/// becomes available, then one exact step to `n`.
pub fn std_vec_geometric<T: Element>(n: usize) -> Vec<T> {
    let mut v = Vec::with_capacity(1);
    let mut target = 2usize;
    while target < n {
        v.reserve_exact(target - v.len());
        v.extend((v.len()..target).map(T::from_index));
        target = target * 3 / 2;
    }
    v.reserve_exact(n.saturating_sub(v.len()));
    v.extend((v.len()..n).map(T::from_index));
    v
}

/// Scenarios run on well-formed sizes; failure means the machine is out of
/// memory and the measurement is meaningless.
#[track_caller]
fn must(result: Result<(), fillvec_alloc::AllocError>) {
    if let Err(e) = result {
        panic!("benchmark scenario failed: {e}");
    }
}
