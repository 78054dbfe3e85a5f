//! Test utilities and provider doubles for fillvec development.
//!
//! - [`CountingProvider`] wraps a provider and counts every call.
//! - [`FailingProvider`] refuses requests past an acquisition budget or
//!   above a byte limit.
//! - [`DropCounter`] is an element type that records its drops in a shared
//!   [`DropLedger`].
//!
//! The doubles keep their counters in atomics, so they still take `&self`
//! and can be shared between arrays through `&P`.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use fillvec_alloc::{AllocError, HeapProvider, MemoryProvider};

// ── CountingProvider ───────────────────────────────────────────────

/// Snapshot of a [`CountingProvider`]'s counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProviderCounts {
    pub acquisitions: u64,
    pub failed_acquisitions: u64,
    pub releases: u64,
    pub bytes_acquired: u64,
    pub in_place_attempts: u64,
    pub in_place_successes: u64,
}

impl ProviderCounts {
    /// Blocks acquired and not yet released.
    pub fn live_blocks(&self) -> u64 {
        self.acquisitions - self.releases
    }
}

/// Provider double that forwards to `P` and counts every call.
///
/// Wrap it in a shared reference to watch an array from the outside:
///
/// ```ignore
/// let provider = CountingProvider::heap();
/// let mut v = DynArray::new(&provider);
/// v.reserve(64).unwrap();
/// assert_eq!(provider.counts().acquisitions, 1);
/// ```
#[derive(Debug, Default)]
pub struct CountingProvider<P = HeapProvider> {
    inner: P,
    acquisitions: AtomicU64,
    failed_acquisitions: AtomicU64,
    releases: AtomicU64,
    bytes_acquired: AtomicU64,
    in_place_attempts: AtomicU64,
    in_place_successes: AtomicU64,
}

impl CountingProvider<HeapProvider> {
    pub fn heap() -> Self {
        Self::new(HeapProvider::new())
    }
}

impl<P> CountingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            acquisitions: AtomicU64::new(0),
            failed_acquisitions: AtomicU64::new(0),
            releases: AtomicU64::new(0),
            bytes_acquired: AtomicU64::new(0),
            in_place_attempts: AtomicU64::new(0),
            in_place_successes: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Current counter values.
    pub fn counts(&self) -> ProviderCounts {
        ProviderCounts {
            acquisitions: self.acquisitions.load(Ordering::Relaxed),
            failed_acquisitions: self.failed_acquisitions.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            bytes_acquired: self.bytes_acquired.load(Ordering::Relaxed),
            in_place_attempts: self.in_place_attempts.load(Ordering::Relaxed),
            in_place_successes: self.in_place_successes.load(Ordering::Relaxed),
        }
    }
}

#[allow(unsafe_code)]
// SAFETY: every block comes from `inner` and is forwarded back to it.
unsafe impl<P: MemoryProvider> MemoryProvider for CountingProvider<P> {
    fn acquire(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        match self.inner.acquire(layout) {
            Ok(block) => {
                self.acquisitions.fetch_add(1, Ordering::Relaxed);
                self.bytes_acquired
                    .fetch_add(layout.size() as u64, Ordering::Relaxed);
                Ok(block)
            }
            Err(e) => {
                self.failed_acquisitions.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    unsafe fn release(&self, block: NonNull<u8>, layout: Layout) {
        self.releases.fetch_add(1, Ordering::Relaxed);
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.release(block, layout) }
    }

    unsafe fn grow_in_place(&self, block: NonNull<u8>, old: Layout, new_size: usize) -> bool {
        self.in_place_attempts.fetch_add(1, Ordering::Relaxed);
        // SAFETY: forwarded caller contract.
        let grown = unsafe { self.inner.grow_in_place(block, old, new_size) };
        if grown {
            self.in_place_successes.fetch_add(1, Ordering::Relaxed);
            self.bytes_acquired
                .fetch_add((new_size - old.size()) as u64, Ordering::Relaxed);
        }
        grown
    }

    fn usable_size(&self, layout: Layout) -> usize {
        self.inner.usable_size(layout)
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

// ── FailingProvider ────────────────────────────────────────────────

/// Provider double that refuses requests once a budget is spent.
///
/// An acquire fails with [`AllocError::OutOfMemory`] if the acquisition
/// budget is exhausted or the request is larger than `max_bytes`.
#[derive(Debug)]
pub struct FailingProvider<P = HeapProvider> {
    inner: P,
    remaining: AtomicUsize,
    max_bytes: usize,
}

impl FailingProvider<HeapProvider> {
    /// Heap-backed double that allows `budget` acquisitions of any size.
    pub fn after(budget: usize) -> Self {
        Self::new(HeapProvider::new(), budget, usize::MAX)
    }

    /// Heap-backed double that allows any number of acquisitions up to
    /// `max_bytes` each.
    pub fn above(max_bytes: usize) -> Self {
        Self::new(HeapProvider::new(), usize::MAX, max_bytes)
    }
}

impl<P> FailingProvider<P> {
    pub fn new(inner: P, budget: usize, max_bytes: usize) -> Self {
        Self {
            inner,
            remaining: AtomicUsize::new(budget),
            max_bytes,
        }
    }

    /// Acquisitions left before the double starts failing.
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Relaxed)
    }

    /// Reset the acquisition budget.
    pub fn set_budget(&self, budget: usize) {
        self.remaining.store(budget, Ordering::Relaxed);
    }
}

#[allow(unsafe_code)]
// SAFETY: every block comes from `inner` and is forwarded back to it.
unsafe impl<P: MemoryProvider> MemoryProvider for FailingProvider<P> {
    fn acquire(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let refused = AllocError::OutOfMemory {
            requested: layout.size(),
        };
        if layout.size() > self.max_bytes {
            return Err(refused);
        }
        self.remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .map_err(|_| refused)?;
        self.inner.acquire(layout).inspect_err(|_| {
            // No block was handed out; give the unit back.
            self.remaining.fetch_add(1, Ordering::Relaxed);
        })
    }

    unsafe fn release(&self, block: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.release(block, layout) }
    }

    unsafe fn grow_in_place(&self, block: NonNull<u8>, old: Layout, new_size: usize) -> bool {
        if new_size > self.max_bytes {
            return false;
        }
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.grow_in_place(block, old, new_size) }
    }

    fn usable_size(&self, layout: Layout) -> usize {
        self.inner.usable_size(layout)
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

// ── DropCounter ────────────────────────────────────────────────────

/// Shared record of how many [`DropCounter`]s were created and dropped.
#[derive(Clone, Debug, Default)]
pub struct DropLedger {
    created: Rc<Cell<usize>>,
    dropped: Rc<Cell<usize>>,
}

impl DropLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new element tagged with `id`, tracked by this ledger.
    pub fn counter(&self, id: usize) -> DropCounter {
        self.created.set(self.created.get() + 1);
        DropCounter {
            id,
            created: Rc::clone(&self.created),
            dropped: Rc::clone(&self.dropped),
        }
    }

    pub fn created(&self) -> usize {
        self.created.get()
    }

    pub fn dropped(&self) -> usize {
        self.dropped.get()
    }

    /// Elements created and not yet dropped.
    pub fn alive(&self) -> usize {
        self.created() - self.dropped()
    }
}

/// Element type that bumps its ledger's drop count when dropped.
///
/// Clones keep the `id` and count as new elements in the same ledger.
#[derive(Debug)]
pub struct DropCounter {
    pub id: usize,
    created: Rc<Cell<usize>>,
    dropped: Rc<Cell<usize>>,
}

impl Clone for DropCounter {
    fn clone(&self) -> Self {
        self.created.set(self.created.get() + 1);
        Self {
            id: self.id,
            created: Rc::clone(&self.created),
            dropped: Rc::clone(&self.dropped),
        }
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.dropped.set(self.dropped.get() + 1);
    }
}

impl PartialEq for DropCounter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
