//! Per-array growth metrics.
//!
//! [`GrowthMetrics`] counts what the growth path did over an array's
//! lifetime. Counters are only touched when capacity changes, never on the
//! append fast path.

/// Cumulative growth counters for one [`DynArray`](crate::DynArray).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GrowthMetrics {
    /// Blocks acquired from the provider.
    pub acquisitions: u64,
    /// Growth steps that moved live elements into a new block.
    pub relocations: u64,
    /// Growth steps satisfied by extending the block in place.
    pub in_place_growths: u64,
    /// Bytes requested from the provider over the array's lifetime,
    /// counting the extension size for in-place growth.
    pub bytes_acquired: u64,
    /// Elements moved across all relocations.
    pub elements_relocated: u64,
    /// Largest capacity reached, in elements.
    pub peak_capacity: usize,
}

impl GrowthMetrics {
    /// All counters zero.
    pub const fn new() -> Self {
        Self {
            acquisitions: 0,
            relocations: 0,
            in_place_growths: 0,
            bytes_acquired: 0,
            elements_relocated: 0,
            peak_capacity: 0,
        }
    }

    /// Total growth steps, however they were satisfied.
    pub fn growth_steps(&self) -> u64 {
        self.acquisitions + self.in_place_growths
    }

    pub(crate) fn record_acquire(&mut self, bytes: usize, capacity: usize) {
        self.acquisitions += 1;
        self.bytes_acquired += bytes as u64;
        self.peak_capacity = self.peak_capacity.max(capacity);
    }

    pub(crate) fn record_relocation(&mut self, elements: usize) {
        self.relocations += 1;
        self.elements_relocated += elements as u64;
    }

    pub(crate) fn record_in_place(&mut self, extra_bytes: usize, capacity: usize) {
        self.in_place_growths += 1;
        self.bytes_acquired += extra_bytes as u64;
        self.peak_capacity = self.peak_capacity.max(capacity);
    }
}
