//! Growable contiguous array with pluggable providers and direct-fill
//! resizing.
//!
//! [`DynArray<T, P>`](DynArray) is a dynamic array whose storage comes from a
//! [`MemoryProvider`](fillvec_alloc::MemoryProvider) chosen at construction.
//! Beyond the usual append/reserve/resize surface it offers direct-fill
//! resizing, where the caller constructs new elements straight into
//! uninitialised storage instead of paying for default construction
//! followed by overwrite.
//!
//! # Architecture
//!
//! ```text
//! DynArray<T, P>
//! ├── block: NonNull<T>   one provider block, or none while capacity is 0
//! │   ├── [0, len)        live elements
//! │   └── [len, cap)      uninitialised, write-only
//! ├── provider: P         fixed for the array's lifetime
//! └── GrowthMetrics       acquisitions, relocations, in-place growth
//! ```
//!
//! Growth asks the provider to extend the block in place, and otherwise
//! acquires a new block, moves the live elements, and releases the old one.
//! Appends grow capacity by 1.5x ([`growth`]).
//!
//! # Direct fill
//!
//! - [`DynArray::resize_and_overwrite`] (`unsafe`): the filler gets
//!   `&mut [MaybeUninit<T>]` and returns how many leading slots it
//!   initialised.
//! - [`DynArray::resize_and_fill`] (safe): the filler gets a [`FillCursor`]
//!   that constructs elements in order and keeps the length exact.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod fill;
pub mod growth;
pub mod metrics;

// Public re-exports for the primary API surface.
pub use array::DynArray;
pub use fill::FillCursor;
pub use metrics::GrowthMetrics;
