//! fillvec: a growable contiguous array with pluggable memory providers and
//! direct-fill resizing.
//!
//! This is the top-level facade crate that re-exports the public API from the
//! fillvec sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use fillvec::prelude::*;
//!
//! // Runtime-selected storage: heap below 2 MiB, anonymous mappings above.
//! let provider = ProviderConfig::tiered().build()?;
//! let mut v: DynArray<u32, AnyProvider> = DynArray::new(provider);
//!
//! // Construct 1000 elements straight into fresh storage.
//! v.resize_and_fill(1000, |cursor| cursor.fill_with(|i| i as u32 * 3))?;
//! assert_eq!(v[10], 30);
//!
//! // The raw protocol: the filler reports how many leading slots it wrote.
//! // SAFETY: slots [0, 1000) keep the previous u32s; [1000, 1500) are written.
//! unsafe {
//!     v.resize_and_overwrite(1500, |slots| {
//!         for (i, slot) in slots[1000..].iter_mut().enumerate() {
//!             slot.write(i as u32);
//!         }
//!         slots.len()
//!     })?;
//! }
//! assert_eq!(v.len(), 1500);
//! assert_eq!(v[1001], 1);
//! assert_eq!(v.metrics().growth_steps(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`alloc`] | `fillvec-alloc` | `MemoryProvider`, heap/mapped/tiered providers, config, errors |
//! | [`array`] | `fillvec-array` | `DynArray`, `FillCursor`, growth policy, metrics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Memory providers, provider configuration, and allocation errors
/// (`fillvec-alloc`).
///
/// Implement [`alloc::MemoryProvider`] to plug in a custom strategy.
pub use fillvec_alloc as alloc;

/// The dynamic array and its direct-fill API (`fillvec-array`).
pub use fillvec_array as array;

/// Common imports for typical fillvec usage.
///
/// ```rust
/// use fillvec::prelude::*;
/// ```
pub mod prelude {
    // Providers
    pub use fillvec_alloc::{
        AnyProvider, HeapProvider, MappedProvider, MemoryProvider, TieredProvider,
    };

    // Configuration
    pub use fillvec_alloc::{HugePages, MappedConfig, ProviderConfig, ProviderKind};

    // Errors
    pub use fillvec_alloc::{AllocError, ConfigError};

    // Array
    pub use fillvec_array::{DynArray, FillCursor, GrowthMetrics};
}
