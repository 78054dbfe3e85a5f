//! Pluggable memory providers for fillvec containers.
//!
//! A provider acquires, optionally grows in place, and releases raw untyped
//! storage blocks. Containers are generic over [`MemoryProvider`] and pick
//! their strategy once, at construction.
//!
//! # Strategies
//!
//! ```text
//! MemoryProvider (unsafe trait)
//! ├── HeapProvider    std::alloc, exact-size blocks
//! ├── MappedProvider  anonymous mmap, page-granular, mremap growth, THP advice
//! ├── TieredProvider  heap below a byte threshold, mapped at or above it
//! └── AnyProvider     runtime-selected (enum dispatch), built from ProviderConfig
//! ```
//!
//! # Unsafe code
//!
//! OS calls live in the private `raw` module. The provider impls carry
//! item-level `#[allow(unsafe_code)]` for the `unsafe impl` and the
//! `unsafe fn` trait methods; everything else is safe.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod any;
pub mod config;
pub mod error;
pub mod heap;
pub mod mapped;
pub mod provider;
mod raw;
pub mod tiered;

// Public re-exports for the primary API surface.
pub use any::AnyProvider;
pub use config::{ConfigError, HugePages, MappedConfig, ProviderConfig, ProviderKind};
pub use error::AllocError;
pub use heap::HeapProvider;
pub use mapped::MappedProvider;
pub use provider::MemoryProvider;
pub use tiered::TieredProvider;

/// System page size in bytes, queried once and cached.
pub fn page_size() -> usize {
    raw::page_size()
}
