//! Provider configuration, validation, and error types.
//!
//! [`ProviderConfig`] selects a strategy at runtime and
//! [`build()`](ProviderConfig::build) turns it into an [`AnyProvider`].
//! Code that knows its strategy statically can construct the concrete
//! provider directly and skip this module.

use std::error::Error;
use std::fmt;

use crate::any::AnyProvider;
use crate::heap::HeapProvider;
use crate::mapped::MappedProvider;
use crate::tiered::TieredProvider;

// ── MappedConfig ───────────────────────────────────────────────────

/// Transparent huge page policy for mapped blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HugePages {
    /// Leave paging policy to the kernel default.
    Never,
    /// `madvise(MADV_HUGEPAGE)` every mapping (Linux only; ignored elsewhere).
    #[default]
    Advise,
}

/// Configuration for [`MappedProvider`].
///
/// All values are immutable after the provider is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MappedConfig {
    /// Huge page advice applied to each new or grown mapping.
    ///
    /// Default: [`HugePages::Advise`].
    pub huge_pages: HugePages,

    /// Pre-fault the whole mapping at acquire time (`MAP_POPULATE`, Linux only).
    ///
    /// Default: `false`. Trades a slower acquire for no first-touch faults
    /// in the fill loop.
    pub populate: bool,
}

impl MappedConfig {
    /// Create a config with default values.
    pub const fn new() -> Self {
        Self {
            huge_pages: HugePages::Advise,
            populate: false,
        }
    }
}

impl Default for MappedConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ── ProviderConfig ─────────────────────────────────────────────────

/// Which provider strategy to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProviderKind {
    /// [`HeapProvider`].
    #[default]
    Heap,
    /// [`MappedProvider`].
    Mapped,
    /// [`TieredProvider`]: heap below `threshold_bytes`, mapped at or above.
    Tiered {
        /// Smallest block size, in bytes, served by the mapped tier.
        threshold_bytes: usize,
    },
}

/// Runtime provider selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Strategy to build. Default: [`ProviderKind::Heap`].
    pub kind: ProviderKind,
    /// Settings for the mapped strategy (and the mapped tier of `Tiered`).
    pub mapped: MappedConfig,
}

impl ProviderConfig {
    /// Default tiered threshold: 2 MiB, one transparent huge page on x86-64.
    pub const DEFAULT_TIERED_THRESHOLD: usize = 2 * 1024 * 1024;

    /// Heap strategy.
    pub fn heap() -> Self {
        Self::default()
    }

    /// Mapped strategy with default [`MappedConfig`].
    pub fn mapped() -> Self {
        Self {
            kind: ProviderKind::Mapped,
            mapped: MappedConfig::default(),
        }
    }

    /// Tiered strategy with [`DEFAULT_TIERED_THRESHOLD`](Self::DEFAULT_TIERED_THRESHOLD).
    pub fn tiered() -> Self {
        Self {
            kind: ProviderKind::Tiered {
                threshold_bytes: Self::DEFAULT_TIERED_THRESHOLD,
            },
            mapped: MappedConfig::default(),
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let ProviderKind::Tiered { threshold_bytes: 0 } = self.kind {
            return Err(ConfigError::ZeroThreshold);
        }
        Ok(())
    }

    /// Validate and build the configured provider.
    pub fn build(&self) -> Result<AnyProvider, ConfigError> {
        self.validate()?;
        Ok(match self.kind {
            ProviderKind::Heap => AnyProvider::Heap(HeapProvider::new()),
            ProviderKind::Mapped => AnyProvider::Mapped(MappedProvider::with_config(self.mapped)),
            ProviderKind::Tiered { threshold_bytes } => AnyProvider::Tiered(
                TieredProvider::with_config(threshold_bytes, self.mapped),
            ),
        })
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`ProviderConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A tiered threshold of zero would route every request to the mapped tier.
    ZeroThreshold,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroThreshold => write!(f, "tiered threshold must be non-zero"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryProvider;

    #[test]
    fn default_is_heap() {
        let provider = ProviderConfig::default().build().unwrap();
        assert_eq!(provider.name(), "heap");
    }

    #[test]
    fn mapped_defaults_advise_huge_pages() {
        let config = ProviderConfig::mapped();
        assert_eq!(config.mapped.huge_pages, HugePages::Advise);
        assert!(!config.mapped.populate);
        assert_eq!(config.build().unwrap().name(), "mapped");
    }

    #[test]
    fn tiered_uses_default_threshold() {
        let config = ProviderConfig::tiered();
        assert_eq!(
            config.kind,
            ProviderKind::Tiered {
                threshold_bytes: 2 * 1024 * 1024
            }
        );
        assert_eq!(config.build().unwrap().name(), "tiered");
    }

    #[test]
    fn zero_threshold_rejected() {
        let config = ProviderConfig {
            kind: ProviderKind::Tiered { threshold_bytes: 0 },
            mapped: MappedConfig::default(),
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroThreshold));
        assert!(config.build().is_err());
    }
}
