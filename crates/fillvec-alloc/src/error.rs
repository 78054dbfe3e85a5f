//! Allocation error types.

use std::error::Error;
use std::fmt;

/// Errors a [`MemoryProvider`](crate::MemoryProvider) or a container growth
/// step can report.
///
/// Every variant is returned before any state changes, so the caller's
/// container is observably unchanged when it sees one of these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The provider could not satisfy the request.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
    },
    /// The byte size of the requested element count does not fit a `Layout`.
    CapacityOverflow {
        /// Number of elements requested.
        elements: usize,
        /// Size of one element in bytes.
        element_size: usize,
    },
    /// The provider cannot honour the requested alignment.
    UnsupportedAlignment {
        /// Alignment requested, in bytes.
        align: usize,
        /// Largest alignment the provider guarantees.
        max: usize,
    },
    /// A zero-byte block was requested.
    ZeroSized,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory: requested {requested} bytes")
            }
            Self::CapacityOverflow {
                elements,
                element_size,
            } => {
                write!(
                    f,
                    "capacity overflow: {elements} elements of {element_size} bytes"
                )
            }
            Self::UnsupportedAlignment { align, max } => {
                write!(
                    f,
                    "unsupported alignment: requested {align} bytes, provider maximum {max} bytes"
                )
            }
            Self::ZeroSized => write!(f, "zero-sized allocation request"),
        }
    }
}

impl Error for AllocError {}
