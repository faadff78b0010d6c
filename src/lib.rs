//! # nditem - Typed Element Access and Subscript Normalization
//!
//! The low-level core an array engine needs beneath a scripting front end:
//! reading and writing single elements of raw array memory, whatever its
//! byte order or alignment, and turning the arguments of one subscript
//! operation into an ordered, typed index description.
//!
//! ## Components
//!
//! - **Byte-order codec** - copy 2/4/8-byte units with an optional reversal
//! - **Typed accessor registry** - one `(get_item, set_item)` pair per element type
//! - **Index normalizer** - classify subscript arguments into index components
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         nditem                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  CORE (pure data, no collaborators)                         │
//! │    ElementType, ItemValue, HostValue, IndexArg,             │
//! │    NormalizedIndex, byte-order codec, IndexConfig           │
//! │                                                              │
//! │  PORTS (trait contracts)                                     │
//! │    ArrayMemory, ScalarConversion, IndexArray                │
//! │                                                              │
//! │  ADAPTERS (swappable implementations)                       │
//! │    StandardConversion, MemoryArray                          │
//! │    API: Python bindings                                      │
//! │                                                              │
//! │  ENGINE (operations)                                         │
//! │    Accessor registry, IndexNormalizer                       │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use nditem::{
//!     ByteOrder, ElementType, HostValue, IndexArg, IndexComponent, IndexNormalizer,
//!     ItemValue, MemoryArray,
//! };
//!
//! // Element access on a big-endian buffer
//! let mut arr = MemoryArray::new(ElementType::Int, vec![4]).with_byte_order(ByteOrder::Big);
//! arr.set(1, &HostValue::Int(7)).unwrap();
//! assert_eq!(arr.get(1).unwrap(), ItemValue::I32(7));
//!
//! // Subscript normalization: `a[[1, 2, 3]]` is one fancy index
//! let normalizer = IndexNormalizer::default();
//! let index = normalizer.normalize(&[vec![1i64, 2, 3].into()]).unwrap();
//! assert!(matches!(index.as_slice(), [IndexComponent::IntArray(_)]));
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Core domain - pure data, no collaborators
/// Contains: element types, values, index shapes, byte-order codec, config
pub mod core;

/// Port definitions - trait contracts for collaborators
/// Contains: ArrayMemory, ScalarConversion, IndexArray, error enums
pub mod ports;

/// Adapter implementations - swappable components
/// Contains: convert, memory, python submodules
pub mod adapters;

/// Engine - the accessor registry and the index normalizer
pub mod engine;

// ============================================================================
// PYTHON BINDINGS (when enabled)
// ============================================================================

#[cfg(feature = "python")]
pub use adapters::python::*;

// ============================================================================
// RE-EXPORTS (public API)
// ============================================================================

// Core types
pub use crate::core::config::{IndexConfig, PointerWidth, MAX_DIMS};
pub use crate::core::swap::{copy_swap, copy_swap2, copy_swap4, copy_swap8, ByteOrder, Width};
pub use crate::core::{
    BoolMask, ElementKind, ElementType, HostValue, IndexArg, IndexComponent, IntpArray,
    ItemValue, NormalizedIndex, SliceArg,
};

// Port traits and errors
pub use crate::ports::{
    ArrayMemory, ConversionError, IndexArray, IndexError, ItemError, ScalarConversion,
};

// Adapters
pub use crate::adapters::{MemoryArray, StandardConversion};

// Engine
pub use crate::engine::{accessor, get_item, has_accessor, set_item, ArrFuncs, IndexNormalizer};
