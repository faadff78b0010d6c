//! # Core
//!
//! Pure domain types, no collaborators:
//! element type tags, native and host values, configuration, the
//! byte-order codec and the index argument / normalized index shapes.

pub mod config;
pub mod dtype;
pub mod index;
pub mod swap;
pub mod value;

pub use config::{IndexConfig, PointerWidth, MAX_DIMS};
pub use dtype::{ElementKind, ElementType};
pub use index::{BoolMask, IndexArg, IndexComponent, IntpArray, NormalizedIndex, SliceArg};
pub use swap::{ByteOrder, Width};
pub use value::{HostValue, ItemValue};
