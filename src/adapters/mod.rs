//! # Adapters
//!
//! Concrete implementations of the port traits:
//! - Scalar conversion for host values
//! - An in-memory array (memory descriptor and index array)
//! - Python bindings (when enabled)
//!
//! Each adapter implements one or more port traits.

pub mod convert;
pub mod memory;

#[cfg(feature = "python")]
pub mod python;

pub use convert::{narrow_intp, to_intp, to_intp_list, StandardConversion};
pub use memory::MemoryArray;
