//! # Ports
//!
//! Contracts for the collaborators this crate is wired to:
//!
//! - [`ArrayMemory`]: the array engine's memory descriptor
//! - [`ScalarConversion`]: host value to native scalar conversion
//! - [`IndexArray`]: introspection of array-valued index arguments
//!
//! Errors live next to the port whose operations produce them.

mod convert;
mod error;
mod introspect;
mod memory;

pub use convert::{ConversionError, ConversionResult, IntWidth, ScalarConversion};
pub use error::{IndexError, IndexResult, ItemError, ItemResult};
pub use introspect::IndexArray;
pub use memory::ArrayMemory;
