//! # Engine
//!
//! The two operational components of the crate:
//! - The typed accessor registry (element reads and writes)
//! - The index normalizer (subscript classification)
//!
//! Both are wired to collaborators only through the port traits.

pub mod registry;
mod normalizer;

pub use normalizer::IndexNormalizer;
pub use registry::{accessor, get_item, has_accessor, set_item, ArrFuncs, GetItem, SetItem};
