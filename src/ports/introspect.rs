//! Array value introspection port.

use std::fmt;

use super::error::IndexResult;
use crate::core::ElementType;

/// An array value supplied as an index argument.
///
/// The normalizer only asks for rank and element type, then pulls either
/// the single element of a zero-dimensional array or the flattened
/// elements of a higher-rank one.
pub trait IndexArray: fmt::Debug + Send + Sync {
    fn ndim(&self) -> usize;

    fn shape(&self) -> Vec<usize>;

    fn element_type(&self) -> ElementType;

    /// The single element of a zero-dimensional boolean array
    fn scalar_bool(&self) -> IndexResult<bool>;

    /// The single element of a zero-dimensional integer array,
    /// sign-extended to `i128`
    fn scalar_int(&self) -> IndexResult<i128>;

    /// All elements in C order, as booleans
    fn flat_bools(&self) -> IndexResult<Vec<bool>>;

    /// All elements in C order, as integers
    fn flat_ints(&self) -> IndexResult<Vec<i128>>;
}
