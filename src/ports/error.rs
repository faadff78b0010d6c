//! Errors for element access and index normalization.

use super::convert::ConversionError;
use crate::core::ElementType;

/// Errors from the typed accessor registry
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ItemError {
    /// No accessor is registered for the element type. Callers must check
    /// before dispatching; this is not a per-element condition.
    #[error("no element accessor for type {0}")]
    UnsupportedElementType(ElementType),

    /// The value offers no conversion to the destination element type
    #[error("value {value} not convertible to target element type {target}")]
    NotConvertible { value: String, target: ElementType },

    /// Range or literal failure reported by the conversion service
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Result type for element access
pub type ItemResult<T> = Result<T, ItemError>;

/// Errors from index normalization
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndexError {
    /// More explicit indices than dimensions can exist
    #[error("too many indices: {count} (maximum {max})")]
    TooManyIndices { count: usize, max: usize },

    /// An array index whose elements are neither integer nor boolean
    #[error("arrays used as indices must be of integer (or boolean) type, not {0}")]
    NonIntegerArray(ElementType),

    /// An argument matching no recognized index shape
    #[error("argument {0} is not a valid index")]
    InvalidIndex(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Item(#[from] ItemError),
}

/// Result type for index normalization
pub type IndexResult<T> = Result<T, IndexError>;
