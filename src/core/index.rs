//! # Index Arguments and Normalized Indices
//!
//! [`IndexArg`] is one raw subscript token as the front end hands it over.
//! [`NormalizedIndex`] is the ordered, typed, capped sequence the array
//! engine's subscript executor consumes. A normalized index is built fresh
//! for every subscript operation.

use std::fmt;

use super::value::HostValue;
use crate::ports::{IndexArray, IndexError, IndexResult};

/// Slice endpoints; each is independently optional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliceArg {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl SliceArg {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    /// `start:stop`
    pub fn range(start: isize, stop: isize) -> Self {
        Self::new(Some(start), Some(stop), None)
    }

    /// `:`
    pub fn full() -> Self {
        Self::default()
    }
}

impl fmt::Display for SliceArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |v: Option<isize>| v.map(|v| v.to_string()).unwrap_or_default();
        write!(f, "{}:{}", part(self.start), part(self.stop))?;
        if let Some(step) = self.step {
            write!(f, ":{step}")?;
        }
        Ok(())
    }
}

/// One user-supplied subscript token
#[derive(Debug)]
pub enum IndexArg {
    /// The host's absent value (`None` / `np.newaxis`)
    NewAxis,
    Ellipsis,
    Bool(bool),
    /// Host integer of any width
    Int(i128),
    Slice(SliceArg),
    /// Field name of a structured array
    Field(String),
    /// Array value, inspected through [`IndexArray`]
    Array(Box<dyn IndexArray>),
    /// Ordered host sequence (list or tuple)
    Sequence(Vec<IndexArg>),
    /// Any other host value; only usable if it converts to an integer
    Scalar(HostValue),
}

impl IndexArg {
    pub fn array(array: impl IndexArray + 'static) -> Self {
        IndexArg::Array(Box::new(array))
    }

    /// Whether this token, found inside a lone sequence, makes that
    /// sequence an index tuple. Arrays of rank one or more count as nested
    /// sequences.
    pub(crate) fn is_tuple_marker(&self) -> bool {
        match self {
            IndexArg::NewAxis | IndexArg::Ellipsis | IndexArg::Slice(_) | IndexArg::Sequence(_) => {
                true
            }
            IndexArg::Array(array) => array.ndim() > 0,
            _ => false,
        }
    }
}

impl From<i64> for IndexArg {
    fn from(v: i64) -> Self {
        IndexArg::Int(v.into())
    }
}

impl From<bool> for IndexArg {
    fn from(v: bool) -> Self {
        IndexArg::Bool(v)
    }
}

impl From<SliceArg> for IndexArg {
    fn from(v: SliceArg) -> Self {
        IndexArg::Slice(v)
    }
}

impl From<&str> for IndexArg {
    fn from(v: &str) -> Self {
        IndexArg::Field(v.to_string())
    }
}

impl From<HostValue> for IndexArg {
    fn from(v: HostValue) -> Self {
        IndexArg::Scalar(v)
    }
}

impl<T: Into<IndexArg>> From<Vec<T>> for IndexArg {
    fn from(items: Vec<T>) -> Self {
        IndexArg::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for IndexArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexArg::NewAxis => f.write_str("None"),
            IndexArg::Ellipsis => f.write_str("Ellipsis"),
            IndexArg::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            IndexArg::Int(v) => write!(f, "{v}"),
            IndexArg::Slice(s) => write!(f, "slice({s})"),
            IndexArg::Field(name) => write!(f, "'{name}'"),
            IndexArg::Array(a) => write!(f, "array(ndim={}, dtype={})", a.ndim(), a.element_type()),
            IndexArg::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            IndexArg::Scalar(v) => write!(f, "{v}"),
        }
    }
}

/// Integer index array: flattened `intp` values plus their shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntpArray {
    pub shape: Vec<usize>,
    pub values: Vec<isize>,
}

impl IntpArray {
    pub fn new(shape: Vec<usize>, values: Vec<isize>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), values.len());
        Self { shape, values }
    }

    /// One-dimensional array over `values`
    pub fn from_vec(values: Vec<isize>) -> Self {
        Self {
            shape: vec![values.len()],
            values,
        }
    }
}

/// Boolean mask: flattened values plus their shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolMask {
    pub shape: Vec<usize>,
    pub mask: Vec<bool>,
}

impl BoolMask {
    pub fn new(shape: Vec<usize>, mask: Vec<bool>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), mask.len());
        Self { shape, mask }
    }

    /// Number of selected positions
    pub fn count_true(&self) -> usize {
        self.mask.iter().filter(|&&b| b).count()
    }
}

/// One normalized index component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexComponent {
    NewAxis,
    Ellipsis,
    Bool(bool),
    Int(isize),
    Slice(SliceArg),
    Field(String),
    IntArray(IntpArray),
    BoolArray(BoolMask),
}

impl IndexComponent {
    /// Whether the component addresses an existing dimension
    pub fn is_explicit(&self) -> bool {
        !matches!(self, IndexComponent::NewAxis | IndexComponent::Ellipsis)
    }
}

/// Ordered sequence of index components, capped at a maximum length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedIndex {
    components: Vec<IndexComponent>,
    max: usize,
}

impl NormalizedIndex {
    /// Create an empty index holding at most `max` components
    pub fn with_max(max: usize) -> Self {
        Self {
            components: Vec::new(),
            max,
        }
    }

    /// Append a component; fails once the cap is reached
    pub fn push(&mut self, component: IndexComponent) -> IndexResult<()> {
        if self.components.len() >= self.max {
            return Err(IndexError::TooManyIndices {
                count: self.components.len() + 1,
                max: self.max,
            });
        }
        self.components.push(component);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndexComponent> {
        self.components.iter()
    }

    pub fn as_slice(&self) -> &[IndexComponent] {
        &self.components
    }

    pub fn into_vec(self) -> Vec<IndexComponent> {
        self.components
    }

    /// Number of components that consume an existing dimension
    pub fn explicit_dims(&self) -> usize {
        self.components.iter().filter(|c| c.is_explicit()).count()
    }

    pub fn has_ellipsis(&self) -> bool {
        self.components
            .iter()
            .any(|c| matches!(c, IndexComponent::Ellipsis))
    }

    pub fn new_axes(&self) -> usize {
        self.components
            .iter()
            .filter(|c| matches!(c, IndexComponent::NewAxis))
            .count()
    }
}

impl<'a> IntoIterator for &'a NormalizedIndex {
    type Item = &'a IndexComponent;
    type IntoIter = std::slice::Iter<'a, IndexComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

impl IntoIterator for NormalizedIndex {
    type Item = IndexComponent;
    type IntoIter = std::vec::IntoIter<IndexComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_respects_cap() {
        let mut index = NormalizedIndex::with_max(2);
        index.push(IndexComponent::Int(1)).unwrap();
        index.push(IndexComponent::NewAxis).unwrap();

        let err = index.push(IndexComponent::Int(2)).unwrap_err();
        assert!(matches!(err, IndexError::TooManyIndices { count: 3, max: 2 }));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_component_counts() {
        let mut index = NormalizedIndex::with_max(8);
        index.push(IndexComponent::NewAxis).unwrap();
        index.push(IndexComponent::Ellipsis).unwrap();
        index.push(IndexComponent::Slice(SliceArg::full())).unwrap();
        index.push(IndexComponent::Int(-1)).unwrap();

        assert_eq!(index.explicit_dims(), 2);
        assert_eq!(index.new_axes(), 1);
        assert!(index.has_ellipsis());
    }

    #[test]
    fn test_tuple_markers() {
        assert!(IndexArg::NewAxis.is_tuple_marker());
        assert!(IndexArg::Slice(SliceArg::full()).is_tuple_marker());
        assert!(IndexArg::from(vec![1i64]).is_tuple_marker());
        assert!(!IndexArg::Int(1).is_tuple_marker());
        assert!(!IndexArg::Field("x".into()).is_tuple_marker());
    }

    #[test]
    fn test_arrays_as_tuple_markers() {
        use crate::adapters::MemoryArray;
        use crate::core::{ElementType, ItemValue};

        let vector = MemoryArray::new(ElementType::Long, vec![3]);
        assert!(IndexArg::array(vector).is_tuple_marker());

        let scalar = MemoryArray::scalar(ItemValue::I64(1));
        assert!(!IndexArg::array(scalar).is_tuple_marker());
    }

    #[test]
    fn test_display() {
        let arg = IndexArg::from(vec![
            IndexArg::Slice(SliceArg::new(Some(0), None, Some(2))),
            IndexArg::Ellipsis,
            IndexArg::Int(3),
        ]);
        assert_eq!(arg.to_string(), "[slice(0::2), Ellipsis, 3]");
    }

    #[test]
    fn test_mask_count() {
        let mask = BoolMask::new(vec![2, 2], vec![true, false, true, true]);
        assert_eq!(mask.count_true(), 3);
    }
}
