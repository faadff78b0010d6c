//! # Index Normalizer
//!
//! Turns the raw arguments of one subscript operation into a
//! [`NormalizedIndex`].
//!
//! Classification is a single pass. The only ambiguity is a lone sequence
//! argument: `a[[1, 2, 3]]` is one fancy index, while `a[(slice(0, 2), 3)]`
//! is two indices. A lone sequence is unpacked only when it "looks like a
//! tuple", meaning at least one element is a new-axis, ellipsis, slice,
//! nested sequence or array of rank one or more, and it is no longer than
//! the maximum dimensionality.
//!
//! Any failure aborts the whole normalization; no partially filled index
//! is ever returned.

use tracing::{debug, warn};

use crate::adapters::convert::{narrow_intp, to_intp};
use crate::adapters::StandardConversion;
use crate::core::{
    BoolMask, HostValue, IndexArg, IndexComponent, IndexConfig, IntpArray, ItemValue,
    NormalizedIndex,
};
use crate::ports::{ConversionError, IndexArray, IndexError, IndexResult, ScalarConversion};

/// Index normalizer
///
/// Holds the dimensionality cap, the pointer width and the conversion
/// service used for generic scalars.
pub struct IndexNormalizer {
    /// Configuration
    config: IndexConfig,

    /// Conversion service for generic scalars and sequence elements
    conversion: Box<dyn ScalarConversion>,
}

impl IndexNormalizer {
    /// Create a normalizer using [`StandardConversion`]
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            conversion: Box::new(StandardConversion),
        }
    }

    /// Create with a custom conversion service
    pub fn with_conversion(config: IndexConfig, conversion: Box<dyn ScalarConversion>) -> Self {
        Self { config, conversion }
    }

    /// Get the configuration
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Normalize the arguments of one subscript operation
    pub fn normalize(&self, args: &[IndexArg]) -> IndexResult<NormalizedIndex> {
        match self.classify(args) {
            Ok(index) => {
                debug!(
                    args = args.len(),
                    components = index.len(),
                    "normalized subscript"
                );
                Ok(index)
            }
            Err(e) => {
                warn!(args = args.len(), error = %e, "subscript normalization failed");
                Err(e)
            }
        }
    }

    fn classify(&self, args: &[IndexArg]) -> IndexResult<NormalizedIndex> {
        let max = self.config.max_dims;
        let mut index = NormalizedIndex::with_max(max);

        match args {
            [arg @ (IndexArg::Array(_) | IndexArg::Field(_))] => {
                self.convert_single(arg, &mut index)?;
            }
            [IndexArg::Sequence(items)] if self.looks_like_tuple(items) => {
                debug!(len = items.len(), "unpacking lone sequence as index tuple");
                for item in items {
                    self.convert_single(item, &mut index)?;
                }
            }
            [arg] => self.convert_single(arg, &mut index)?,
            _ => {
                if args.len() > max {
                    return Err(IndexError::TooManyIndices {
                        count: args.len(),
                        max,
                    });
                }
                for arg in args {
                    self.convert_single(arg, &mut index)?;
                }
            }
        }

        Ok(index)
    }

    /// Whether a lone sequence argument should be read as several indices
    pub fn looks_like_tuple(&self, items: &[IndexArg]) -> bool {
        items.len() <= self.config.max_dims && items.iter().any(IndexArg::is_tuple_marker)
    }

    /// Classify one argument and append the resulting component
    pub fn convert_single(&self, arg: &IndexArg, index: &mut NormalizedIndex) -> IndexResult<()> {
        let component = match arg {
            IndexArg::NewAxis => IndexComponent::NewAxis,
            IndexArg::Ellipsis => IndexComponent::Ellipsis,
            IndexArg::Bool(b) => IndexComponent::Bool(*b),
            IndexArg::Int(v) => IndexComponent::Int(self.narrow(*v)?),
            IndexArg::Slice(s) => IndexComponent::Slice(*s),
            IndexArg::Field(name) => IndexComponent::Field(name.clone()),
            IndexArg::Array(array) => self.convert_array(array.as_ref())?,
            IndexArg::Sequence(items) => {
                let (shape, values) = self.flatten_sequence(items)?;
                IndexComponent::IntArray(IntpArray::new(shape, values))
            }
            IndexArg::Scalar(HostValue::Bool(b) | HostValue::Item(ItemValue::Bool(b))) => {
                IndexComponent::Bool(*b)
            }
            IndexArg::Scalar(HostValue::Str(name)) => IndexComponent::Field(name.clone()),
            IndexArg::Scalar(value) => IndexComponent::Int(self.scalar_to_intp(value)?),
        };
        index.push(component)
    }

    fn narrow(&self, value: i128) -> IndexResult<isize> {
        Ok(narrow_intp(value, self.config.pointer_width)?)
    }

    fn convert_array(&self, array: &dyn IndexArray) -> IndexResult<IndexComponent> {
        let ty = array.element_type();

        if array.ndim() == 0 {
            if ty.is_bool() {
                return Ok(IndexComponent::Bool(array.scalar_bool()?));
            }
            if ty.is_integer() {
                return Ok(IndexComponent::Int(self.narrow(array.scalar_int()?)?));
            }
        }

        if ty.is_integer() {
            Ok(IndexComponent::IntArray(IntpArray::new(
                array.shape(),
                self.array_ints(array)?,
            )))
        } else if ty.is_bool() {
            Ok(IndexComponent::BoolArray(BoolMask::new(
                array.shape(),
                array.flat_bools()?,
            )))
        } else {
            Err(IndexError::NonIntegerArray(ty))
        }
    }

    fn array_ints(&self, array: &dyn IndexArray) -> IndexResult<Vec<isize>> {
        array
            .flat_ints()?
            .into_iter()
            .map(|v| self.narrow(v))
            .collect()
    }

    /// Flatten a (possibly nested) host sequence into `intp` values,
    /// returning its rectangular shape. Ragged nesting is rejected.
    fn flatten_sequence(&self, items: &[IndexArg]) -> IndexResult<(Vec<usize>, Vec<isize>)> {
        let mut inner: Option<Vec<usize>> = None;
        let mut values = Vec::new();

        for item in items {
            let (shape, mut vals) = match item {
                IndexArg::Sequence(sub) => self.flatten_sequence(sub)?,
                IndexArg::Array(array) if array.ndim() > 0 => {
                    let ty = array.element_type();
                    let vals = if ty.is_integer() {
                        self.array_ints(array.as_ref())?
                    } else if ty.is_bool() {
                        array.flat_bools()?.into_iter().map(isize::from).collect()
                    } else {
                        return Err(IndexError::NonIntegerArray(ty));
                    };
                    (array.shape(), vals)
                }
                leaf => (Vec::new(), vec![self.leaf_to_intp(leaf)?]),
            };

            match &inner {
                None => inner = Some(shape),
                Some(expected) if *expected != shape => {
                    return Err(IndexError::InvalidIndex(format!(
                        "{item} (ragged nested sequence)"
                    )));
                }
                Some(_) => {}
            }
            values.append(&mut vals);
        }

        let mut shape = vec![items.len()];
        shape.extend(inner.unwrap_or_default());
        Ok((shape, values))
    }

    fn leaf_to_intp(&self, leaf: &IndexArg) -> IndexResult<isize> {
        match leaf {
            IndexArg::Int(v) => self.narrow(*v),
            IndexArg::Bool(b) => Ok(isize::from(*b)),
            IndexArg::Scalar(value) => self.scalar_to_intp(value),
            IndexArg::Array(array) if array.ndim() == 0 => {
                let ty = array.element_type();
                if ty.is_integer() {
                    self.narrow(array.scalar_int()?)
                } else if ty.is_bool() {
                    Ok(isize::from(array.scalar_bool()?))
                } else {
                    Err(IndexError::NonIntegerArray(ty))
                }
            }
            other => Err(IndexError::InvalidIndex(other.to_string())),
        }
    }

    fn scalar_to_intp(&self, value: &HostValue) -> IndexResult<isize> {
        if !value.has_numeric_conversion() {
            return Err(IndexError::InvalidIndex(value.to_string()));
        }
        match to_intp(self.conversion.as_ref(), value, self.config.pointer_width) {
            Ok(v) => Ok(v),
            Err(ConversionError::NotNumeric { .. }) => {
                Err(IndexError::InvalidIndex(value.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for IndexNormalizer {
    fn default() -> Self {
        Self::new(IndexConfig::default())
    }
}

impl std::fmt::Debug for IndexNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexNormalizer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
