//! # Python Bindings
//!
//! PyO3 front end: converts Python subscript arguments into [`IndexArg`]s
//! and exposes typed element access over an owned buffer.
//!
//! ## Python API
//!
//! ```python
//! from nditem import normalize_index, ItemBuffer
//!
//! # Subscript normalization
//! normalize_index([1, 2, 3])            # [("intp_array", (3,), [1, 2, 3])]
//! normalize_index((slice(0, 2), 3))     # [("slice", 0, 2, None), ("int", 3)]
//! normalize_index(None, ...)            # [("newaxis",), ("ellipsis",)]
//!
//! # Element access
//! buf = ItemBuffer("int32", [4], byteorder=">")
//! buf.setitem(4, 7)
//! buf.getitem(4)    # 7
//! buf.tobytes()     # b"\x00\x00\x00\x00\x00\x00\x00\x07..."
//! ```

use std::str::FromStr;

use num_complex::Complex64;
use pyo3::exceptions::{PyIndexError, PyOverflowError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{
    PyBool, PyBytes, PyComplex, PyFloat, PyList, PyLong, PySlice, PyString, PyTuple,
};

use crate::adapters::MemoryArray;
use crate::core::{
    ByteOrder, ElementType, HostValue, IndexArg, IndexComponent, IndexConfig, ItemValue,
    SliceArg, MAX_DIMS,
};
use crate::engine::{has_accessor, IndexNormalizer};
use crate::ports::{ArrayMemory, ConversionError, IndexError, ItemError};

// ============================================================================
// ERROR MAPPING
// ============================================================================

fn conversion_err(e: ConversionError) -> PyErr {
    match e {
        ConversionError::Overflow { .. } => PyOverflowError::new_err(e.to_string()),
        ConversionError::InvalidLiteral { .. } => PyValueError::new_err(e.to_string()),
        ConversionError::NotNumeric { .. } => PyTypeError::new_err(e.to_string()),
    }
}

fn item_err(e: ItemError) -> PyErr {
    match e {
        ItemError::Conversion(inner) => conversion_err(inner),
        ItemError::UnsupportedElementType(_) | ItemError::NotConvertible { .. } => {
            PyTypeError::new_err(e.to_string())
        }
    }
}

fn index_err(e: IndexError) -> PyErr {
    match e {
        IndexError::TooManyIndices { .. } | IndexError::NonIntegerArray(_) => {
            PyIndexError::new_err(e.to_string())
        }
        IndexError::InvalidIndex(_) => PyTypeError::new_err(e.to_string()),
        IndexError::Conversion(inner) => conversion_err(inner),
        IndexError::Item(inner) => item_err(inner),
    }
}

// ============================================================================
// PYTHON -> RUST
// ============================================================================

/// Convert a Python value into a host value for element writes
fn host_value(obj: &Bound<'_, PyAny>) -> PyResult<HostValue> {
    if obj.is_none() {
        return Ok(HostValue::None);
    }
    // bool before int: Python bools are ints
    if let Ok(b) = obj.downcast::<PyBool>() {
        return Ok(HostValue::Bool(b.is_true()));
    }
    if obj.is_instance_of::<PyLong>() {
        return Ok(HostValue::Int(obj.extract::<i128>()?));
    }
    if let Ok(f) = obj.downcast::<PyFloat>() {
        return Ok(HostValue::Float(f.value()));
    }
    if let Ok(c) = obj.downcast::<PyComplex>() {
        return Ok(HostValue::Complex(Complex64::new(c.real(), c.imag())));
    }
    if let Ok(s) = obj.downcast::<PyString>() {
        return Ok(HostValue::Str(s.to_cow()?.into_owned()));
    }
    if obj.hasattr("__index__")? {
        return Ok(HostValue::Int(obj.call_method0("__index__")?.extract::<i128>()?));
    }
    if obj.hasattr("__float__")? {
        return Ok(HostValue::Float(obj.call_method0("__float__")?.extract::<f64>()?));
    }
    Ok(HostValue::Opaque(type_name(obj)))
}

fn type_name(obj: &Bound<'_, PyAny>) -> String {
    obj.get_type()
        .name()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| "object".to_string())
}

/// Whether `obj` looks like an ndarray
fn is_array_like(obj: &Bound<'_, PyAny>) -> PyResult<bool> {
    Ok(obj.hasattr("ndim")? && obj.hasattr("dtype")? && obj.hasattr("shape")?)
}

/// Copy an integer or boolean ndarray-like object into a [`MemoryArray`].
///
/// The element type comes from `dtype.kind` and `dtype.itemsize`, so byte
/// order does not matter; `tolist()` already yields host values.
fn materialize_array(obj: &Bound<'_, PyAny>) -> PyResult<MemoryArray> {
    let dtype = obj.getattr("dtype")?;
    let kind: char = dtype.getattr("kind")?.extract()?;
    let itemsize: usize = dtype.getattr("itemsize")?.extract()?;

    let element_type = match ElementType::from_kind(kind, itemsize) {
        Some(ty) if ty.is_integer() || ty.is_bool() => ty,
        Some(ty) => return Err(index_err(IndexError::NonIntegerArray(ty))),
        None => {
            return Err(PyIndexError::new_err(format!(
                "arrays used as indices must be of integer (or boolean) type, not {}",
                dtype.str()?
            )))
        }
    };
    let shape: Vec<usize> = obj.getattr("shape")?.extract()?;

    let flat = obj.call_method0("ravel")?.call_method0("tolist")?;
    let values = flat
        .iter()?
        .map(|item| host_value(&item?))
        .collect::<PyResult<Vec<_>>>()?;

    MemoryArray::from_values(element_type, shape, &values).map_err(item_err)
}

/// Any ordered sequence except text and bytes (`list`, `tuple`, `range`, ...)
fn is_index_sequence(obj: &Bound<'_, PyAny>) -> PyResult<bool> {
    if obj.is_instance_of::<PyList>() || obj.is_instance_of::<PyTuple>() {
        return Ok(true);
    }
    if obj.is_instance_of::<PyString>() || obj.is_instance_of::<PyBytes>() {
        return Ok(false);
    }
    let abc = obj.py().import_bound("collections.abc")?;
    obj.is_instance(&abc.getattr("Sequence")?)
}

/// Convert one Python subscript token into an [`IndexArg`]
fn index_arg(obj: &Bound<'_, PyAny>) -> PyResult<IndexArg> {
    let py = obj.py();

    if obj.is_none() {
        return Ok(IndexArg::NewAxis);
    }
    if obj.is(&py.Ellipsis()) {
        return Ok(IndexArg::Ellipsis);
    }
    if let Ok(b) = obj.downcast::<PyBool>() {
        return Ok(IndexArg::Bool(b.is_true()));
    }
    if obj.is_instance_of::<PyLong>() {
        return Ok(IndexArg::Int(obj.extract::<i128>()?));
    }
    if let Ok(slice) = obj.downcast::<PySlice>() {
        let endpoint = |name: &str| -> PyResult<Option<isize>> { slice.getattr(name)?.extract() };
        return Ok(IndexArg::Slice(SliceArg::new(
            endpoint("start")?,
            endpoint("stop")?,
            endpoint("step")?,
        )));
    }
    if let Ok(s) = obj.downcast::<PyString>() {
        return Ok(IndexArg::Field(s.to_cow()?.into_owned()));
    }
    if is_array_like(obj)? {
        return Ok(IndexArg::array(materialize_array(obj)?));
    }
    if is_index_sequence(obj)? {
        let items = obj
            .iter()?
            .map(|item| index_arg(&item?))
            .collect::<PyResult<Vec<_>>>()?;
        return Ok(IndexArg::Sequence(items));
    }
    Ok(IndexArg::Scalar(host_value(obj)?))
}

// ============================================================================
// RUST -> PYTHON
// ============================================================================

fn item_to_py(py: Python<'_>, item: ItemValue) -> PyObject {
    match item {
        ItemValue::Bool(v) => v.into_py(py),
        ItemValue::I8(v) => v.into_py(py),
        ItemValue::U8(v) => v.into_py(py),
        ItemValue::I16(v) => v.into_py(py),
        ItemValue::U16(v) => v.into_py(py),
        ItemValue::I32(v) => v.into_py(py),
        ItemValue::U32(v) => v.into_py(py),
        ItemValue::I64(v) => v.into_py(py),
        ItemValue::U64(v) => v.into_py(py),
        ItemValue::F32(v) => v.into_py(py),
        ItemValue::F64(v) => v.into_py(py),
        ItemValue::C64(v) => Complex64::new(v.re.into(), v.im.into()).into_py(py),
        ItemValue::C128(v) => v.into_py(py),
    }
}

fn component_to_py(py: Python<'_>, component: IndexComponent) -> PyObject {
    match component {
        IndexComponent::NewAxis => ("newaxis",).into_py(py),
        IndexComponent::Ellipsis => ("ellipsis",).into_py(py),
        IndexComponent::Bool(b) => ("bool", b).into_py(py),
        IndexComponent::Int(v) => ("int", v).into_py(py),
        IndexComponent::Slice(s) => ("slice", s.start, s.stop, s.step).into_py(py),
        IndexComponent::Field(name) => ("field", name).into_py(py),
        IndexComponent::IntArray(a) => {
            let shape = PyTuple::new_bound(py, a.shape);
            ("intp_array", shape, a.values).into_py(py)
        }
        IndexComponent::BoolArray(m) => {
            let shape = PyTuple::new_bound(py, m.shape);
            ("bool_array", shape, m.mask).into_py(py)
        }
    }
}

// ============================================================================
// MODULE API
// ============================================================================

/// Normalize subscript arguments
///
/// Args:
///     *args: The subscript, as `a[...]` would pass it (a tuple for
///         `a[x, y]` may be given either unpacked or as one argument)
///     max_dims: Maximum number of indices (default: 32)
///
/// Returns:
///     List[tuple]: One tagged tuple per normalized component
#[pyfunction]
#[pyo3(signature = (*args, max_dims = MAX_DIMS))]
fn normalize_index(
    py: Python<'_>,
    args: &Bound<'_, PyTuple>,
    max_dims: usize,
) -> PyResult<Vec<PyObject>> {
    let args = args
        .iter()
        .map(|arg| index_arg(&arg))
        .collect::<PyResult<Vec<_>>>()?;

    let normalizer = IndexNormalizer::new(IndexConfig::new(max_dims));
    let index = normalizer.normalize(&args).map_err(index_err)?;

    Ok(index
        .into_iter()
        .map(|c| component_to_py(py, c))
        .collect())
}

/// Typed element buffer
///
/// Owned storage of one element type with a chosen byte order, read and
/// written element by element at byte offsets.
#[pyclass(name = "ItemBuffer")]
pub struct PyItemBuffer {
    inner: MemoryArray,
}

impl PyItemBuffer {
    fn check_offset(&self, offset: usize) -> PyResult<()> {
        let end = offset.checked_add(self.inner.itemsize());
        match end {
            Some(end) if end <= self.inner.nbytes() => Ok(()),
            _ => Err(PyIndexError::new_err(format!(
                "offset {} out of bounds for buffer of {} bytes",
                offset,
                self.inner.nbytes()
            ))),
        }
    }
}

#[pymethods]
impl PyItemBuffer {
    /// Create a zero-filled buffer
    ///
    /// Args:
    ///     dtype: Element type name (e.g. "int32", "float64", "complex128")
    ///     shape: Array shape
    ///     byteorder: One of "<", ">", "=", "s" (default: native)
    ///     aligned: Whether element storage is aligned (default: True)
    #[new]
    #[pyo3(signature = (dtype, shape, byteorder = "=", aligned = true))]
    fn new(dtype: &str, shape: Vec<usize>, byteorder: &str, aligned: bool) -> PyResult<Self> {
        let element_type =
            ElementType::from_str(dtype).map_err(|e| PyTypeError::new_err(e.to_string()))?;
        if !has_accessor(element_type) {
            return Err(PyTypeError::new_err(format!(
                "no element accessor for type {}",
                element_type
            )));
        }
        let byte_order =
            ByteOrder::from_str(byteorder).map_err(|e| PyValueError::new_err(e.to_string()))?;

        let mut inner = MemoryArray::new(element_type, shape).with_byte_order(byte_order);
        if !aligned {
            inner = inner.unaligned();
        }
        Ok(Self { inner })
    }

    /// Read the element at a byte offset
    fn getitem(&self, py: Python<'_>, offset: usize) -> PyResult<PyObject> {
        self.check_offset(offset)?;
        let item = crate::engine::get_item(&self.inner, offset).map_err(item_err)?;
        Ok(item_to_py(py, item))
    }

    /// Write a value at a byte offset, converting it to the element type
    fn setitem(&mut self, offset: usize, value: &Bound<'_, PyAny>) -> PyResult<()> {
        self.check_offset(offset)?;
        let value = host_value(value)?;
        crate::engine::set_item(
            &mut self.inner,
            &value,
            offset,
            &crate::adapters::StandardConversion,
        )
        .map_err(item_err)
    }

    #[getter]
    fn dtype(&self) -> String {
        self.inner.element_type().to_string()
    }

    #[getter]
    fn itemsize(&self) -> usize {
        self.inner.itemsize()
    }

    #[getter]
    fn nbytes(&self) -> usize {
        self.inner.nbytes()
    }

    #[getter]
    fn byteorder(&self) -> char {
        self.inner.byte_order().as_char()
    }

    /// Raw element bytes
    fn tobytes<'py>(&self, py: Python<'py>) -> Bound<'py, PyBytes> {
        PyBytes::new_bound(py, self.inner.bytes())
    }

    fn __len__(&self) -> usize {
        ArrayMemory::size(&self.inner)
    }

    fn __repr__(&self) -> String {
        format!(
            "ItemBuffer(dtype='{}', shape={:?}, byteorder='{}')",
            self.inner.element_type(),
            self.inner.shape(),
            self.inner.byte_order().as_char()
        )
    }
}

/// nditem Python module
#[pymodule]
fn nditem(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(normalize_index, m)?)?;
    m.add_class::<PyItemBuffer>()?;

    m.add("MAX_DIMS", MAX_DIMS)?;
    m.add("__doc__", "nditem: typed element access and subscript normalization")?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
