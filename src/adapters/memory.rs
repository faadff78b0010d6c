//! # Memory Array Adapter
//!
//! An owned, in-memory array implementing both collaborator ports:
//! [`ArrayMemory`] (so the accessors can read and write it) and
//! [`IndexArray`] (so it can be passed as a fancy index).
//!
//! Good for:
//! - Testing the accessors against swapped and unaligned layouts
//! - Building index arrays without an external array engine
//!
//! Storage is word-aligned; [`MemoryArray::unaligned`] shifts the element
//! region by one byte to produce a misaligned buffer on purpose.

use crate::adapters::convert::StandardConversion;
use crate::core::{ByteOrder, ElementType, HostValue, ItemValue};
use crate::engine::registry;
use crate::ports::{ArrayMemory, IndexArray, IndexError, IndexResult, ItemResult};

/// In-memory array
#[derive(Debug, Clone)]
pub struct MemoryArray {
    /// Backing words; element bytes start at `base`
    words: Vec<u64>,

    /// Byte shift of the element region inside `words`
    base: usize,

    element_type: ElementType,

    shape: Vec<usize>,

    byte_order: ByteOrder,
}

impl MemoryArray {
    /// Create a zero-filled array in host byte order
    pub fn new(element_type: ElementType, shape: Vec<usize>) -> Self {
        let nbytes = shape.iter().product::<usize>() * element_type.itemsize();
        Self {
            words: vec![0; words_for(nbytes)],
            base: 0,
            element_type,
            shape,
            byte_order: ByteOrder::Native,
        }
    }

    /// Zero-dimensional array holding one value
    pub fn scalar(value: ItemValue) -> Self {
        let mut arr = Self::new(value.element_type(), vec![]);
        registry::store_item(&mut arr, 0, value);
        arr
    }

    /// Build an array from host values, converting each through the
    /// accessor registry
    pub fn from_values(
        element_type: ElementType,
        shape: Vec<usize>,
        values: &[HostValue],
    ) -> ItemResult<Self> {
        let mut arr = Self::new(element_type, shape);
        debug_assert_eq!(arr.size(), values.len());
        for (i, value) in values.iter().enumerate() {
            arr.set(i, value)?;
        }
        Ok(arr)
    }

    /// Store elements in the given byte order. Existing bytes are kept
    /// as is, so call this before writing.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Shift the element region off word alignment by one byte
    pub fn unaligned(mut self) -> Self {
        let nbytes = self.nbytes();
        let mut words = vec![0u64; words_for(nbytes + 1)];
        {
            let dest: &mut [u8] = bytemuck::cast_slice_mut(&mut words);
            dest[1..1 + nbytes].copy_from_slice(self.bytes());
        }
        self.words = words;
        self.base = 1;
        self
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn itemsize(&self) -> usize {
        self.element_type.itemsize()
    }

    pub fn nbytes(&self) -> usize {
        self.size() * self.itemsize()
    }

    /// Whether element storage sits on the element type's alignment
    pub fn is_aligned(&self) -> bool {
        let addr = self.words.as_ptr() as usize + self.base;
        addr % self.element_type.alignment() == 0
    }

    /// Byte offset of the element at flat (C-order) position `index`
    pub fn offset_of(&self, index: usize) -> usize {
        index * self.itemsize()
    }

    /// Read the element at flat position `index`.
    ///
    /// Panics if `index` is past the end of the array.
    pub fn get(&self, index: usize) -> ItemResult<ItemValue> {
        registry::get_item(self, self.offset_of(index))
    }

    /// Write `value` at flat position `index`.
    ///
    /// Panics if `index` is past the end of the array.
    pub fn set(&mut self, index: usize, value: &HostValue) -> ItemResult<()> {
        let offset = self.offset_of(index);
        registry::set_item(self, value, offset, &StandardConversion)
    }

    /// All elements in C order
    pub fn to_vec(&self) -> ItemResult<Vec<ItemValue>> {
        (0..self.size()).map(|i| self.get(i)).collect()
    }
}

fn words_for(nbytes: usize) -> usize {
    nbytes.div_ceil(8)
}

impl ArrayMemory for MemoryArray {
    fn bytes(&self) -> &[u8] {
        let all: &[u8] = bytemuck::cast_slice(&self.words);
        &all[self.base..self.base + self.nbytes()]
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        let (base, nbytes) = (self.base, self.nbytes());
        let all: &mut [u8] = bytemuck::cast_slice_mut(&mut self.words);
        &mut all[base..base + nbytes]
    }

    fn is_behaved(&self) -> bool {
        self.is_aligned() && self.is_not_swapped()
    }

    fn is_not_swapped(&self) -> bool {
        self.byte_order.is_native()
    }

    fn element_type(&self) -> ElementType {
        self.element_type
    }

    fn ndim(&self) -> usize {
        self.shape.len()
    }

    fn size(&self) -> usize {
        self.shape.iter().product()
    }
}

impl IndexArray for MemoryArray {
    fn ndim(&self) -> usize {
        self.shape.len()
    }

    fn shape(&self) -> Vec<usize> {
        self.shape.clone()
    }

    fn element_type(&self) -> ElementType {
        self.element_type
    }

    fn scalar_bool(&self) -> IndexResult<bool> {
        Ok(self.get(0)?.is_truthy())
    }

    fn scalar_int(&self) -> IndexResult<i128> {
        let item = self.get(0)?;
        item.as_i128()
            .ok_or_else(|| IndexError::InvalidIndex(item.to_string()))
    }

    fn flat_bools(&self) -> IndexResult<Vec<bool>> {
        Ok(self.to_vec()?.iter().map(ItemValue::is_truthy).collect())
    }

    fn flat_ints(&self) -> IndexResult<Vec<i128>> {
        self.to_vec()?
            .into_iter()
            .map(|item| {
                item.as_i128()
                    .ok_or_else(|| IndexError::InvalidIndex(item.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ItemError;

    #[test]
    fn test_memory_array_new() {
        let arr = MemoryArray::new(ElementType::Int, vec![2, 3]);
        assert_eq!(ArrayMemory::size(&arr), 6);
        assert_eq!(arr.nbytes(), 24);
        assert_eq!(arr.bytes().len(), 24);
        assert!(arr.is_behaved());
        assert!(arr.to_vec().unwrap().iter().all(|v| *v == ItemValue::I32(0)));
    }

    #[test]
    fn test_memory_array_set_get() {
        let mut arr = MemoryArray::new(ElementType::Double, vec![3]);
        arr.set(1, &HostValue::Float(2.5)).unwrap();
        assert_eq!(arr.get(1).unwrap(), ItemValue::F64(2.5));
        assert_eq!(arr.get(0).unwrap(), ItemValue::F64(0.0));
    }

    #[test]
    fn test_unaligned_keeps_contents() {
        let mut arr = MemoryArray::new(ElementType::Long, vec![2]);
        arr.set(0, &HostValue::Int(11)).unwrap();
        arr.set(1, &HostValue::Int(-22)).unwrap();

        let arr = arr.unaligned();
        assert!(!arr.is_aligned());
        assert!(!arr.is_behaved());
        assert_eq!(
            arr.to_vec().unwrap(),
            vec![ItemValue::I64(11), ItemValue::I64(-22)]
        );
    }

    #[test]
    fn test_swapped_array_is_not_behaved() {
        let arr = MemoryArray::new(ElementType::Short, vec![1]).with_byte_order(ByteOrder::Swapped);
        assert!(arr.is_aligned());
        assert!(!arr.is_behaved());
        assert!(!arr.is_not_swapped());
    }

    #[test]
    fn test_from_values() {
        let arr = MemoryArray::from_values(
            ElementType::UByte,
            vec![3],
            &[HostValue::Int(1), HostValue::Bool(true), HostValue::Float(7.9)],
        )
        .unwrap();
        assert_eq!(
            arr.to_vec().unwrap(),
            vec![ItemValue::U8(1), ItemValue::U8(1), ItemValue::U8(7)]
        );

        let err = MemoryArray::from_values(ElementType::UByte, vec![1], &[HostValue::Int(-1)])
            .unwrap_err();
        assert!(matches!(err, ItemError::Conversion(_)));
    }

    #[test]
    fn test_scalar_array() {
        let arr = MemoryArray::scalar(ItemValue::I16(-4));
        assert_eq!(IndexArray::ndim(&arr), 0);
        assert_eq!(arr.scalar_int().unwrap(), -4);

        let arr = MemoryArray::scalar(ItemValue::Bool(true));
        assert!(arr.scalar_bool().unwrap());
    }

    #[test]
    fn test_index_array_flattening() {
        let arr = MemoryArray::from_values(
            ElementType::Long,
            vec![2, 2],
            &[
                HostValue::Int(0),
                HostValue::Int(1),
                HostValue::Int(-1),
                HostValue::Int(5),
            ],
        )
        .unwrap();
        assert_eq!(IndexArray::shape(&arr), vec![2, 2]);
        assert_eq!(arr.flat_ints().unwrap(), vec![0, 1, -1, 5]);
        assert_eq!(arr.flat_bools().unwrap(), vec![false, true, true, true]);
    }

    #[test]
    fn test_float_array_has_no_integer_view() {
        let arr = MemoryArray::scalar(ItemValue::F64(1.0));
        assert!(matches!(
            arr.scalar_int(),
            Err(IndexError::InvalidIndex(_))
        ));
    }
}
