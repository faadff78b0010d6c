//! # Typed Accessor Registry
//!
//! One `(get_item, set_item)` pair per element type, held in a static
//! table indexed by type number. The table is built at compile time and
//! never written afterwards, so lookups need no synchronization.
//!
//! Readers and writers take the direct path for behaved buffers and go
//! through the byte-order codec otherwise. Complex elements are two
//! consecutive floats (real, then imaginary), each swapped on its own.

use num_complex::{Complex32, Complex64};
use tracing::{error, trace};

use crate::core::swap::{copy_swap, Width};
use crate::core::{ElementType, HostValue, ItemValue};
use crate::ports::{
    ArrayMemory, ConversionError, ConversionResult, IntWidth, ItemError, ItemResult,
    ScalarConversion,
};

/// Reads the element at a byte offset
pub type GetItem = fn(usize, &dyn ArrayMemory) -> ItemValue;

/// Coerces a host value and stores it at a byte offset
pub type SetItem =
    fn(&HostValue, usize, &mut dyn ArrayMemory, &dyn ScalarConversion) -> ItemResult<()>;

/// Accessor pair for one element type
#[derive(Clone, Copy)]
pub struct ArrFuncs {
    pub get_item: GetItem,
    pub set_item: SetItem,
}

impl std::fmt::Debug for ArrFuncs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrFuncs").finish_non_exhaustive()
    }
}

const fn entry(get_item: GetItem, set_item: SetItem) -> Option<ArrFuncs> {
    Some(ArrFuncs { get_item, set_item })
}

static ACCESSORS: [Option<ArrFuncs>; ElementType::COUNT] = {
    let mut table: [Option<ArrFuncs>; ElementType::COUNT] = [None; ElementType::COUNT];
    table[ElementType::Bool as usize] = entry(get_bool, set_bool);
    table[ElementType::Byte as usize] = entry(get_byte, set_byte);
    table[ElementType::UByte as usize] = entry(get_ubyte, set_ubyte);
    table[ElementType::Short as usize] = entry(get_short, set_short);
    table[ElementType::UShort as usize] = entry(get_ushort, set_ushort);
    table[ElementType::Int as usize] = entry(get_int, set_int);
    table[ElementType::UInt as usize] = entry(get_uint, set_uint);
    table[ElementType::Long as usize] = entry(get_long, set_long);
    table[ElementType::ULong as usize] = entry(get_ulong, set_ulong);
    table[ElementType::Float as usize] = entry(get_float, set_float);
    table[ElementType::Double as usize] = entry(get_double, set_double);
    table[ElementType::CFloat as usize] = entry(get_cfloat, set_cfloat);
    table[ElementType::CDouble as usize] = entry(get_cdouble, set_cdouble);
    table
};

/// The accessor pair for `ty`, or `None` if the type has no accessor
pub fn accessor(ty: ElementType) -> Option<&'static ArrFuncs> {
    ACCESSORS[ty.type_num()].as_ref()
}

pub fn has_accessor(ty: ElementType) -> bool {
    accessor(ty).is_some()
}

/// Read the element at `offset` using the array's own element type
pub fn get_item(arr: &dyn ArrayMemory, offset: usize) -> ItemResult<ItemValue> {
    let ty = arr.element_type();
    let funcs = accessor(ty).ok_or_else(|| unsupported(ty))?;
    Ok((funcs.get_item)(offset, arr))
}

/// Store `value` at `offset` using the array's own element type.
///
/// On error the buffer is left untouched.
pub fn set_item(
    arr: &mut dyn ArrayMemory,
    value: &HostValue,
    offset: usize,
    conversion: &dyn ScalarConversion,
) -> ItemResult<()> {
    let ty = arr.element_type();
    let funcs = accessor(ty).ok_or_else(|| unsupported(ty))?;
    (funcs.set_item)(value, offset, arr, conversion)
}

fn unsupported(ty: ElementType) -> ItemError {
    error!(element_type = %ty, "element access requested for type without accessor");
    ItemError::UnsupportedElementType(ty)
}

// ============================================================================
// RAW LOADS AND STORES
// ============================================================================

/// Fixed-width native types handled by the codec
trait Native: Copy {
    const WIDTH: Width;
    type Raw: AsRef<[u8]> + AsMut<[u8]> + Default;

    fn from_raw(raw: Self::Raw) -> Self;
    fn into_raw(self) -> Self::Raw;
}

macro_rules! impl_native {
    ($($ty:ty => $width:ident, $n:literal;)*) => {
        $(
            impl Native for $ty {
                const WIDTH: Width = Width::$width;
                type Raw = [u8; $n];

                #[inline]
                fn from_raw(raw: Self::Raw) -> Self {
                    <$ty>::from_ne_bytes(raw)
                }

                #[inline]
                fn into_raw(self) -> Self::Raw {
                    self.to_ne_bytes()
                }
            }
        )*
    };
}

impl_native! {
    i16 => Two, 2;
    u16 => Two, 2;
    i32 => Four, 4;
    u32 => Four, 4;
    f32 => Four, 4;
    i64 => Eight, 8;
    u64 => Eight, 8;
    f64 => Eight, 8;
}

#[inline]
fn read_native<T: Native>(arr: &dyn ArrayMemory, offset: usize) -> T {
    let src = &arr.bytes()[offset..offset + T::WIDTH.bytes()];
    let mut raw = T::Raw::default();
    if arr.is_behaved() {
        raw.as_mut().copy_from_slice(src);
    } else {
        let swap = !arr.is_not_swapped();
        trace!(offset, swap, "unbehaved element read");
        copy_swap(T::WIDTH, raw.as_mut(), src, swap);
    }
    T::from_raw(raw)
}

#[inline]
fn write_native<T: Native>(arr: &mut dyn ArrayMemory, offset: usize, value: T) {
    let behaved = arr.is_behaved();
    let swap = !arr.is_not_swapped();
    let raw = value.into_raw();
    let dest = &mut arr.bytes_mut()[offset..offset + T::WIDTH.bytes()];
    if behaved {
        dest.copy_from_slice(raw.as_ref());
    } else {
        trace!(offset, swap, "unbehaved element write");
        copy_swap(T::WIDTH, dest, raw.as_ref(), swap);
    }
}

/// Store an item of the array's own element type at `offset`.
///
/// Every item variant has a fixed layout, so no conversion and no error
/// path is involved.
pub(crate) fn store_item(arr: &mut dyn ArrayMemory, offset: usize, item: ItemValue) {
    debug_assert_eq!(arr.element_type(), item.element_type());
    match item {
        ItemValue::Bool(v) => arr.bytes_mut()[offset] = v as u8,
        ItemValue::I8(v) => arr.bytes_mut()[offset] = v as u8,
        ItemValue::U8(v) => arr.bytes_mut()[offset] = v,
        ItemValue::I16(v) => write_native(arr, offset, v),
        ItemValue::U16(v) => write_native(arr, offset, v),
        ItemValue::I32(v) => write_native(arr, offset, v),
        ItemValue::U32(v) => write_native(arr, offset, v),
        ItemValue::I64(v) => write_native(arr, offset, v),
        ItemValue::U64(v) => write_native(arr, offset, v),
        ItemValue::F32(v) => write_native(arr, offset, v),
        ItemValue::F64(v) => write_native(arr, offset, v),
        ItemValue::C64(c) => {
            write_native(arr, offset, c.re);
            write_native(arr, offset + 4, c.im);
        }
        ItemValue::C128(c) => {
            write_native(arr, offset, c.re);
            write_native(arr, offset + 8, c.im);
        }
    }
}

// ============================================================================
// COERCION
// ============================================================================

/// Capability-based coercion shared by every writer.
///
/// An item of exactly the destination type is used as is. Otherwise the
/// value must offer numeric conversion; a conversion the service cannot
/// perform at all is a write-type error, while range and literal failures
/// pass through unchanged.
fn coerce<T>(
    value: &HostValue,
    target: ElementType,
    exact: impl FnOnce(&ItemValue) -> Option<T>,
    convert: impl FnOnce(&HostValue) -> ConversionResult<T>,
) -> ItemResult<T> {
    if let HostValue::Item(item) = value {
        if let Some(v) = exact(item) {
            return Ok(v);
        }
    }

    let not_convertible = || ItemError::NotConvertible {
        value: value.to_string(),
        target,
    };

    if !value.has_numeric_conversion() {
        return Err(not_convertible());
    }

    convert(value).map_err(|e| match e {
        ConversionError::NotNumeric { .. } => not_convertible(),
        other => ItemError::Conversion(other),
    })
}

// ============================================================================
// SINGLE-BYTE TYPES
// ============================================================================

fn get_bool(offset: usize, arr: &dyn ArrayMemory) -> ItemValue {
    ItemValue::Bool(arr.bytes()[offset] != 0)
}

fn set_bool(
    value: &HostValue,
    offset: usize,
    arr: &mut dyn ArrayMemory,
    conv: &dyn ScalarConversion,
) -> ItemResult<()> {
    let v = coerce(
        value,
        ElementType::Bool,
        |item| match *item {
            ItemValue::Bool(b) => Some(b),
            _ => None,
        },
        |value| conv.to_native_boolean(value),
    )?;
    arr.bytes_mut()[offset] = v as u8;
    Ok(())
}

fn get_byte(offset: usize, arr: &dyn ArrayMemory) -> ItemValue {
    ItemValue::I8(arr.bytes()[offset] as i8)
}

fn set_byte(
    value: &HostValue,
    offset: usize,
    arr: &mut dyn ArrayMemory,
    conv: &dyn ScalarConversion,
) -> ItemResult<()> {
    let v = coerce(
        value,
        ElementType::Byte,
        |item| match *item {
            ItemValue::I8(v) => Some(v),
            _ => None,
        },
        |value| conv.to_native_integer(value, IntWidth::I8).map(|v| v as i8),
    )?;
    arr.bytes_mut()[offset] = v as u8;
    Ok(())
}

fn get_ubyte(offset: usize, arr: &dyn ArrayMemory) -> ItemValue {
    ItemValue::U8(arr.bytes()[offset])
}

fn set_ubyte(
    value: &HostValue,
    offset: usize,
    arr: &mut dyn ArrayMemory,
    conv: &dyn ScalarConversion,
) -> ItemResult<()> {
    let v = coerce(
        value,
        ElementType::UByte,
        |item| match *item {
            ItemValue::U8(v) => Some(v),
            _ => None,
        },
        |value| conv.to_native_integer(value, IntWidth::U8).map(|v| v as u8),
    )?;
    arr.bytes_mut()[offset] = v;
    Ok(())
}

// ============================================================================
// MULTI-BYTE TYPES
// ============================================================================

macro_rules! integer_accessors {
    ($($get:ident, $set:ident: $ty:ty, $variant:ident, $tag:ident, $width:ident;)*) => {
        $(
            fn $get(offset: usize, arr: &dyn ArrayMemory) -> ItemValue {
                ItemValue::$variant(read_native::<$ty>(arr, offset))
            }

            fn $set(
                value: &HostValue,
                offset: usize,
                arr: &mut dyn ArrayMemory,
                conv: &dyn ScalarConversion,
            ) -> ItemResult<()> {
                let v = coerce(
                    value,
                    ElementType::$tag,
                    |item| match *item {
                        ItemValue::$variant(v) => Some(v),
                        _ => None,
                    },
                    // in range by the conversion contract
                    |value| conv.to_native_integer(value, IntWidth::$width).map(|v| v as $ty),
                )?;
                write_native(arr, offset, v);
                Ok(())
            }
        )*
    };
}

integer_accessors! {
    get_short, set_short: i16, I16, Short, I16;
    get_ushort, set_ushort: u16, U16, UShort, U16;
    get_int, set_int: i32, I32, Int, I32;
    get_uint, set_uint: u32, U32, UInt, U32;
    get_long, set_long: i64, I64, Long, I64;
    get_ulong, set_ulong: u64, U64, ULong, U64;
}

fn get_float(offset: usize, arr: &dyn ArrayMemory) -> ItemValue {
    ItemValue::F32(read_native::<f32>(arr, offset))
}

fn set_float(
    value: &HostValue,
    offset: usize,
    arr: &mut dyn ArrayMemory,
    conv: &dyn ScalarConversion,
) -> ItemResult<()> {
    let v = coerce(
        value,
        ElementType::Float,
        |item| match *item {
            ItemValue::F32(v) => Some(v),
            _ => None,
        },
        |value| conv.to_native_float(value).map(|v| v as f32),
    )?;
    write_native(arr, offset, v);
    Ok(())
}

fn get_double(offset: usize, arr: &dyn ArrayMemory) -> ItemValue {
    ItemValue::F64(read_native::<f64>(arr, offset))
}

fn set_double(
    value: &HostValue,
    offset: usize,
    arr: &mut dyn ArrayMemory,
    conv: &dyn ScalarConversion,
) -> ItemResult<()> {
    let v = coerce(
        value,
        ElementType::Double,
        |item| match *item {
            ItemValue::F64(v) => Some(v),
            _ => None,
        },
        |value| conv.to_native_float(value),
    )?;
    write_native(arr, offset, v);
    Ok(())
}

fn get_cfloat(offset: usize, arr: &dyn ArrayMemory) -> ItemValue {
    let re = read_native::<f32>(arr, offset);
    let im = read_native::<f32>(arr, offset + 4);
    ItemValue::C64(Complex32::new(re, im))
}

fn set_cfloat(
    value: &HostValue,
    offset: usize,
    arr: &mut dyn ArrayMemory,
    conv: &dyn ScalarConversion,
) -> ItemResult<()> {
    let v = coerce(
        value,
        ElementType::CFloat,
        |item| match *item {
            ItemValue::C64(c) => Some(c),
            _ => None,
        },
        |value| {
            conv.to_native_complex(value)
                .map(|c| Complex32::new(c.re as f32, c.im as f32))
        },
    )?;
    write_native(arr, offset, v.re);
    write_native(arr, offset + 4, v.im);
    Ok(())
}

fn get_cdouble(offset: usize, arr: &dyn ArrayMemory) -> ItemValue {
    let re = read_native::<f64>(arr, offset);
    let im = read_native::<f64>(arr, offset + 8);
    ItemValue::C128(Complex64::new(re, im))
}

fn set_cdouble(
    value: &HostValue,
    offset: usize,
    arr: &mut dyn ArrayMemory,
    conv: &dyn ScalarConversion,
) -> ItemResult<()> {
    let v = coerce(
        value,
        ElementType::CDouble,
        |item| match *item {
            ItemValue::C128(c) => Some(c),
            _ => None,
        },
        |value| conv.to_native_complex(value),
    )?;
    write_native(arr, offset, v.re);
    write_native(arr, offset + 8, v.im);
    Ok(())
}
