//! # Element Types
//!
//! The elemental type tag carried by every array descriptor.
//!
//! Tags follow numpy's type numbering. Only a subset has element
//! accessors (see [`crate::engine::registry`]); the rest are reserved so
//! that a descriptor can still name them and callers can route them to a
//! fallback conversion path.

use std::fmt;
use std::str::FromStr;

/// Native storage format of one array element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ElementType {
    Bool = 0,
    Byte,
    UByte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Float,
    Double,
    LongDouble,
    CFloat,
    CDouble,
    CLongDouble,
    Datetime,
    Timedelta,
    Object,
    String,
    Unicode,
    Void,
}

/// Coarse classification used by the index normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Bool,
    SignedInt,
    UnsignedInt,
    Float,
    Complex,
    /// Datetime, object, string and struct types
    Other,
}

impl ElementType {
    /// Number of type tags
    pub const COUNT: usize = 23;

    /// Every tag, in type-number order
    pub const ALL: [ElementType; Self::COUNT] = [
        ElementType::Bool,
        ElementType::Byte,
        ElementType::UByte,
        ElementType::Short,
        ElementType::UShort,
        ElementType::Int,
        ElementType::UInt,
        ElementType::Long,
        ElementType::ULong,
        ElementType::LongLong,
        ElementType::ULongLong,
        ElementType::Float,
        ElementType::Double,
        ElementType::LongDouble,
        ElementType::CFloat,
        ElementType::CDouble,
        ElementType::CLongDouble,
        ElementType::Datetime,
        ElementType::Timedelta,
        ElementType::Object,
        ElementType::String,
        ElementType::Unicode,
        ElementType::Void,
    ];

    /// Type number (position in the accessor table)
    pub fn type_num(self) -> usize {
        self as usize
    }

    pub fn kind(self) -> ElementKind {
        use ElementType::*;
        match self {
            Bool => ElementKind::Bool,
            Byte | Short | Int | Long | LongLong => ElementKind::SignedInt,
            UByte | UShort | UInt | ULong | ULongLong => ElementKind::UnsignedInt,
            Float | Double | LongDouble => ElementKind::Float,
            CFloat | CDouble | CLongDouble => ElementKind::Complex,
            Datetime | Timedelta | Object | String | Unicode | Void => ElementKind::Other,
        }
    }

    pub fn is_bool(self) -> bool {
        self.kind() == ElementKind::Bool
    }

    /// True for signed and unsigned integer tags
    pub fn is_integer(self) -> bool {
        matches!(
            self.kind(),
            ElementKind::SignedInt | ElementKind::UnsignedInt
        )
    }

    /// Storage size in bytes. Flexible types (string, unicode, void) report 0.
    pub fn itemsize(self) -> usize {
        use ElementType::*;
        match self {
            Bool | Byte | UByte => 1,
            Short | UShort => 2,
            Int | UInt | Float => 4,
            Long | ULong | LongLong | ULongLong | Double | CFloat => 8,
            Datetime | Timedelta => 8,
            Object => std::mem::size_of::<usize>(),
            LongDouble => 16,
            CDouble => 16,
            CLongDouble => 32,
            String | Unicode | Void => 0,
        }
    }

    /// Natural alignment of the element. Complex types align to their halves.
    pub fn alignment(self) -> usize {
        match self {
            ElementType::CFloat => 4,
            ElementType::CDouble => 8,
            ElementType::CLongDouble => 16,
            other => other.itemsize().max(1),
        }
    }

    /// Element type for a numpy dtype `kind` character and item size.
    ///
    /// Byte order plays no part, so `'>i4'` and `'<i4'` both give `Int`.
    /// Returns `None` for combinations with no tag (e.g. `float16`).
    pub fn from_kind(kind: char, itemsize: usize) -> Option<Self> {
        use ElementType::*;
        let ty = match (kind, itemsize) {
            ('b', 1) => Bool,
            ('i', 1) => Byte,
            ('i', 2) => Short,
            ('i', 4) => Int,
            ('i', 8) => Long,
            ('u', 1) => UByte,
            ('u', 2) => UShort,
            ('u', 4) => UInt,
            ('u', 8) => ULong,
            ('f', 4) => Float,
            ('f', 8) => Double,
            ('f', n) if n > 8 => LongDouble,
            ('c', 8) => CFloat,
            ('c', 16) => CDouble,
            ('c', n) if n > 16 => CLongDouble,
            ('M', _) => Datetime,
            ('m', _) => Timedelta,
            ('O', _) => Object,
            ('S', _) => String,
            ('U', _) => Unicode,
            ('V', _) => Void,
            _ => return None,
        };
        Some(ty)
    }

    /// Canonical name, as accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        use ElementType::*;
        match self {
            Bool => "bool",
            Byte => "int8",
            UByte => "uint8",
            Short => "int16",
            UShort => "uint16",
            Int => "int32",
            UInt => "uint32",
            Long => "int64",
            ULong => "uint64",
            LongLong => "longlong",
            ULongLong => "ulonglong",
            Float => "float32",
            Double => "float64",
            LongDouble => "longdouble",
            CFloat => "complex64",
            CDouble => "complex128",
            CLongDouble => "clongdouble",
            Datetime => "datetime64",
            Timedelta => "timedelta64",
            Object => "object",
            String => "bytes",
            Unicode => "str",
            Void => "void",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a type name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("data type '{0}' not understood")]
pub struct UnknownElementType(pub String);

impl FromStr for ElementType {
    type Err = UnknownElementType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ElementType::*;
        let ty = match s {
            "bool" | "bool_" | "?" => Bool,
            "int8" | "byte" | "b" | "i1" => Byte,
            "uint8" | "ubyte" | "B" | "u1" => UByte,
            "int16" | "short" | "h" | "i2" => Short,
            "uint16" | "ushort" | "H" | "u2" => UShort,
            "int32" | "intc" | "i" | "i4" => Int,
            "uint32" | "uintc" | "I" | "u4" => UInt,
            "int64" | "long" | "int" | "intp" | "l" | "i8" => Long,
            "uint64" | "ulong" | "uint" | "uintp" | "L" | "u8" => ULong,
            "longlong" | "q" => LongLong,
            "ulonglong" | "Q" => ULongLong,
            "float32" | "single" | "f" | "f4" => Float,
            "float64" | "double" | "float" | "d" | "f8" => Double,
            "longdouble" | "g" => LongDouble,
            "complex64" | "csingle" | "F" | "c8" => CFloat,
            "complex128" | "cdouble" | "complex" | "D" | "c16" => CDouble,
            "clongdouble" | "G" => CLongDouble,
            "datetime64" | "M" | "M8" => Datetime,
            "timedelta64" | "m" | "m8" => Timedelta,
            "object" | "O" => Object,
            "bytes" | "S" => String,
            "str" | "unicode" | "U" => Unicode,
            "void" | "V" => Void,
            _ => return Err(UnknownElementType(s.to_string())),
        };
        Ok(ty)
    }
}
