//! # Element and Host Values
//!
//! Two value families cross the accessor boundary:
//!
//! - [`ItemValue`]: exactly one native element, as read from array memory.
//!   Its variant always matches the element type it came from.
//! - [`HostValue`]: a value handed over by the scripting front end. It may
//!   already be a native element (the fast path for writes) or any of the
//!   dynamically typed shapes the front end produces.

use std::fmt;

use num_complex::{Complex32, Complex64};

use super::dtype::ElementType;

/// A single native element value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemValue {
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    C64(Complex32),
    C128(Complex64),
}

impl ItemValue {
    /// The element type this value is stored as
    pub fn element_type(&self) -> ElementType {
        match self {
            ItemValue::Bool(_) => ElementType::Bool,
            ItemValue::I8(_) => ElementType::Byte,
            ItemValue::U8(_) => ElementType::UByte,
            ItemValue::I16(_) => ElementType::Short,
            ItemValue::U16(_) => ElementType::UShort,
            ItemValue::I32(_) => ElementType::Int,
            ItemValue::U32(_) => ElementType::UInt,
            ItemValue::I64(_) => ElementType::Long,
            ItemValue::U64(_) => ElementType::ULong,
            ItemValue::F32(_) => ElementType::Float,
            ItemValue::F64(_) => ElementType::Double,
            ItemValue::C64(_) => ElementType::CFloat,
            ItemValue::C128(_) => ElementType::CDouble,
        }
    }

    /// Integer content widened without loss, `None` for non-integers.
    ///
    /// Booleans count as integers here (`True == 1`).
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            ItemValue::Bool(b) => Some(b as i128),
            ItemValue::I8(v) => Some(v.into()),
            ItemValue::U8(v) => Some(v.into()),
            ItemValue::I16(v) => Some(v.into()),
            ItemValue::U16(v) => Some(v.into()),
            ItemValue::I32(v) => Some(v.into()),
            ItemValue::U32(v) => Some(v.into()),
            ItemValue::I64(v) => Some(v.into()),
            ItemValue::U64(v) => Some(v.into()),
            _ => None,
        }
    }

    /// Real floating-point content, `None` for complex values
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            ItemValue::F32(v) => Some(v.into()),
            ItemValue::F64(v) => Some(v),
            ItemValue::C64(_) | ItemValue::C128(_) => None,
            // i128 -> f64 rounds like a C cast, which is what numpy does
            other => other.as_i128().map(|v| v as f64),
        }
    }

    pub fn as_complex(&self) -> Complex64 {
        match *self {
            ItemValue::C64(c) => Complex64::new(c.re.into(), c.im.into()),
            ItemValue::C128(c) => c,
            other => Complex64::new(other.as_f64().unwrap_or_default(), 0.0),
        }
    }

    /// Truthiness: nonzero numbers are true
    pub fn is_truthy(&self) -> bool {
        match *self {
            ItemValue::Bool(b) => b,
            ItemValue::C64(c) => c.re != 0.0 || c.im != 0.0,
            ItemValue::C128(c) => c.re != 0.0 || c.im != 0.0,
            ItemValue::F32(v) => v != 0.0,
            ItemValue::F64(v) => v != 0.0,
            other => other.as_i128().unwrap_or_default() != 0,
        }
    }
}

impl fmt::Display for ItemValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemValue::Bool(v) => write!(f, "{}", if *v { "True" } else { "False" }),
            ItemValue::I8(v) => write!(f, "{v}"),
            ItemValue::U8(v) => write!(f, "{v}"),
            ItemValue::I16(v) => write!(f, "{v}"),
            ItemValue::U16(v) => write!(f, "{v}"),
            ItemValue::I32(v) => write!(f, "{v}"),
            ItemValue::U32(v) => write!(f, "{v}"),
            ItemValue::I64(v) => write!(f, "{v}"),
            ItemValue::U64(v) => write!(f, "{v}"),
            ItemValue::F32(v) => write!(f, "{v}"),
            ItemValue::F64(v) => write!(f, "{v}"),
            ItemValue::C64(c) => write!(f, "({}{:+}j)", c.re, c.im),
            ItemValue::C128(c) => write!(f, "({}{:+}j)", c.re, c.im),
        }
    }
}

/// A value supplied by the scripting front end
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    /// The host's absent value
    None,
    Bool(bool),
    /// Host integer. Arbitrary-precision integers arrive here already
    /// reduced to 128 bits; anything wider is rejected by the front end.
    Int(i128),
    Float(f64),
    Complex(Complex64),
    Str(String),
    /// An already-native element (numpy scalar)
    Item(ItemValue),
    /// An object with no numeric capability; carries its type name
    Opaque(String),
}

impl HostValue {
    /// Whether the value supports generic numeric conversion at all
    pub fn has_numeric_conversion(&self) -> bool {
        !matches!(self, HostValue::None | HostValue::Opaque(_))
    }

    /// Short host-side type name, used in error messages
    pub fn type_name(&self) -> &str {
        match self {
            HostValue::None => "NoneType",
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Float(_) => "float",
            HostValue::Complex(_) => "complex",
            HostValue::Str(_) => "str",
            HostValue::Item(v) => v.element_type().name(),
            HostValue::Opaque(name) => name,
        }
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::None => f.write_str("None"),
            HostValue::Bool(v) => write!(f, "{}", if *v { "True" } else { "False" }),
            HostValue::Int(v) => write!(f, "{v}"),
            HostValue::Float(v) => write!(f, "{v}"),
            HostValue::Complex(c) => write!(f, "({}{:+}j)", c.re, c.im),
            HostValue::Str(s) => write!(f, "'{s}'"),
            HostValue::Item(v) => write!(f, "{v}"),
            HostValue::Opaque(name) => write!(f, "<{name} object>"),
        }
    }
}

impl From<ItemValue> for HostValue {
    fn from(v: ItemValue) -> Self {
        HostValue::Item(v)
    }
}

impl From<bool> for HostValue {
    fn from(v: bool) -> Self {
        HostValue::Bool(v)
    }
}

impl From<i64> for HostValue {
    fn from(v: i64) -> Self {
        HostValue::Int(v.into())
    }
}

impl From<f64> for HostValue {
    fn from(v: f64) -> Self {
        HostValue::Float(v)
    }
}

impl From<Complex64> for HostValue {
    fn from(v: Complex64) -> Self {
        HostValue::Complex(v)
    }
}

impl From<&str> for HostValue {
    fn from(v: &str) -> Self {
        HostValue::Str(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_value_element_type() {
        assert_eq!(ItemValue::I8(-1).element_type(), ElementType::Byte);
        assert_eq!(ItemValue::U64(1).element_type(), ElementType::ULong);
        assert_eq!(
            ItemValue::C128(Complex64::new(1.0, 2.0)).element_type(),
            ElementType::CDouble
        );
    }

    #[test]
    fn test_item_value_widening() {
        assert_eq!(ItemValue::U64(u64::MAX).as_i128(), Some(u64::MAX as i128));
        assert_eq!(ItemValue::I8(-5).as_i128(), Some(-5));
        assert_eq!(ItemValue::Bool(true).as_i128(), Some(1));
        assert_eq!(ItemValue::F32(1.5).as_i128(), None);
        assert_eq!(ItemValue::I32(7).as_f64(), Some(7.0));
        assert_eq!(ItemValue::C64(Complex32::new(1.0, 1.0)).as_f64(), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(ItemValue::I16(-3).is_truthy());
        assert!(!ItemValue::U8(0).is_truthy());
        assert!(ItemValue::C128(Complex64::new(0.0, 1.0)).is_truthy());
        assert!(!ItemValue::F64(0.0).is_truthy());
    }

    #[test]
    fn test_numeric_capability() {
        assert!(HostValue::Int(3).has_numeric_conversion());
        assert!(HostValue::Str("3".into()).has_numeric_conversion());
        assert!(!HostValue::None.has_numeric_conversion());
        assert!(!HostValue::Opaque("dict".into()).has_numeric_conversion());
    }

    #[test]
    fn test_display() {
        assert_eq!(HostValue::Bool(true).to_string(), "True");
        assert_eq!(HostValue::Str("x".into()).to_string(), "'x'");
        assert_eq!(HostValue::Opaque("dict".into()).to_string(), "<dict object>");
        assert_eq!(ItemValue::C128(Complex64::new(1.0, -2.0)).to_string(), "(1-2j)");
    }
}
