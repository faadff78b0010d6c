//! Scalar conversion port.

use std::fmt;

use num_complex::Complex64;

use crate::core::{HostValue, PointerWidth};

/// Target integer width for [`ScalarConversion::to_native_integer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntWidth {
    pub bits: u32,
    pub signed: bool,
}

impl IntWidth {
    pub const I8: IntWidth = IntWidth::signed(8);
    pub const U8: IntWidth = IntWidth::unsigned(8);
    pub const I16: IntWidth = IntWidth::signed(16);
    pub const U16: IntWidth = IntWidth::unsigned(16);
    pub const I32: IntWidth = IntWidth::signed(32);
    pub const U32: IntWidth = IntWidth::unsigned(32);
    pub const I64: IntWidth = IntWidth::signed(64);
    pub const U64: IntWidth = IntWidth::unsigned(64);

    pub const fn signed(bits: u32) -> Self {
        Self { bits, signed: true }
    }

    pub const fn unsigned(bits: u32) -> Self {
        Self {
            bits,
            signed: false,
        }
    }

    /// Signed `intp` width
    pub fn intp(width: PointerWidth) -> Self {
        Self::signed(width.bits())
    }

    /// Inclusive range of representable values
    pub fn range(self) -> (i128, i128) {
        if self.signed {
            let half = 1i128 << (self.bits - 1);
            (-half, half - 1)
        } else {
            (0, (1i128 << self.bits) - 1)
        }
    }

    pub fn contains(self, value: i128) -> bool {
        let (lo, hi) = self.range();
        (lo..=hi).contains(&value)
    }
}

impl fmt::Display for IntWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.signed { "int" } else { "uint" };
        write!(f, "{prefix}{}", self.bits)
    }
}

/// Failures raised by the scalar conversion service
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// The value does not fit the requested width
    #[error("value {value} out of range for {target}")]
    Overflow { value: String, target: String },

    /// A string value that does not parse as a number
    #[error("invalid literal for {target}: {value}")]
    InvalidLiteral { value: String, target: String },

    /// The value has no conversion to the requested target
    #[error("{value} cannot be converted to {target}")]
    NotNumeric { value: String, target: String },
}

impl ConversionError {
    pub fn overflow(value: impl fmt::Display, target: impl fmt::Display) -> Self {
        Self::Overflow {
            value: value.to_string(),
            target: target.to_string(),
        }
    }

    pub fn not_numeric(value: impl fmt::Display, target: impl fmt::Display) -> Self {
        Self::NotNumeric {
            value: value.to_string(),
            target: target.to_string(),
        }
    }
}

/// Result type for conversions
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Converts host values into native scalars.
///
/// Implementations decide the exact semantics for each host type; the
/// accessors and the normalizer only pick which conversion to call.
pub trait ScalarConversion: Send + Sync {
    fn to_native_boolean(&self, value: &HostValue) -> ConversionResult<bool>;

    /// Integer conversion; the result must lie within `width`
    fn to_native_integer(&self, value: &HostValue, width: IntWidth) -> ConversionResult<i128>;

    fn to_native_float(&self, value: &HostValue) -> ConversionResult<f64>;

    /// Complex conversion. Defaults to real conversion with a zero
    /// imaginary part for non-complex values.
    fn to_native_complex(&self, value: &HostValue) -> ConversionResult<Complex64> {
        match value {
            HostValue::Complex(c) => Ok(*c),
            HostValue::Item(item) => Ok(item.as_complex()),
            other => Ok(Complex64::new(self.to_native_float(other)?, 0.0)),
        }
    }
}
