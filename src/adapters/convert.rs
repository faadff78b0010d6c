//! # Standard Scalar Conversion
//!
//! Default implementation of the [`ScalarConversion`] port for the host
//! value shapes in [`HostValue`].
//!
//! - Integers convert with an explicit range check for the requested width.
//! - Floats convert to integers by truncation toward zero.
//! - Strings parse as numeric literals (`"True"`/`"False"` for booleans).
//! - Complex values convert only to complex targets.
//! - `None` and opaque objects have no numeric capability.

use crate::core::{HostValue, PointerWidth};
use crate::ports::{ConversionError, ConversionResult, IntWidth, ScalarConversion};

/// The default conversion service
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardConversion;

impl ScalarConversion for StandardConversion {
    fn to_native_boolean(&self, value: &HostValue) -> ConversionResult<bool> {
        match value {
            HostValue::Bool(b) => Ok(*b),
            HostValue::Int(v) => Ok(*v != 0),
            HostValue::Float(v) => Ok(*v != 0.0),
            HostValue::Complex(c) => Ok(c.re != 0.0 || c.im != 0.0),
            HostValue::Item(item) => Ok(item.is_truthy()),
            HostValue::Str(s) => parse_bool(s),
            HostValue::None | HostValue::Opaque(_) => {
                Err(ConversionError::not_numeric(value, "bool"))
            }
        }
    }

    fn to_native_integer(&self, value: &HostValue, width: IntWidth) -> ConversionResult<i128> {
        let v = match value {
            HostValue::Bool(b) => *b as i128,
            HostValue::Int(v) => *v,
            HostValue::Float(f) => float_to_integer(*f, width)?,
            HostValue::Item(item) => match item.as_i128() {
                Some(v) => v,
                None => match item.as_f64() {
                    Some(f) => float_to_integer(f, width)?,
                    None => return Err(ConversionError::not_numeric(value, width)),
                },
            },
            HostValue::Str(s) => {
                s.trim()
                    .parse::<i128>()
                    .map_err(|_| ConversionError::InvalidLiteral {
                        value: s.clone(),
                        target: width.to_string(),
                    })?
            }
            HostValue::Complex(_) | HostValue::None | HostValue::Opaque(_) => {
                return Err(ConversionError::not_numeric(value, width))
            }
        };

        if width.contains(v) {
            Ok(v)
        } else {
            Err(ConversionError::overflow(v, width))
        }
    }

    fn to_native_float(&self, value: &HostValue) -> ConversionResult<f64> {
        match value {
            HostValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            HostValue::Int(v) => Ok(*v as f64),
            HostValue::Float(v) => Ok(*v),
            HostValue::Item(item) => item
                .as_f64()
                .ok_or_else(|| ConversionError::not_numeric(value, "float")),
            HostValue::Str(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ConversionError::InvalidLiteral {
                    value: s.clone(),
                    target: "float".to_string(),
                }),
            HostValue::Complex(_) | HostValue::None | HostValue::Opaque(_) => {
                Err(ConversionError::not_numeric(value, "float"))
            }
        }
    }
}

fn parse_bool(s: &str) -> ConversionResult<bool> {
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Ok(false);
    }
    trimmed
        .parse::<f64>()
        .map(|v| v != 0.0)
        .map_err(|_| ConversionError::InvalidLiteral {
            value: s.to_string(),
            target: "bool".to_string(),
        })
}

fn float_to_integer(f: f64, width: IntWidth) -> ConversionResult<i128> {
    if f.is_nan() {
        return Err(ConversionError::InvalidLiteral {
            value: "nan".to_string(),
            target: width.to_string(),
        });
    }
    let truncated = f.trunc();
    let (lo, hi) = width.range();
    if truncated < lo as f64 || truncated > hi as f64 {
        return Err(ConversionError::overflow(f, width));
    }
    Ok(truncated as i128)
}

/// Reduce a wide integer to `intp` at the given pointer width
pub fn narrow_intp(value: i128, width: PointerWidth) -> ConversionResult<isize> {
    let target = IntWidth::intp(width);
    if !target.contains(value) {
        return Err(ConversionError::overflow(value, target));
    }
    isize::try_from(value).map_err(|_| ConversionError::overflow(value, "intp"))
}

/// Convert one host value to `intp` through `conversion`
pub fn to_intp(
    conversion: &dyn ScalarConversion,
    value: &HostValue,
    width: PointerWidth,
) -> ConversionResult<isize> {
    let exact = match value {
        HostValue::Int(v) => Some(*v),
        HostValue::Item(item) => item.as_i128(),
        _ => None,
    };
    let v = match exact {
        Some(v) => v,
        None => conversion.to_native_integer(value, IntWidth::intp(width))?,
    };
    narrow_intp(v, width)
}

/// Convert a list of host values to `intp`, stopping at the first failure
pub fn to_intp_list(
    conversion: &dyn ScalarConversion,
    values: &[HostValue],
    width: PointerWidth,
) -> ConversionResult<Vec<isize>> {
    values
        .iter()
        .map(|v| to_intp(conversion, v, width))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ItemValue;
    use num_complex::Complex64;

    #[test]
    fn test_integer_fast_paths() {
        let conv = StandardConversion;
        assert_eq!(conv.to_native_integer(&HostValue::Int(-3), IntWidth::I8), Ok(-3));
        assert_eq!(conv.to_native_integer(&HostValue::Bool(true), IntWidth::U8), Ok(1));
        assert_eq!(
            conv.to_native_integer(&HostValue::Item(ItemValue::U16(9)), IntWidth::I32),
            Ok(9)
        );
    }

    #[test]
    fn test_integer_range_checks() {
        let conv = StandardConversion;
        for (value, width) in [
            (128i128, IntWidth::I8),
            (-1, IntWidth::U64),
            (1 << 32, IntWidth::U32),
            (i64::MAX as i128 + 1, IntWidth::I64),
        ] {
            let err = conv
                .to_native_integer(&HostValue::Int(value), width)
                .unwrap_err();
            assert!(matches!(err, ConversionError::Overflow { .. }), "{value} {width}");
        }
        assert_eq!(
            conv.to_native_integer(&HostValue::Int(u64::MAX as i128), IntWidth::U64),
            Ok(u64::MAX as i128)
        );
    }

    #[test]
    fn test_float_truncates_toward_zero() {
        let conv = StandardConversion;
        assert_eq!(conv.to_native_integer(&HostValue::Float(2.9), IntWidth::I32), Ok(2));
        assert_eq!(conv.to_native_integer(&HostValue::Float(-2.9), IntWidth::I32), Ok(-2));
        assert!(matches!(
            conv.to_native_integer(&HostValue::Float(f64::INFINITY), IntWidth::I64),
            Err(ConversionError::Overflow { .. })
        ));
        assert!(matches!(
            conv.to_native_integer(&HostValue::Float(f64::NAN), IntWidth::I64),
            Err(ConversionError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_string_literals() {
        let conv = StandardConversion;
        assert_eq!(conv.to_native_integer(&" 42 ".into(), IntWidth::I16), Ok(42));
        assert_eq!(conv.to_native_float(&"1e3".into()), Ok(1000.0));
        assert_eq!(conv.to_native_boolean(&"FALSE".into()), Ok(false));
        assert_eq!(conv.to_native_boolean(&"2".into()), Ok(true));
        assert!(matches!(
            conv.to_native_integer(&"1.5".into(), IntWidth::I32),
            Err(ConversionError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_non_numeric_values() {
        let conv = StandardConversion;
        let complex = HostValue::Complex(Complex64::new(1.0, 0.0));
        assert!(matches!(
            conv.to_native_float(&complex),
            Err(ConversionError::NotNumeric { .. })
        ));
        assert!(matches!(
            conv.to_native_boolean(&HostValue::None),
            Err(ConversionError::NotNumeric { .. })
        ));
        assert_eq!(conv.to_native_complex(&complex), Ok(Complex64::new(1.0, 0.0)));
        assert_eq!(
            conv.to_native_complex(&HostValue::Float(2.0)),
            Ok(Complex64::new(2.0, 0.0))
        );
    }

    #[test]
    fn test_intp_conversion() {
        let conv = StandardConversion;
        assert_eq!(to_intp(&conv, &HostValue::Int(-7), PointerWidth::Bits64), Ok(-7));
        assert!(matches!(
            to_intp(&conv, &HostValue::Int(1 << 40), PointerWidth::Bits32),
            Err(ConversionError::Overflow { .. })
        ));
        assert_eq!(
            to_intp_list(
                &conv,
                &[HostValue::Int(1), HostValue::Float(2.5), "3".into()],
                PointerWidth::native()
            ),
            Ok(vec![1, 2, 3])
        );
    }
}
