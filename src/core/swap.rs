//! # Byte-Order Codec
//!
//! Fixed-width copy with optional byte reversal, used by every multi-byte
//! accessor when the target buffer is byte-swapped or unaligned.
//!
//! Copies go one byte at a time, so neither side needs to be aligned to
//! the width. The caller guarantees both slices hold at least `width`
//! bytes; shorter slices panic on indexing.

use std::str::FromStr;

/// Supported codec widths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Two,
    Four,
    Eight,
}

impl Width {
    pub fn bytes(self) -> usize {
        match self {
            Width::Two => 2,
            Width::Four => 4,
            Width::Eight => 8,
        }
    }
}

/// Copy two bytes from `src` to `dest`, reversing them if `swap` is set
#[inline]
pub fn copy_swap2(dest: &mut [u8], src: &[u8], swap: bool) {
    if !swap {
        dest[0] = src[0];
        dest[1] = src[1];
    } else {
        dest[0] = src[1];
        dest[1] = src[0];
    }
}

/// Copy four bytes from `src` to `dest`, reversing them if `swap` is set
#[inline]
pub fn copy_swap4(dest: &mut [u8], src: &[u8], swap: bool) {
    copy_swap_n::<4>(dest, src, swap);
}

/// Copy eight bytes from `src` to `dest`, reversing them if `swap` is set
#[inline]
pub fn copy_swap8(dest: &mut [u8], src: &[u8], swap: bool) {
    copy_swap_n::<8>(dest, src, swap);
}

/// Width-dispatched form of the `copy_swap*` family
pub fn copy_swap(width: Width, dest: &mut [u8], src: &[u8], swap: bool) {
    match width {
        Width::Two => copy_swap2(dest, src, swap),
        Width::Four => copy_swap4(dest, src, swap),
        Width::Eight => copy_swap8(dest, src, swap),
    }
}

#[inline(always)]
fn copy_swap_n<const N: usize>(dest: &mut [u8], src: &[u8], swap: bool) {
    let (dest, src) = (&mut dest[..N], &src[..N]);
    if !swap {
        dest.copy_from_slice(src);
    } else {
        for (d, s) in dest.iter_mut().zip(src.iter().rev()) {
            *d = *s;
        }
    }
}

/// Byte order of an array's elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    Little,
    Big,
    /// Host order
    #[default]
    Native,
    /// Opposite of host order
    Swapped,
}

impl ByteOrder {
    /// Whether elements stored in this order match the host
    pub fn is_native(self) -> bool {
        match self {
            ByteOrder::Native => true,
            ByteOrder::Swapped => false,
            ByteOrder::Little => cfg!(target_endian = "little"),
            ByteOrder::Big => cfg!(target_endian = "big"),
        }
    }

    /// The numpy byte-order character for this order
    pub fn as_char(self) -> char {
        match self {
            ByteOrder::Little => '<',
            ByteOrder::Big => '>',
            ByteOrder::Native => '=',
            ByteOrder::Swapped => 's',
        }
    }
}

/// Error returned for an unusable byte-order specification
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ByteOrderError {
    #[error("byteorder string must be at least length 1")]
    Empty,

    #[error("{0} is an unrecognized byte order")]
    Unrecognized(String),
}

impl FromStr for ByteOrder {
    type Err = ByteOrderError;

    /// Only the first character is significant, as in numpy.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.chars().next() {
            None => Err(ByteOrderError::Empty),
            Some('>' | 'b' | 'B') => Ok(ByteOrder::Big),
            Some('<' | 'l' | 'L') => Ok(ByteOrder::Little),
            Some('=' | 'n' | 'N') => Ok(ByteOrder::Native),
            Some('s' | 'S') => Ok(ByteOrder::Swapped),
            Some(_) => Err(ByteOrderError::Unrecognized(s.to_string())),
        }
    }
}
