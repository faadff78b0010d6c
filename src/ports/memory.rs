//! Array memory descriptor port.

use crate::core::ElementType;

/// View of an array's raw memory plus the flags the accessors need.
///
/// Offsets handed to the accessors are byte offsets into [`bytes`].
/// Keeping `offset + itemsize` within the buffer is the caller's contract.
///
/// [`bytes`]: ArrayMemory::bytes
pub trait ArrayMemory {
    /// Element storage, starting at the array's base pointer
    fn bytes(&self) -> &[u8];

    /// Mutable element storage
    fn bytes_mut(&mut self) -> &mut [u8];

    /// Elements are aligned and in host byte order
    fn is_behaved(&self) -> bool;

    /// Element byte order matches the host
    fn is_not_swapped(&self) -> bool;

    fn element_type(&self) -> ElementType;

    fn ndim(&self) -> usize;

    /// Total number of elements
    fn size(&self) -> usize;
}
