//! # Configuration
//!
//! Limits and platform choices for index normalization.

/// Maximum number of dimensions (and of explicit indices)
pub const MAX_DIMS: usize = 32;

/// Width of the native pointer-sized integer (`intp`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    /// Pointer width of the compilation target
    pub fn native() -> Self {
        if cfg!(target_pointer_width = "32") {
            PointerWidth::Bits32
        } else {
            PointerWidth::Bits64
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            PointerWidth::Bits32 => 32,
            PointerWidth::Bits64 => 64,
        }
    }
}

impl Default for PointerWidth {
    fn default() -> Self {
        Self::native()
    }
}

/// Index normalization configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Cap on explicit index arguments and on normalized components
    pub max_dims: usize,

    /// Integer width used when reducing scalars to `intp`
    pub pointer_width: PointerWidth,
}

impl IndexConfig {
    /// Create a configuration with the given dimensionality cap
    pub fn new(max_dims: usize) -> Self {
        Self {
            max_dims,
            ..Default::default()
        }
    }

    /// Override the pointer width (e.g. to mimic a 32-bit host)
    pub fn with_pointer_width(mut self, width: PointerWidth) -> Self {
        self.pointer_width = width;
        self
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_dims: MAX_DIMS,
            pointer_width: PointerWidth::native(),
        }
    }
}
