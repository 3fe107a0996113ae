//! Parameter and configuration types shared by the kernels.

pub use crate::kernel_types::{FloatType, KernelFloat};

/// Inclusive output clamp applied after rounding and offset addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationRange {
    pub min: i32,
    pub max: i32,
}

impl ActivationRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Full int8 range.
    pub const fn int8() -> Self {
        Self::new(i8::MIN as i32, i8::MAX as i32)
    }

    /// Full int16 range.
    pub const fn int16() -> Self {
        Self::new(i16::MIN as i32, i16::MAX as i32)
    }
}

impl Default for ActivationRange {
    fn default() -> Self {
        Self::int8()
    }
}

/// Fixed-point rescale factor: `output ≈ round(input * multiplier * 2^shift / 2^31)`.
///
/// `multiplier` is a Q31 value in `[-1, 1)`; `shift` is a signed exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequantParams {
    pub multiplier: i32,
    pub shift: i32,
}

impl RequantParams {
    pub const fn new(multiplier: i32, shift: i32) -> Self {
        Self { multiplier, shift }
    }
}

/// Row layout for float softmax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftmaxConfig {
    pub num_rows: usize,
    pub row_size: usize,
}

impl SoftmaxConfig {
    pub const fn new(num_rows: usize, row_size: usize) -> Self {
        Self { num_rows, row_size }
    }

    /// A single row spanning `len` elements.
    pub const fn single_row(len: usize) -> Self {
        Self::new(1, len)
    }
}

/// Parameters of the high-precision int8 softmax.
///
/// `mult` and `shift` scale the integer difference `x - row_max` into Q5.26:
/// the difference is multiplied by `2^shift` and then by `mult` through a
/// saturating doubling high multiply. `diff_min` is the smallest difference
/// still evaluated; anything below it produces the minimum output code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftmaxS8Config {
    pub num_rows: usize,
    pub row_size: usize,
    pub mult: i32,
    pub shift: i32,
    pub diff_min: i32,
}

impl SoftmaxS8Config {
    pub const fn new(num_rows: usize, row_size: usize, mult: i32, shift: i32, diff_min: i32) -> Self {
        Self {
            num_rows,
            row_size,
            mult,
            shift,
            diff_min,
        }
    }

    /// Total number of elements covered by the config.
    pub fn len(&self) -> Option<usize> {
        self.num_rows.checked_mul(self.row_size)
    }
}

/// Affine quantization of a float tensor into int8.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizeConfig {
    pub scale: f32,
    pub zero_point: i32,
    pub act_min: i32,
    pub act_max: i32,
}

impl QuantizeConfig {
    pub const fn new(scale: f32, zero_point: i32) -> Self {
        Self {
            scale,
            zero_point,
            act_min: i8::MIN as i32,
            act_max: i8::MAX as i32,
        }
    }

    pub const fn with_activation(mut self, act_min: i32, act_max: i32) -> Self {
        self.act_min = act_min;
        self.act_max = act_max;
        self
    }

    pub const fn activation_range(&self) -> ActivationRange {
        ActivationRange::new(self.act_min, self.act_max)
    }
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self::new(1.0, 0)
    }
}
