//! Float element types understood by the transcendental kernels.

use std::ops::{Add, Div, Mul, Neg, Sub};

use half::f16;

/// Runtime float type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatType {
    F32,
    F16,
}

impl FloatType {
    /// Size of one element in bytes.
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FloatType::F32 => 4,
            FloatType::F16 => 2,
        }
    }
}

/// Trait for kernel-compatible IEEE-754 binary floating point types.
/// Implemented for f32 and half::f16. Zero-cost via monomorphization.
///
/// Arithmetic runs in the element type itself, so the f16 kernels round
/// after every operation exactly like a native half-precision pipeline.
/// The associated constants carry the per-type polynomial coefficients and
/// the input domains that keep exponent injection inside the normal range.
pub trait KernelFloat:
    Copy
    + Default
    + PartialOrd
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Compile-time type identifier for zero-cost kernel selection.
    const TYPE_ID: FloatType;
    /// Width of the stored mantissa field (23 for f32, 10 for f16).
    const MANTISSA_BITS: u32;

    const ZERO: Self;
    const ONE: Self;
    const ONE_THIRD: Self;
    const LN2: Self;
    const INV_LN2: Self;
    /// Taylor coefficients `1/k!` for `k = 0..=7`.
    const EXP_COEFFS: [Self; 8];

    const EXP_MIN: Self;
    const EXP_MAX: Self;
    const TANH_MIN: Self;
    const TANH_MAX: Self;
    /// Below this magnitude tanh uses `x * (1 - x^2 / 3)`.
    const TANH_SMALL: Self;
    const SIGMOID_MIN: Self;
    const SIGMOID_MAX: Self;

    fn to_f32(self) -> f32;
    fn from_f32(v: f32) -> Self;
    fn from_i32(v: i32) -> Self;
    /// `floor(self)` converted to an integer.
    fn floor_to_i32(self) -> i32;
    fn abs(self) -> Self;
    /// Raw bit pattern, zero-extended.
    fn to_bits_i32(self) -> i32;
    /// Inverse of [`KernelFloat::to_bits_i32`]; upper bits are discarded.
    fn from_bits_i32(bits: i32) -> Self;

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        if self >= other {
            self
        } else {
            other
        }
    }

    /// Clamp into `[lo, hi]`. NaN passes through unchanged.
    #[inline(always)]
    fn clamp_to(self, lo: Self, hi: Self) -> Self {
        if self < lo {
            lo
        } else if self > hi {
            hi
        } else {
            self
        }
    }
}

impl KernelFloat for f32 {
    const TYPE_ID: FloatType = FloatType::F32;
    const MANTISSA_BITS: u32 = 23;

    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const ONE_THIRD: Self = 1.0 / 3.0;
    const LN2: Self = std::f32::consts::LN_2;
    const INV_LN2: Self = std::f32::consts::LOG2_E;
    const EXP_COEFFS: [Self; 8] = [
        1.0,
        1.0,
        1.0 / 2.0,
        1.0 / 6.0,
        1.0 / 24.0,
        1.0 / 120.0,
        1.0 / 720.0,
        1.0 / 5040.0,
    ];

    const EXP_MIN: Self = -87.0;
    const EXP_MAX: Self = 88.0;
    const TANH_MIN: Self = -9.0;
    const TANH_MAX: Self = 9.0;
    const TANH_SMALL: Self = 0.0625;
    const SIGMOID_MIN: Self = -87.0;
    const SIGMOID_MAX: Self = 20.0;

    #[inline(always)]
    fn to_f32(self) -> f32 {
        self
    }
    #[inline(always)]
    fn from_f32(v: f32) -> Self {
        v
    }
    #[inline(always)]
    fn from_i32(v: i32) -> Self {
        v as f32
    }
    #[inline(always)]
    fn floor_to_i32(self) -> i32 {
        self.floor() as i32
    }
    #[inline(always)]
    fn abs(self) -> Self {
        f32::abs(self)
    }
    #[inline(always)]
    fn to_bits_i32(self) -> i32 {
        self.to_bits() as i32
    }
    #[inline(always)]
    fn from_bits_i32(bits: i32) -> Self {
        f32::from_bits(bits as u32)
    }
}

impl KernelFloat for f16 {
    const TYPE_ID: FloatType = FloatType::F16;
    const MANTISSA_BITS: u32 = 10;

    const ZERO: Self = f16::ZERO;
    const ONE: Self = f16::ONE;
    const ONE_THIRD: Self = f16::from_f32_const(1.0 / 3.0);
    const LN2: Self = f16::from_f32_const(std::f32::consts::LN_2);
    const INV_LN2: Self = f16::from_f32_const(std::f32::consts::LOG2_E);
    const EXP_COEFFS: [Self; 8] = [
        f16::from_f32_const(1.0),
        f16::from_f32_const(1.0),
        f16::from_f32_const(1.0 / 2.0),
        f16::from_f32_const(1.0 / 6.0),
        f16::from_f32_const(1.0 / 24.0),
        f16::from_f32_const(1.0 / 120.0),
        f16::from_f32_const(1.0 / 720.0),
        f16::from_f32_const(1.0 / 5040.0),
    ];

    // 2^15 * exp(r) must stay below f16::MAX and 2^-14 is the smallest normal.
    const EXP_MIN: Self = f16::from_f32_const(-9.7);
    const EXP_MAX: Self = f16::from_f32_const(10.9);
    const TANH_MIN: Self = f16::from_f32_const(-4.5);
    const TANH_MAX: Self = f16::from_f32_const(4.5);
    const TANH_SMALL: Self = f16::from_f32_const(0.25);
    const SIGMOID_MIN: Self = f16::from_f32_const(-9.7);
    const SIGMOID_MAX: Self = f16::from_f32_const(10.0);

    #[inline(always)]
    fn to_f32(self) -> f32 {
        f16::to_f32(self)
    }
    #[inline(always)]
    fn from_f32(v: f32) -> Self {
        f16::from_f32(v)
    }
    #[inline(always)]
    fn from_i32(v: i32) -> Self {
        f16::from_f32(v as f32)
    }
    #[inline(always)]
    fn floor_to_i32(self) -> i32 {
        f16::to_f32(self).floor() as i32
    }
    #[inline(always)]
    fn abs(self) -> Self {
        f16::from_bits(self.to_bits() & 0x7FFF)
    }
    #[inline(always)]
    fn to_bits_i32(self) -> i32 {
        self.to_bits() as i32
    }
    #[inline(always)]
    fn from_bits_i32(bits: i32) -> Self {
        f16::from_bits(bits as u16)
    }
}
