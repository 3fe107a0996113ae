//! Saturating integer primitives.
//!
//! Every integer kernel ends by narrowing its result through one of these
//! helpers: out-of-range values clamp to the container bounds, never wrap.

use crate::types::ActivationRange;

/// Q7 fixed-point container.
pub type Q7 = i8;
/// Q15 fixed-point container.
pub type Q15 = i16;
/// Q31 fixed-point container.
pub type Q31 = i32;

/// Narrowing conversion with saturation from a wide accumulator.
pub trait Saturating: Copy {
    const MIN_WIDE: i64;
    const MAX_WIDE: i64;

    fn saturate_from(value: i64) -> Self;
}

macro_rules! impl_saturating {
    ($($ty:ty),*) => {
        $(
            impl Saturating for $ty {
                const MIN_WIDE: i64 = <$ty>::MIN as i64;
                const MAX_WIDE: i64 = <$ty>::MAX as i64;

                #[inline(always)]
                fn saturate_from(value: i64) -> Self {
                    value.clamp(Self::MIN_WIDE, Self::MAX_WIDE) as $ty
                }
            }
        )*
    };
}

impl_saturating!(i8, i16, i32, u8, u16);

/// Signed saturation to `bits` bits: clamp to `[-2^(bits-1), 2^(bits-1) - 1]`.
///
/// `bits` must be in `1..=32`.
#[inline(always)]
pub fn ssat(value: i32, bits: u32) -> i32 {
    debug_assert!((1..=32).contains(&bits), "ssat width {bits} out of range");
    let bits = bits.clamp(1, 32);
    let max = ((1i64 << (bits - 1)) - 1) as i32;
    let min = (-(1i64 << (bits - 1))) as i32;
    value.clamp(min, max)
}

/// Unsigned saturation to `bits` bits: clamp to `[0, 2^bits - 1]`.
///
/// `bits` must be in `0..=31`.
#[inline(always)]
pub fn usat(value: i32, bits: u32) -> i32 {
    debug_assert!(bits <= 31, "usat width {bits} out of range");
    let max = ((1i64 << bits.min(31)) - 1) as i32;
    value.clamp(0, max)
}

#[inline(always)]
pub fn saturate_to_i8(value: i32) -> i8 {
    value.clamp(i8::MIN as i32, i8::MAX as i32) as i8
}

#[inline(always)]
pub fn saturate_to_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

#[inline(always)]
pub fn saturate_to_u8(value: i32) -> u8 {
    value.clamp(0, u8::MAX as i32) as u8
}

/// Saturating Q7 addition.
#[inline(always)]
pub fn qadd8(a: Q7, b: Q7) -> Q7 {
    a.saturating_add(b)
}

/// Saturating Q7 subtraction.
#[inline(always)]
pub fn qsub8(a: Q7, b: Q7) -> Q7 {
    a.saturating_sub(b)
}

/// Saturating Q15 addition.
#[inline(always)]
pub fn qadd16(a: Q15, b: Q15) -> Q15 {
    a.saturating_add(b)
}

/// Saturating Q15 subtraction.
#[inline(always)]
pub fn qsub16(a: Q15, b: Q15) -> Q15 {
    a.saturating_sub(b)
}

/// Saturating Q31 addition.
#[inline(always)]
pub fn qadd(a: Q31, b: Q31) -> Q31 {
    a.saturating_add(b)
}

/// Saturating Q31 subtraction.
#[inline(always)]
pub fn qsub(a: Q31, b: Q31) -> Q31 {
    a.saturating_sub(b)
}

/// Apply the activation clamp. Always the last step of a kernel.
#[inline(always)]
pub fn clamp_activation(value: i32, range: ActivationRange) -> i32 {
    value.max(range.min).min(range.max)
}

/// Number of leading zero bits, i.e. the headroom of a non-negative value.
#[inline(always)]
pub fn headroom(value: i32) -> u32 {
    (value as u32).leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturate_to_i8_identity_in_range() {
        for x in -128..=127 {
            assert_eq!(saturate_to_i8(x) as i32, x);
        }
    }

    #[test]
    fn test_saturate_to_i8_clamps() {
        assert_eq!(saturate_to_i8(128), 127);
        assert_eq!(saturate_to_i8(-129), -128);
        assert_eq!(saturate_to_i8(i32::MAX), 127);
        assert_eq!(saturate_to_i8(i32::MIN), -128);
    }

    #[test]
    fn test_ssat_matches_narrow_helpers() {
        for x in [-70000, -32769, -200, -1, 0, 5, 300, 40000] {
            assert_eq!(ssat(x, 8), saturate_to_i8(x) as i32);
            assert_eq!(ssat(x, 16), saturate_to_i16(x) as i32);
        }
        assert_eq!(ssat(i32::MIN, 32), i32::MIN);
        assert_eq!(ssat(i32::MAX, 32), i32::MAX);
        assert_eq!(ssat(3, 1), 0);
        assert_eq!(ssat(-3, 1), -1);
    }

    #[test]
    fn test_usat() {
        assert_eq!(usat(-5, 8), 0);
        assert_eq!(usat(300, 8), 255);
        assert_eq!(usat(17, 4), 15);
        assert_eq!(usat(300, 8), saturate_to_u8(300) as i32);
    }

    #[test]
    fn test_saturate_from_wide() {
        assert_eq!(i32::saturate_from(i64::MAX), i32::MAX);
        assert_eq!(i32::saturate_from(-5_000_000_000), i32::MIN);
        assert_eq!(i16::saturate_from(40_000), i16::MAX);
        assert_eq!(u8::saturate_from(-1), 0);
        assert_eq!(u16::saturate_from(70_000), u16::MAX);
        assert_eq!(i8::saturate_from(-12), -12);
    }

    #[test]
    fn test_lane_arithmetic_saturates() {
        assert_eq!(qadd8(100, 100), 127);
        assert_eq!(qsub8(-100, 100), -128);
        assert_eq!(qadd16(30000, 30000), i16::MAX);
        assert_eq!(qsub16(-30000, 30000), i16::MIN);
        assert_eq!(qadd(i32::MAX, 1), i32::MAX);
        assert_eq!(qsub(i32::MIN, 1), i32::MIN);
    }

    #[test]
    fn test_clamp_activation_and_headroom() {
        let range = ActivationRange::new(-10, 10);
        assert_eq!(clamp_activation(42, range), 10);
        assert_eq!(clamp_activation(-42, range), -10);
        assert_eq!(clamp_activation(3, range), 3);
        assert_eq!(headroom(1), 31);
        assert_eq!(headroom(0), 32);
        assert_eq!(headroom(0x4000_0000), 1);
    }
}
