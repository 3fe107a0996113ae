//! Integer-only transcendental approximations.
//!
//! These back the high-precision int8 softmax. All values are Q31-family
//! fixed point:
//!
//! - [`exp_on_negative_values`] takes Q5.26 in `(-inf, 0]` and returns Q0.31
//! - [`one_over_one_plus_x_for_x_in_0_1`] takes Q0.31 in `[0, 1)` and returns
//!   Q0.31
//!
//! The polynomial degree, correction constants, and the number of
//! Newton-Raphson steps are frozen. Changing any of them breaks output parity
//! with reference quantized models.

use crate::ops::saturate::Q31;

/// Number of Newton-Raphson refinement steps in the reciprocal.
pub const NEWTON_RAPHSON_ITERATIONS: usize = 3;

/// `exp(-1/8)` in Q0.31.
const EXP_MINUS_ONE_EIGHTH: Q31 = 1_895_147_668;
/// `1/3` in Q0.31.
const ONE_THIRD_Q31: Q31 = 715_827_883;
/// One quarter in Q5.26.
const QUARTER_SHIFT: u32 = 24;

/// `exp(-2^(k-2))` in Q0.31 for remainder bits `k = 0..7` above the quarter.
const EXP_BARREL_FACTORS: [Q31; 7] = [
    1_672_461_947, // exp(-1/4)
    1_302_514_674, // exp(-1/2)
    790_015_084,   // exp(-1)
    290_630_308,   // exp(-2)
    39_332_535,    // exp(-4)
    720_401,       // exp(-8)
    242,           // exp(-16)
];

/// `48/17` and `-32/17` in Q2.29, the linear seed of the reciprocal.
const RECIP_SEED_CONSTANT: Q31 = 1_515_870_810;
const RECIP_SEED_SLOPE: Q31 = -1_010_580_540;
/// One in Q2.29.
const ONE_Q29: Q31 = 1 << 29;

/// `round(a * b * 2 / 2^32)` with saturation.
///
/// The rounding nudge is `2^30` for non-negative products and `1 - 2^30`
/// otherwise, followed by a truncating division, so exact halves move toward
/// positive infinity. `i32::MIN * i32::MIN` is the only pair whose result does
/// not fit and returns `i32::MAX`.
#[inline(always)]
pub fn saturating_doubling_high_multiply(a: Q31, b: Q31) -> Q31 {
    if a == i32::MIN && b == i32::MIN {
        return i32::MAX;
    }
    let nudge: i64 = if (a < 0) ^ (b < 0) { 1 - (1 << 30) } else { 1 << 30 };
    let product = a as i64 * b as i64 + nudge;
    (product / (1i64 << 31)) as i32
}

/// Rounding arithmetic shift right by `exponent`, ties away from zero.
///
/// The discarded remainder is compared against half the divisor; for
/// negative quotients the threshold is raised by one so that exact halves
/// move away from zero.
#[inline(always)]
pub fn divide_by_power_of_two(dividend: i32, exponent: i32) -> i32 {
    divide_rounding(dividend, exponent, true)
}

/// Rounding arithmetic shift right without the sign-dependent threshold.
///
/// Exact halves of negative dividends round toward positive infinity, so this
/// is not interchangeable with [`divide_by_power_of_two`]. It is used where
/// the dividend is known to be non-negative (the exponential sum of the int8
/// softmax), where both agree.
#[inline(always)]
pub fn divide_by_power_of_two_v2(dividend: i32, exponent: i32) -> i32 {
    divide_rounding(dividend, exponent, false)
}

#[inline(always)]
fn divide_rounding(dividend: i32, exponent: i32, sign_adjust: bool) -> i32 {
    debug_assert!(exponent >= 0, "negative divide exponent {exponent}");
    // Exponents past 31 are evaluated in 64 bits and round to 0 or -1.
    let exponent = exponent.clamp(0, 62) as u32;
    let dividend = dividend as i64;
    let mask = (1i64 << exponent) - 1;
    let remainder = dividend & mask;
    let mut result = dividend >> exponent;
    let mut threshold = mask >> 1;
    if sign_adjust && result < 0 {
        threshold += 1;
    }
    if remainder > threshold {
        result += 1;
    }
    result as i32
}

/// Saturating multiply by `2^exponent`.
#[inline(always)]
pub fn multiply_by_power_of_two(value: Q31, exponent: u32) -> Q31 {
    debug_assert!(exponent < 32);
    let exponent = exponent.min(31);
    let threshold = (1i64 << (31 - exponent)) - 1;
    let value_wide = value as i64;
    if value_wide > threshold {
        i32::MAX
    } else if value_wide < -threshold {
        i32::MIN
    } else {
        value << exponent
    }
}

/// `exp(val)` for `val` in `(-inf, 0]`, Q5.26 in, Q0.31 out.
///
/// The argument splits at quarter boundaries: the fractional part in
/// `[-1/4, 0)` is re-centred around `-1/8` and evaluated with a 4th-order
/// polynomial scaled by `exp(-1/8)`, then every set bit of the whole-quarter
/// remainder multiplies in its precomputed `exp(-2^k / 4)`, lowest bit first.
pub fn exp_on_negative_values(val: Q31) -> Q31 {
    debug_assert!(val <= 0, "exp_on_negative_values called with {val}");

    let quarter: i32 = 1 << QUARTER_SHIFT;
    let val_mod_minus_quarter = (val & (quarter - 1)) - quarter;
    let remainder = val_mod_minus_quarter.wrapping_sub(val);

    // Q5.26 -> Q0.31, shifted into [-1/8, 1/8).
    let x = (val_mod_minus_quarter << 5) + (1 << 28);
    let x2 = saturating_doubling_high_multiply(x, x);
    let x3 = saturating_doubling_high_multiply(x2, x);
    let x4 = saturating_doubling_high_multiply(x2, x2);
    let x4_over_4 = divide_by_power_of_two(x4, 2);
    let x4_over_24_plus_x3_over_6_plus_x2_over_2 = divide_by_power_of_two(
        saturating_doubling_high_multiply(x4_over_4 + x3, ONE_THIRD_Q31) + x2,
        1,
    );
    let mut result = EXP_MINUS_ONE_EIGHTH.saturating_add(saturating_doubling_high_multiply(
        EXP_MINUS_ONE_EIGHTH,
        x + x4_over_24_plus_x3_over_6_plus_x2_over_2,
    ));

    for (bit, &factor) in EXP_BARREL_FACTORS.iter().enumerate() {
        if remainder & (1 << (QUARTER_SHIFT + bit as u32)) != 0 {
            result = saturating_doubling_high_multiply(result, factor);
        }
    }

    if val == 0 {
        i32::MAX
    } else {
        result
    }
}

/// `1 / (1 + x)` for `x` in `[0, 1)`, Q0.31 in and out.
///
/// Seeded with the linear estimate `48/17 - 32/17 * d` on the half
/// denominator `d = (1 + x) / 2`, then refined with exactly
/// [`NEWTON_RAPHSON_ITERATIONS`] steps.
pub fn one_over_one_plus_x_for_x_in_0_1(val: Q31) -> Q31 {
    let sum = val as i64 + i32::MAX as i64;
    let half_denominator = ((sum + if sum >= 0 { 1 } else { -1 }) / 2) as i32;

    let mut x = RECIP_SEED_CONSTANT
        .saturating_add(saturating_doubling_high_multiply(half_denominator, RECIP_SEED_SLOPE));

    for _ in 0..NEWTON_RAPHSON_ITERATIONS {
        let half_denominator_times_x = saturating_doubling_high_multiply(half_denominator, x);
        let one_minus_half_denominator_times_x = ONE_Q29.saturating_sub(half_denominator_times_x);
        x = x.saturating_add(multiply_by_power_of_two(
            saturating_doubling_high_multiply(x, one_minus_half_denominator_times_x),
            2,
        ));
    }

    multiply_by_power_of_two(x, 1)
}
