//! Multiplier/shift requantization.
//!
//! Rescales an integer accumulator from one quantized domain into another
//! without going through floating point:
//!
//! ```text
//! output = round(value * multiplier * 2^shift / 2^31)
//! ```
//!
//! `multiplier` is a Q31 fraction and `shift` a signed exponent. The 64-bit
//! product cannot overflow for 32-bit inputs. The rounding step shifts to one
//! bit above the target, adds one and halves.
//!
//! # Variants
//!
//! - [`requantize`]: general form, any shift sign
//! - [`requantize_ps`] / [`requantize_ns`]: caller guarantees `shift >= 0` /
//!   `shift <= 0`; numerically identical to [`requantize`]
//! - [`requantize_s64`]: 64-bit accumulators with a 16-bit reduced multiplier
//! - [`requantize_double_rounding`]: two-step rounding via doubling high
//!   multiply plus rounding divide

use crate::error::KernelResult;
use crate::ops::fixed_point::{divide_by_power_of_two, saturating_doubling_high_multiply};
use crate::ops::saturate::{clamp_activation, saturate_to_i16, saturate_to_i8, Saturating};
use crate::types::{ActivationRange, RequantParams};
use crate::validation::{check_len, validate_activation_range, validate_shift};

/// Largest multiplier that survives [`reduce_multiplier`] without clamping.
const REDUCED_MULTIPLIER_LIMIT: i32 = 0x7FFF_0000;
const REDUCED_MULTIPLIER_MAX: i32 = 0x7FFF;

#[inline(always)]
fn requantize_impl(value: i32, multiplier: i32, shift: i32) -> i32 {
    let product = value as i64 * multiplier as i64;
    // Shifts past either end of the product degrade instead of overflowing.
    let total_shift = (30 - shift).clamp(0, 63) as u32;
    let rounded = ((product >> total_shift) + 1) >> 1;
    i32::saturate_from(rounded)
}

/// `round(value * multiplier * 2^shift / 2^31)`.
///
/// `multiplier == 0` yields 0 for every shift. Valid shifts lie in
/// `[-31, 30]`.
#[inline(always)]
pub fn requantize(value: i32, multiplier: i32, shift: i32) -> i32 {
    debug_assert!((-31..=30).contains(&shift), "requantize shift {shift} out of range");
    requantize_impl(value, multiplier, shift)
}

/// [`requantize`] for a shift known to be non-negative.
#[inline(always)]
pub fn requantize_ps(value: i32, multiplier: i32, shift: i32) -> i32 {
    debug_assert!((0..=30).contains(&shift), "requantize_ps shift {shift}");
    requantize_impl(value, multiplier, shift)
}

/// [`requantize`] for a shift known to be non-positive.
#[inline(always)]
pub fn requantize_ns(value: i32, multiplier: i32, shift: i32) -> i32 {
    debug_assert!((-31..=0).contains(&shift), "requantize_ns shift {shift}");
    requantize_impl(value, multiplier, shift)
}

/// Reduce a Q31 multiplier to 15 significant bits plus sign.
///
/// Multipliers at or above `0x7FFF_0000` clamp to `0x7FFF`.
#[inline(always)]
pub fn reduce_multiplier(multiplier: i32) -> i32 {
    if multiplier < REDUCED_MULTIPLIER_LIMIT {
        (multiplier + (1 << 15)) >> 16
    } else {
        REDUCED_MULTIPLIER_MAX
    }
}

/// Requantize a 64-bit accumulator with a multiplier from [`reduce_multiplier`].
///
/// The product of the accumulator and the 16-bit multiplier must fit in 64
/// bits, which holds for accumulators below `2^48`; larger products saturate.
#[inline(always)]
pub fn requantize_s64(value: i64, reduced_multiplier: i32, shift: i32) -> i32 {
    debug_assert!(reduced_multiplier.unsigned_abs() <= 0x8000);
    let product = value.saturating_mul(reduced_multiplier as i64);
    let total_shift = (14 - shift).clamp(0, 63) as u32;
    let rounded = ((product >> total_shift) + 1) >> 1;
    i32::saturate_from(rounded)
}

/// Two-step rounding: left shift, doubling high multiply, rounding divide.
pub fn requantize_double_rounding(value: i32, multiplier: i32, shift: i32) -> i32 {
    let left_shift = shift.clamp(0, 32) as u32;
    let right_shift = (-shift).max(0);
    let shifted = i32::saturate_from((value as i64) << left_shift);
    divide_by_power_of_two(saturating_doubling_high_multiply(shifted, multiplier), right_shift)
}

/// Decompose a real rescale factor into a Q31 multiplier and exponent.
///
/// The multiplier magnitude lands in `[2^30, 2^31)`. Zero and factors too
/// small to represent produce `(0, 0)`; factors too large saturate to the
/// largest representable pair.
pub fn quantize_multiplier(real_multiplier: f64) -> RequantParams {
    if real_multiplier == 0.0 {
        return RequantParams::new(0, 0);
    }
    if !real_multiplier.is_finite() {
        log::warn!("quantize_multiplier: non-finite scale {real_multiplier}");
        return RequantParams::new(0, 0);
    }

    let (fraction, mut shift) = frexp(real_multiplier);
    let mut q_fixed = (fraction * (1i64 << 31) as f64).round() as i64;
    if q_fixed.abs() == 1i64 << 31 {
        q_fixed /= 2;
        shift += 1;
    }
    if shift < -31 {
        log::debug!("quantize_multiplier: scale {real_multiplier} flushes to zero");
        return RequantParams::new(0, 0);
    }
    if shift > 30 {
        log::debug!("quantize_multiplier: scale {real_multiplier} saturates");
        let saturated = if q_fixed < 0 { -i32::MAX } else { i32::MAX };
        return RequantParams::new(saturated, 30);
    }
    RequantParams::new(q_fixed as i32, shift)
}

/// Split a finite non-zero `x` into `fraction * 2^exp` with `|fraction|` in `[0.5, 1)`.
fn frexp(x: f64) -> (f64, i32) {
    const EXP_MASK: u64 = 0x7FF << 52;
    let mut bits = x.to_bits();
    let mut bias_adjust = 0;
    if bits & EXP_MASK == 0 {
        // Subnormal: scale into the normal range first.
        bits = (x * 2f64.powi(54)).to_bits();
        bias_adjust = -54;
    }
    let exponent = ((bits & EXP_MASK) >> 52) as i32 - 1022 + bias_adjust;
    let fraction = f64::from_bits((bits & !EXP_MASK) | (1022u64 << 52));
    (fraction, exponent)
}

/// Per-accumulator output step: requantize, add the output offset, clamp.
#[inline(always)]
pub fn requantize_to_s8(acc: i32, params: RequantParams, output_offset: i32, range: ActivationRange) -> i8 {
    let scaled = requantize(acc, params.multiplier, params.shift).saturating_add(output_offset);
    saturate_to_i8(clamp_activation(scaled, range))
}

/// Output step for 64-bit accumulators narrowing to int16.
#[inline(always)]
pub fn requantize_s64_to_s16(acc: i64, reduced_multiplier: i32, shift: i32, range: ActivationRange) -> i16 {
    saturate_to_i16(clamp_activation(
        requantize_s64(acc, reduced_multiplier, shift),
        range,
    ))
}

/// Requantize a buffer of per-channel accumulators into int8.
///
/// `acc` holds rows of `multipliers.len()` channels; channel `c` of every row
/// uses `multipliers[c]` and `shifts[c]`.
pub fn requantize_per_channel_s8(
    acc: &[i32],
    multipliers: &[i32],
    shifts: &[i32],
    output_offset: i32,
    range: ActivationRange,
    output: &mut [i8],
) -> KernelResult<()> {
    let channels = multipliers.len();
    if channels == 0 {
        return Err("requantize_per_channel_s8: no channels".to_string().into());
    }
    check_len("shifts", channels, shifts.len())?;
    check_len("output", acc.len(), output.len())?;
    if acc.len() % channels != 0 {
        return Err(format!(
            "requantize_per_channel_s8: {} accumulators not a multiple of {channels} channels",
            acc.len()
        )
        .into());
    }
    validate_activation_range(range.min, range.max)?;
    for &shift in shifts {
        validate_shift(shift)?;
    }

    for (acc_row, out_row) in acc.chunks_exact(channels).zip(output.chunks_exact_mut(channels)) {
        for (c, (&a, out)) in acc_row.iter().zip(out_row.iter_mut()).enumerate() {
            *out = requantize_to_s8(a, RequantParams::new(multipliers[c], shifts[c]), output_offset, range);
        }
    }
    Ok(())
}
