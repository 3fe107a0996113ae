//! Row-wise softmax.
//!
//! Two families live here:
//!
//! - [`softmax`] / [`softmax_inplace`] for float rows, built on the
//!   polynomial exp in [`crate::ops::float_math`]
//! - [`softmax_s8_hp`] / [`softmax_s8_s16_hp`] for quantized int8 rows,
//!   computed entirely in Q31-family fixed point so results are bit-exact
//!   across platforms

use crate::error::{KernelError, KernelResult};
use crate::kernel_types::KernelFloat;
use crate::ops::fixed_point::{
    divide_by_power_of_two, divide_by_power_of_two_v2, exp_on_negative_values,
    one_over_one_plus_x_for_x_in_0_1, saturating_doubling_high_multiply,
};
use crate::ops::float_math;
use crate::ops::saturate::headroom;
use crate::types::{SoftmaxConfig, SoftmaxS8Config};
use crate::validation::{check_len, validate_rows};

// ============================================================================
// Float softmax
// ============================================================================

#[inline(always)]
fn softmax_row<T: KernelFloat>(input: &[T], output: &mut [T]) {
    let Some(&first) = input.first() else {
        return;
    };
    let max_val = input.iter().fold(first, |m, &x| m.max(x));

    let mut sum = T::ZERO;
    for (out, &x) in output.iter_mut().zip(input.iter()) {
        let e = float_math::exp(x - max_val);
        *out = e;
        sum = sum + e;
    }

    // The row maximum contributes exp(0) = 1, so sum >= 1.
    let inv = T::ONE / sum;
    for out in output.iter_mut() {
        *out = *out * inv;
    }
}

/// Softmax over `config.num_rows` contiguous rows of `config.row_size`.
pub fn softmax<T: KernelFloat>(input: &[T], output: &mut [T], config: SoftmaxConfig) -> KernelResult<()> {
    let len = validate_rows(config.num_rows, config.row_size)?;
    check_len("softmax input", len, input.len())?;
    check_len("softmax output", len, output.len())?;
    if len == 0 {
        return Ok(());
    }

    for (row_in, row_out) in input
        .chunks_exact(config.row_size)
        .zip(output.chunks_exact_mut(config.row_size))
    {
        softmax_row(row_in, row_out);
    }
    Ok(())
}

/// In-place softmax over `config.num_rows` rows.
pub fn softmax_inplace<T: KernelFloat>(data: &mut [T], config: SoftmaxConfig) -> KernelResult<()> {
    let len = validate_rows(config.num_rows, config.row_size)?;
    check_len("softmax data", len, data.len())?;
    if len == 0 {
        return Ok(());
    }

    for row in data.chunks_exact_mut(config.row_size) {
        let Some(&first) = row.first() else {
            continue;
        };
        let max_val = row.iter().fold(first, |m, &x| m.max(x));
        let mut sum = T::ZERO;
        for x in row.iter_mut() {
            *x = float_math::exp(*x - max_val);
            sum = sum + *x;
        }
        let inv = T::ONE / sum;
        for x in row.iter_mut() {
            *x = *x * inv;
        }
    }
    Ok(())
}

// ============================================================================
// High-precision int8 softmax
// ============================================================================

/// Fractional bits dropped from each `exp` term before accumulation.
/// Leaves 12 integer bits of headroom, enough for 4096 terms of at most 1.0.
const ACCUM_BITS: i32 = 12;

/// Row-independent part of the quantized softmax.
struct FixedSoftmax {
    mult: i32,
    shift_factor: i32,
    diff_min: i32,
}

impl FixedSoftmax {
    fn new(config: &SoftmaxS8Config) -> KernelResult<Self> {
        if !(0..31).contains(&config.shift) {
            log::warn!("softmax_s8: input shift {} outside [0, 30]", config.shift);
            return Err(KernelError::InvalidConfig(format!(
                "softmax input shift {} outside [0, 30]",
                config.shift
            )));
        }
        Ok(Self {
            mult: config.mult,
            shift_factor: 1 << config.shift,
            diff_min: config.diff_min,
        })
    }

    /// `exp(diff)` in Q0.31 for a non-positive integer difference.
    #[inline(always)]
    fn exp_diff(&self, diff: i32) -> i32 {
        let scaled = saturating_doubling_high_multiply(diff.saturating_mul(self.shift_factor), self.mult);
        exp_on_negative_values(scaled)
    }

    /// Writes one row; `emit(q31_probability_shifted, bits_over_unit)`
    /// produces the output code, `min_code` is written for underflowed
    /// elements.
    #[inline(always)]
    fn row<O: Copy>(
        &self,
        input: &[i8],
        output: &mut [O],
        frac_bits: i32,
        min_code: O,
        emit: impl Fn(i32) -> O,
    ) {
        let Some(max) = input.iter().copied().max() else {
            return;
        };
        let max = max as i32;

        let mut sum: i32 = 0;
        for &x in input {
            let diff = x as i32 - max;
            if diff >= self.diff_min {
                sum = sum.saturating_add(divide_by_power_of_two_v2(self.exp_diff(diff), ACCUM_BITS));
            }
        }

        // Normalise the sum into [1, 2) and take the reciprocal of it.
        let sum_headroom = if sum > 0 { headroom(sum) as i32 } else { 0 };
        let shifted_sum_minus_one = if sum > 0 {
            ((sum as u32) << sum_headroom).wrapping_sub(1u32 << 31) as i32
        } else {
            0
        };
        let shifted_scale = one_over_one_plus_x_for_x_in_0_1(shifted_sum_minus_one);
        let bits_over_unit = ACCUM_BITS - sum_headroom + frac_bits;

        for (out, &x) in output.iter_mut().zip(input.iter()) {
            let diff = x as i32 - max;
            *out = if diff >= self.diff_min {
                let prob = saturating_doubling_high_multiply(shifted_scale, self.exp_diff(diff));
                emit(divide_by_power_of_two(prob, bits_over_unit))
            } else {
                min_code
            };
        }
    }
}

fn check_s8_config(config: &SoftmaxS8Config, input_len: usize, output_len: usize) -> KernelResult<usize> {
    let len = validate_rows(config.num_rows, config.row_size)?;
    check_len("softmax_s8 input", len, input_len)?;
    check_len("softmax_s8 output", len, output_len)?;
    Ok(len)
}

/// High-precision softmax on int8 rows with int8 output.
///
/// Output codes cover `[-128, 127]` with `-128` meaning probability 0 and a
/// unit step of `1/256`. Elements whose difference to the row maximum is below
/// `config.diff_min` are written as `-128` without evaluating exp.
pub fn softmax_s8_hp(input: &[i8], config: SoftmaxS8Config, output: &mut [i8]) -> KernelResult<()> {
    let len = check_s8_config(&config, input.len(), output.len())?;
    if len == 0 {
        return Ok(());
    }
    let engine = FixedSoftmax::new(&config)?;

    for (row_in, row_out) in input
        .chunks_exact(config.row_size)
        .zip(output.chunks_exact_mut(config.row_size))
    {
        engine.row(row_in, row_out, 23, i8::MIN, |v| {
            (v + i8::MIN as i32).clamp(i8::MIN as i32, i8::MAX as i32) as i8
        });
    }
    Ok(())
}

/// High-precision softmax on int8 rows with int16 output.
///
/// Same as [`softmax_s8_hp`] with codes in `[-32768, 32767]` and a unit step of
/// `1/65536`.
pub fn softmax_s8_s16_hp(input: &[i8], config: SoftmaxS8Config, output: &mut [i16]) -> KernelResult<()> {
    let len = check_s8_config(&config, input.len(), output.len())?;
    if len == 0 {
        return Ok(());
    }
    let engine = FixedSoftmax::new(&config)?;

    for (row_in, row_out) in input
        .chunks_exact(config.row_size)
        .zip(output.chunks_exact_mut(config.row_size))
    {
        engine.row(row_in, row_out, 15, i16::MIN, |v| {
            (v + i16::MIN as i32).clamp(i16::MIN as i32, i16::MAX as i32) as i16
        });
    }
    Ok(())
}
