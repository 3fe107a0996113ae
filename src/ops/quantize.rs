//! Affine float <-> int8 conversion.
//!
//! `q = clamp(round_half_even(x / scale) + zero_point, act_min, act_max)` and
//! `x = scale * (q - zero_point)`.
//!
//! Rounding uses the float magic-number trick: adding `1.5 * 2^23` to a value
//! of magnitude below `2^22` leaves the rounded integer in the low mantissa
//! bits, with the FPU's round-to-nearest-even doing the rounding. Folding the
//! zero point into the magic constant saves the integer add.

use half::f16;

use crate::error::{KernelError, KernelResult};
use crate::ops::saturate::{clamp_activation, saturate_to_i8};
use crate::types::{ActivationRange, QuantizeConfig};
use crate::validation::{check_len, validate_activation_range, validate_scale, validate_zero_point_s8};

/// Bit pattern of `1.5 * 2^23`.
const MAGIC_BITS: i32 = 0x4B40_0000;
/// Largest scaled magnitude the magic trick resolves to a unit step.
const SCALED_LIMIT: f32 = (1 << 22) as f32;

/// Quantize one value.
#[inline(always)]
pub fn quantize(x: f32, scale: f32, zero_point: i32, range: ActivationRange) -> i8 {
    quantize_with_inv(x, 1.0 / scale, zero_point, range)
}

#[inline(always)]
fn quantize_with_inv(x: f32, inv_scale: f32, zero_point: i32, range: ActivationRange) -> i8 {
    let scaled = x * inv_scale;
    // clamp passes NaN through.
    let limited = if scaled.is_nan() {
        -SCALED_LIMIT
    } else {
        scaled.clamp(-SCALED_LIMIT, SCALED_LIMIT)
    };
    let magic = f32::from_bits(MAGIC_BITS.wrapping_add(zero_point) as u32);
    let q = (limited + magic).to_bits() as i32 - MAGIC_BITS;
    saturate_to_i8(clamp_activation(q, range))
}

/// Dequantize one value.
#[inline(always)]
pub fn dequantize(q: i8, scale: f32, zero_point: i32) -> f32 {
    scale * (q as i32 - zero_point) as f32
}

fn validate_config(config: &QuantizeConfig) -> KernelResult<()> {
    validate_scale(config.scale)?;
    validate_zero_point_s8(config.zero_point)?;
    validate_activation_range(config.act_min, config.act_max)?;
    if config.act_min < i8::MIN as i32 || config.act_max > i8::MAX as i32 {
        return Err(KernelError::InvalidConfig(format!(
            "activation range [{}, {}] exceeds int8",
            config.act_min, config.act_max
        )));
    }
    Ok(())
}

/// Quantize an f32 buffer into int8.
pub fn quantize_f32_s8(input: &[f32], config: QuantizeConfig, output: &mut [i8]) -> KernelResult<()> {
    validate_config(&config)?;
    check_len("quantize output", input.len(), output.len())?;

    let inv_scale = 1.0 / config.scale;
    let range = config.activation_range();
    for (out, &x) in output.iter_mut().zip(input.iter()) {
        *out = quantize_with_inv(x, inv_scale, config.zero_point, range);
    }
    Ok(())
}

/// Quantize an f16 buffer into int8. Each element is widened to f32 first.
pub fn quantize_f16_s8(input: &[f16], config: QuantizeConfig, output: &mut [i8]) -> KernelResult<()> {
    validate_config(&config)?;
    check_len("quantize output", input.len(), output.len())?;

    let inv_scale = 1.0 / config.scale;
    let range = config.activation_range();
    for (out, &x) in output.iter_mut().zip(input.iter()) {
        *out = quantize_with_inv(x.to_f32(), inv_scale, config.zero_point, range);
    }
    Ok(())
}

/// Dequantize an int8 buffer into f32. The activation range is ignored.
pub fn dequantize_s8_f32(input: &[i8], config: QuantizeConfig, output: &mut [f32]) -> KernelResult<()> {
    validate_config(&config)?;
    check_len("dequantize output", input.len(), output.len())?;

    for (out, &q) in output.iter_mut().zip(input.iter()) {
        *out = dequantize(q, config.scale, config.zero_point);
    }
    Ok(())
}

/// Dequantize an int8 buffer into f16, rounding each f32 result once.
pub fn dequantize_s8_f16(input: &[i8], config: QuantizeConfig, output: &mut [f16]) -> KernelResult<()> {
    validate_config(&config)?;
    check_len("dequantize output", input.len(), output.len())?;

    for (out, &q) in output.iter_mut().zip(input.iter()) {
        *out = f16::from_f32(dequantize(q, config.scale, config.zero_point));
    }
    Ok(())
}
