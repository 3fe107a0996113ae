//! Buffer entry points: quantize, dequantize, and int8 softmax.
//!
//! All functions return `0` on success and `-1` on rejected arguments. A
//! zero-length call succeeds without touching either pointer.

use std::slice;

use qnn_kernels::ops::{quantize, softmax};
use qnn_kernels::{KernelError, KernelResult, QuantizeConfig, SoftmaxS8Config};

use crate::{status, STATUS_INVALID, STATUS_OK};

fn non_null<T>(entry: &'static str, ptrs: &[*const T]) -> KernelResult<()> {
    if ptrs.iter().any(|p| p.is_null()) {
        return Err(KernelError::InvalidConfig(format!("{entry}: null buffer")));
    }
    Ok(())
}

/// Quantize `n` f32 values into int8.
///
/// # Safety
///
/// `input` must be valid for `n` reads and `output` for `n` writes; the two
/// regions must not overlap.
#[no_mangle]
#[inline(never)]
pub unsafe extern "C" fn qnn_quantize_f32_s8(
    input: *const f32,
    output: *mut i8,
    n: usize,
    scale: f32,
    zero_point: i32,
    act_min: i32,
    act_max: i32,
) -> i32 {
    if n == 0 {
        return STATUS_OK;
    }
    let checked = non_null("qnn_quantize_f32_s8", &[input as *const u8, output as *const u8]);
    if checked.is_err() {
        return status("qnn_quantize_f32_s8", checked);
    }
    let input = slice::from_raw_parts(input, n);
    let output = slice::from_raw_parts_mut(output, n);
    let config = QuantizeConfig::new(scale, zero_point).with_activation(act_min, act_max);
    status("qnn_quantize_f32_s8", quantize::quantize_f32_s8(input, config, output))
}

/// Dequantize `n` int8 values into f32.
///
/// # Safety
///
/// `input` must be valid for `n` reads and `output` for `n` writes; the two
/// regions must not overlap.
#[no_mangle]
#[inline(never)]
pub unsafe extern "C" fn qnn_dequantize_s8_f32(
    input: *const i8,
    output: *mut f32,
    n: usize,
    scale: f32,
    zero_point: i32,
) -> i32 {
    if n == 0 {
        return STATUS_OK;
    }
    let checked = non_null("qnn_dequantize_s8_f32", &[input as *const u8, output as *const u8]);
    if checked.is_err() {
        return status("qnn_dequantize_s8_f32", checked);
    }
    let input = slice::from_raw_parts(input, n);
    let output = slice::from_raw_parts_mut(output, n);
    let config = QuantizeConfig::new(scale, zero_point);
    status("qnn_dequantize_s8_f32", quantize::dequantize_s8_f32(input, config, output))
}

/// High-precision softmax over `num_rows` rows of `row_size` int8 values.
///
/// # Safety
///
/// `input` must be valid for `num_rows * row_size` reads and `output` for as
/// many writes; the two regions must not overlap.
#[no_mangle]
#[inline(never)]
pub unsafe extern "C" fn qnn_softmax_s8_hp(
    input: *const i8,
    num_rows: usize,
    row_size: usize,
    mult: i32,
    shift: i32,
    diff_min: i32,
    output: *mut i8,
) -> i32 {
    let config = SoftmaxS8Config::new(num_rows, row_size, mult, shift, diff_min);
    let Some(len) = config.len() else {
        log::warn!("qnn_softmax_s8_hp: {num_rows} x {row_size} overflows");
        return STATUS_INVALID;
    };
    if len == 0 {
        return STATUS_OK;
    }
    let checked = non_null("qnn_softmax_s8_hp", &[input as *const u8, output as *const u8]);
    if checked.is_err() {
        return status("qnn_softmax_s8_hp", checked);
    }
    let input = slice::from_raw_parts(input, len);
    let output = slice::from_raw_parts_mut(output, len);
    status("qnn_softmax_s8_hp", softmax::softmax_s8_hp(input, config, output))
}
