//! Scalar fixed-point entry points.

use qnn_kernels::ops::{fixed_point, requantize};

/// `round(value * multiplier * 2^shift / 2^31)`, saturated to i32.
#[no_mangle]
#[inline(never)]
pub extern "C" fn qnn_requantize(value: i32, multiplier: i32, shift: i32) -> i32 {
    requantize::requantize(value, multiplier, shift)
}

/// 64-bit accumulator requantization with a 16-bit reduced multiplier.
#[no_mangle]
#[inline(never)]
pub extern "C" fn qnn_requantize_s64(value: i64, reduced_multiplier: i32, shift: i32) -> i32 {
    requantize::requantize_s64(value, reduced_multiplier, shift)
}

/// `exp(val)` for a Q5.26 value in `(-inf, 0]`, Q0.31 result.
///
/// Positive inputs are clamped to zero, returning `i32::MAX`.
#[no_mangle]
#[inline(never)]
pub extern "C" fn qnn_exp_on_negative_values(val: i32) -> i32 {
    fixed_point::exp_on_negative_values(val.min(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qnn_requantize() {
        assert_eq!(qnn_requantize(1_000_000, 1 << 30, 0), 500_000);
        assert_eq!(qnn_requantize(0, 1_234_567, -5), 0);
        assert_eq!(qnn_requantize(100, 1 << 30, 1), 100);
    }

    #[test]
    fn test_qnn_requantize_s64() {
        // reduced multiplier 0.5 in Q15
        assert_eq!(qnn_requantize_s64(1000, 1 << 14, 0), 500);
        assert_eq!(qnn_requantize_s64(0, 1 << 14, 3), 0);
    }

    #[test]
    fn test_qnn_exp_on_negative_values() {
        assert_eq!(qnn_exp_on_negative_values(0), i32::MAX);
        assert_eq!(qnn_exp_on_negative_values(1 << 20), i32::MAX);
        let e1 = qnn_exp_on_negative_values(-(1 << 26)) as f64 / 2f64.powi(31);
        assert!((e1 - (-1.0f64).exp()).abs() < 1e-6);
    }
}
