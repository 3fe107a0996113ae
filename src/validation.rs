//! Parameter validation for buffer-level kernels.
//!
//! Scalar primitives are total and never validate. The buffer kernels check
//! shapes and parameters once before touching any element.
//!
//! # Design
//!
//! - Parameter checks return `Result<(), String>`; callers map the message
//!   into [`KernelError::InvalidConfig`] with `?`
//! - Buffer lengths are checked with [`check_len`], which reports both sizes
//! - Row counts use `checked_mul` for overflow safety

use crate::error::{KernelError, KernelResult};

/// Validate a row layout and return the element count.
#[inline]
pub fn validate_rows(num_rows: usize, row_size: usize) -> Result<usize, String> {
    if row_size == 0 && num_rows != 0 {
        return Err("row_size must be > 0".into());
    }
    num_rows
        .checked_mul(row_size)
        .ok_or_else(|| format!("{num_rows} rows of {row_size} elements overflow usize"))
}

/// Validate an affine quantization scale.
#[inline]
pub fn validate_scale(scale: f32) -> Result<(), String> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(format!("scale {scale} must be finite and > 0"));
    }
    Ok(())
}

/// Validate an int8 zero point.
#[inline]
pub fn validate_zero_point_s8(zero_point: i32) -> Result<(), String> {
    if !(i8::MIN as i32..=i8::MAX as i32).contains(&zero_point) {
        return Err(format!("zero_point {zero_point} outside int8 range"));
    }
    Ok(())
}

/// Validate an activation clamp.
#[inline]
pub fn validate_activation_range(act_min: i32, act_max: i32) -> Result<(), String> {
    if act_min > act_max {
        return Err(format!("act_min {act_min} exceeds act_max {act_max}"));
    }
    Ok(())
}

/// Validate a requantization shift.
///
/// Shifts outside `[-31, 30]` move the rounding point outside the 64-bit
/// product and are rejected by the buffer kernels.
#[inline]
pub fn validate_shift(shift: i32) -> Result<(), String> {
    if !(-31..=30).contains(&shift) {
        return Err(format!("shift {shift} outside [-31, 30]"));
    }
    Ok(())
}

/// Check that a buffer holds exactly `expected` elements.
#[inline]
pub fn check_len(what: &'static str, expected: usize, actual: usize) -> KernelResult<()> {
    if expected != actual {
        log::warn!("{what}: expected {expected} elements, got {actual}");
        return Err(KernelError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rows() {
        assert_eq!(validate_rows(3, 4), Ok(12));
        assert_eq!(validate_rows(0, 0), Ok(0));
        assert!(validate_rows(2, 0).is_err());
        assert!(validate_rows(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_validate_scale() {
        assert!(validate_scale(0.5).is_ok());
        assert!(validate_scale(0.0).is_err());
        assert!(validate_scale(-1.0).is_err());
        assert!(validate_scale(f32::NAN).is_err());
        assert!(validate_scale(f32::INFINITY).is_err());
    }

    #[test]
    fn test_validate_zero_point_and_range() {
        assert!(validate_zero_point_s8(-128).is_ok());
        assert!(validate_zero_point_s8(128).is_err());
        assert!(validate_activation_range(-128, 127).is_ok());
        assert!(validate_activation_range(5, 4).is_err());
    }

    #[test]
    fn test_validate_shift() {
        assert!(validate_shift(-31).is_ok());
        assert!(validate_shift(30).is_ok());
        assert!(validate_shift(31).is_err());
        assert!(validate_shift(-32).is_err());
    }

    #[test]
    fn test_check_len() {
        assert!(check_len("input", 4, 4).is_ok());
        assert_eq!(
            check_len("output", 4, 3),
            Err(KernelError::LengthMismatch {
                what: "output",
                expected: 4,
                actual: 3
            })
        );
    }
}
