//! Polynomial exp/tanh/sigmoid for f32 and f16.
//!
//! Algorithm for exp: clamp → m = floor(x / ln2) → r = x - m*ln2
//!            → degree-7 Taylor polynomial → 2^m via IEEE-754 exponent injection.
//!
//! All arithmetic runs in the element type. The input domains in
//! [`KernelFloat`] keep `m` small enough that the injected exponent never
//! leaves the normal range, so finite inputs never produce inf or NaN.

use half::f16;

use crate::kernel_types::KernelFloat;

/// Add `exponent_delta` to the biased exponent field of `mantissa`.
///
/// This is the only place that depends on the IEEE-754 bit layout: the
/// exponent field sits directly above the `MANTISSA_BITS`-wide fraction, so
/// adding `delta << MANTISSA_BITS` to the raw bits multiplies by `2^delta` as
/// long as the result stays normal.
#[inline(always)]
pub fn assemble_float<T: KernelFloat>(mantissa: T, exponent_delta: i32) -> T {
    let bits = mantissa
        .to_bits_i32()
        .wrapping_add(exponent_delta.wrapping_shl(T::MANTISSA_BITS));
    T::from_bits_i32(bits)
}

/// Polynomial `exp(x)`.
#[inline(always)]
pub fn exp<T: KernelFloat>(x: T) -> T {
    let x = x.clamp_to(T::EXP_MIN, T::EXP_MAX);

    let m = (x * T::INV_LN2).floor_to_i32();
    let r = x - T::from_i32(m) * T::LN2;

    let c = T::EXP_COEFFS;
    let r2 = r * r;
    let r4 = r2 * r2;
    let p01 = c[0] + c[1] * r;
    let p23 = c[2] + c[3] * r;
    let p45 = c[4] + c[5] * r;
    let p67 = c[6] + c[7] * r;
    let p0123 = p01 + p23 * r2;
    let p4567 = p45 + p67 * r2;
    let poly = p0123 + p4567 * r4;

    assemble_float(poly, m)
}

/// Polynomial `tanh(x)`.
///
/// Small arguments use the Taylor form `x * (1 - x^2 / 3)`; everything else
/// goes through `(e^2x - 1) / (e^2x + 1)`, which loses precision to
/// cancellation near zero.
#[inline(always)]
pub fn tanh<T: KernelFloat>(x: T) -> T {
    let x = x.clamp_to(T::TANH_MIN, T::TANH_MAX);
    if x.abs() < T::TANH_SMALL {
        return x * (T::ONE - x * x * T::ONE_THIRD);
    }
    let e = exp(x + x);
    (e - T::ONE) / (e + T::ONE)
}

/// `exp(x) / (1 + exp(x))`.
#[inline(always)]
pub fn sigmoid<T: KernelFloat>(x: T) -> T {
    let x = x.clamp_to(T::SIGMOID_MIN, T::SIGMOID_MAX);
    let e = exp(x);
    e / (T::ONE + e)
}

/// `x * sigmoid(x)`.
#[inline(always)]
pub fn silu<T: KernelFloat>(x: T) -> T {
    x * sigmoid(x)
}

#[inline(always)]
pub fn exp_f32(x: f32) -> f32 {
    exp(x)
}

#[inline(always)]
pub fn exp_f16(x: f16) -> f16 {
    exp(x)
}

#[inline(always)]
pub fn tanh_f32(x: f32) -> f32 {
    tanh(x)
}

#[inline(always)]
pub fn tanh_f16(x: f16) -> f16 {
    tanh(x)
}

#[inline(always)]
pub fn sigmoid_f32(x: f32) -> f32 {
    sigmoid(x)
}

#[inline(always)]
pub fn sigmoid_f16(x: f16) -> f16 {
    sigmoid(x)
}

#[inline(always)]
pub fn silu_f32(x: f32) -> f32 {
    silu(x)
}

#[inline(always)]
pub fn silu_f16(x: f16) -> f16 {
    silu(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_err(got: f32, want: f32) -> f32 {
        ((got - want) / want).abs()
    }

    #[test]
    fn test_assemble_float() {
        assert_eq!(assemble_float(1.5f32, 3), 12.0);
        assert_eq!(assemble_float(1.5f32, -1), 0.75);
        let h = assemble_float(f16::from_f32(1.25), 4);
        assert_eq!(h.to_f32(), 20.0);
    }

    #[test]
    fn test_exp_f32_at_zero() {
        assert!(rel_err(exp_f32(0.0), 1.0) < 1e-6);
    }

    #[test]
    fn test_exp_f32_accuracy() {
        let mut x = -80.0f32;
        while x <= 80.0 {
            let got = exp_f32(x);
            let want = x.exp();
            assert!(rel_err(got, want) < 2e-5, "exp({x}) = {got}, want {want}");
            x += 0.37;
        }
    }

    #[test]
    fn test_exp_f32_monotonic() {
        let mut prev = exp_f32(-90.0);
        let mut x = -90.0f32;
        while x < 90.0 {
            let cur = exp_f32(x);
            assert!(cur >= prev, "exp not monotonic at {x}");
            prev = cur;
            x += 0.01;
        }
    }

    #[test]
    fn test_exp_f32_clamps_to_finite() {
        assert!(exp_f32(1000.0).is_finite());
        assert!(exp_f32(-1000.0) > 0.0);
        assert_eq!(exp_f32(1000.0), exp_f32(f32::EXP_MAX));
    }

    #[test]
    fn test_exp_f16() {
        for &x in &[-9.0f32, -3.5, -1.0, 0.0, 0.5, 2.0, 7.25, 10.5] {
            let got = exp_f16(f16::from_f32(x)).to_f32();
            let want = f16::from_f32(x).to_f32().exp();
            assert!(rel_err(got, want) < 1e-2, "exp_f16({x}) = {got}, want {want}");
        }
        assert!(exp_f16(f16::from_f32(30.0)).to_f32().is_finite());
        assert!(exp_f16(f16::from_f32(-30.0)).to_f32() > 0.0);
    }

    #[test]
    fn test_tanh_f32() {
        assert_eq!(tanh_f32(0.0), 0.0);
        for &x in &[0.01f32, 0.05, 0.1, 0.5, 1.0, 2.0, 4.0, 8.0, 20.0] {
            let got = tanh_f32(x);
            assert!((got - x.tanh()).abs() < 2e-6, "tanh({x}) = {got}");
            assert!((tanh_f32(-x) + got).abs() < 2e-6, "tanh not odd at {x}");
        }
    }

    #[test]
    fn test_tanh_f16() {
        assert_eq!(tanh_f16(f16::ZERO).to_f32(), 0.0);
        for &x in &[0.1f32, 0.3, 1.0, 2.5, 6.0] {
            let got = tanh_f16(f16::from_f32(x)).to_f32();
            assert!((got - x.tanh()).abs() < 5e-3, "tanh_f16({x}) = {got}");
        }
    }

    #[test]
    fn test_sigmoid_f32() {
        assert!((sigmoid_f32(0.0) - 0.5).abs() < 1e-6);
        assert!((sigmoid_f32(1.0) - 0.731_058_6).abs() < 1e-5);
        assert!((sigmoid_f32(-1.0) - 0.268_941_4).abs() < 1e-5);
        assert!(sigmoid_f32(100.0).is_finite());
        assert!((sigmoid_f32(100.0) - 1.0).abs() < 1e-6);
        assert!(sigmoid_f32(-100.0) >= 0.0 && sigmoid_f32(-100.0) < 1e-30);
    }

    #[test]
    fn test_silu() {
        assert_eq!(silu_f32(0.0), 0.0);
        assert!((silu_f32(1.0) - 0.731_058_6).abs() < 1e-5);
        assert!((silu_f32(-1.0) + 0.268_941_4).abs() < 1e-5);
        let h = silu_f16(f16::from_f32(2.0)).to_f32();
        assert!((h - 1.761_594).abs() < 1e-2);
        assert!((sigmoid_f16(f16::ZERO).to_f32() - 0.5).abs() < 1e-3);
    }
}
