//! Scalar float transcendental entry points.

use qnn_kernels::ops::float_math;

/// Polynomial `exp(x)`, clamped to `[-87, 88]`.
#[no_mangle]
#[inline(never)]
pub extern "C" fn qnn_exp_f32(x: f32) -> f32 {
    float_math::exp_f32(x)
}

/// Polynomial `tanh(x)`.
#[no_mangle]
#[inline(never)]
pub extern "C" fn qnn_tanh_f32(x: f32) -> f32 {
    float_math::tanh_f32(x)
}

/// Polynomial `sigmoid(x)`.
#[no_mangle]
#[inline(never)]
pub extern "C" fn qnn_sigmoid_f32(x: f32) -> f32 {
    float_math::sigmoid_f32(x)
}
