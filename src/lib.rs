//! qnn-kernels: bit-exact numeric core for quantized neural-network operators.
//!
//! This crate provides the arithmetic that int8/int16 operator kernels share:
//! - **Saturating Q-format arithmetic**: Q7/Q15/Q31 add, subtract, and clamp
//! - **Requantization**: multiplier/shift rescaling of 32- and 64-bit accumulators
//! - **Fixed-point transcendentals**: `exp` on negative values and `1/(1+x)`,
//!   driving the high-precision int8 softmax
//! - **Polynomial float math**: `exp`, `tanh`, `sigmoid` for f32 and f16
//! - **Affine quantization**: float <-> int8 with round-half-even
//!
//! Scalar primitives are total and allocation-free. Buffer kernels validate
//! their arguments once and return [`KernelResult`].
//!
//! # Quick Start
//!
//! ```
//! use qnn_kernels::{requantize, softmax_s8_hp, SoftmaxS8Config};
//!
//! assert_eq!(requantize(1_000_000, 1 << 30, 0), 500_000);
//!
//! let input = [10i8, 20, 30];
//! let mut output = [0i8; 3];
//! softmax_s8_hp(&input, SoftmaxS8Config::new(1, 3, 1_717_986_918, 23, -248), &mut output).unwrap();
//! assert!(output[2] > output[1] && output[1] > output[0]);
//! ```

pub mod error;
pub mod kernel_types;
pub mod ops;
pub mod types;
pub mod validation;

pub use error::{KernelError, KernelResult};
pub use kernel_types::{FloatType, KernelFloat};
pub use types::{ActivationRange, QuantizeConfig, RequantParams, SoftmaxConfig, SoftmaxS8Config};

// Saturating Q-format primitives
pub use ops::saturate::{
    Q7, Q15, Q31, Saturating,
    ssat, usat, saturate_to_i8, saturate_to_i16, saturate_to_u8,
    qadd8, qsub8, qadd16, qsub16, qadd, qsub,
    clamp_activation, headroom,
};

// Requantization exports
pub use ops::requantize::{
    requantize, requantize_ps, requantize_ns, requantize_s64, reduce_multiplier,
    requantize_double_rounding, quantize_multiplier,
    requantize_to_s8, requantize_s64_to_s16, requantize_per_channel_s8,
};

// Fixed-point transcendental exports
pub use ops::fixed_point::{
    NEWTON_RAPHSON_ITERATIONS,
    saturating_doubling_high_multiply, divide_by_power_of_two, divide_by_power_of_two_v2,
    multiply_by_power_of_two, exp_on_negative_values, one_over_one_plus_x_for_x_in_0_1,
};

// Float transcendental exports
pub use ops::float_math::{
    assemble_float,
    exp_f32, exp_f16, tanh_f32, tanh_f16, sigmoid_f32, sigmoid_f16, silu_f32, silu_f16,
};

// Slice activation exports
pub use ops::activations::{
    silu, silu_inplace,
    sigmoid, sigmoid_inplace,
    tanh_activation, tanh_inplace,
    exp_activation, exp_inplace,
};

// Softmax exports
pub use ops::softmax::{softmax, softmax_inplace, softmax_s8_hp, softmax_s8_s16_hp};

// Quantize/dequantize exports
pub use ops::quantize::{
    quantize, dequantize,
    quantize_f32_s8, quantize_f16_s8, dequantize_s8_f32, dequantize_s8_f16,
};
