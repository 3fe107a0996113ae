//! Zero-cost activation functions over float slices.
//!
//! Slice forms of the polynomial approximations in [`crate::ops::float_math`],
//! generic over [`KernelFloat`] so the same code serves f32 and f16 buffers.
//!
//! # Supported Activations
//!
//! - **SiLU/Swish**: `x * sigmoid(x)`
//! - **Sigmoid**: `exp(x) / (1 + exp(x))`
//! - **Tanh**: hyperbolic tangent
//! - **Exp**: element-wise exponential
//!
//! # Design
//!
//! All functions have both in-place and out-of-place variants.
//! In-place variants modify the input directly, avoiding allocation.

use crate::error::KernelResult;
use crate::kernel_types::KernelFloat;
use crate::ops::float_math;
use crate::validation::check_len;

#[inline(always)]
fn map_into<T: KernelFloat>(input: &[T], output: &mut [T], f: impl Fn(T) -> T) -> KernelResult<()> {
    check_len("activation output", input.len(), output.len())?;
    for (out, &x) in output.iter_mut().zip(input.iter()) {
        *out = f(x);
    }
    Ok(())
}

// ============================================================================
// SiLU (Swish) Activation: x * sigmoid(x)
// ============================================================================

/// SiLU (Swish) activation in-place: `x = x * sigmoid(x)`.
#[inline(always)]
pub fn silu_inplace<T: KernelFloat>(data: &mut [T]) {
    for x in data.iter_mut() {
        *x = float_math::silu(*x);
    }
}

/// SiLU (Swish) activation: `output = input * sigmoid(input)`.
#[inline(always)]
pub fn silu<T: KernelFloat>(input: &[T], output: &mut [T]) -> KernelResult<()> {
    map_into(input, output, float_math::silu)
}

// ============================================================================
// Sigmoid Activation
// ============================================================================

/// Sigmoid activation in-place.
#[inline(always)]
pub fn sigmoid_inplace<T: KernelFloat>(data: &mut [T]) {
    for x in data.iter_mut() {
        *x = float_math::sigmoid(*x);
    }
}

/// Sigmoid activation.
#[inline(always)]
pub fn sigmoid<T: KernelFloat>(input: &[T], output: &mut [T]) -> KernelResult<()> {
    map_into(input, output, float_math::sigmoid)
}

// ============================================================================
// Tanh Activation
// ============================================================================

/// Tanh activation in-place.
#[inline(always)]
pub fn tanh_inplace<T: KernelFloat>(data: &mut [T]) {
    for x in data.iter_mut() {
        *x = float_math::tanh(*x);
    }
}

/// Tanh activation.
#[inline(always)]
pub fn tanh_activation<T: KernelFloat>(input: &[T], output: &mut [T]) -> KernelResult<()> {
    map_into(input, output, float_math::tanh)
}

// ============================================================================
// Exp
// ============================================================================

/// Element-wise exp in-place.
#[inline(always)]
pub fn exp_inplace<T: KernelFloat>(data: &mut [T]) {
    for x in data.iter_mut() {
        *x = float_math::exp(*x);
    }
}

/// Element-wise exp.
#[inline(always)]
pub fn exp_activation<T: KernelFloat>(input: &[T], output: &mut [T]) -> KernelResult<()> {
    map_into(input, output, float_math::exp)
}
