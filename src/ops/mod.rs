pub mod activations;
pub mod fixed_point;
pub mod float_math;
pub mod quantize;
pub mod requantize;
pub mod saturate;
pub mod softmax;

pub use saturate::{Q15, Q31, Q7};
