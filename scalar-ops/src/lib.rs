//! C ABI entry points over the qnn-kernels arithmetic core.
//!
//! Every function here is `#[no_mangle] pub extern "C"` so C operator kernels
//! can link against the same bit-exact arithmetic the Rust crate uses.
//!
//! Scalar entry points are total and never fail. Buffer entry points take
//! raw pointers plus explicit lengths and return `0` on success or `-1` when
//! an argument is rejected (null pointer with a non-zero length, inconsistent
//! shape, invalid quantization parameter). Rejections are logged through the
//! `log` facade.

pub mod activations;
pub mod fixed;
pub mod quant;

pub(crate) const STATUS_OK: i32 = 0;
pub(crate) const STATUS_INVALID: i32 = -1;

/// Map a kernel result onto the C status convention.
pub(crate) fn status(entry: &'static str, result: qnn_kernels::KernelResult<()>) -> i32 {
    match result {
        Ok(()) => STATUS_OK,
        Err(err) => {
            log::warn!("{entry}: {err}");
            STATUS_INVALID
        }
    }
}
