use thiserror::Error;

/// Errors reported by buffer-level kernels.
///
/// Scalar primitives never fail; only kernels that walk caller-owned buffers
/// check their shapes and parameters up front.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("{what} length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type KernelResult<T> = Result<T, KernelError>;

impl From<String> for KernelError {
    fn from(msg: String) -> Self {
        KernelError::InvalidConfig(msg)
    }
}
