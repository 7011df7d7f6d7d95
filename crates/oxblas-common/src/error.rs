//! Status-style error surface.
//!
//! Every fallible routine in the library returns [`Result`]. The variants
//! mirror the status codes a GPU BLAS reports at its API boundary; states
//! that safe Rust makes unrepresentable (null pointers, dangling handles)
//! have no variant here.

use crate::types::PointerMode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A dimension argument is negative or a leading dimension is too small.
    #[error("invalid size: {arg} = {value}")]
    InvalidSize { arg: &'static str, value: i64 },

    /// An enum-like argument is outside its documented domain.
    #[error("invalid value for argument {arg}")]
    InvalidValue { arg: &'static str },

    /// A zero increment was passed to a routine that forbids it.
    #[error("invalid increment: {arg} = {value}")]
    InvalidIncrement { arg: &'static str, value: i32 },

    /// A buffer is too small for the shape the size arguments describe.
    #[error("buffer {arg} holds {actual} elements, shape requires {required}")]
    SizeMismatch {
        arg: &'static str,
        required: usize,
        actual: usize,
    },

    /// A scalar argument was passed in the wrong pointer mode for the handle.
    #[error("scalar {arg} does not match handle pointer mode {expected}")]
    PointerMode {
        arg: &'static str,
        expected: PointerMode,
    },

    /// Device allocation failed.
    #[error("device allocation of {bytes} bytes failed")]
    OutOfMemory { bytes: usize },

    /// Numeric checking found a NaN or infinity and the handle is in fail mode.
    #[error("{function}: numeric check failed on {location}")]
    CheckNumericsFail {
        function: &'static str,
        location: &'static str,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_argument() {
        let e = Error::InvalidSize { arg: "lda", value: -3 };
        assert_eq!(e.to_string(), "invalid size: lda = -3");
    }

    #[test]
    fn size_mismatch_reports_both_sides() {
        let e = Error::SizeMismatch { arg: "x", required: 10, actual: 4 };
        let s = e.to_string();
        assert!(s.contains("10") && s.contains("4"), "message: {s}");
    }

    #[test]
    fn pointer_mode_mentions_expected_mode() {
        let e = Error::PointerMode { arg: "alpha", expected: PointerMode::Device };
        assert!(e.to_string().contains("device"));
    }
}
