//! Common types and utilities for the oxblas BLAS library
//!
//! This crate provides the foundational types shared by the kernel, reference,
//! and cross-validation crates: the status-style error surface, the layout
//! enums every routine takes, the runtime datatype tags the dispatch layer
//! matches on, and the scalar traits that are their compile-time face.

pub mod datatype;
pub mod error;
pub mod math;
pub mod scalar;
pub mod types;

pub use datatype::Datatype;
pub use error::{Error, Result};
pub use math::{ceil_div, matrix_span, vector_index, vector_span};
pub use scalar::{Compute, Float, Scalar};
pub use types::{Diag, Fill, PointerMode, Side, Transpose};
