//! Host-side reference implementations.
//!
//! These are the CPU oracle the cross-validation harness scores device
//! results against. They run on plain slices, take host scalars, and use
//! the same left-to-right reduction order as the device kernels, so exact
//! comparison is meaningful wherever the arithmetic itself is exact.
//!
//! Shape handling mirrors the routine surface: degenerate sizes are no-ops
//! and an alpha of zero never reads the corresponding input. Out-of-range
//! indexing panics, which is what an oracle should do under a harness.

pub mod level1;
pub mod level2;
pub mod level3;
pub mod mixed;

pub use level1::{asum, axpy, copy, dot, iamax, nrm2, scal, swap};
pub use level2::{gemv, ger, symv, trsv};
pub use level3::{gemm, syrk, trsm};
pub use mixed::{axpy_ex, dot_ex, gemm_ex};
