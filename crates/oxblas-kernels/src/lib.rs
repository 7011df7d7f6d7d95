//! Device model and BLAS routine surface.
//!
//! The device here is simulated: buffers are host memory behind a
//! transfer-only API, streams are in-order counters, and kernels run
//! synchronously. Everything above this crate — argument validation,
//! pointer modes, numeric checks, the shape of every routine — behaves as
//! it would against real hardware, which is what the cross-validation
//! harness exercises.
//!
//! Determinism contract: for a given build, every routine accumulates in a
//! fixed left-to-right order regardless of the compiled kernel backend, so
//! repeated runs and differently-tiled paths produce identical bits.

pub mod blas1;
pub mod blas2;
pub mod blas3;
pub mod blas_ex;
pub mod check_numerics;
pub mod device;
pub mod handle;
pub mod registry;

mod validate;

pub use check_numerics::{CheckNumericsMode, NumericsReport};
pub use device::{DeviceBatch, DeviceBuffer, DeviceScalar, Stream};
pub use handle::{Handle, ResultArg, ResultsArg, ScalarArg};
pub use registry::{KernelBackend, KernelCaps, SimdLevel};
