//! Datatype dispatch.
//!
//! Maps an argument record's function name and datatype tuple onto a
//! monomorphized driver. A tuple with no instantiation is not an error:
//! the case is skipped, which is what lets a sweep enumerate the full
//! type grid and only run the combinations the library ships.

use crate::arguments::Arguments;
use crate::report::TestOutcome;
use crate::testing;
use anyhow::Result;
use half::{bf16, f16};
use oxblas_common::Datatype;

/// The single datatype of a uniformly-typed case, or None when the tags
/// disagree (which no non-`_ex` routine supports).
fn uniform(args: &Arguments) -> Option<Datatype> {
    let dt = args.a_type;
    let all_same = args.b_type == dt
        && args.c_type == dt
        && args.d_type == dt
        && args.compute_type == dt;
    all_same.then_some(dt)
}

macro_rules! uniform_case {
    ($args:expr, $mod:ident :: $driver:ident, [$($tag:ident => $ty:ty),+ $(,)?]) => {
        match uniform($args) {
            $(Some(Datatype::$tag) => TestOutcome::Ran(testing::$mod::$driver::<$ty>($args)?),)+
            _ => TestOutcome::Skipped,
        }
    };
}

/// Runs one argument record end to end.
///
/// `Ok(Skipped)` means the datatype tuple has no kernel; `Err` means the
/// case ran and failed (numeric mismatch or unexpected status).
pub fn run_case(args: &Arguments) -> Result<TestOutcome> {
    log::debug!("dispatch {} a_type={} compute_type={}", args.function, args.a_type, args.compute_type);
    let outcome = match args.function.as_str() {
        "scal" => uniform_case!(args, blas1::testing_scal, [F16 => f16, F32 => f32, F64 => f64]),
        "axpy" => uniform_case!(args, blas1::testing_axpy, [F16 => f16, F32 => f32, F64 => f64]),
        "axpy_batched" => {
            uniform_case!(args, blas1::testing_axpy_batched, [F16 => f16, F32 => f32, F64 => f64])
        }
        "axpy_strided_batched" => uniform_case!(
            args,
            blas1::testing_axpy_strided_batched,
            [F16 => f16, F32 => f32, F64 => f64]
        ),
        "copy" => uniform_case!(args, blas1::testing_copy, [F32 => f32, F64 => f64]),
        "swap" => uniform_case!(args, blas1::testing_swap, [F32 => f32, F64 => f64]),
        "dot" => uniform_case!(
            args,
            blas1::testing_dot,
            [F16 => f16, Bf16 => bf16, F32 => f32, F64 => f64]
        ),
        "dot_batched" => uniform_case!(
            args,
            blas1::testing_dot_batched,
            [F16 => f16, Bf16 => bf16, F32 => f32, F64 => f64]
        ),
        "dot_strided_batched" => uniform_case!(
            args,
            blas1::testing_dot_strided_batched,
            [F16 => f16, Bf16 => bf16, F32 => f32, F64 => f64]
        ),
        "nrm2" => uniform_case!(args, blas1::testing_nrm2, [F32 => f32, F64 => f64]),
        "asum" => uniform_case!(args, blas1::testing_asum, [F32 => f32, F64 => f64]),
        "iamax" => uniform_case!(args, blas1::testing_iamax, [F32 => f32, F64 => f64]),
        "axpy_bad_arg" => {
            uniform_case!(args, blas1::testing_axpy_bad_arg, [F32 => f32, F64 => f64])
        }

        "gemv" => uniform_case!(args, blas2::testing_gemv, [F32 => f32, F64 => f64]),
        "gemv_batched" => {
            uniform_case!(args, blas2::testing_gemv_batched, [F32 => f32, F64 => f64])
        }
        "gemv_strided_batched" => {
            uniform_case!(args, blas2::testing_gemv_strided_batched, [F32 => f32, F64 => f64])
        }
        "ger" => uniform_case!(args, blas2::testing_ger, [F32 => f32, F64 => f64]),
        "symv" => uniform_case!(args, blas2::testing_symv, [F32 => f32, F64 => f64]),
        "trsv" => uniform_case!(args, blas2::testing_trsv, [F32 => f32, F64 => f64]),
        "gemv_bad_arg" => {
            uniform_case!(args, blas2::testing_gemv_bad_arg, [F32 => f32, F64 => f64])
        }
        "ger_bad_arg" => {
            uniform_case!(args, blas2::testing_ger_bad_arg, [F32 => f32, F64 => f64])
        }
        "symv_bad_arg" => {
            uniform_case!(args, blas2::testing_symv_bad_arg, [F32 => f32, F64 => f64])
        }
        "trsv_bad_arg" => {
            uniform_case!(args, blas2::testing_trsv_bad_arg, [F32 => f32, F64 => f64])
        }

        "gemm" => uniform_case!(args, blas3::testing_gemm, [F16 => f16, F32 => f32, F64 => f64]),
        "gemm_batched" => {
            uniform_case!(args, blas3::testing_gemm_batched, [F16 => f16, F32 => f32, F64 => f64])
        }
        "gemm_strided_batched" => uniform_case!(
            args,
            blas3::testing_gemm_strided_batched,
            [F16 => f16, F32 => f32, F64 => f64]
        ),
        "syrk" => uniform_case!(args, blas3::testing_syrk, [F32 => f32, F64 => f64]),
        "trsm" => uniform_case!(args, blas3::testing_trsm, [F32 => f32, F64 => f64]),
        "gemm_bad_arg" => {
            uniform_case!(args, blas3::testing_gemm_bad_arg, [F32 => f32, F64 => f64])
        }
        "syrk_bad_arg" => {
            uniform_case!(args, blas3::testing_syrk_bad_arg, [F32 => f32, F64 => f64])
        }
        "trsm_bad_arg" => {
            uniform_case!(args, blas3::testing_trsm_bad_arg, [F32 => f32, F64 => f64])
        }

        "gemm_ex" => gemm_ex_case(args)?,
        "axpy_ex" => axpy_ex_case(args)?,
        "dot_ex" => dot_ex_case(args)?,
        "gemm_ex_bad_arg" => {
            uniform_case!(args, blas_ex::testing_gemm_ex_bad_arg, [F32 => f32, F64 => f64])
        }
        "axpy_ex_bad_arg" => {
            uniform_case!(args, blas_ex::testing_axpy_ex_bad_arg, [F32 => f32, F64 => f64])
        }
        "dot_ex_bad_arg" => {
            uniform_case!(args, blas_ex::testing_dot_ex_bad_arg, [F32 => f32, F64 => f64])
        }

        other => {
            log::warn!("unknown function '{other}'");
            TestOutcome::Unsupported
        }
    };
    if outcome.is_skipped() {
        log::debug!("skipped {}: no instantiation for this datatype tuple", args.function);
    }
    Ok(outcome)
}

/// gemm_ex tuples: (input, output, compute) with b matching a and d
/// matching c.
fn gemm_ex_case(args: &Arguments) -> Result<TestOutcome> {
    use Datatype::*;
    if args.b_type != args.a_type || args.d_type != args.c_type {
        return Ok(TestOutcome::Skipped);
    }
    let report = match (args.a_type, args.c_type, args.compute_type) {
        (F16, F16, F16) => testing::blas_ex::testing_gemm_ex::<f16, f16, f16>(args)?,
        (F16, F16, F32) => testing::blas_ex::testing_gemm_ex::<f16, f16, f32>(args)?,
        (Bf16, Bf16, F32) => testing::blas_ex::testing_gemm_ex::<bf16, bf16, f32>(args)?,
        (F32, F32, F32) => testing::blas_ex::testing_gemm_ex::<f32, f32, f32>(args)?,
        (F64, F64, F64) => testing::blas_ex::testing_gemm_ex::<f64, f64, f64>(args)?,
        (I8, I32, I32) => testing::blas_ex::testing_gemm_ex::<i8, i32, i32>(args)?,
        _ => return Ok(TestOutcome::Skipped),
    };
    Ok(TestOutcome::Ran(report))
}

/// axpy_ex tuples: (alpha, element, compute).
fn axpy_ex_case(args: &Arguments) -> Result<TestOutcome> {
    use Datatype::*;
    if args.c_type != args.b_type || args.d_type != args.b_type {
        return Ok(TestOutcome::Skipped);
    }
    let report = match (args.a_type, args.b_type, args.compute_type) {
        (F16, F16, F16) => testing::blas_ex::testing_axpy_ex::<f16, f16, f16>(args)?,
        (F16, F16, F32) => testing::blas_ex::testing_axpy_ex::<f16, f16, f32>(args)?,
        (F32, F16, F32) => testing::blas_ex::testing_axpy_ex::<f32, f16, f32>(args)?,
        (F32, Bf16, F32) => testing::blas_ex::testing_axpy_ex::<f32, bf16, f32>(args)?,
        (F32, F32, F32) => testing::blas_ex::testing_axpy_ex::<f32, f32, f32>(args)?,
        (F64, F64, F64) => testing::blas_ex::testing_axpy_ex::<f64, f64, f64>(args)?,
        _ => return Ok(TestOutcome::Skipped),
    };
    Ok(TestOutcome::Ran(report))
}

/// dot_ex tuples: (element, result, compute).
fn dot_ex_case(args: &Arguments) -> Result<TestOutcome> {
    use Datatype::*;
    if args.b_type != args.a_type || args.c_type != args.a_type {
        return Ok(TestOutcome::Skipped);
    }
    let report = match (args.a_type, args.d_type, args.compute_type) {
        (F16, F16, F16) => testing::blas_ex::testing_dot_ex::<f16, f16, f16>(args)?,
        (F16, F16, F32) => testing::blas_ex::testing_dot_ex::<f16, f16, f32>(args)?,
        (Bf16, Bf16, F32) => testing::blas_ex::testing_dot_ex::<bf16, bf16, f32>(args)?,
        (F32, F32, F32) => testing::blas_ex::testing_dot_ex::<f32, f32, f32>(args)?,
        (F64, F64, F64) => testing::blas_ex::testing_dot_ex::<f64, f64, f64>(args)?,
        _ => return Ok(TestOutcome::Skipped),
    };
    Ok(TestOutcome::Ran(report))
}
