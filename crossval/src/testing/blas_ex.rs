//! Mixed-precision drivers.
//!
//! Scoring keys off the compute type: combinations that accumulate in a
//! type wide enough for the integer test data (f32, f64, i32) compare
//! exactly; half-precision accumulation gets the reduction-scaled bound.

use super::{handle_for, run, to_device, to_host};
use crate::arguments::Arguments;
use crate::compare;
use crate::report::TestReport;
use crate::init;
use anyhow::{ensure, Result};
use oxblas_common::{Compute, Error, Float, PointerMode, Scalar, Transpose};
use oxblas_kernels::blas_ex;
use oxblas_kernels::{DeviceScalar, ResultArg, ScalarArg};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn check_ex<To: Scalar>(
    label: &str,
    compute: oxblas_common::Datatype,
    reduction_len: i32,
    gold: &[To],
    actual: &[To],
) -> Result<()> {
    let tol = reduction_len.max(1) as f64 * compare::sum_error_tolerance(compute);
    if tol == 0.0 {
        compare::unit_check(label, gold, actual)
    } else {
        compare::near_check(label, gold, actual, tol)
    }
}

pub fn testing_gemm_ex<Ti, To, Tc>(args: &Arguments) -> Result<TestReport>
where
    Ti: Scalar,
    To: Scalar,
    Tc: Compute,
{
    let transa = Transpose::from_char(args.transa)?;
    let transb = Transpose::from_char(args.transb)?;
    let (m, n, k) = (args.m, args.n, args.k);
    let (lda, ldb, ldc) = (args.lda, args.ldb, args.ldc);
    let (alpha, beta): (Tc, Tc) = (args.get_alpha(), args.get_beta());
    let (ra, ca) = match transa {
        Transpose::None => (m, k),
        Transpose::Transpose => (k, m),
    };
    let (rb, cb) = match transb {
        Transpose::None => (k, n),
        Transpose::Transpose => (n, k),
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    let ha: Vec<Ti> = init::matrix(&mut rng, ra, ca, lda, args.initialization);
    let hb: Vec<Ti> = init::matrix(&mut rng, rb, cb, ldb, args.initialization);
    let hc: Vec<To> = init::matrix(&mut rng, m, n, ldc, args.initialization);

    let mut gold = hc.clone();
    oxblas_reference::gemm_ex::<Ti, To, Tc>(
        transa, transb, m, n, k, alpha, &ha, lda, &hb, ldb, beta, &mut gold, ldc,
    );

    let da = to_device(&ha)?;
    let db = to_device(&hb)?;
    let report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut dc = to_device(&hc)?;
        run(blas_ex::gemm_ex::<Ti, To, Tc>(
            &handle, transa, transb, m, n, k, ScalarArg::Host(alpha), &da, lda, &db, ldb,
            ScalarArg::Host(beta), &mut dc, ldc,
        ))?;
        check_ex("gemm_ex(host)", Tc::DATATYPE, k, &gold, &to_host(&dc)?)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let dbeta = DeviceScalar::new(beta);
        let mut dc = to_device(&hc)?;
        run(blas_ex::gemm_ex::<Ti, To, Tc>(
            &handle, transa, transb, m, n, k, ScalarArg::Device(&dalpha), &da, lda, &db, ldb,
            ScalarArg::Device(&dbeta), &mut dc, ldc,
        ))?;
        check_ex("gemm_ex(device)", Tc::DATATYPE, k, &gold, &to_host(&dc)?)?;
    }
    Ok(report)
}

pub fn testing_axpy_ex<Ta, Tx, Tc>(args: &Arguments) -> Result<TestReport>
where
    Ta: Scalar,
    Tx: Scalar,
    Tc: Compute,
{
    let (n, incx, incy) = (args.n, args.incx, args.incy);
    let alpha: Ta = args.get_alpha();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let hx: Vec<Tx> = init::vector(&mut rng, n, incx, args.initialization);
    let hy: Vec<Tx> = init::vector(&mut rng, n, incy, args.initialization);

    let mut gold = hy.clone();
    oxblas_reference::axpy_ex::<Ta, Tx, Tc>(n, alpha, &hx, incx, &mut gold, incy);

    let dx = to_device(&hx)?;
    let report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut dy = to_device(&hy)?;
        run(blas_ex::axpy_ex::<Ta, Tx, Tc>(&handle, n, ScalarArg::Host(alpha), &dx, incx, &mut dy, incy))?;
        check_ex("axpy_ex(host)", Tc::DATATYPE, 1, &gold, &to_host(&dy)?)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let mut dy = to_device(&hy)?;
        run(blas_ex::axpy_ex::<Ta, Tx, Tc>(&handle, n, ScalarArg::Device(&dalpha), &dx, incx, &mut dy, incy))?;
        check_ex("axpy_ex(device)", Tc::DATATYPE, 1, &gold, &to_host(&dy)?)?;
    }
    Ok(report)
}

pub fn testing_dot_ex<Tx, Tr, Tc>(args: &Arguments) -> Result<TestReport>
where
    Tx: Scalar,
    Tr: Scalar,
    Tc: Compute,
{
    let (n, incx, incy) = (args.n, args.incx, args.incy);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let hx: Vec<Tx> = init::vector(&mut rng, n, incx, args.initialization);
    let hy: Vec<Tx> = init::vector(&mut rng, n, incy, args.initialization);

    let gold = [oxblas_reference::dot_ex::<Tx, Tr, Tc>(n, &hx, incx, &hy, incy)];

    let dx = to_device(&hx)?;
    let dy = to_device(&hy)?;
    let report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut r = Tr::ZERO;
        run(blas_ex::dot_ex::<Tx, Tr, Tc>(&handle, n, &dx, incx, &dy, incy, ResultArg::Host(&mut r)))?;
        check_ex("dot_ex(host)", Tc::DATATYPE, n, &gold, &[r])?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let mut dr = DeviceScalar::new(Tr::ZERO);
        run(blas_ex::dot_ex::<Tx, Tr, Tc>(&handle, n, &dx, incx, &dy, incy, ResultArg::Device(&mut dr)))?;
        check_ex("dot_ex(device)", Tc::DATATYPE, n, &gold, &[dr.get()])?;
    }
    Ok(report)
}

/// Pins the mixed-precision validation contract for the uniform flavor.
pub fn testing_gemm_ex_bad_arg<T: Float>(args: &Arguments) -> Result<TestReport> {
    let handle = handle_for(PointerMode::Host);
    let a = to_device(&vec![T::ONE; 16])?;
    let b = to_device(&vec![T::ONE; 16])?;
    let mut c = to_device(&vec![T::ONE; 16])?;
    let one = || ScalarArg::Host(T::ONE);
    let nn = Transpose::None;

    super::expect_invalid(
        blas_ex::gemm_ex::<T, T, T>(&handle, nn, nn, -1, 4, 4, one(), &a, 4, &b, 4, one(), &mut c, 4),
        "gemm_ex(m=-1)",
    )?;
    super::expect_invalid(
        blas_ex::gemm_ex::<T, T, T>(&handle, nn, nn, 4, 4, -1, one(), &a, 4, &b, 4, one(), &mut c, 4),
        "gemm_ex(k=-1)",
    )?;
    super::expect_invalid(
        blas_ex::gemm_ex::<T, T, T>(&handle, nn, nn, 4, 4, 4, one(), &a, 3, &b, 4, one(), &mut c, 4),
        "gemm_ex(lda<m)",
    )?;
    super::expect_invalid(
        blas_ex::gemm_ex::<T, T, T>(&handle, nn, nn, 4, 4, 4, one(), &a, 4, &b, 4, one(), &mut c, 3),
        "gemm_ex(ldc<m)",
    )?;
    Ok(TestReport::new(&args.function))
}

pub fn testing_axpy_ex_bad_arg<T: Float>(args: &Arguments) -> Result<TestReport> {
    let x = to_device(&vec![T::ONE; 4])?;
    let mut y = to_device(&vec![T::ONE; 4])?;

    // Host scalar against a device-mode handle.
    let handle = handle_for(PointerMode::Device);
    let r = blas_ex::axpy_ex::<T, T, T>(&handle, 4, ScalarArg::Host(T::ONE), &x, 1, &mut y, 1);
    ensure!(
        matches!(r, Err(Error::PointerMode { arg: "alpha", .. })),
        "axpy_ex accepted a host scalar in device pointer mode"
    );

    // Buffer shorter than the span its arguments claim.
    let handle = handle_for(PointerMode::Host);
    let r = blas_ex::axpy_ex::<T, T, T>(&handle, 8, ScalarArg::Host(T::ONE), &x, 1, &mut y, 1);
    ensure!(
        matches!(r, Err(Error::SizeMismatch { .. })),
        "axpy_ex accepted a buffer shorter than its span"
    );
    Ok(TestReport::new(&args.function))
}

pub fn testing_dot_ex_bad_arg<T: Float>(args: &Arguments) -> Result<TestReport> {
    let x = to_device(&vec![T::ONE; 4])?;
    let y = to_device(&vec![T::ONE; 4])?;

    // Host result slot against a device-mode handle.
    let handle = handle_for(PointerMode::Device);
    let mut r = T::ZERO;
    let got = blas_ex::dot_ex::<T, T, T>(&handle, 4, &x, 1, &y, 1, ResultArg::Host(&mut r));
    ensure!(
        matches!(got, Err(Error::PointerMode { arg: "result", .. })),
        "dot_ex accepted a host result in device pointer mode"
    );

    // Buffer shorter than the span its arguments claim.
    let handle = handle_for(PointerMode::Host);
    let mut r = T::ZERO;
    let got = blas_ex::dot_ex::<T, T, T>(&handle, 8, &x, 1, &y, 1, ResultArg::Host(&mut r));
    ensure!(
        matches!(got, Err(Error::SizeMismatch { .. })),
        "dot_ex accepted a buffer shorter than its span"
    );
    Ok(TestReport::new(&args.function))
}
