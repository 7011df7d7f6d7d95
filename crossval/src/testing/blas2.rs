//! Level-2 drivers.

use super::{handle_for, run, score, time_cpu, to_device, to_device_batch, to_host};
use crate::arguments::Arguments;
use crate::report::TestReport;
use crate::timing::{time_kernel, PerfRecord};
use crate::{bytes, flops, init};
use anyhow::Result;
use oxblas_common::{Diag, Fill, Float, PointerMode, Transpose};
use oxblas_kernels::blas2;
use oxblas_kernels::{DeviceScalar, ScalarArg};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn gemv_lens(trans: Transpose, m: i32, n: i32) -> (i32, i32, i32) {
    // (xlen, ylen, reduction length)
    match trans {
        Transpose::None => (n, m, n),
        Transpose::Transpose => (m, n, m),
    }
}

pub fn testing_gemv<T: Float>(args: &Arguments) -> Result<TestReport> {
    let trans = Transpose::from_char(args.transa)?;
    let (m, n, lda, incx, incy) = (args.m, args.n, args.lda, args.incx, args.incy);
    let (alpha, beta): (T, T) = (args.get_alpha(), args.get_beta());
    let (xlen, ylen, red) = gemv_lens(trans, m, n);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let ha: Vec<T> = init::matrix(&mut rng, m, n, lda, args.initialization);
    let hx: Vec<T> = init::vector(&mut rng, xlen, incx, args.initialization);
    let hy: Vec<T> = init::vector(&mut rng, ylen, incy, args.initialization);

    let mut gold = hy.clone();
    let cpu_us = time_cpu(|| {
        oxblas_reference::gemv(trans, m, n, alpha, &ha, lda, &hx, incx, beta, &mut gold, incy)
    });

    let da = to_device(&ha)?;
    let dx = to_device(&hx)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut dy = to_device(&hy)?;
        run(blas2::gemv(
            &handle, trans, m, n, ScalarArg::Host(alpha), &da, lda, &dx, incx,
            ScalarArg::Host(beta), &mut dy, incy,
        ))?;
        score(args, "gemv(host)", red, &gold, &to_host(&dy)?, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let dbeta = DeviceScalar::new(beta);
        let mut dy = to_device(&hy)?;
        run(blas2::gemv(
            &handle, trans, m, n, ScalarArg::Device(&dalpha), &da, lda, &dx, incx,
            ScalarArg::Device(&dbeta), &mut dy, incy,
        ))?;
        score(args, "gemv(device)", red, &gold, &to_host(&dy)?, &mut report.norm_error_device)?;
    }
    if args.timing {
        let handle = handle_for(PointerMode::Host);
        let mut dy = to_device(&hy)?;
        let us = time_kernel(&handle, args.cold_iters, args.iters, || {
            run(blas2::gemv(
                &handle, trans, m, n, ScalarArg::Host(alpha), &da, lda, &dx, incx,
                ScalarArg::Host(beta), &mut dy, incy,
            ))
        })?;
        report.perf = Some(PerfRecord::new(
            &handle,
            &args.function,
            us,
            args.iters,
            args.cold_iters,
            Some(cpu_us),
            Some(flops::gemv_gflop_count(m, n)),
            Some(bytes::gemv_gbyte_count(m, n, T::DATATYPE)),
        ));
    }
    Ok(report)
}

pub fn testing_gemv_batched<T: Float>(args: &Arguments) -> Result<TestReport> {
    let trans = Transpose::from_char(args.transa)?;
    let (m, n, lda, incx, incy, bc) = (args.m, args.n, args.lda, args.incx, args.incy, args.batch_count);
    let (alpha, beta): (T, T) = (args.get_alpha(), args.get_beta());
    let (xlen, ylen, red) = gemv_lens(trans, m, n);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let ha: Vec<Vec<T>> =
        (0..bc.max(0)).map(|_| init::matrix(&mut rng, m, n, lda, args.initialization)).collect();
    let hx: Vec<Vec<T>> = init::vector_batch(&mut rng, xlen, incx, bc, args.initialization);
    let hy: Vec<Vec<T>> = init::vector_batch(&mut rng, ylen, incy, bc, args.initialization);

    let mut gold = hy.clone();
    for b in 0..bc.max(0) as usize {
        oxblas_reference::gemv(trans, m, n, alpha, &ha[b], lda, &hx[b], incx, beta, &mut gold[b], incy);
    }
    let gold_flat: Vec<T> = gold.concat();

    let da = to_device_batch(&ha)?;
    let dx = to_device_batch(&hx)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut dy = to_device_batch(&hy)?;
        run(blas2::gemv_batched(
            &handle, trans, m, n, ScalarArg::Host(alpha), &da, lda, &dx, incx,
            ScalarArg::Host(beta), &mut dy, incy, bc,
        ))?;
        let out: Vec<T> = super::batch_to_host(&dy)?.concat();
        score(args, "gemv_batched(host)", red, &gold_flat, &out, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let dbeta = DeviceScalar::new(beta);
        let mut dy = to_device_batch(&hy)?;
        run(blas2::gemv_batched(
            &handle, trans, m, n, ScalarArg::Device(&dalpha), &da, lda, &dx, incx,
            ScalarArg::Device(&dbeta), &mut dy, incy, bc,
        ))?;
        let out: Vec<T> = super::batch_to_host(&dy)?.concat();
        score(args, "gemv_batched(device)", red, &gold_flat, &out, &mut report.norm_error_device)?;
    }
    Ok(report)
}

pub fn testing_gemv_strided_batched<T: Float>(args: &Arguments) -> Result<TestReport> {
    let trans = Transpose::from_char(args.transa)?;
    let (m, n, lda, incx, incy, bc) = (args.m, args.n, args.lda, args.incx, args.incy, args.batch_count);
    let (sa, sx, sy) = (args.stride_a, args.stride_x, args.stride_y);
    let (alpha, beta): (T, T) = (args.get_alpha(), args.get_beta());
    let (xlen, ylen, red) = gemv_lens(trans, m, n);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let ha: Vec<T> = init::strided_matrix(&mut rng, m, n, lda, sa, bc, args.initialization);
    let hx: Vec<T> = init::strided_vector(&mut rng, xlen, incx, sx, bc, args.initialization);
    let hy: Vec<T> = init::strided_vector(&mut rng, ylen, incy, sy, bc, args.initialization);

    let mut gold = hy.clone();
    for b in 0..bc.max(0) as usize {
        oxblas_reference::gemv(
            trans, m, n, alpha,
            &ha[b * sa as usize..], lda,
            &hx[b * sx as usize..], incx,
            beta,
            &mut gold[b * sy as usize..], incy,
        );
    }

    let da = to_device(&ha)?;
    let dx = to_device(&hx)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut dy = to_device(&hy)?;
        run(blas2::gemv_strided_batched(
            &handle, trans, m, n, ScalarArg::Host(alpha), &da, lda, sa, &dx, incx, sx,
            ScalarArg::Host(beta), &mut dy, incy, sy, bc,
        ))?;
        score(args, "gemv_strided_batched(host)", red, &gold, &to_host(&dy)?, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let dbeta = DeviceScalar::new(beta);
        let mut dy = to_device(&hy)?;
        run(blas2::gemv_strided_batched(
            &handle, trans, m, n, ScalarArg::Device(&dalpha), &da, lda, sa, &dx, incx, sx,
            ScalarArg::Device(&dbeta), &mut dy, incy, sy, bc,
        ))?;
        score(args, "gemv_strided_batched(device)", red, &gold, &to_host(&dy)?, &mut report.norm_error_device)?;
    }
    Ok(report)
}

pub fn testing_ger<T: Float>(args: &Arguments) -> Result<TestReport> {
    let (m, n, lda, incx, incy) = (args.m, args.n, args.lda, args.incx, args.incy);
    let alpha: T = args.get_alpha();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let hx: Vec<T> = init::vector(&mut rng, m, incx, args.initialization);
    let hy: Vec<T> = init::vector(&mut rng, n, incy, args.initialization);
    let ha: Vec<T> = init::matrix(&mut rng, m, n, lda, args.initialization);

    let mut gold = ha.clone();
    let cpu_us =
        time_cpu(|| oxblas_reference::ger(m, n, alpha, &hx, incx, &hy, incy, &mut gold, lda));

    let dx = to_device(&hx)?;
    let dy = to_device(&hy)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut da = to_device(&ha)?;
        run(blas2::ger(&handle, m, n, ScalarArg::Host(alpha), &dx, incx, &dy, incy, &mut da, lda))?;
        score(args, "ger(host)", 1, &gold, &to_host(&da)?, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let mut da = to_device(&ha)?;
        run(blas2::ger(&handle, m, n, ScalarArg::Device(&dalpha), &dx, incx, &dy, incy, &mut da, lda))?;
        score(args, "ger(device)", 1, &gold, &to_host(&da)?, &mut report.norm_error_device)?;
    }
    if args.timing {
        let handle = handle_for(PointerMode::Host);
        let mut da = to_device(&ha)?;
        let us = time_kernel(&handle, args.cold_iters, args.iters, || {
            run(blas2::ger(&handle, m, n, ScalarArg::Host(alpha), &dx, incx, &dy, incy, &mut da, lda))
        })?;
        report.perf = Some(PerfRecord::new(
            &handle,
            &args.function,
            us,
            args.iters,
            args.cold_iters,
            Some(cpu_us),
            Some(flops::ger_gflop_count(m, n)),
            None,
        ));
    }
    Ok(report)
}

pub fn testing_symv<T: Float>(args: &Arguments) -> Result<TestReport> {
    let uplo = Fill::from_char(args.uplo)?;
    let (n, lda, incx, incy) = (args.n, args.lda, args.incx, args.incy);
    let (alpha, beta): (T, T) = (args.get_alpha(), args.get_beta());

    let mut rng = StdRng::seed_from_u64(args.seed);
    let ha: Vec<T> = init::matrix(&mut rng, n, n, lda, args.initialization);
    let hx: Vec<T> = init::vector(&mut rng, n, incx, args.initialization);
    let hy: Vec<T> = init::vector(&mut rng, n, incy, args.initialization);

    let mut gold = hy.clone();
    let cpu_us = time_cpu(|| {
        oxblas_reference::symv(uplo, n, alpha, &ha, lda, &hx, incx, beta, &mut gold, incy)
    });

    let da = to_device(&ha)?;
    let dx = to_device(&hx)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut dy = to_device(&hy)?;
        run(blas2::symv(
            &handle, uplo, n, ScalarArg::Host(alpha), &da, lda, &dx, incx,
            ScalarArg::Host(beta), &mut dy, incy,
        ))?;
        score(args, "symv(host)", n, &gold, &to_host(&dy)?, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let dbeta = DeviceScalar::new(beta);
        let mut dy = to_device(&hy)?;
        run(blas2::symv(
            &handle, uplo, n, ScalarArg::Device(&dalpha), &da, lda, &dx, incx,
            ScalarArg::Device(&dbeta), &mut dy, incy,
        ))?;
        score(args, "symv(device)", n, &gold, &to_host(&dy)?, &mut report.norm_error_device)?;
    }
    if args.timing {
        let handle = handle_for(PointerMode::Host);
        let mut dy = to_device(&hy)?;
        let us = time_kernel(&handle, args.cold_iters, args.iters, || {
            run(blas2::symv(
                &handle, uplo, n, ScalarArg::Host(alpha), &da, lda, &dx, incx,
                ScalarArg::Host(beta), &mut dy, incy,
            ))
        })?;
        report.perf = Some(PerfRecord::new(
            &handle,
            &args.function,
            us,
            args.iters,
            args.cold_iters,
            Some(cpu_us),
            Some(flops::symv_gflop_count(n)),
            None,
        ));
    }
    Ok(report)
}

pub fn testing_trsv<T: Float>(args: &Arguments) -> Result<TestReport> {
    let uplo = Fill::from_char(args.uplo)?;
    let trans = Transpose::from_char(args.transa)?;
    let diag = Diag::from_char(args.diag)?;
    let (n, lda, incx) = (args.n, args.lda, args.incx);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let ha: Vec<T> = init::dominant_matrix(&mut rng, n, lda, args.initialization);
    let hx: Vec<T> = init::vector(&mut rng, n, incx, args.initialization);

    let mut gold = hx.clone();
    let cpu_us =
        time_cpu(|| oxblas_reference::trsv(uplo, trans, diag, n, &ha, lda, &mut gold, incx));

    let da = to_device(&ha)?;
    let mut report = TestReport::new(&args.function);
    let handle = handle_for(PointerMode::Host);
    let mut dx = to_device(&hx)?;
    run(blas2::trsv(&handle, uplo, trans, diag, n, &da, lda, &mut dx, incx))?;
    score(args, "trsv", n, &gold, &to_host(&dx)?, &mut report.norm_error_host)?;
    if args.timing {
        let mut dx = to_device(&hx)?;
        let us = time_kernel(&handle, args.cold_iters, args.iters, || {
            run(blas2::trsv(&handle, uplo, trans, diag, n, &da, lda, &mut dx, incx))
        })?;
        report.perf = Some(PerfRecord::new(
            &handle,
            &args.function,
            us,
            args.iters,
            args.cold_iters,
            Some(cpu_us),
            Some(flops::trsv_gflop_count(n)),
            None,
        ));
    }
    Ok(report)
}

/// Pins the level-2 validation contract: negative sizes, undersized leading
/// dimensions and zero increments must all reject.
pub fn testing_gemv_bad_arg<T: Float>(args: &Arguments) -> Result<TestReport> {
    let handle = handle_for(PointerMode::Host);
    let a = to_device(&vec![T::ONE; 16])?;
    let x = to_device(&vec![T::ONE; 4])?;
    let mut y = to_device(&vec![T::ONE; 4])?;
    let one = || ScalarArg::Host(T::ONE);

    super::expect_invalid(
        blas2::gemv(&handle, Transpose::None, -1, 4, one(), &a, 4, &x, 1, one(), &mut y, 1),
        "gemv(m=-1)",
    )?;
    super::expect_invalid(
        blas2::gemv(&handle, Transpose::None, 4, 4, one(), &a, 3, &x, 1, one(), &mut y, 1),
        "gemv(lda<m)",
    )?;
    super::expect_invalid(
        blas2::gemv(&handle, Transpose::None, 4, 4, one(), &a, 4, &x, 0, one(), &mut y, 1),
        "gemv(incx=0)",
    )?;
    super::expect_invalid(
        blas2::gemv(&handle, Transpose::None, 4, 4, one(), &a, 4, &x, 1, one(), &mut y, 0),
        "gemv(incy=0)",
    )?;
    Ok(TestReport::new(&args.function))
}

pub fn testing_ger_bad_arg<T: Float>(args: &Arguments) -> Result<TestReport> {
    let handle = handle_for(PointerMode::Host);
    let mut a = to_device(&vec![T::ONE; 16])?;
    let x = to_device(&vec![T::ONE; 4])?;
    let y = to_device(&vec![T::ONE; 4])?;
    let one = || ScalarArg::Host(T::ONE);

    super::expect_invalid(
        blas2::ger(&handle, -1, 4, one(), &x, 1, &y, 1, &mut a, 4),
        "ger(m=-1)",
    )?;
    super::expect_invalid(
        blas2::ger(&handle, 4, 4, one(), &x, 1, &y, 1, &mut a, 3),
        "ger(lda<m)",
    )?;
    super::expect_invalid(
        blas2::ger(&handle, 4, 4, one(), &x, 0, &y, 1, &mut a, 4),
        "ger(incx=0)",
    )?;
    Ok(TestReport::new(&args.function))
}

pub fn testing_symv_bad_arg<T: Float>(args: &Arguments) -> Result<TestReport> {
    let handle = handle_for(PointerMode::Host);
    let a = to_device(&vec![T::ONE; 16])?;
    let x = to_device(&vec![T::ONE; 4])?;
    let mut y = to_device(&vec![T::ONE; 4])?;
    let one = || ScalarArg::Host(T::ONE);

    super::expect_invalid(
        blas2::symv(&handle, Fill::Upper, -1, one(), &a, 4, &x, 1, one(), &mut y, 1),
        "symv(n=-1)",
    )?;
    super::expect_invalid(
        blas2::symv(&handle, Fill::Upper, 4, one(), &a, 3, &x, 1, one(), &mut y, 1),
        "symv(lda<n)",
    )?;
    super::expect_invalid(
        blas2::symv(&handle, Fill::Lower, 4, one(), &a, 4, &x, 1, one(), &mut y, 0),
        "symv(incy=0)",
    )?;
    Ok(TestReport::new(&args.function))
}

pub fn testing_trsv_bad_arg<T: Float>(args: &Arguments) -> Result<TestReport> {
    let handle = handle_for(PointerMode::Host);
    let a = to_device(&vec![T::ONE; 16])?;
    let mut x = to_device(&vec![T::ONE; 4])?;
    let (nn, nu) = (Transpose::None, Diag::NonUnit);

    super::expect_invalid(
        blas2::trsv(&handle, Fill::Upper, nn, nu, -1, &a, 4, &mut x, 1),
        "trsv(n=-1)",
    )?;
    super::expect_invalid(
        blas2::trsv(&handle, Fill::Upper, nn, nu, 4, &a, 3, &mut x, 1),
        "trsv(lda<n)",
    )?;
    super::expect_invalid(
        blas2::trsv(&handle, Fill::Lower, nn, nu, 4, &a, 4, &mut x, 0),
        "trsv(incx=0)",
    )?;
    Ok(TestReport::new(&args.function))
}
