//! Level-3 drivers.

use super::{handle_for, run, score, time_cpu, to_device, to_device_batch, to_host};
use crate::arguments::Arguments;
use crate::report::TestReport;
use crate::timing::{time_kernel, PerfRecord};
use crate::{bytes, flops, init};
use anyhow::Result;
use oxblas_common::{Diag, Fill, Float, PointerMode, Side, Transpose};
use oxblas_kernels::blas3;
use oxblas_kernels::{DeviceScalar, ScalarArg};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn op_dims(trans: Transpose, rows: i32, cols: i32) -> (i32, i32) {
    match trans {
        Transpose::None => (rows, cols),
        Transpose::Transpose => (cols, rows),
    }
}

pub fn testing_gemm<T: Float>(args: &Arguments) -> Result<TestReport> {
    let transa = Transpose::from_char(args.transa)?;
    let transb = Transpose::from_char(args.transb)?;
    let (m, n, k) = (args.m, args.n, args.k);
    let (lda, ldb, ldc) = (args.lda, args.ldb, args.ldc);
    let (alpha, beta): (T, T) = (args.get_alpha(), args.get_beta());
    let (ra, ca) = op_dims(transa, m, k);
    let (rb, cb) = op_dims(transb, k, n);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let ha: Vec<T> = init::matrix(&mut rng, ra, ca, lda, args.initialization);
    let hb: Vec<T> = init::matrix(&mut rng, rb, cb, ldb, args.initialization);
    let hc: Vec<T> = init::matrix(&mut rng, m, n, ldc, args.initialization);

    let mut gold = hc.clone();
    let cpu_us = time_cpu(|| {
        oxblas_reference::gemm(transa, transb, m, n, k, alpha, &ha, lda, &hb, ldb, beta, &mut gold, ldc)
    });

    let da = to_device(&ha)?;
    let db = to_device(&hb)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut dc = to_device(&hc)?;
        run(blas3::gemm(
            &handle, transa, transb, m, n, k, ScalarArg::Host(alpha), &da, lda, &db, ldb,
            ScalarArg::Host(beta), &mut dc, ldc,
        ))?;
        score(args, "gemm(host)", k, &gold, &to_host(&dc)?, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let dbeta = DeviceScalar::new(beta);
        let mut dc = to_device(&hc)?;
        run(blas3::gemm(
            &handle, transa, transb, m, n, k, ScalarArg::Device(&dalpha), &da, lda, &db, ldb,
            ScalarArg::Device(&dbeta), &mut dc, ldc,
        ))?;
        score(args, "gemm(device)", k, &gold, &to_host(&dc)?, &mut report.norm_error_device)?;
    }
    if args.timing {
        let handle = handle_for(PointerMode::Host);
        let mut dc = to_device(&hc)?;
        let us = time_kernel(&handle, args.cold_iters, args.iters, || {
            run(blas3::gemm(
                &handle, transa, transb, m, n, k, ScalarArg::Host(alpha), &da, lda, &db, ldb,
                ScalarArg::Host(beta), &mut dc, ldc,
            ))
        })?;
        report.perf = Some(PerfRecord::new(
            &handle,
            &args.function,
            us,
            args.iters,
            args.cold_iters,
            Some(cpu_us),
            Some(flops::gemm_gflop_count(m, n, k)),
            Some(bytes::gemm_gbyte_count(m, n, k, T::DATATYPE)),
        ));
    }
    Ok(report)
}

pub fn testing_gemm_batched<T: Float>(args: &Arguments) -> Result<TestReport> {
    let transa = Transpose::from_char(args.transa)?;
    let transb = Transpose::from_char(args.transb)?;
    let (m, n, k, bc) = (args.m, args.n, args.k, args.batch_count);
    let (lda, ldb, ldc) = (args.lda, args.ldb, args.ldc);
    let (alpha, beta): (T, T) = (args.get_alpha(), args.get_beta());
    let (ra, ca) = op_dims(transa, m, k);
    let (rb, cb) = op_dims(transb, k, n);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let ha: Vec<Vec<T>> =
        (0..bc.max(0)).map(|_| init::matrix(&mut rng, ra, ca, lda, args.initialization)).collect();
    let hb: Vec<Vec<T>> =
        (0..bc.max(0)).map(|_| init::matrix(&mut rng, rb, cb, ldb, args.initialization)).collect();
    let hc: Vec<Vec<T>> =
        (0..bc.max(0)).map(|_| init::matrix(&mut rng, m, n, ldc, args.initialization)).collect();

    let mut gold = hc.clone();
    for b in 0..bc.max(0) as usize {
        oxblas_reference::gemm(
            transa, transb, m, n, k, alpha, &ha[b], lda, &hb[b], ldb, beta, &mut gold[b], ldc,
        );
    }
    let gold_flat: Vec<T> = gold.concat();

    let da = to_device_batch(&ha)?;
    let db = to_device_batch(&hb)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut dc = to_device_batch(&hc)?;
        run(blas3::gemm_batched(
            &handle, transa, transb, m, n, k, ScalarArg::Host(alpha), &da, lda, &db, ldb,
            ScalarArg::Host(beta), &mut dc, ldc, bc,
        ))?;
        let out: Vec<T> = super::batch_to_host(&dc)?.concat();
        score(args, "gemm_batched(host)", k, &gold_flat, &out, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let dbeta = DeviceScalar::new(beta);
        let mut dc = to_device_batch(&hc)?;
        run(blas3::gemm_batched(
            &handle, transa, transb, m, n, k, ScalarArg::Device(&dalpha), &da, lda, &db, ldb,
            ScalarArg::Device(&dbeta), &mut dc, ldc, bc,
        ))?;
        let out: Vec<T> = super::batch_to_host(&dc)?.concat();
        score(args, "gemm_batched(device)", k, &gold_flat, &out, &mut report.norm_error_device)?;
    }
    Ok(report)
}

pub fn testing_gemm_strided_batched<T: Float>(args: &Arguments) -> Result<TestReport> {
    let transa = Transpose::from_char(args.transa)?;
    let transb = Transpose::from_char(args.transb)?;
    let (m, n, k, bc) = (args.m, args.n, args.k, args.batch_count);
    let (lda, ldb, ldc) = (args.lda, args.ldb, args.ldc);
    let (sa, sb, sc) = (args.stride_a, args.stride_b, args.stride_c);
    let (alpha, beta): (T, T) = (args.get_alpha(), args.get_beta());
    let (ra, ca) = op_dims(transa, m, k);
    let (rb, cb) = op_dims(transb, k, n);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let ha: Vec<T> = init::strided_matrix(&mut rng, ra, ca, lda, sa, bc, args.initialization);
    let hb: Vec<T> = init::strided_matrix(&mut rng, rb, cb, ldb, sb, bc, args.initialization);
    let hc: Vec<T> = init::strided_matrix(&mut rng, m, n, ldc, sc, bc, args.initialization);

    let mut gold = hc.clone();
    for b in 0..bc.max(0) as usize {
        oxblas_reference::gemm(
            transa, transb, m, n, k, alpha,
            &ha[b * sa as usize..], lda,
            &hb[b * sb as usize..], ldb,
            beta,
            &mut gold[b * sc as usize..], ldc,
        );
    }

    let da = to_device(&ha)?;
    let db = to_device(&hb)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut dc = to_device(&hc)?;
        run(blas3::gemm_strided_batched(
            &handle, transa, transb, m, n, k, ScalarArg::Host(alpha), &da, lda, sa, &db, ldb, sb,
            ScalarArg::Host(beta), &mut dc, ldc, sc, bc,
        ))?;
        score(args, "gemm_strided_batched(host)", k, &gold, &to_host(&dc)?, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let dbeta = DeviceScalar::new(beta);
        let mut dc = to_device(&hc)?;
        run(blas3::gemm_strided_batched(
            &handle, transa, transb, m, n, k, ScalarArg::Device(&dalpha), &da, lda, sa, &db, ldb, sb,
            ScalarArg::Device(&dbeta), &mut dc, ldc, sc, bc,
        ))?;
        score(args, "gemm_strided_batched(device)", k, &gold, &to_host(&dc)?, &mut report.norm_error_device)?;
    }
    Ok(report)
}

pub fn testing_syrk<T: Float>(args: &Arguments) -> Result<TestReport> {
    let uplo = Fill::from_char(args.uplo)?;
    let trans = Transpose::from_char(args.transa)?;
    let (n, k, lda, ldc) = (args.n, args.k, args.lda, args.ldc);
    let (alpha, beta): (T, T) = (args.get_alpha(), args.get_beta());
    let (ra, ca) = op_dims(trans, n, k);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let ha: Vec<T> = init::matrix(&mut rng, ra, ca, lda, args.initialization);
    let hc: Vec<T> = init::matrix(&mut rng, n, n, ldc, args.initialization);

    let mut gold = hc.clone();
    let cpu_us = time_cpu(|| {
        oxblas_reference::syrk(uplo, trans, n, k, alpha, &ha, lda, beta, &mut gold, ldc)
    });

    let da = to_device(&ha)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut dc = to_device(&hc)?;
        run(blas3::syrk(
            &handle, uplo, trans, n, k, ScalarArg::Host(alpha), &da, lda,
            ScalarArg::Host(beta), &mut dc, ldc,
        ))?;
        score(args, "syrk(host)", k, &gold, &to_host(&dc)?, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let dbeta = DeviceScalar::new(beta);
        let mut dc = to_device(&hc)?;
        run(blas3::syrk(
            &handle, uplo, trans, n, k, ScalarArg::Device(&dalpha), &da, lda,
            ScalarArg::Device(&dbeta), &mut dc, ldc,
        ))?;
        score(args, "syrk(device)", k, &gold, &to_host(&dc)?, &mut report.norm_error_device)?;
    }
    if args.timing {
        let handle = handle_for(PointerMode::Host);
        let mut dc = to_device(&hc)?;
        let us = time_kernel(&handle, args.cold_iters, args.iters, || {
            run(blas3::syrk(
                &handle, uplo, trans, n, k, ScalarArg::Host(alpha), &da, lda,
                ScalarArg::Host(beta), &mut dc, ldc,
            ))
        })?;
        report.perf = Some(PerfRecord::new(
            &handle,
            &args.function,
            us,
            args.iters,
            args.cold_iters,
            Some(cpu_us),
            Some(flops::syrk_gflop_count(n, k)),
            None,
        ));
    }
    Ok(report)
}

pub fn testing_trsm<T: Float>(args: &Arguments) -> Result<TestReport> {
    let side = Side::from_char(args.side)?;
    let uplo = Fill::from_char(args.uplo)?;
    let transa = Transpose::from_char(args.transa)?;
    let diag = Diag::from_char(args.diag)?;
    let (m, n, lda, ldb) = (args.m, args.n, args.lda, args.ldb);
    let alpha: T = args.get_alpha();
    let ka = match side {
        Side::Left => m,
        Side::Right => n,
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    let ha: Vec<T> = init::dominant_matrix(&mut rng, ka, lda, args.initialization);
    let hb: Vec<T> = init::matrix(&mut rng, m, n, ldb, args.initialization);

    let mut gold = hb.clone();
    let cpu_us = time_cpu(|| {
        oxblas_reference::trsm(side, uplo, transa, diag, m, n, alpha, &ha, lda, &mut gold, ldb)
    });

    let da = to_device(&ha)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut db = to_device(&hb)?;
        run(blas3::trsm(&handle, side, uplo, transa, diag, m, n, ScalarArg::Host(alpha), &da, lda, &mut db, ldb))?;
        score(args, "trsm(host)", ka, &gold, &to_host(&db)?, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let mut db = to_device(&hb)?;
        run(blas3::trsm(&handle, side, uplo, transa, diag, m, n, ScalarArg::Device(&dalpha), &da, lda, &mut db, ldb))?;
        score(args, "trsm(device)", ka, &gold, &to_host(&db)?, &mut report.norm_error_device)?;
    }
    if args.timing {
        let handle = handle_for(PointerMode::Host);
        let mut db = to_device(&hb)?;
        let us = time_kernel(&handle, args.cold_iters, args.iters, || {
            run(blas3::trsm(&handle, side, uplo, transa, diag, m, n, ScalarArg::Host(alpha), &da, lda, &mut db, ldb))
        })?;
        report.perf = Some(PerfRecord::new(
            &handle,
            &args.function,
            us,
            args.iters,
            args.cold_iters,
            Some(cpu_us),
            Some(flops::trsm_gflop_count(m, n, side == Side::Left)),
            None,
        ));
    }
    Ok(report)
}

/// Pins the level-3 validation contract.
pub fn testing_gemm_bad_arg<T: Float>(args: &Arguments) -> Result<TestReport> {
    let handle = handle_for(PointerMode::Host);
    let a = to_device(&vec![T::ONE; 16])?;
    let b = to_device(&vec![T::ONE; 16])?;
    let mut c = to_device(&vec![T::ONE; 16])?;
    let one = || ScalarArg::Host(T::ONE);
    let nn = Transpose::None;

    super::expect_invalid(
        blas3::gemm(&handle, nn, nn, -1, 4, 4, one(), &a, 4, &b, 4, one(), &mut c, 4),
        "gemm(m=-1)",
    )?;
    super::expect_invalid(
        blas3::gemm(&handle, nn, nn, 4, 4, -1, one(), &a, 4, &b, 4, one(), &mut c, 4),
        "gemm(k=-1)",
    )?;
    super::expect_invalid(
        blas3::gemm(&handle, nn, nn, 4, 4, 4, one(), &a, 3, &b, 4, one(), &mut c, 4),
        "gemm(lda<m)",
    )?;
    super::expect_invalid(
        blas3::gemm(&handle, nn, nn, 4, 4, 4, one(), &a, 4, &b, 4, one(), &mut c, 3),
        "gemm(ldc<m)",
    )?;
    // Transposed A is k x m, so lda must now cover k.
    super::expect_invalid(
        blas3::gemm(&handle, Transpose::Transpose, nn, 2, 4, 8, one(), &a, 4, &b, 8, one(), &mut c, 2),
        "gemm(transA lda<k)",
    )?;
    Ok(TestReport::new(&args.function))
}

pub fn testing_syrk_bad_arg<T: Float>(args: &Arguments) -> Result<TestReport> {
    let handle = handle_for(PointerMode::Host);
    let a = to_device(&vec![T::ONE; 16])?;
    let mut c = to_device(&vec![T::ONE; 16])?;
    let one = || ScalarArg::Host(T::ONE);
    let nn = Transpose::None;
    let up = Fill::Upper;

    super::expect_invalid(
        blas3::syrk(&handle, up, nn, -1, 4, one(), &a, 4, one(), &mut c, 4),
        "syrk(n=-1)",
    )?;
    super::expect_invalid(
        blas3::syrk(&handle, up, nn, 4, -1, one(), &a, 4, one(), &mut c, 4),
        "syrk(k=-1)",
    )?;
    super::expect_invalid(
        blas3::syrk(&handle, up, nn, 4, 4, one(), &a, 3, one(), &mut c, 4),
        "syrk(lda<n)",
    )?;
    super::expect_invalid(
        blas3::syrk(&handle, up, nn, 4, 4, one(), &a, 4, one(), &mut c, 3),
        "syrk(ldc<n)",
    )?;
    // Transposed A is k x n, so lda must now cover k.
    super::expect_invalid(
        blas3::syrk(&handle, up, Transpose::Transpose, 2, 8, one(), &a, 4, one(), &mut c, 2),
        "syrk(trans lda<k)",
    )?;
    Ok(TestReport::new(&args.function))
}

pub fn testing_trsm_bad_arg<T: Float>(args: &Arguments) -> Result<TestReport> {
    let handle = handle_for(PointerMode::Host);
    let a = to_device(&vec![T::ONE; 16])?;
    let mut b = to_device(&vec![T::ONE; 16])?;
    let one = || ScalarArg::Host(T::ONE);
    let (left, up, nn, unit) = (Side::Left, Fill::Upper, Transpose::None, Diag::NonUnit);

    super::expect_invalid(
        blas3::trsm(&handle, left, up, nn, unit, -1, 4, one(), &a, 4, &mut b, 4),
        "trsm(m=-1)",
    )?;
    super::expect_invalid(
        blas3::trsm(&handle, left, up, nn, unit, 4, -1, one(), &a, 4, &mut b, 4),
        "trsm(n=-1)",
    )?;
    // Left-sided A is m x m, so lda must cover m.
    super::expect_invalid(
        blas3::trsm(&handle, left, up, nn, unit, 4, 4, one(), &a, 3, &mut b, 4),
        "trsm(lda<m)",
    )?;
    super::expect_invalid(
        blas3::trsm(&handle, left, up, nn, unit, 4, 4, one(), &a, 4, &mut b, 3),
        "trsm(ldb<m)",
    )?;
    // Right-sided A is n x n, so lda must now cover n.
    super::expect_invalid(
        blas3::trsm(&handle, Side::Right, up, nn, unit, 2, 4, one(), &a, 3, &mut b, 2),
        "trsm(right lda<n)",
    )?;
    Ok(TestReport::new(&args.function))
}
