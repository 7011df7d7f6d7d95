//! Level-1 drivers.

use super::{handle_for, run, score, time_cpu, to_device, to_device_batch, to_host};
use crate::arguments::Arguments;
use crate::report::TestReport;
use crate::timing::{time_kernel, PerfRecord};
use crate::{bytes, flops, init};
use anyhow::{ensure, Result};
use oxblas_common::{Error, Float, PointerMode};
use oxblas_kernels::blas1;
use oxblas_kernels::{DeviceScalar, ResultArg, ResultsArg, ScalarArg};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn testing_scal<T: Float>(args: &Arguments) -> Result<TestReport> {
    let (n, incx) = (args.n, args.incx);
    let alpha: T = args.get_alpha();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let hx: Vec<T> = init::vector(&mut rng, n, incx, args.initialization);

    let mut gold = hx.clone();
    let cpu_us = time_cpu(|| oxblas_reference::scal(n, alpha, &mut gold, incx));

    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut dx = to_device(&hx)?;
        run(blas1::scal(&handle, n, ScalarArg::Host(alpha), &mut dx, incx))?;
        score(args, "scal(host)", 1, &gold, &to_host(&dx)?, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let mut dx = to_device(&hx)?;
        run(blas1::scal(&handle, n, ScalarArg::Device(&dalpha), &mut dx, incx))?;
        score(args, "scal(device)", 1, &gold, &to_host(&dx)?, &mut report.norm_error_device)?;
    }
    if args.timing {
        let handle = handle_for(PointerMode::Host);
        let mut dx = to_device(&hx)?;
        let us = time_kernel(&handle, args.cold_iters, args.iters, || {
            run(blas1::scal(&handle, n, ScalarArg::Host(alpha), &mut dx, incx))
        })?;
        report.perf = Some(PerfRecord::new(
            &handle,
            &args.function,
            us,
            args.iters,
            args.cold_iters,
            Some(cpu_us),
            Some(flops::scal_gflop_count(n)),
            Some(bytes::scal_gbyte_count(n, T::DATATYPE)),
        ));
    }
    Ok(report)
}

pub fn testing_axpy<T: Float>(args: &Arguments) -> Result<TestReport> {
    let (n, incx, incy) = (args.n, args.incx, args.incy);
    let alpha: T = args.get_alpha();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let hx: Vec<T> = init::vector(&mut rng, n, incx, args.initialization);
    let hy: Vec<T> = init::vector(&mut rng, n, incy, args.initialization);

    let mut gold = hy.clone();
    let cpu_us = time_cpu(|| oxblas_reference::axpy(n, alpha, &hx, incx, &mut gold, incy));

    let dx = to_device(&hx)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut dy = to_device(&hy)?;
        run(blas1::axpy(&handle, n, ScalarArg::Host(alpha), &dx, incx, &mut dy, incy))?;
        score(args, "axpy(host)", 1, &gold, &to_host(&dy)?, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let mut dy = to_device(&hy)?;
        run(blas1::axpy(&handle, n, ScalarArg::Device(&dalpha), &dx, incx, &mut dy, incy))?;
        score(args, "axpy(device)", 1, &gold, &to_host(&dy)?, &mut report.norm_error_device)?;
    }
    if args.timing {
        let handle = handle_for(PointerMode::Host);
        let mut dy = to_device(&hy)?;
        let us = time_kernel(&handle, args.cold_iters, args.iters, || {
            run(blas1::axpy(&handle, n, ScalarArg::Host(alpha), &dx, incx, &mut dy, incy))
        })?;
        report.perf = Some(PerfRecord::new(
            &handle,
            &args.function,
            us,
            args.iters,
            args.cold_iters,
            Some(cpu_us),
            Some(flops::axpy_gflop_count(n)),
            Some(bytes::axpy_gbyte_count(n, T::DATATYPE)),
        ));
    }
    Ok(report)
}

pub fn testing_axpy_batched<T: Float>(args: &Arguments) -> Result<TestReport> {
    let (n, incx, incy, bc) = (args.n, args.incx, args.incy, args.batch_count);
    let alpha: T = args.get_alpha();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let hx: Vec<Vec<T>> = init::vector_batch(&mut rng, n, incx, bc, args.initialization);
    let hy: Vec<Vec<T>> = init::vector_batch(&mut rng, n, incy, bc, args.initialization);

    let mut gold = hy.clone();
    for (gx, gy) in hx.iter().zip(&mut gold) {
        oxblas_reference::axpy(n, alpha, gx, incx, gy, incy);
    }
    let gold_flat: Vec<T> = gold.concat();

    let dx = to_device_batch(&hx)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut dy = to_device_batch(&hy)?;
        run(blas1::axpy_batched(&handle, n, ScalarArg::Host(alpha), &dx, incx, &mut dy, incy, bc))?;
        let out: Vec<T> = super::batch_to_host(&dy)?.concat();
        score(args, "axpy_batched(host)", 1, &gold_flat, &out, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let mut dy = to_device_batch(&hy)?;
        run(blas1::axpy_batched(&handle, n, ScalarArg::Device(&dalpha), &dx, incx, &mut dy, incy, bc))?;
        let out: Vec<T> = super::batch_to_host(&dy)?.concat();
        score(args, "axpy_batched(device)", 1, &gold_flat, &out, &mut report.norm_error_device)?;
    }
    Ok(report)
}

pub fn testing_axpy_strided_batched<T: Float>(args: &Arguments) -> Result<TestReport> {
    let (n, incx, incy, bc) = (args.n, args.incx, args.incy, args.batch_count);
    let (sx, sy) = (args.stride_x, args.stride_y);
    let alpha: T = args.get_alpha();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let hx: Vec<T> = init::strided_vector(&mut rng, n, incx, sx, bc, args.initialization);
    let hy: Vec<T> = init::strided_vector(&mut rng, n, incy, sy, bc, args.initialization);

    let mut gold = hy.clone();
    if alpha != T::ZERO {
        for b in 0..bc.max(0) as usize {
            oxblas_reference::axpy(
                n,
                alpha,
                &hx[b * sx as usize..],
                incx,
                &mut gold[b * sy as usize..],
                incy,
            );
        }
    }

    let dx = to_device(&hx)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut dy = to_device(&hy)?;
        run(blas1::axpy_strided_batched(
            &handle, n, ScalarArg::Host(alpha), &dx, incx, sx, &mut dy, incy, sy, bc,
        ))?;
        score(args, "axpy_strided_batched(host)", 1, &gold, &to_host(&dy)?, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let dalpha = DeviceScalar::new(alpha);
        let mut dy = to_device(&hy)?;
        run(blas1::axpy_strided_batched(
            &handle, n, ScalarArg::Device(&dalpha), &dx, incx, sx, &mut dy, incy, sy, bc,
        ))?;
        score(args, "axpy_strided_batched(device)", 1, &gold, &to_host(&dy)?, &mut report.norm_error_device)?;
    }
    Ok(report)
}

pub fn testing_copy<T: Float>(args: &Arguments) -> Result<TestReport> {
    let (n, incx, incy) = (args.n, args.incx, args.incy);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let hx: Vec<T> = init::vector(&mut rng, n, incx, args.initialization);
    let hy: Vec<T> = init::vector(&mut rng, n, incy, args.initialization);

    let mut gold = hy.clone();
    oxblas_reference::copy(n, &hx, incx, &mut gold, incy);

    let dx = to_device(&hx)?;
    let mut report = TestReport::new(&args.function);
    let handle = handle_for(PointerMode::Host);
    let mut dy = to_device(&hy)?;
    run(blas1::copy(&handle, n, &dx, incx, &mut dy, incy))?;
    score(args, "copy", 1, &gold, &to_host(&dy)?, &mut report.norm_error_host)?;
    Ok(report)
}

pub fn testing_swap<T: Float>(args: &Arguments) -> Result<TestReport> {
    let (n, incx, incy) = (args.n, args.incx, args.incy);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let hx: Vec<T> = init::vector(&mut rng, n, incx, args.initialization);
    let hy: Vec<T> = init::vector(&mut rng, n, incy, args.initialization);

    let mut gold_x = hx.clone();
    let mut gold_y = hy.clone();
    oxblas_reference::swap(n, &mut gold_x, incx, &mut gold_y, incy);

    let mut report = TestReport::new(&args.function);
    let handle = handle_for(PointerMode::Host);
    let mut dx = to_device(&hx)?;
    let mut dy = to_device(&hy)?;
    run(blas1::swap(&handle, n, &mut dx, incx, &mut dy, incy))?;
    score(args, "swap(x)", 1, &gold_x, &to_host(&dx)?, &mut report.norm_error_host)?;
    score(args, "swap(y)", 1, &gold_y, &to_host(&dy)?, &mut report.norm_error_host)?;
    Ok(report)
}

pub fn testing_dot<T: Float>(args: &Arguments) -> Result<TestReport> {
    let (n, incx, incy) = (args.n, args.incx, args.incy);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let hx: Vec<T> = init::vector(&mut rng, n, incx, args.initialization);
    let hy: Vec<T> = init::vector(&mut rng, n, incy, args.initialization);

    let mut gold = [T::ZERO];
    let cpu_us = time_cpu(|| gold[0] = oxblas_reference::dot(n, &hx, incx, &hy, incy));

    let dx = to_device(&hx)?;
    let dy = to_device(&hy)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut r = T::ZERO;
        run(blas1::dot(&handle, n, &dx, incx, &dy, incy, ResultArg::Host(&mut r)))?;
        score(args, "dot(host)", n, &gold, &[r], &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let mut dr = DeviceScalar::new(T::ZERO);
        run(blas1::dot(&handle, n, &dx, incx, &dy, incy, ResultArg::Device(&mut dr)))?;
        score(args, "dot(device)", n, &gold, &[dr.get()], &mut report.norm_error_device)?;
    }
    if args.timing {
        let handle = handle_for(PointerMode::Host);
        let mut r = T::ZERO;
        let us = time_kernel(&handle, args.cold_iters, args.iters, || {
            run(blas1::dot(&handle, n, &dx, incx, &dy, incy, ResultArg::Host(&mut r)))
        })?;
        report.perf = Some(PerfRecord::new(
            &handle,
            &args.function,
            us,
            args.iters,
            args.cold_iters,
            Some(cpu_us),
            Some(flops::dot_gflop_count(n)),
            Some(bytes::dot_gbyte_count(n, T::DATATYPE)),
        ));
    }
    Ok(report)
}

pub fn testing_dot_batched<T: Float>(args: &Arguments) -> Result<TestReport> {
    let (n, incx, incy, bc) = (args.n, args.incx, args.incy, args.batch_count);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let hx: Vec<Vec<T>> = init::vector_batch(&mut rng, n, incx, bc, args.initialization);
    let hy: Vec<Vec<T>> = init::vector_batch(&mut rng, n, incy, bc, args.initialization);

    let gold: Vec<T> = hx
        .iter()
        .zip(&hy)
        .map(|(gx, gy)| oxblas_reference::dot(n, gx, incx, gy, incy))
        .collect();

    let dx = to_device_batch(&hx)?;
    let dy = to_device_batch(&hy)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut rs = vec![T::ZERO; bc.max(0) as usize];
        run(blas1::dot_batched(&handle, n, &dx, incx, &dy, incy, bc, ResultsArg::Host(&mut rs)))?;
        score(args, "dot_batched(host)", n, &gold, &rs, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let mut dr = oxblas_kernels::DeviceBuffer::new(bc.max(0) as usize)?;
        run(blas1::dot_batched(&handle, n, &dx, incx, &dy, incy, bc, ResultsArg::Device(&mut dr)))?;
        score(args, "dot_batched(device)", n, &gold, &to_host(&dr)?, &mut report.norm_error_device)?;
    }
    Ok(report)
}

pub fn testing_dot_strided_batched<T: Float>(args: &Arguments) -> Result<TestReport> {
    let (n, incx, incy, bc) = (args.n, args.incx, args.incy, args.batch_count);
    let (sx, sy) = (args.stride_x, args.stride_y);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let hx: Vec<T> = init::strided_vector(&mut rng, n, incx, sx, bc, args.initialization);
    let hy: Vec<T> = init::strided_vector(&mut rng, n, incy, sy, bc, args.initialization);

    let gold: Vec<T> = (0..bc.max(0) as usize)
        .map(|b| {
            oxblas_reference::dot(n, &hx[b * sx as usize..], incx, &hy[b * sy as usize..], incy)
        })
        .collect();

    let dx = to_device(&hx)?;
    let dy = to_device(&hy)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut rs = vec![T::ZERO; bc.max(0) as usize];
        run(blas1::dot_strided_batched(
            &handle, n, &dx, incx, sx, &dy, incy, sy, bc, ResultsArg::Host(&mut rs),
        ))?;
        score(args, "dot_strided_batched(host)", n, &gold, &rs, &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let mut dr = oxblas_kernels::DeviceBuffer::new(bc.max(0) as usize)?;
        run(blas1::dot_strided_batched(
            &handle, n, &dx, incx, sx, &dy, incy, sy, bc, ResultsArg::Device(&mut dr),
        ))?;
        score(args, "dot_strided_batched(device)", n, &gold, &to_host(&dr)?, &mut report.norm_error_device)?;
    }
    Ok(report)
}

pub fn testing_nrm2<T: Float>(args: &Arguments) -> Result<TestReport> {
    let (n, incx) = (args.n, args.incx);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let hx: Vec<T> = init::vector(&mut rng, n, incx, args.initialization);

    let mut gold = [T::ZERO];
    let cpu_us = time_cpu(|| gold[0] = oxblas_reference::nrm2(n, &hx, incx));

    let dx = to_device(&hx)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut r = T::ZERO;
        run(blas1::nrm2(&handle, n, &dx, incx, ResultArg::Host(&mut r)))?;
        score(args, "nrm2(host)", n, &gold, &[r], &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let mut dr = DeviceScalar::new(T::ZERO);
        run(blas1::nrm2(&handle, n, &dx, incx, ResultArg::Device(&mut dr)))?;
        score(args, "nrm2(device)", n, &gold, &[dr.get()], &mut report.norm_error_device)?;
    }
    if args.timing {
        let handle = handle_for(PointerMode::Host);
        let mut r = T::ZERO;
        let us = time_kernel(&handle, args.cold_iters, args.iters, || {
            run(blas1::nrm2(&handle, n, &dx, incx, ResultArg::Host(&mut r)))
        })?;
        report.perf = Some(PerfRecord::new(
            &handle,
            &args.function,
            us,
            args.iters,
            args.cold_iters,
            Some(cpu_us),
            Some(flops::nrm2_gflop_count(n)),
            Some(bytes::reduction_gbyte_count(n, T::DATATYPE)),
        ));
    }
    Ok(report)
}

pub fn testing_asum<T: Float>(args: &Arguments) -> Result<TestReport> {
    let (n, incx) = (args.n, args.incx);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let hx: Vec<T> = init::vector(&mut rng, n, incx, args.initialization);

    let mut gold = [T::ZERO];
    let cpu_us = time_cpu(|| gold[0] = oxblas_reference::asum(n, &hx, incx));

    let dx = to_device(&hx)?;
    let mut report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut r = T::ZERO;
        run(blas1::asum(&handle, n, &dx, incx, ResultArg::Host(&mut r)))?;
        score(args, "asum(host)", n, &gold, &[r], &mut report.norm_error_host)?;
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let mut dr = DeviceScalar::new(T::ZERO);
        run(blas1::asum(&handle, n, &dx, incx, ResultArg::Device(&mut dr)))?;
        score(args, "asum(device)", n, &gold, &[dr.get()], &mut report.norm_error_device)?;
    }
    if args.timing {
        let handle = handle_for(PointerMode::Host);
        let mut r = T::ZERO;
        let us = time_kernel(&handle, args.cold_iters, args.iters, || {
            run(blas1::asum(&handle, n, &dx, incx, ResultArg::Host(&mut r)))
        })?;
        report.perf = Some(PerfRecord::new(
            &handle,
            &args.function,
            us,
            args.iters,
            args.cold_iters,
            Some(cpu_us),
            Some(flops::asum_gflop_count(n)),
            Some(bytes::reduction_gbyte_count(n, T::DATATYPE)),
        ));
    }
    Ok(report)
}

pub fn testing_iamax<T: Float>(args: &Arguments) -> Result<TestReport> {
    let (n, incx) = (args.n, args.incx);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let hx: Vec<T> = init::vector(&mut rng, n, incx, args.initialization);

    let gold = oxblas_reference::iamax(n, &hx, incx);

    let dx = to_device(&hx)?;
    let report = TestReport::new(&args.function);
    if args.pointer_mode_host {
        let handle = handle_for(PointerMode::Host);
        let mut r = 0i32;
        run(blas1::iamax(&handle, n, &dx, incx, ResultArg::Host(&mut r)))?;
        ensure!(r == gold, "iamax(host): expected index {gold}, got {r}");
    }
    if args.pointer_mode_device {
        let handle = handle_for(PointerMode::Device);
        let mut dr = DeviceScalar::new(0i32);
        run(blas1::iamax(&handle, n, &dx, incx, ResultArg::Device(&mut dr)))?;
        ensure!(dr.get() == gold, "iamax(device): expected index {gold}, got {}", dr.get());
    }
    Ok(report)
}

/// Pins the validation contract of the level-1 surface: wrong-mode scalar
/// arguments, negative batch counts and short buffers must all reject.
pub fn testing_axpy_bad_arg<T: Float>(args: &Arguments) -> Result<TestReport> {
    let handle = handle_for(PointerMode::Device);
    let x = to_device(&vec![T::ONE; 4])?;
    let mut y = to_device(&vec![T::ONE; 4])?;

    // Host scalar against a device-mode handle.
    let r = blas1::axpy(&handle, 4, ScalarArg::Host(T::ONE), &x, 1, &mut y, 1);
    ensure!(
        matches!(r, Err(Error::PointerMode { arg: "alpha", .. })),
        "axpy accepted a host scalar in device pointer mode"
    );

    // Buffer shorter than the span its arguments claim.
    let handle = handle_for(PointerMode::Host);
    let r = blas1::axpy(&handle, 8, ScalarArg::Host(T::ONE), &x, 1, &mut y, 1);
    ensure!(
        matches!(r, Err(Error::SizeMismatch { .. })),
        "axpy accepted a buffer shorter than its span"
    );

    // Negative batch count.
    super::expect_invalid(
        blas1::axpy_strided_batched(&handle, 4, ScalarArg::Host(T::ONE), &x, 1, 4, &mut y, 1, 4, -1),
        "axpy_strided_batched(batch_count=-1)",
    )?;
    Ok(TestReport::new(&args.function))
}
