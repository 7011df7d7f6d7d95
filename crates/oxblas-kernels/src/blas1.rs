//! Level-1 routines: vector-vector operations and reductions.
//!
//! Reductions accumulate left to right in a fixed order, and sums of
//! magnitudes accumulate in f64, so results are reproducible across the
//! looped and blocked builds. Quick-return shapes follow the reference BLAS:
//! `scal`, `nrm2`, `asum` and `iamax` treat a non-positive increment as an
//! empty problem rather than an error.

use crate::check_numerics::{check_vector, check_vector_batched};
use crate::device::{DeviceBatch, DeviceBuffer};
use crate::handle::{Handle, ResultArg, ResultsArg, ScalarArg};
use crate::validate;
use oxblas_common::{vector_index, Float, Result};

/// x = alpha * x
pub fn scal<T: Float>(
    handle: &Handle,
    n: i32,
    alpha: ScalarArg<T>,
    x: &mut DeviceBuffer<T>,
    incx: i32,
) -> Result<()> {
    log::trace!("scal n={n} incx={incx}");
    if n <= 0 || incx <= 0 {
        return Ok(());
    }
    let alpha = alpha.resolve(handle, "alpha")?;
    validate::vector_extent("x", x, n, incx)?;
    if alpha == T::ONE {
        return Ok(());
    }
    check_vector(handle.check_numerics(), "scal", "input x", x, n, incx, 0, 1)?;
    handle.stream().record_launch();
    let data = x.as_mut_slice();
    for i in 0..n {
        let xi = vector_index(i, n, incx);
        data[xi] = alpha * data[xi];
    }
    check_vector(handle.check_numerics(), "scal", "output x", x, n, incx, 0, 1)
}

fn axpy_kernel<T: Float>(n: i32, alpha: T, x: &[T], incx: i32, y: &mut [T], incy: i32) {
    for i in 0..n {
        let yi = vector_index(i, n, incy);
        y[yi] = alpha * x[vector_index(i, n, incx)] + y[yi];
    }
}

/// y = alpha * x + y
pub fn axpy<T: Float>(
    handle: &Handle,
    n: i32,
    alpha: ScalarArg<T>,
    x: &DeviceBuffer<T>,
    incx: i32,
    y: &mut DeviceBuffer<T>,
    incy: i32,
) -> Result<()> {
    log::trace!("axpy n={n} incx={incx} incy={incy}");
    if n <= 0 {
        return Ok(());
    }
    let alpha = alpha.resolve(handle, "alpha")?;
    // alpha of zero must not read x; callers rely on this to pass
    // uninitialized x for degenerate cases.
    if alpha == T::ZERO {
        return Ok(());
    }
    validate::vector_extent("x", x, n, incx)?;
    validate::vector_extent("y", y, n, incy)?;
    let mode = handle.check_numerics();
    check_vector(mode, "axpy", "input x", x, n, incx, 0, 1)?;
    check_vector(mode, "axpy", "input y", y, n, incy, 0, 1)?;
    handle.stream().record_launch();
    axpy_kernel(n, alpha, x.as_slice(), incx, y.as_mut_slice(), incy);
    check_vector(mode, "axpy", "output y", y, n, incy, 0, 1)
}

/// y[b] = alpha * x[b] + y[b] over a pointer-array batch.
pub fn axpy_batched<T: Float>(
    handle: &Handle,
    n: i32,
    alpha: ScalarArg<T>,
    x: &DeviceBatch<T>,
    incx: i32,
    y: &mut DeviceBatch<T>,
    incy: i32,
    batch_count: i32,
) -> Result<()> {
    log::trace!("axpy_batched n={n} incx={incx} incy={incy} batch_count={batch_count}");
    validate::size("batch_count", batch_count)?;
    if n <= 0 || batch_count == 0 {
        return Ok(());
    }
    let alpha = alpha.resolve(handle, "alpha")?;
    if alpha == T::ZERO {
        return Ok(());
    }
    validate::batch_extent("x", x, n, incx, batch_count)?;
    validate::batch_extent("y", y, n, incy, batch_count)?;
    let mode = handle.check_numerics();
    check_vector_batched(mode, "axpy_batched", "input x", x, n, incx, batch_count)?;
    check_vector_batched(mode, "axpy_batched", "input y", y, n, incy, batch_count)?;
    handle.stream().record_launch();
    for b in 0..batch_count as usize {
        axpy_kernel(n, alpha, x.buf(b).as_slice(), incx, y.buf_mut(b).as_mut_slice(), incy);
    }
    check_vector_batched(mode, "axpy_batched", "output y", y, n, incy, batch_count)
}

/// y = alpha * x + y over a strided batch in one allocation.
#[allow(clippy::too_many_arguments)]
pub fn axpy_strided_batched<T: Float>(
    handle: &Handle,
    n: i32,
    alpha: ScalarArg<T>,
    x: &DeviceBuffer<T>,
    incx: i32,
    stride_x: i64,
    y: &mut DeviceBuffer<T>,
    incy: i32,
    stride_y: i64,
    batch_count: i32,
) -> Result<()> {
    log::trace!("axpy_strided_batched n={n} batch_count={batch_count}");
    validate::size("batch_count", batch_count)?;
    validate::stride("stride_x", stride_x)?;
    validate::stride("stride_y", stride_y)?;
    if n <= 0 || batch_count == 0 {
        return Ok(());
    }
    let alpha = alpha.resolve(handle, "alpha")?;
    if alpha == T::ZERO {
        return Ok(());
    }
    validate::strided_vector_extent("x", x, n, incx, stride_x, batch_count)?;
    validate::strided_vector_extent("y", y, n, incy, stride_y, batch_count)?;
    let mode = handle.check_numerics();
    check_vector(mode, "axpy_strided_batched", "input x", x, n, incx, stride_x, batch_count)?;
    check_vector(mode, "axpy_strided_batched", "input y", y, n, incy, stride_y, batch_count)?;
    handle.stream().record_launch();
    for b in 0..batch_count as usize {
        let xb = &x.as_slice()[b * stride_x as usize..];
        let yb = &mut y.as_mut_slice()[b * stride_y as usize..];
        axpy_kernel(n, alpha, xb, incx, yb, incy);
    }
    check_vector(mode, "axpy_strided_batched", "output y", y, n, incy, stride_y, batch_count)
}

/// y = x
pub fn copy<T: Float>(
    handle: &Handle,
    n: i32,
    x: &DeviceBuffer<T>,
    incx: i32,
    y: &mut DeviceBuffer<T>,
    incy: i32,
) -> Result<()> {
    log::trace!("copy n={n} incx={incx} incy={incy}");
    if n <= 0 {
        return Ok(());
    }
    validate::vector_extent("x", x, n, incx)?;
    validate::vector_extent("y", y, n, incy)?;
    handle.stream().record_launch();
    let (src, dst) = (x.as_slice(), y.as_mut_slice());
    for i in 0..n {
        dst[vector_index(i, n, incy)] = src[vector_index(i, n, incx)];
    }
    Ok(())
}

/// x <-> y
pub fn swap<T: Float>(
    handle: &Handle,
    n: i32,
    x: &mut DeviceBuffer<T>,
    incx: i32,
    y: &mut DeviceBuffer<T>,
    incy: i32,
) -> Result<()> {
    log::trace!("swap n={n} incx={incx} incy={incy}");
    if n <= 0 {
        return Ok(());
    }
    validate::vector_extent("x", x, n, incx)?;
    validate::vector_extent("y", y, n, incy)?;
    handle.stream().record_launch();
    for i in 0..n {
        let xi = vector_index(i, n, incx);
        let yi = vector_index(i, n, incy);
        let t = x.as_slice()[xi];
        x.as_mut_slice()[xi] = y.as_slice()[yi];
        y.as_mut_slice()[yi] = t;
    }
    Ok(())
}

fn dot_kernel<T: Float>(n: i32, x: &[T], incx: i32, y: &[T], incy: i32) -> T {
    let mut acc = T::ZERO;
    for i in 0..n {
        acc = acc + x[vector_index(i, n, incx)] * y[vector_index(i, n, incy)];
    }
    acc
}

/// result = x . y
pub fn dot<T: Float>(
    handle: &Handle,
    n: i32,
    x: &DeviceBuffer<T>,
    incx: i32,
    y: &DeviceBuffer<T>,
    incy: i32,
    mut result: ResultArg<T>,
) -> Result<()> {
    log::trace!("dot n={n} incx={incx} incy={incy}");
    result.check(handle, "result")?;
    if n <= 0 {
        result.write(T::ZERO);
        return Ok(());
    }
    validate::vector_extent("x", x, n, incx)?;
    validate::vector_extent("y", y, n, incy)?;
    let mode = handle.check_numerics();
    check_vector(mode, "dot", "input x", x, n, incx, 0, 1)?;
    check_vector(mode, "dot", "input y", y, n, incy, 0, 1)?;
    handle.stream().record_launch();
    result.write(dot_kernel(n, x.as_slice(), incx, y.as_slice(), incy));
    Ok(())
}

/// result[b] = x[b] . y[b] over a pointer-array batch.
#[allow(clippy::too_many_arguments)]
pub fn dot_batched<T: Float>(
    handle: &Handle,
    n: i32,
    x: &DeviceBatch<T>,
    incx: i32,
    y: &DeviceBatch<T>,
    incy: i32,
    batch_count: i32,
    mut results: ResultsArg<T>,
) -> Result<()> {
    log::trace!("dot_batched n={n} batch_count={batch_count}");
    validate::size("batch_count", batch_count)?;
    results.check(handle, "results", batch_count)?;
    if batch_count == 0 {
        return Ok(());
    }
    if n <= 0 {
        for b in 0..batch_count as usize {
            results.write(b, T::ZERO);
        }
        return Ok(());
    }
    validate::batch_extent("x", x, n, incx, batch_count)?;
    validate::batch_extent("y", y, n, incy, batch_count)?;
    handle.stream().record_launch();
    for b in 0..batch_count as usize {
        results.write(b, dot_kernel(n, x.buf(b).as_slice(), incx, y.buf(b).as_slice(), incy));
    }
    Ok(())
}

/// result[b] = x[b] . y[b] over a strided batch.
#[allow(clippy::too_many_arguments)]
pub fn dot_strided_batched<T: Float>(
    handle: &Handle,
    n: i32,
    x: &DeviceBuffer<T>,
    incx: i32,
    stride_x: i64,
    y: &DeviceBuffer<T>,
    incy: i32,
    stride_y: i64,
    batch_count: i32,
    mut results: ResultsArg<T>,
) -> Result<()> {
    log::trace!("dot_strided_batched n={n} batch_count={batch_count}");
    validate::size("batch_count", batch_count)?;
    validate::stride("stride_x", stride_x)?;
    validate::stride("stride_y", stride_y)?;
    results.check(handle, "results", batch_count)?;
    if batch_count == 0 {
        return Ok(());
    }
    if n <= 0 {
        for b in 0..batch_count as usize {
            results.write(b, T::ZERO);
        }
        return Ok(());
    }
    validate::strided_vector_extent("x", x, n, incx, stride_x, batch_count)?;
    validate::strided_vector_extent("y", y, n, incy, stride_y, batch_count)?;
    handle.stream().record_launch();
    for b in 0..batch_count as usize {
        let xb = &x.as_slice()[b * stride_x as usize..];
        let yb = &y.as_slice()[b * stride_y as usize..];
        results.write(b, dot_kernel(n, xb, incx, yb, incy));
    }
    Ok(())
}

/// result = ||x||_2, accumulated in f64.
pub fn nrm2<T: Float>(
    handle: &Handle,
    n: i32,
    x: &DeviceBuffer<T>,
    incx: i32,
    mut result: ResultArg<T>,
) -> Result<()> {
    log::trace!("nrm2 n={n} incx={incx}");
    result.check(handle, "result")?;
    if n <= 0 || incx <= 0 {
        result.write(T::ZERO);
        return Ok(());
    }
    validate::vector_extent("x", x, n, incx)?;
    check_vector(handle.check_numerics(), "nrm2", "input x", x, n, incx, 0, 1)?;
    handle.stream().record_launch();
    let data = x.as_slice();
    let mut acc = 0.0f64;
    for i in 0..n {
        let v = data[vector_index(i, n, incx)].to_f64();
        acc += v * v;
    }
    result.write(T::from_f64(acc.sqrt()));
    Ok(())
}

/// result = sum |x_i|, accumulated in f64.
pub fn asum<T: Float>(
    handle: &Handle,
    n: i32,
    x: &DeviceBuffer<T>,
    incx: i32,
    mut result: ResultArg<T>,
) -> Result<()> {
    log::trace!("asum n={n} incx={incx}");
    result.check(handle, "result")?;
    if n <= 0 || incx <= 0 {
        result.write(T::ZERO);
        return Ok(());
    }
    validate::vector_extent("x", x, n, incx)?;
    check_vector(handle.check_numerics(), "asum", "input x", x, n, incx, 0, 1)?;
    handle.stream().record_launch();
    let data = x.as_slice();
    let mut acc = 0.0f64;
    for i in 0..n {
        acc += data[vector_index(i, n, incx)].to_f64().abs();
    }
    result.write(T::from_f64(acc));
    Ok(())
}

/// result = zero-based index of the first element with maximum |x_i|.
///
/// Degenerate shapes report index 0.
pub fn iamax<T: Float>(
    handle: &Handle,
    n: i32,
    x: &DeviceBuffer<T>,
    incx: i32,
    mut result: ResultArg<i32>,
) -> Result<()> {
    log::trace!("iamax n={n} incx={incx}");
    result.check(handle, "result")?;
    if n <= 0 || incx <= 0 {
        result.write(0);
        return Ok(());
    }
    validate::vector_extent("x", x, n, incx)?;
    handle.stream().record_launch();
    let data = x.as_slice();
    let mut best = 0i32;
    let mut best_val = data[vector_index(0, n, incx)].abs();
    for i in 1..n {
        let v = data[vector_index(i, n, incx)].abs();
        // Strict comparison keeps the first of equal magnitudes.
        if v > best_val {
            best = i;
            best_val = v;
        }
    }
    result.write(best);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxblas_common::{Error, PointerMode};

    fn buf(vals: &[f32]) -> DeviceBuffer<f32> {
        let mut b = DeviceBuffer::new(vals.len()).unwrap();
        b.transfer_from(vals).unwrap();
        b
    }

    fn host(b: &DeviceBuffer<f32>) -> Vec<f32> {
        let mut out = vec![0.0; b.len()];
        b.transfer_to(&mut out).unwrap();
        out
    }

    #[test]
    fn axpy_contiguous() {
        let h = Handle::new();
        let x = buf(&[1.0, 2.0, 3.0]);
        let mut y = buf(&[10.0, 20.0, 30.0]);
        axpy(&h, 3, ScalarArg::Host(2.0), &x, 1, &mut y, 1).unwrap();
        assert_eq!(host(&y), [12.0, 24.0, 36.0]);
    }

    #[test]
    fn axpy_zero_alpha_never_reads_x() {
        let h = Handle::new();
        let x = buf(&[f32::NAN; 3]);
        let mut y = buf(&[1.0, 2.0, 3.0]);
        axpy(&h, 3, ScalarArg::Host(0.0), &x, 1, &mut y, 1).unwrap();
        assert_eq!(host(&y), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn axpy_negative_increment_walks_backwards() {
        let h = Handle::new();
        let x = buf(&[1.0, 2.0, 3.0]);
        let mut y = buf(&[0.0, 0.0, 0.0]);
        // incx = -1: logical x is [3,2,1].
        axpy(&h, 3, ScalarArg::Host(1.0), &x, -1, &mut y, 1).unwrap();
        assert_eq!(host(&y), [3.0, 2.0, 1.0]);
    }

    #[test]
    fn axpy_rejects_short_buffer() {
        let h = Handle::new();
        let x = buf(&[1.0, 2.0]);
        let mut y = buf(&[0.0, 0.0, 0.0]);
        let err = axpy(&h, 3, ScalarArg::Host(1.0), &x, 1, &mut y, 1).unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { arg: "x", .. }));
    }

    #[test]
    fn scal_quick_returns_on_nonpositive_increment() {
        let h = Handle::new();
        let mut x = buf(&[1.0, 2.0]);
        scal(&h, 2, ScalarArg::Host(5.0), &mut x, -1).unwrap();
        assert_eq!(host(&x), [1.0, 2.0]);
        scal(&h, 2, ScalarArg::Host(5.0), &mut x, 1).unwrap();
        assert_eq!(host(&x), [5.0, 10.0]);
    }

    #[test]
    fn dot_device_mode_result() {
        let mut h = Handle::new();
        h.set_pointer_mode(PointerMode::Device);
        let x = buf(&[1.0, 2.0, 3.0]);
        let y = buf(&[4.0, 5.0, 6.0]);
        let mut d = crate::device::DeviceScalar::new(0.0f32);
        dot(&h, 3, &x, 1, &y, 1, ResultArg::Device(&mut d)).unwrap();
        assert_eq!(d.get(), 32.0);
    }

    #[test]
    fn dot_host_result_in_device_mode_is_rejected() {
        let mut h = Handle::new();
        h.set_pointer_mode(PointerMode::Device);
        let x = buf(&[1.0]);
        let y = buf(&[1.0]);
        let mut r = 0.0f32;
        let err = dot(&h, 1, &x, 1, &y, 1, ResultArg::Host(&mut r)).unwrap_err();
        assert!(matches!(err, Error::PointerMode { .. }));
    }

    #[test]
    fn nrm2_matches_hand_value() {
        let h = Handle::new();
        let x = buf(&[3.0, 4.0]);
        let mut r = 0.0f32;
        nrm2(&h, 2, &x, 1, ResultArg::Host(&mut r)).unwrap();
        assert_eq!(r, 5.0);
    }

    #[test]
    fn iamax_reports_first_of_ties() {
        let h = Handle::new();
        let x = buf(&[1.0, -7.0, 7.0, 2.0]);
        let mut r = 0i32;
        iamax(&h, 4, &x, 1, ResultArg::Host(&mut r)).unwrap();
        assert_eq!(r, 1);
    }

    #[test]
    fn swap_exchanges_contents() {
        let h = Handle::new();
        let mut x = buf(&[1.0, 2.0]);
        let mut y = buf(&[9.0, 8.0]);
        swap(&h, 2, &mut x, 1, &mut y, 1).unwrap();
        assert_eq!(host(&x), [9.0, 8.0]);
        assert_eq!(host(&y), [1.0, 2.0]);
    }

    #[test]
    fn axpy_strided_batched_offsets_each_member() {
        let h = Handle::new();
        let x = buf(&[1.0, 2.0, 10.0, 20.0]);
        let mut y = buf(&[0.0, 0.0, 0.0, 0.0]);
        axpy_strided_batched(&h, 2, ScalarArg::Host(1.0), &x, 1, 2, &mut y, 1, 2, 2).unwrap();
        assert_eq!(host(&y), [1.0, 2.0, 10.0, 20.0]);
    }

    #[test]
    fn dot_batched_writes_one_result_per_member() {
        let h = Handle::new();
        let mut x = DeviceBatch::<f32>::new(2, 2).unwrap();
        let mut y = DeviceBatch::<f32>::new(2, 2).unwrap();
        x.transfer_from(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        y.transfer_from(&[vec![1.0, 1.0], vec![2.0, 2.0]]).unwrap();
        let mut out = vec![0.0f32; 2];
        dot_batched(&h, 2, &x, 1, &y, 1, 2, ResultsArg::Host(&mut out)).unwrap();
        assert_eq!(out, [3.0, 14.0]);
    }

    #[test]
    fn negative_batch_count_is_invalid() {
        let h = Handle::new();
        let x = buf(&[1.0]);
        let mut y = buf(&[1.0]);
        let err = axpy_strided_batched(&h, 1, ScalarArg::Host(1.0), &x, 1, 1, &mut y, 1, 1, -1)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSize { arg: "batch_count", .. }));
    }
}
