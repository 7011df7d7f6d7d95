//! Level-2 routines: matrix-vector operations.
//!
//! All matrices are column-major. Dot products over matrix rows or columns
//! accumulate left to right in ascending index order, so every build
//! produces identical bits for identical inputs.

use crate::check_numerics::{check_matrix, check_vector};
use crate::device::{DeviceBatch, DeviceBuffer};
use crate::handle::{Handle, ScalarArg};
use crate::validate;
use oxblas_common::{vector_index, Diag, Fill, Float, Result, Transpose};

fn gemv_kernel<T: Float>(
    trans: Transpose,
    m: i32,
    n: i32,
    alpha: T,
    a: &[T],
    lda: i32,
    x: &[T],
    incx: i32,
    beta: T,
    y: &mut [T],
    incy: i32,
) {
    let (rows, cols) = match trans {
        Transpose::None => (m, n),
        Transpose::Transpose => (n, m),
    };
    let lda = lda as usize;
    for i in 0..rows {
        let yi = vector_index(i, rows, incy);
        // beta of zero overwrites rather than scales, so y is never read.
        let old = if beta == T::ZERO { T::ZERO } else { beta * y[yi] };
        if alpha == T::ZERO {
            y[yi] = old;
            continue;
        }
        let mut acc = T::ZERO;
        for j in 0..cols {
            let aij = match trans {
                Transpose::None => a[i as usize + j as usize * lda],
                Transpose::Transpose => a[j as usize + i as usize * lda],
            };
            acc = acc + aij * x[vector_index(j, cols, incx)];
        }
        y[yi] = alpha * acc + old;
    }
}

/// y = alpha * op(A) * x + beta * y
#[allow(clippy::too_many_arguments)]
pub fn gemv<T: Float>(
    handle: &Handle,
    trans: Transpose,
    m: i32,
    n: i32,
    alpha: ScalarArg<T>,
    a: &DeviceBuffer<T>,
    lda: i32,
    x: &DeviceBuffer<T>,
    incx: i32,
    beta: ScalarArg<T>,
    y: &mut DeviceBuffer<T>,
    incy: i32,
) -> Result<()> {
    log::trace!("gemv trans={trans} m={m} n={n} lda={lda} incx={incx} incy={incy}");
    validate::size("m", m)?;
    validate::size("n", n)?;
    validate::leading_dim("lda", lda, m)?;
    validate::increment("incx", incx)?;
    validate::increment("incy", incy)?;
    if m == 0 || n == 0 {
        return Ok(());
    }
    let alpha = alpha.resolve(handle, "alpha")?;
    let beta = beta.resolve(handle, "beta")?;
    if alpha == T::ZERO && beta == T::ONE {
        return Ok(());
    }
    let (xlen, ylen) = match trans {
        Transpose::None => (n, m),
        Transpose::Transpose => (m, n),
    };
    validate::matrix_extent("a", a, m, n, lda)?;
    validate::vector_extent("x", x, xlen, incx)?;
    validate::vector_extent("y", y, ylen, incy)?;
    let mode = handle.check_numerics();
    check_matrix(mode, "gemv", "input a", a, m, n, lda, 0, 1)?;
    check_vector(mode, "gemv", "input x", x, xlen, incx, 0, 1)?;
    check_vector(mode, "gemv", "input y", y, ylen, incy, 0, 1)?;
    handle.stream().record_launch();
    gemv_kernel(trans, m, n, alpha, a.as_slice(), lda, x.as_slice(), incx, beta, y.as_mut_slice(), incy);
    check_vector(mode, "gemv", "output y", y, ylen, incy, 0, 1)
}

/// y[b] = alpha * op(A[b]) * x[b] + beta * y[b] over a pointer-array batch.
#[allow(clippy::too_many_arguments)]
pub fn gemv_batched<T: Float>(
    handle: &Handle,
    trans: Transpose,
    m: i32,
    n: i32,
    alpha: ScalarArg<T>,
    a: &DeviceBatch<T>,
    lda: i32,
    x: &DeviceBatch<T>,
    incx: i32,
    beta: ScalarArg<T>,
    y: &mut DeviceBatch<T>,
    incy: i32,
    batch_count: i32,
) -> Result<()> {
    log::trace!("gemv_batched trans={trans} m={m} n={n} batch_count={batch_count}");
    validate::size("m", m)?;
    validate::size("n", n)?;
    validate::size("batch_count", batch_count)?;
    validate::leading_dim("lda", lda, m)?;
    validate::increment("incx", incx)?;
    validate::increment("incy", incy)?;
    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(());
    }
    let alpha = alpha.resolve(handle, "alpha")?;
    let beta = beta.resolve(handle, "beta")?;
    if alpha == T::ZERO && beta == T::ONE {
        return Ok(());
    }
    let (xlen, ylen) = match trans {
        Transpose::None => (n, m),
        Transpose::Transpose => (m, n),
    };
    validate::matrix_batch_extent("a", a, m, n, lda, batch_count)?;
    validate::batch_extent("x", x, xlen, incx, batch_count)?;
    validate::batch_extent("y", y, ylen, incy, batch_count)?;
    handle.stream().record_launch();
    for b in 0..batch_count as usize {
        gemv_kernel(
            trans,
            m,
            n,
            alpha,
            a.buf(b).as_slice(),
            lda,
            x.buf(b).as_slice(),
            incx,
            beta,
            y.buf_mut(b).as_mut_slice(),
            incy,
        );
    }
    Ok(())
}

/// y = alpha * op(A) * x + beta * y over a strided batch.
#[allow(clippy::too_many_arguments)]
pub fn gemv_strided_batched<T: Float>(
    handle: &Handle,
    trans: Transpose,
    m: i32,
    n: i32,
    alpha: ScalarArg<T>,
    a: &DeviceBuffer<T>,
    lda: i32,
    stride_a: i64,
    x: &DeviceBuffer<T>,
    incx: i32,
    stride_x: i64,
    beta: ScalarArg<T>,
    y: &mut DeviceBuffer<T>,
    incy: i32,
    stride_y: i64,
    batch_count: i32,
) -> Result<()> {
    log::trace!("gemv_strided_batched trans={trans} m={m} n={n} batch_count={batch_count}");
    validate::size("m", m)?;
    validate::size("n", n)?;
    validate::size("batch_count", batch_count)?;
    validate::leading_dim("lda", lda, m)?;
    validate::increment("incx", incx)?;
    validate::increment("incy", incy)?;
    validate::stride("stride_a", stride_a)?;
    validate::stride("stride_x", stride_x)?;
    validate::stride("stride_y", stride_y)?;
    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(());
    }
    let alpha = alpha.resolve(handle, "alpha")?;
    let beta = beta.resolve(handle, "beta")?;
    if alpha == T::ZERO && beta == T::ONE {
        return Ok(());
    }
    let (xlen, ylen) = match trans {
        Transpose::None => (n, m),
        Transpose::Transpose => (m, n),
    };
    validate::strided_matrix_extent("a", a, m, n, lda, stride_a, batch_count)?;
    validate::strided_vector_extent("x", x, xlen, incx, stride_x, batch_count)?;
    validate::strided_vector_extent("y", y, ylen, incy, stride_y, batch_count)?;
    let mode = handle.check_numerics();
    check_matrix(mode, "gemv_strided_batched", "input a", a, m, n, lda, stride_a, batch_count)?;
    check_vector(mode, "gemv_strided_batched", "input x", x, xlen, incx, stride_x, batch_count)?;
    check_vector(mode, "gemv_strided_batched", "input y", y, ylen, incy, stride_y, batch_count)?;
    handle.stream().record_launch();
    for b in 0..batch_count as usize {
        let ab = &a.as_slice()[b * stride_a as usize..];
        let xb = &x.as_slice()[b * stride_x as usize..];
        let yb = &mut y.as_mut_slice()[b * stride_y as usize..];
        gemv_kernel(trans, m, n, alpha, ab, lda, xb, incx, beta, yb, incy);
    }
    check_vector(mode, "gemv_strided_batched", "output y", y, ylen, incy, stride_y, batch_count)
}

/// A = alpha * x * y^T + A
#[allow(clippy::too_many_arguments)]
pub fn ger<T: Float>(
    handle: &Handle,
    m: i32,
    n: i32,
    alpha: ScalarArg<T>,
    x: &DeviceBuffer<T>,
    incx: i32,
    y: &DeviceBuffer<T>,
    incy: i32,
    a: &mut DeviceBuffer<T>,
    lda: i32,
) -> Result<()> {
    log::trace!("ger m={m} n={n} lda={lda}");
    validate::size("m", m)?;
    validate::size("n", n)?;
    validate::leading_dim("lda", lda, m)?;
    validate::increment("incx", incx)?;
    validate::increment("incy", incy)?;
    if m == 0 || n == 0 {
        return Ok(());
    }
    let alpha = alpha.resolve(handle, "alpha")?;
    if alpha == T::ZERO {
        return Ok(());
    }
    validate::vector_extent("x", x, m, incx)?;
    validate::vector_extent("y", y, n, incy)?;
    validate::matrix_extent("a", a, m, n, lda)?;
    handle.stream().record_launch();
    let (xs, ys, data) = (x.as_slice(), y.as_slice(), a.as_mut_slice());
    for j in 0..n {
        let yj = alpha * ys[vector_index(j, n, incy)];
        for i in 0..m {
            let idx = i as usize + j as usize * lda as usize;
            data[idx] = data[idx] + xs[vector_index(i, m, incx)] * yj;
        }
    }
    Ok(())
}

/// y = alpha * A * x + beta * y, A symmetric with one stored triangle.
#[allow(clippy::too_many_arguments)]
pub fn symv<T: Float>(
    handle: &Handle,
    uplo: Fill,
    n: i32,
    alpha: ScalarArg<T>,
    a: &DeviceBuffer<T>,
    lda: i32,
    x: &DeviceBuffer<T>,
    incx: i32,
    beta: ScalarArg<T>,
    y: &mut DeviceBuffer<T>,
    incy: i32,
) -> Result<()> {
    log::trace!("symv uplo={uplo} n={n} lda={lda}");
    validate::size("n", n)?;
    validate::leading_dim("lda", lda, n)?;
    validate::increment("incx", incx)?;
    validate::increment("incy", incy)?;
    if n == 0 {
        return Ok(());
    }
    let alpha = alpha.resolve(handle, "alpha")?;
    let beta = beta.resolve(handle, "beta")?;
    if alpha == T::ZERO && beta == T::ONE {
        return Ok(());
    }
    validate::matrix_extent("a", a, n, n, lda)?;
    validate::vector_extent("x", x, n, incx)?;
    validate::vector_extent("y", y, n, incy)?;
    handle.stream().record_launch();
    let (aa, xs, ys) = (a.as_slice(), x.as_slice(), y.as_mut_slice());
    let lda = lda as usize;
    for i in 0..n {
        let yi = vector_index(i, n, incy);
        let old = if beta == T::ZERO { T::ZERO } else { beta * ys[yi] };
        if alpha == T::ZERO {
            ys[yi] = old;
            continue;
        }
        let mut acc = T::ZERO;
        for j in 0..n {
            // Mirror across the diagonal into the stored triangle.
            let stored_upper = matches!(uplo, Fill::Upper);
            let (r, c) = if (i <= j) == stored_upper { (i, j) } else { (j, i) };
            acc = acc + aa[r as usize + c as usize * lda] * xs[vector_index(j, n, incx)];
        }
        ys[yi] = alpha * acc + old;
    }
    Ok(())
}

/// Solves op(A) * x = b in place, A triangular.
#[allow(clippy::too_many_arguments)]
pub fn trsv<T: Float>(
    handle: &Handle,
    uplo: Fill,
    trans: Transpose,
    diag: Diag,
    n: i32,
    a: &DeviceBuffer<T>,
    lda: i32,
    x: &mut DeviceBuffer<T>,
    incx: i32,
) -> Result<()> {
    log::trace!("trsv uplo={uplo} trans={trans} diag={diag} n={n} lda={lda}");
    validate::size("n", n)?;
    validate::leading_dim("lda", lda, n)?;
    validate::increment("incx", incx)?;
    if n == 0 {
        return Ok(());
    }
    validate::matrix_extent("a", a, n, n, lda)?;
    validate::vector_extent("x", x, n, incx)?;
    handle.stream().record_launch();
    let (aa, xs) = (a.as_slice(), x.as_mut_slice());
    let ld = lda as usize;
    let at = |r: i32, c: i32| aa[r as usize + c as usize * ld];
    // op(A) element (i,j): transposing swaps the traversal indices, which
    // also flips which triangle the substitution walks.
    let elem = |i: i32, j: i32| match trans {
        Transpose::None => at(i, j),
        Transpose::Transpose => at(j, i),
    };
    let forward = match (uplo, trans) {
        (Fill::Lower, Transpose::None) | (Fill::Upper, Transpose::Transpose) => true,
        (Fill::Upper, Transpose::None) | (Fill::Lower, Transpose::Transpose) => false,
    };
    let order: Vec<i32> = if forward { (0..n).collect() } else { (0..n).rev().collect() };
    for &i in &order {
        let mut sum = T::ZERO;
        let solved: Box<dyn Iterator<Item = i32>> =
            if forward { Box::new(0..i) } else { Box::new((i + 1..n).rev()) };
        for j in solved {
            sum = sum + elem(i, j) * xs[vector_index(j, n, incx)];
        }
        let xi = vector_index(i, n, incx);
        let num = xs[xi] - sum;
        xs[xi] = match diag {
            Diag::Unit => num,
            Diag::NonUnit => num / elem(i, i),
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::ScalarArg;

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
    fn gemv_no_trans() {
        let h = Handle::new();
        // Column-major 2x2: [[1,3],[2,4]].
        let a = buf(&[1.0, 2.0, 3.0, 4.0]);
        let x = buf(&[1.0, 1.0]);
        let mut y = buf(&[0.0, 0.0]);
        gemv(&h, Transpose::None, 2, 2, ScalarArg::Host(1.0), &a, 2, &x, 1, ScalarArg::Host(0.0), &mut y, 1)
            .unwrap();
        assert_eq!(host(&y), [4.0, 6.0]);
    }

    #[test]
    fn gemv_transpose_swaps_lengths() {
        let h = Handle::new();
        // 2x3 matrix; transposed product needs x of length 2, y of length 3.
        let a = buf(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let x = buf(&[1.0, 1.0]);
        let mut y = buf(&[0.0, 0.0, 0.0]);
        gemv(&h, Transpose::Transpose, 2, 3, ScalarArg::Host(1.0), &a, 2, &x, 1, ScalarArg::Host(0.0), &mut y, 1)
            .unwrap();
        assert_eq!(host(&y), [3.0, 7.0, 11.0]);
    }

    #[test]
    fn gemv_rejects_bad_lda() {
        let h = Handle::new();
        let a = buf(&[1.0; 4]);
        let x = buf(&[1.0; 2]);
        let mut y = buf(&[0.0; 2]);
        let err = gemv(&h, Transpose::None, 2, 2, ScalarArg::Host(1.0), &a, 1, &x, 1, ScalarArg::Host(0.0), &mut y, 1)
            .unwrap_err();
        assert!(matches!(err, oxblas_common::Error::InvalidSize { arg: "lda", .. }));
    }

    #[test]
    fn ger_rank_one_update() {
        let h = Handle::new();
        let x = buf(&[1.0, 2.0]);
        let y = buf(&[3.0, 4.0]);
        let mut a = buf(&[0.0; 4]);
        ger(&h, 2, 2, ScalarArg::Host(1.0), &x, 1, &y, 1, &mut a, 2).unwrap();
        // Column-major: column j is x * y[j].
        assert_eq!(host(&a), [3.0, 6.0, 4.0, 8.0]);
    }

    #[test]
    fn symv_reads_only_stored_triangle() {
        let h = Handle::new();
        // Upper triangle of [[2,1],[1,2]]; the lower slot holds garbage.
        let a = buf(&[2.0, f32::NAN, 1.0, 2.0]);
        let x = buf(&[1.0, 1.0]);
        let mut y = buf(&[0.0, 0.0]);
        symv(&h, Fill::Upper, 2, ScalarArg::Host(1.0), &a, 2, &x, 1, ScalarArg::Host(0.0), &mut y, 1)
            .unwrap();
        assert_eq!(host(&y), [3.0, 3.0]);
    }

    #[test]
    fn trsv_lower_forward_substitution() {
        let h = Handle::new();
        // L = [[2,0],[1,4]] column-major; solve L x = [2, 9] -> x = [1, 2].
        let a = buf(&[2.0, 1.0, 0.0, 4.0]);
        let mut x = buf(&[2.0, 9.0]);
        trsv(&h, Fill::Lower, Transpose::None, Diag::NonUnit, 2, &a, 2, &mut x, 1).unwrap();
        assert_eq!(host(&x), [1.0, 2.0]);
    }

    #[test]
    fn trsv_transpose_flips_triangle() {
        let h = Handle::new();
        // U = [[2,1],[0,4]]; solve U^T x = [2, 9] -> forward substitution.
        let a = buf(&[2.0, 0.0, 1.0, 4.0]);
        let mut x = buf(&[2.0, 9.0]);
        trsv(&h, Fill::Upper, Transpose::Transpose, Diag::NonUnit, 2, &a, 2, &mut x, 1).unwrap();
        assert_eq!(host(&x), [1.0, 2.0]);
    }

    #[test]
    fn trsv_unit_diag_skips_division() {
        let h = Handle::new();
        // Diagonal entries are garbage; Unit means they are never read.
        let a = buf(&[0.0, 1.0, 0.0, 0.0]);
        let mut x = buf(&[1.0, 3.0]);
        trsv(&h, Fill::Lower, Transpose::None, Diag::Unit, 2, &a, 2, &mut x, 1).unwrap();
        assert_eq!(host(&x), [1.0, 2.0]);
    }
}
