//! Level-3 routines: matrix-matrix operations.
//!
//! The blocked gemm path tiles only the output; every output element still
//! runs its k-loop in ascending order, so the looped and blocked builds are
//! bitwise identical. Reductions never reorder.

use crate::check_numerics::check_matrix;
use crate::device::{DeviceBatch, DeviceBuffer};
use crate::handle::{Handle, ScalarArg};
use crate::registry::KernelBackend;
use crate::validate;
use oxblas_common::{Diag, Fill, Float, Result, Side, Transpose};

/// Output tile edge for the blocked path.
const BLOCK: i32 = 64;

fn dims_a(trans: Transpose, m: i32, k: i32) -> (i32, i32) {
    match trans {
        Transpose::None => (m, k),
        Transpose::Transpose => (k, m),
    }
}

#[allow(clippy::too_many_arguments)]
fn gemm_tile<T: Float>(
    transa: Transpose,
    transb: Transpose,
    (i0, i1): (i32, i32),
    (j0, j1): (i32, i32),
    k: i32,
    alpha: T,
    a: &[T],
    lda: i32,
    b: &[T],
    ldb: i32,
    beta: T,
    c: &mut [T],
    ldc: i32,
) {
    let (lda, ldb, ldc) = (lda as usize, ldb as usize, ldc as usize);
    for j in j0..j1 {
        for i in i0..i1 {
            let cij = i as usize + j as usize * ldc;
            // beta of zero overwrites rather than scales, so C is never read.
            let old = if beta == T::ZERO { T::ZERO } else { beta * c[cij] };
            if alpha == T::ZERO {
                c[cij] = old;
                continue;
            }
            let mut acc = T::ZERO;
            for l in 0..k {
                let ail = match transa {
                    Transpose::None => a[i as usize + l as usize * lda],
                    Transpose::Transpose => a[l as usize + i as usize * lda],
                };
                let blj = match transb {
                    Transpose::None => b[l as usize + j as usize * ldb],
                    Transpose::Transpose => b[j as usize + l as usize * ldb],
                };
                acc = acc + ail * blj;
            }
            c[cij] = alpha * acc + old;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn gemm_kernel<T: Float>(
    backend: KernelBackend,
    transa: Transpose,
    transb: Transpose,
    m: i32,
    n: i32,
    k: i32,
    alpha: T,
    a: &[T],
    lda: i32,
    b: &[T],
    ldb: i32,
    beta: T,
    c: &mut [T],
    ldc: i32,
) {
    match backend {
        KernelBackend::Blocked => {
            let mut j0 = 0;
            while j0 < n {
                let j1 = (j0 + BLOCK).min(n);
                let mut i0 = 0;
                while i0 < m {
                    let i1 = (i0 + BLOCK).min(m);
                    gemm_tile(transa, transb, (i0, i1), (j0, j1), k, alpha, a, lda, b, ldb, beta, c, ldc);
                    i0 = i1;
                }
                j0 = j1;
            }
        }
        KernelBackend::Looped => {
            gemm_tile(transa, transb, (0, m), (0, n), k, alpha, a, lda, b, ldb, beta, c, ldc)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn gemm_validate(
    transa: Transpose,
    transb: Transpose,
    m: i32,
    n: i32,
    k: i32,
    lda: i32,
    ldb: i32,
    ldc: i32,
) -> Result<()> {
    validate::size("m", m)?;
    validate::size("n", n)?;
    validate::size("k", k)?;
    validate::leading_dim("lda", lda, dims_a(transa, m, k).0)?;
    validate::leading_dim("ldb", ldb, dims_a(transb, k, n).0)?;
    validate::leading_dim("ldc", ldc, m)
}

/// C = alpha * op(A) * op(B) + beta * C
#[allow(clippy::too_many_arguments)]
pub fn gemm<T: Float>(
    handle: &Handle,
    transa: Transpose,
    transb: Transpose,
    m: i32,
    n: i32,
    k: i32,
    alpha: ScalarArg<T>,
    a: &DeviceBuffer<T>,
    lda: i32,
    b: &DeviceBuffer<T>,
    ldb: i32,
    beta: ScalarArg<T>,
    c: &mut DeviceBuffer<T>,
    ldc: i32,
) -> Result<()> {
    log::trace!("gemm transa={transa} transb={transb} m={m} n={n} k={k}");
    gemm_validate(transa, transb, m, n, k, lda, ldb, ldc)?;
    if m == 0 || n == 0 {
        return Ok(());
    }
    let alpha = alpha.resolve(handle, "alpha")?;
    let beta = beta.resolve(handle, "beta")?;
    if (k == 0 || alpha == T::ZERO) && beta == T::ONE {
        return Ok(());
    }
    let (ra, ca) = dims_a(transa, m, k);
    let (rb, cb) = dims_a(transb, k, n);
    validate::matrix_extent("a", a, ra, ca, lda)?;
    validate::matrix_extent("b", b, rb, cb, ldb)?;
    validate::matrix_extent("c", c, m, n, ldc)?;
    let mode = handle.check_numerics();
    check_matrix(mode, "gemm", "input a", a, ra, ca, lda, 0, 1)?;
    check_matrix(mode, "gemm", "input b", b, rb, cb, ldb, 0, 1)?;
    check_matrix(mode, "gemm", "input c", c, m, n, ldc, 0, 1)?;
    handle.stream().record_launch();
    gemm_kernel(
        handle.caps().gemm_backend(),
        transa, transb, m, n, k, alpha,
        a.as_slice(), lda, b.as_slice(), ldb, beta, c.as_mut_slice(), ldc,
    );
    check_matrix(mode, "gemm", "output c", c, m, n, ldc, 0, 1)
}

/// C[b] = alpha * op(A[b]) * op(B[b]) + beta * C[b] over a pointer-array batch.
#[allow(clippy::too_many_arguments)]
pub fn gemm_batched<T: Float>(
    handle: &Handle,
    transa: Transpose,
    transb: Transpose,
    m: i32,
    n: i32,
    k: i32,
    alpha: ScalarArg<T>,
    a: &DeviceBatch<T>,
    lda: i32,
    b: &DeviceBatch<T>,
    ldb: i32,
    beta: ScalarArg<T>,
    c: &mut DeviceBatch<T>,
    ldc: i32,
    batch_count: i32,
) -> Result<()> {
    log::trace!("gemm_batched m={m} n={n} k={k} batch_count={batch_count}");
    gemm_validate(transa, transb, m, n, k, lda, ldb, ldc)?;
    validate::size("batch_count", batch_count)?;
    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(());
    }
    let alpha = alpha.resolve(handle, "alpha")?;
    let beta = beta.resolve(handle, "beta")?;
    if (k == 0 || alpha == T::ZERO) && beta == T::ONE {
        return Ok(());
    }
    let (ra, ca) = dims_a(transa, m, k);
    let (rb, cb) = dims_a(transb, k, n);
    validate::matrix_batch_extent("a", a, ra, ca, lda, batch_count)?;
    validate::matrix_batch_extent("b", b, rb, cb, ldb, batch_count)?;
    validate::matrix_batch_extent("c", c, m, n, ldc, batch_count)?;
    handle.stream().record_launch();
    for bi in 0..batch_count as usize {
        gemm_kernel(
            handle.caps().gemm_backend(),
            transa,
            transb,
            m,
            n,
            k,
            alpha,
            a.buf(bi).as_slice(),
            lda,
            b.buf(bi).as_slice(),
            ldb,
            beta,
            c.buf_mut(bi).as_mut_slice(),
            ldc,
        );
    }
    Ok(())
}

/// C = alpha * op(A) * op(B) + beta * C over a strided batch.
#[allow(clippy::too_many_arguments)]
pub fn gemm_strided_batched<T: Float>(
    handle: &Handle,
    transa: Transpose,
    transb: Transpose,
    m: i32,
    n: i32,
    k: i32,
    alpha: ScalarArg<T>,
    a: &DeviceBuffer<T>,
    lda: i32,
    stride_a: i64,
    b: &DeviceBuffer<T>,
    ldb: i32,
    stride_b: i64,
    beta: ScalarArg<T>,
    c: &mut DeviceBuffer<T>,
    ldc: i32,
    stride_c: i64,
    batch_count: i32,
) -> Result<()> {
    log::trace!("gemm_strided_batched m={m} n={n} k={k} batch_count={batch_count}");
    gemm_validate(transa, transb, m, n, k, lda, ldb, ldc)?;
    validate::size("batch_count", batch_count)?;
    validate::stride("stride_a", stride_a)?;
    validate::stride("stride_b", stride_b)?;
    validate::stride("stride_c", stride_c)?;
    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(());
    }
    let alpha = alpha.resolve(handle, "alpha")?;
    let beta = beta.resolve(handle, "beta")?;
    if (k == 0 || alpha == T::ZERO) && beta == T::ONE {
        return Ok(());
    }
    let (ra, ca) = dims_a(transa, m, k);
    let (rb, cb) = dims_a(transb, k, n);
    validate::strided_matrix_extent("a", a, ra, ca, lda, stride_a, batch_count)?;
    validate::strided_matrix_extent("b", b, rb, cb, ldb, stride_b, batch_count)?;
    validate::strided_matrix_extent("c", c, m, n, ldc, stride_c, batch_count)?;
    let mode = handle.check_numerics();
    check_matrix(mode, "gemm_strided_batched", "input a", a, ra, ca, lda, stride_a, batch_count)?;
    check_matrix(mode, "gemm_strided_batched", "input b", b, rb, cb, ldb, stride_b, batch_count)?;
    check_matrix(mode, "gemm_strided_batched", "input c", c, m, n, ldc, stride_c, batch_count)?;
    handle.stream().record_launch();
    for bi in 0..batch_count as usize {
        let ab = &a.as_slice()[bi * stride_a as usize..];
        let bb = &b.as_slice()[bi * stride_b as usize..];
        let cb_slice = &mut c.as_mut_slice()[bi * stride_c as usize..];
        gemm_kernel(
            handle.caps().gemm_backend(),
            transa, transb, m, n, k, alpha, ab, lda, bb, ldb, beta, cb_slice, ldc,
        );
    }
    check_matrix(mode, "gemm_strided_batched", "output c", c, m, n, ldc, stride_c, batch_count)
}

/// C = alpha * A * A^T + beta * C (or A^T * A), one triangle of C updated.
#[allow(clippy::too_many_arguments)]
pub fn syrk<T: Float>(
    handle: &Handle,
    uplo: Fill,
    trans: Transpose,
    n: i32,
    k: i32,
    alpha: ScalarArg<T>,
    a: &DeviceBuffer<T>,
    lda: i32,
    beta: ScalarArg<T>,
    c: &mut DeviceBuffer<T>,
    ldc: i32,
) -> Result<()> {
    log::trace!("syrk uplo={uplo} trans={trans} n={n} k={k}");
    validate::size("n", n)?;
    validate::size("k", k)?;
    validate::leading_dim("lda", lda, dims_a(trans, n, k).0)?;
    validate::leading_dim("ldc", ldc, n)?;
    if n == 0 {
        return Ok(());
    }
    let alpha = alpha.resolve(handle, "alpha")?;
    let beta = beta.resolve(handle, "beta")?;
    if (k == 0 || alpha == T::ZERO) && beta == T::ONE {
        return Ok(());
    }
    let (ra, ca) = dims_a(trans, n, k);
    validate::matrix_extent("a", a, ra, ca, lda)?;
    validate::matrix_extent("c", c, n, n, ldc)?;
    handle.stream().record_launch();
    let (aa, cc) = (a.as_slice(), c.as_mut_slice());
    let (lda, ldc) = (lda as usize, ldc as usize);
    for j in 0..n {
        let (lo, hi) = match uplo {
            Fill::Upper => (0, j + 1),
            Fill::Lower => (j, n),
        };
        for i in lo..hi {
            let cij = i as usize + j as usize * ldc;
            let old = if beta == T::ZERO { T::ZERO } else { beta * cc[cij] };
            if alpha == T::ZERO {
                cc[cij] = old;
                continue;
            }
            let mut acc = T::ZERO;
            for l in 0..k {
                let (ail, ajl) = match trans {
                    Transpose::None => {
                        (aa[i as usize + l as usize * lda], aa[j as usize + l as usize * lda])
                    }
                    Transpose::Transpose => {
                        (aa[l as usize + i as usize * lda], aa[l as usize + j as usize * lda])
                    }
                };
                acc = acc + ail * ajl;
            }
            cc[cij] = alpha * acc + old;
        }
    }
    Ok(())
}

/// Solves op(A) * X = alpha * B (left) or X * op(A) = alpha * B (right)
/// in place over B, A triangular.
#[allow(clippy::too_many_arguments)]
pub fn trsm<T: Float>(
    handle: &Handle,
    side: Side,
    uplo: Fill,
    transa: Transpose,
    diag: Diag,
    m: i32,
    n: i32,
    alpha: ScalarArg<T>,
    a: &DeviceBuffer<T>,
    lda: i32,
    b: &mut DeviceBuffer<T>,
    ldb: i32,
) -> Result<()> {
    log::trace!("trsm side={side} uplo={uplo} transa={transa} diag={diag} m={m} n={n}");
    validate::size("m", m)?;
    validate::size("n", n)?;
    let ka = match side {
        Side::Left => m,
        Side::Right => n,
    };
    validate::leading_dim("lda", lda, ka)?;
    validate::leading_dim("ldb", ldb, m)?;
    if m == 0 || n == 0 {
        return Ok(());
    }
    let alpha = alpha.resolve(handle, "alpha")?;
    validate::matrix_extent("a", a, ka, ka, lda)?;
    validate::matrix_extent("b", b, m, n, ldb)?;
    handle.stream().record_launch();
    let (aa, bb) = (a.as_slice(), b.as_mut_slice());
    let (lda, ldb) = (lda as usize, ldb as usize);
    let opa = |r: i32, c: i32| match transa {
        Transpose::None => aa[r as usize + c as usize * lda],
        Transpose::Transpose => aa[c as usize + r as usize * lda],
    };
    // alpha of zero zeroes B without reading A.
    if alpha == T::ZERO {
        for j in 0..n as usize {
            for i in 0..m as usize {
                bb[i + j * ldb] = T::ZERO;
            }
        }
        return Ok(());
    }
    // Scale first; the substitutions below only reference entries of B
    // that were already overwritten with solved values or still carry
    // their alpha-scaled inputs.
    for j in 0..n as usize {
        for i in 0..m as usize {
            bb[i + j * ldb] = alpha * bb[i + j * ldb];
        }
    }
    // op(A) is effectively lower when the stored triangle and the
    // transpose flag agree on it.
    let op_lower = matches!(
        (uplo, transa),
        (Fill::Lower, Transpose::None) | (Fill::Upper, Transpose::Transpose)
    );
    match side {
        Side::Left => {
            // Column-by-column substitution over op(A) X = B.
            let rows: Vec<i32> =
                if op_lower { (0..m).collect() } else { (0..m).rev().collect() };
            for j in 0..n as usize {
                for &i in &rows {
                    let mut sum = T::ZERO;
                    let solved: Box<dyn Iterator<Item = i32>> =
                        if op_lower { Box::new(0..i) } else { Box::new((i + 1..m).rev()) };
                    for p in solved {
                        sum = sum + opa(i, p) * bb[p as usize + j * ldb];
                    }
                    let idx = i as usize + j * ldb;
                    let num = bb[idx] - sum;
                    bb[idx] = match diag {
                        Diag::Unit => num,
                        Diag::NonUnit => num / opa(i, i),
                    };
                }
            }
        }
        Side::Right => {
            // Column-by-column over X op(A) = B; an upper op(A) solves
            // left to right, a lower one right to left.
            let cols: Vec<i32> =
                if op_lower { (0..n).rev().collect() } else { (0..n).collect() };
            for &j in &cols {
                let solved: Vec<i32> = if op_lower {
                    ((j + 1)..n).collect()
                } else {
                    (0..j).collect()
                };
                for i in 0..m as usize {
                    let mut sum = T::ZERO;
                    for &p in &solved {
                        sum = sum + bb[i + p as usize * ldb] * opa(p, j);
                    }
                    let idx = i + j as usize * ldb;
                    let num = bb[idx] - sum;
                    bb[idx] = match diag {
                        Diag::Unit => num,
                        Diag::NonUnit => num / opa(j, j),
                    };
                }
            }
        }
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
    fn gemm_identity_times_matrix() {
        let h = Handle::new();
        let a = buf(&[1.0, 0.0, 0.0, 1.0]);
        let b = buf(&[1.0, 2.0, 3.0, 4.0]);
        let mut c = buf(&[0.0; 4]);
        gemm(&h, Transpose::None, Transpose::None, 2, 2, 2, ScalarArg::Host(1.0), &a, 2, &b, 2, ScalarArg::Host(0.0), &mut c, 2)
            .unwrap();
        assert_eq!(host(&c), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn gemm_transposed_operands() {
        let h = Handle::new();
        // A is 3x2 stored, op(A)=A^T is 2x3; B is 3x2.
        let a = buf(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = buf(&[1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
        let mut c = buf(&[0.0; 4]);
        gemm(&h, Transpose::Transpose, Transpose::None, 2, 2, 3, ScalarArg::Host(1.0), &a, 3, &b, 3, ScalarArg::Host(0.0), &mut c, 2)
            .unwrap();
        assert_eq!(host(&c), [6.0, 15.0, 12.0, 30.0]);
    }

    #[test]
    fn gemm_beta_scales_existing_c() {
        let h = Handle::new();
        let a = buf(&[1.0]);
        let b = buf(&[1.0]);
        let mut c = buf(&[10.0]);
        gemm(&h, Transpose::None, Transpose::None, 1, 1, 1, ScalarArg::Host(2.0), &a, 1, &b, 1, ScalarArg::Host(3.0), &mut c, 1)
            .unwrap();
        assert_eq!(host(&c), [32.0]);
    }

    #[test]
    fn gemm_k_zero_is_a_scaling() {
        let h = Handle::new();
        let a = buf(&[]);
        let b = buf(&[]);
        let mut c = buf(&[5.0, 6.0]);
        gemm(&h, Transpose::None, Transpose::None, 2, 1, 0, ScalarArg::Host(1.0), &a, 2, &b, 1, ScalarArg::Host(2.0), &mut c, 2)
            .unwrap();
        assert_eq!(host(&c), [10.0, 12.0]);
    }

    #[test]
    fn gemm_blocked_matches_naive_on_odd_sizes() {
        // 65 exceeds one tile in each direction.
        let h = Handle::new();
        let m = 65;
        let vals: Vec<f32> = (0..m * m).map(|i| ((i % 7) as f32) - 3.0).collect();
        let a = buf(&vals);
        let b = buf(&vals);
        let mut c = buf(&vec![0.0; (m * m) as usize]);
        gemm(&h, Transpose::None, Transpose::None, m, m, m, ScalarArg::Host(1.0), &a, m, &b, m, ScalarArg::Host(0.0), &mut c, m)
            .unwrap();
        // Spot-check one element against a scalar loop.
        let mut expect = 0.0f32;
        for l in 0..m {
            expect += vals[(1 + l * m) as usize] * vals[(l + 2 * m) as usize];
        }
        assert_eq!(host(&c)[(1 + 2 * m) as usize], expect);
    }

    #[test]
    fn gemm_backends_agree_bitwise() {
        // The blocked path tiles only the output; every k-loop still runs
        // in ascending order, so the two backends must match exactly.
        let m = 65;
        let vals: Vec<f32> = (0..m * m).map(|i| ((i % 7) as f32) - 3.0).collect();
        let mut looped = vals.clone();
        let mut blocked = vals.clone();
        gemm_kernel(
            KernelBackend::Looped,
            Transpose::None, Transpose::None, m, m, m, 1.5f32,
            &vals, m, &vals, m, 0.5, &mut looped, m,
        );
        gemm_kernel(
            KernelBackend::Blocked,
            Transpose::None, Transpose::None, m, m, m, 1.5f32,
            &vals, m, &vals, m, 0.5, &mut blocked, m,
        );
        assert_eq!(looped, blocked);
    }

    #[test]
    fn gemm_strided_batched_offsets_members() {
        let h = Handle::new();
        let a = buf(&[1.0, 2.0]);
        let b = buf(&[3.0, 4.0]);
        let mut c = buf(&[0.0, 0.0]);
        gemm_strided_batched(
            &h, Transpose::None, Transpose::None, 1, 1, 1,
            ScalarArg::Host(1.0), &a, 1, 1, &b, 1, 1,
            ScalarArg::Host(0.0), &mut c, 1, 1, 2,
        )
        .unwrap();
        assert_eq!(host(&c), [3.0, 8.0]);
    }

    #[test]
    fn syrk_touches_only_requested_triangle() {
        let h = Handle::new();
        // A = [[1],[2]] (2x1); A*A^T = [[1,2],[2,4]].
        let a = buf(&[1.0, 2.0]);
        let mut c = buf(&[-1.0; 4]);
        syrk(&h, Fill::Upper, Transpose::None, 2, 1, ScalarArg::Host(1.0), &a, 2, ScalarArg::Host(0.0), &mut c, 2)
            .unwrap();
        // Lower slot (1,0) keeps its old value.
        assert_eq!(host(&c), [1.0, -1.0, 2.0, 4.0]);
    }

    #[test]
    fn trsm_left_lower_solves_columns() {
        let h = Handle::new();
        // L = [[2,0],[1,4]]; B = L * X with X = [[1,3],[2,4]].
        let a = buf(&[2.0, 1.0, 0.0, 4.0]);
        let mut b = buf(&[2.0, 9.0, 6.0, 19.0]);
        trsm(&h, Side::Left, Fill::Lower, Transpose::None, Diag::NonUnit, 2, 2, ScalarArg::Host(1.0), &a, 2, &mut b, 2)
            .unwrap();
        assert_eq!(host(&b), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn trsm_right_upper_solves_rows() {
        let h = Handle::new();
        // U = [[2,1],[0,4]]; B = X * U with X = [[1,2],[3,4]] (column-major).
        // X*U = [[2, 9],[6, 19]] -> columns [2,6],[9,19].
        let a = buf(&[2.0, 0.0, 1.0, 4.0]);
        let mut b = buf(&[2.0, 6.0, 9.0, 19.0]);
        trsm(&h, Side::Right, Fill::Upper, Transpose::None, Diag::NonUnit, 2, 2, ScalarArg::Host(1.0), &a, 2, &mut b, 2)
            .unwrap();
        assert_eq!(host(&b), [1.0, 3.0, 2.0, 4.0]);
    }

    #[test]
    fn trsm_alpha_zero_zeroes_b_without_reading_a() {
        let h = Handle::new();
        let a = buf(&[f32::NAN; 4]);
        let mut b = buf(&[1.0, 2.0, 3.0, 4.0]);
        trsm(&h, Side::Left, Fill::Lower, Transpose::None, Diag::NonUnit, 2, 2, ScalarArg::Host(0.0), &a, 2, &mut b, 2)
            .unwrap();
        assert_eq!(host(&b), [0.0; 4]);
    }
}
