//! Level-3 oracle: matrix-matrix operations, column-major.

use oxblas_common::{Diag, Fill, Float, Side, Transpose};

/// C = alpha * op(A) * op(B) + beta * C
#[allow(clippy::too_many_arguments)]
pub fn gemm<T: Float>(
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
    if m <= 0 || n <= 0 || ((k <= 0 || alpha == T::ZERO) && beta == T::ONE) {
        return;
    }
    let (lda, ldb, ldc) = (lda as usize, ldb as usize, ldc as usize);
    for j in 0..n {
        for i in 0..m {
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

/// C = alpha * A * A^T + beta * C (or A^T * A), one triangle of C updated.
#[allow(clippy::too_many_arguments)]
pub fn syrk<T: Float>(
    uplo: Fill,
    trans: Transpose,
    n: i32,
    k: i32,
    alpha: T,
    a: &[T],
    lda: i32,
    beta: T,
    c: &mut [T],
    ldc: i32,
) {
    if n <= 0 || ((k <= 0 || alpha == T::ZERO) && beta == T::ONE) {
        return;
    }
    let (lda, ldc) = (lda as usize, ldc as usize);
    for j in 0..n {
        let (lo, hi) = match uplo {
            Fill::Upper => (0, j + 1),
            Fill::Lower => (j, n),
        };
        for i in lo..hi {
            let cij = i as usize + j as usize * ldc;
            let old = if beta == T::ZERO { T::ZERO } else { beta * c[cij] };
            if alpha == T::ZERO {
                c[cij] = old;
                continue;
            }
            let mut acc = T::ZERO;
            for l in 0..k {
                let (ail, ajl) = match trans {
                    Transpose::None => {
                        (a[i as usize + l as usize * lda], a[j as usize + l as usize * lda])
                    }
                    Transpose::Transpose => {
                        (a[l as usize + i as usize * lda], a[l as usize + j as usize * lda])
                    }
                };
                acc = acc + ail * ajl;
            }
            c[cij] = alpha * acc + old;
        }
    }
}

/// Solves op(A) * X = alpha * B (left) or X * op(A) = alpha * B (right)
/// in place over B, A triangular.
#[allow(clippy::too_many_arguments)]
pub fn trsm<T: Float>(
    side: Side,
    uplo: Fill,
    transa: Transpose,
    diag: Diag,
    m: i32,
    n: i32,
    alpha: T,
    a: &[T],
    lda: i32,
    b: &mut [T],
    ldb: i32,
) {
    if m <= 0 || n <= 0 {
        return;
    }
    let (lda, ldb) = (lda as usize, ldb as usize);
    let opa = |r: i32, c: i32| match transa {
        Transpose::None => a[r as usize + c as usize * lda],
        Transpose::Transpose => a[c as usize + r as usize * lda],
    };
    if alpha == T::ZERO {
        for j in 0..n as usize {
            for i in 0..m as usize {
                b[i + j * ldb] = T::ZERO;
            }
        }
        return;
    }
    for j in 0..n as usize {
        for i in 0..m as usize {
            b[i + j * ldb] = alpha * b[i + j * ldb];
        }
    }
    let op_lower = matches!(
        (uplo, transa),
        (Fill::Lower, Transpose::None) | (Fill::Upper, Transpose::Transpose)
    );
    match side {
        Side::Left => {
            let rows: Vec<i32> =
                if op_lower { (0..m).collect() } else { (0..m).rev().collect() };
            for j in 0..n as usize {
                for &i in &rows {
                    let mut sum = T::ZERO;
                    let solved: Box<dyn Iterator<Item = i32>> =
                        if op_lower { Box::new(0..i) } else { Box::new((i + 1..m).rev()) };
                    for p in solved {
                        sum = sum + opa(i, p) * b[p as usize + j * ldb];
                    }
                    let idx = i as usize + j * ldb;
                    let num = b[idx] - sum;
                    b[idx] = match diag {
                        Diag::Unit => num,
                        Diag::NonUnit => num / opa(i, i),
                    };
                }
            }
        }
        Side::Right => {
            let cols: Vec<i32> =
                if op_lower { (0..n).rev().collect() } else { (0..n).collect() };
            for &j in &cols {
                let solved: Vec<i32> =
                    if op_lower { ((j + 1)..n).collect() } else { (0..j).collect() };
                for i in 0..m as usize {
                    let mut sum = T::ZERO;
                    for &p in &solved {
                        sum = sum + b[i + p as usize * ldb] * opa(p, j);
                    }
                    let idx = i + j as usize * ldb;
                    let num = b[idx] - sum;
                    b[idx] = match diag {
                        Diag::Unit => num,
                        Diag::NonUnit => num / opa(j, j),
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemm_small() {
        let a = [1.0f32, 2.0, 3.0, 4.0];
        let b = [1.0f32, 0.0, 0.0, 1.0];
        let mut c = [0.0f32; 4];
        gemm(Transpose::None, Transpose::None, 2, 2, 2, 1.0, &a, 2, &b, 2, 0.0, &mut c, 2);
        assert_eq!(c, a);
    }

    #[test]
    fn syrk_upper_only() {
        let a = [1.0f32, 2.0];
        let mut c = [-1.0f32; 4];
        syrk(Fill::Upper, Transpose::None, 2, 1, 1.0, &a, 2, 0.0, &mut c, 2);
        assert_eq!(c, [1.0, -1.0, 2.0, 4.0]);
    }

    #[test]
    fn trsm_inverts_gemm() {
        // B = L * X, then trsm(L, B) must recover X.
        let l = [2.0f32, 1.0, 0.0, 4.0];
        let x = [1.0f32, 2.0, 3.0, 4.0];
        let mut b = [0.0f32; 4];
        gemm(Transpose::None, Transpose::None, 2, 2, 2, 1.0, &l, 2, &x, 2, 0.0, &mut b, 2);
        trsm(Side::Left, Fill::Lower, Transpose::None, Diag::NonUnit, 2, 2, 1.0, &l, 2, &mut b, 2);
        assert_eq!(b, x);
    }
}
