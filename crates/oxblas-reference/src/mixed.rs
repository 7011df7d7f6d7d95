//! Mixed-precision oracle, mirroring the widening rules of the `_ex`
//! routines: every element widens through f64 into the compute type,
//! accumulates there in ascending order, and narrows once on store.

use oxblas_common::{vector_index, Compute, Scalar, Transpose};

fn widen<From: Scalar, To: Compute>(v: From) -> To {
    To::from_f64(v.to_f64())
}

fn narrow<From: Compute, To: Scalar>(v: From) -> To {
    To::from_f64(v.to_f64())
}

/// y = alpha * x + y computed in `Tc`.
pub fn axpy_ex<Ta, Tx, Tc>(n: i32, alpha: Ta, x: &[Tx], incx: i32, y: &mut [Tx], incy: i32)
where
    Ta: Scalar,
    Tx: Scalar,
    Tc: Compute,
{
    let alpha: Tc = widen(alpha);
    if n <= 0 || alpha == Tc::ZERO {
        return;
    }
    for i in 0..n {
        let yi = vector_index(i, n, incy);
        let acc = alpha * widen::<Tx, Tc>(x[vector_index(i, n, incx)]) + widen::<Tx, Tc>(y[yi]);
        y[yi] = narrow(acc);
    }
}

/// x . y accumulated in `Tc`, narrowed to `Tr`.
pub fn dot_ex<Tx, Tr, Tc>(n: i32, x: &[Tx], incx: i32, y: &[Tx], incy: i32) -> Tr
where
    Tx: Scalar,
    Tr: Scalar,
    Tc: Compute,
{
    let mut acc = Tc::ZERO;
    for i in 0..n.max(0) {
        acc = acc
            + widen::<Tx, Tc>(x[vector_index(i, n, incx)])
                * widen::<Tx, Tc>(y[vector_index(i, n, incy)]);
    }
    narrow(acc)
}

/// C = alpha * op(A) * op(B) + beta * C accumulated in `Tc`.
#[allow(clippy::too_many_arguments)]
pub fn gemm_ex<Ti, To, Tc>(
    transa: Transpose,
    transb: Transpose,
    m: i32,
    n: i32,
    k: i32,
    alpha: Tc,
    a: &[Ti],
    lda: i32,
    b: &[Ti],
    ldb: i32,
    beta: Tc,
    c: &mut [To],
    ldc: i32,
) where
    Ti: Scalar,
    To: Scalar,
    Tc: Compute,
{
    if m <= 0 || n <= 0 || ((k <= 0 || alpha == Tc::ZERO) && beta == Tc::ONE) {
        return;
    }
    let (lda, ldb, ldc) = (lda as usize, ldb as usize, ldc as usize);
    for j in 0..n {
        for i in 0..m {
            let cij = i as usize + j as usize * ldc;
            // beta of zero overwrites rather than scales, so C is never read.
            let old: Tc =
                if beta == Tc::ZERO { Tc::ZERO } else { beta * widen::<To, Tc>(c[cij]) };
            if alpha == Tc::ZERO {
                c[cij] = narrow(old);
                continue;
            }
            let mut acc = Tc::ZERO;
            for l in 0..k {
                let ail = match transa {
                    Transpose::None => a[i as usize + l as usize * lda],
                    Transpose::Transpose => a[l as usize + i as usize * lda],
                };
                let blj = match transb {
                    Transpose::None => b[l as usize + j as usize * ldb],
                    Transpose::Transpose => b[j as usize + l as usize * ldb],
                };
                acc = acc + widen::<Ti, Tc>(ail) * widen::<Ti, Tc>(blj);
            }
            c[cij] = narrow(alpha * acc + old);
        }
    }
}
