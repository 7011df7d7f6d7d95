//! Level-2 oracle: matrix-vector operations, column-major.

use oxblas_common::{vector_index, Diag, Fill, Float, Transpose};

/// y = alpha * op(A) * x + beta * y
#[allow(clippy::too_many_arguments)]
pub fn gemv<T: Float>(
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
    if m <= 0 || n <= 0 || (alpha == T::ZERO && beta == T::ONE) {
        return;
    }
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

/// A = alpha * x * y^T + A
#[allow(clippy::too_many_arguments)]
pub fn ger<T: Float>(
    m: i32,
    n: i32,
    alpha: T,
    x: &[T],
    incx: i32,
    y: &[T],
    incy: i32,
    a: &mut [T],
    lda: i32,
) {
    if m <= 0 || n <= 0 || alpha == T::ZERO {
        return;
    }
    for j in 0..n {
        let yj = alpha * y[vector_index(j, n, incy)];
        for i in 0..m {
            let idx = i as usize + j as usize * lda as usize;
            a[idx] = a[idx] + x[vector_index(i, m, incx)] * yj;
        }
    }
}

/// y = alpha * A * x + beta * y, A symmetric with one stored triangle.
#[allow(clippy::too_many_arguments)]
pub fn symv<T: Float>(
    uplo: Fill,
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
    if n <= 0 || (alpha == T::ZERO && beta == T::ONE) {
        return;
    }
    let lda = lda as usize;
    for i in 0..n {
        let yi = vector_index(i, n, incy);
        let old = if beta == T::ZERO { T::ZERO } else { beta * y[yi] };
        if alpha == T::ZERO {
            y[yi] = old;
            continue;
        }
        let mut acc = T::ZERO;
        for j in 0..n {
            let stored_upper = matches!(uplo, Fill::Upper);
            let (r, c) = if (i <= j) == stored_upper { (i, j) } else { (j, i) };
            acc = acc + a[r as usize + c as usize * lda] * x[vector_index(j, n, incx)];
        }
        y[yi] = alpha * acc + old;
    }
}

/// Solves op(A) * x = b in place, A triangular.
pub fn trsv<T: Float>(
    uplo: Fill,
    trans: Transpose,
    diag: Diag,
    n: i32,
    a: &[T],
    lda: i32,
    x: &mut [T],
    incx: i32,
) {
    if n <= 0 {
        return;
    }
    let ld = lda as usize;
    let elem = |i: i32, j: i32| match trans {
        Transpose::None => a[i as usize + j as usize * ld],
        Transpose::Transpose => a[j as usize + i as usize * ld],
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
            sum = sum + elem(i, j) * x[vector_index(j, n, incx)];
        }
        let xi = vector_index(i, n, incx);
        let num = x[xi] - sum;
        x[xi] = match diag {
            Diag::Unit => num,
            Diag::NonUnit => num / elem(i, i),
        };
    }
}
