//! Level-1 oracle: vector operations and reductions.

use oxblas_common::{vector_index, Float};

/// x = alpha * x
pub fn scal<T: Float>(n: i32, alpha: T, x: &mut [T], incx: i32) {
    if n <= 0 || incx <= 0 || alpha == T::ONE {
        return;
    }
    for i in 0..n {
        let xi = vector_index(i, n, incx);
        x[xi] = alpha * x[xi];
    }
}

/// y = alpha * x + y; alpha of zero never reads x.
pub fn axpy<T: Float>(n: i32, alpha: T, x: &[T], incx: i32, y: &mut [T], incy: i32) {
    if n <= 0 || alpha == T::ZERO {
        return;
    }
    for i in 0..n {
        let yi = vector_index(i, n, incy);
        y[yi] = alpha * x[vector_index(i, n, incx)] + y[yi];
    }
}

/// y = x
pub fn copy<T: Float>(n: i32, x: &[T], incx: i32, y: &mut [T], incy: i32) {
    if n <= 0 {
        return;
    }
    for i in 0..n {
        y[vector_index(i, n, incy)] = x[vector_index(i, n, incx)];
    }
}

/// x <-> y
pub fn swap<T: Float>(n: i32, x: &mut [T], incx: i32, y: &mut [T], incy: i32) {
    if n <= 0 {
        return;
    }
    for i in 0..n {
        let xi = vector_index(i, n, incx);
        let yi = vector_index(i, n, incy);
        std::mem::swap(&mut x[xi], &mut y[yi]);
    }
}

/// x . y, accumulated left to right in T.
pub fn dot<T: Float>(n: i32, x: &[T], incx: i32, y: &[T], incy: i32) -> T {
    let mut acc = T::ZERO;
    for i in 0..n.max(0) {
        acc = acc + x[vector_index(i, n, incx)] * y[vector_index(i, n, incy)];
    }
    acc
}

/// ||x||_2, accumulated in f64.
pub fn nrm2<T: Float>(n: i32, x: &[T], incx: i32) -> T {
    if n <= 0 || incx <= 0 {
        return T::ZERO;
    }
    let mut acc = 0.0f64;
    for i in 0..n {
        let v = x[vector_index(i, n, incx)].to_f64();
        acc += v * v;
    }
    T::from_f64(acc.sqrt())
}

/// sum |x_i|, accumulated in f64.
pub fn asum<T: Float>(n: i32, x: &[T], incx: i32) -> T {
    if n <= 0 || incx <= 0 {
        return T::ZERO;
    }
    let mut acc = 0.0f64;
    for i in 0..n {
        acc += x[vector_index(i, n, incx)].to_f64().abs();
    }
    T::from_f64(acc)
}

/// Zero-based index of the first element of maximum magnitude.
pub fn iamax<T: Float>(n: i32, x: &[T], incx: i32) -> i32 {
    if n <= 0 || incx <= 0 {
        return 0;
    }
    let mut best = 0i32;
    let mut best_val = x[vector_index(0, n, incx)].abs();
    for i in 1..n {
        let v = x[vector_index(i, n, incx)].abs();
        if v > best_val {
            best = i;
            best_val = v;
        }
    }
    best
}
