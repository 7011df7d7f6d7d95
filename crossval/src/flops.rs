//! Floating-point operation counts for performance reporting.
//!
//! Counts are the classical ones: a multiply-add is two flops, and
//! batched variants scale by the batch count.

pub fn scal_gflop_count(n: i32) -> f64 {
    n.max(0) as f64 / 1e9
}

pub fn axpy_gflop_count(n: i32) -> f64 {
    2.0 * n.max(0) as f64 / 1e9
}

pub fn dot_gflop_count(n: i32) -> f64 {
    2.0 * n.max(0) as f64 / 1e9
}

pub fn nrm2_gflop_count(n: i32) -> f64 {
    2.0 * n.max(0) as f64 / 1e9
}

pub fn asum_gflop_count(n: i32) -> f64 {
    n.max(0) as f64 / 1e9
}

pub fn gemv_gflop_count(m: i32, n: i32) -> f64 {
    2.0 * m.max(0) as f64 * n.max(0) as f64 / 1e9
}

pub fn ger_gflop_count(m: i32, n: i32) -> f64 {
    2.0 * m.max(0) as f64 * n.max(0) as f64 / 1e9
}

pub fn symv_gflop_count(n: i32) -> f64 {
    2.0 * n.max(0) as f64 * n.max(0) as f64 / 1e9
}

pub fn trsv_gflop_count(n: i32) -> f64 {
    n.max(0) as f64 * n.max(0) as f64 / 1e9
}

pub fn gemm_gflop_count(m: i32, n: i32, k: i32) -> f64 {
    2.0 * m.max(0) as f64 * n.max(0) as f64 * k.max(0) as f64 / 1e9
}

pub fn syrk_gflop_count(n: i32, k: i32) -> f64 {
    let n = n.max(0) as f64;
    n * (n + 1.0) * k.max(0) as f64 / 1e9
}

pub fn trsm_gflop_count(m: i32, n: i32, left: bool) -> f64 {
    let (m, n) = (m.max(0) as f64, n.max(0) as f64);
    if left {
        m * m * n / 1e9
    } else {
        m * n * n / 1e9
    }
}
