//! Memory traffic counts for bandwidth reporting.
//!
//! Counts assume each operand crosses the bus once: reads count the
//! logical elements touched, read-modify-write operands count twice.

use oxblas_common::Datatype;

fn gb(elems: f64, dt: Datatype) -> f64 {
    elems * dt.size_of() as f64 / 1e9
}

/// scal reads and writes x.
pub fn scal_gbyte_count(n: i32, dt: Datatype) -> f64 {
    gb(2.0 * n.max(0) as f64, dt)
}

/// axpy reads x, reads and writes y.
pub fn axpy_gbyte_count(n: i32, dt: Datatype) -> f64 {
    gb(3.0 * n.max(0) as f64, dt)
}

/// dot reads x and y.
pub fn dot_gbyte_count(n: i32, dt: Datatype) -> f64 {
    gb(2.0 * n.max(0) as f64, dt)
}

/// nrm2/asum/iamax read x.
pub fn reduction_gbyte_count(n: i32, dt: Datatype) -> f64 {
    gb(n.max(0) as f64, dt)
}

/// gemv reads A and x, reads and writes y.
pub fn gemv_gbyte_count(m: i32, n: i32, dt: Datatype) -> f64 {
    let (m, n) = (m.max(0) as f64, n.max(0) as f64);
    gb(m * n + n + 2.0 * m, dt)
}

/// gemm reads A and B, reads and writes C.
pub fn gemm_gbyte_count(m: i32, n: i32, k: i32, dt: Datatype) -> f64 {
    let (m, n, k) = (m.max(0) as f64, n.max(0) as f64, k.max(0) as f64);
    gb(m * k + k * n + 2.0 * m * n, dt)
}
