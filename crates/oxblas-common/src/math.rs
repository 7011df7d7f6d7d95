//! Small indexing helpers shared by kernels, reference, and harness.

/// Ceiling division.
pub fn ceil_div(a: usize, b: usize) -> usize {
    (a + b - 1) / b
}

/// Number of physical elements a BLAS vector of logical length `n` with
/// increment `inc` spans. A zero increment reads one element repeatedly.
pub fn vector_span(n: i32, inc: i32) -> usize {
    if n <= 0 {
        0
    } else {
        1 + (n as usize - 1) * inc.unsigned_abs() as usize
    }
}

/// Physical index of logical element `i` of a BLAS vector.
///
/// Negative increments walk the buffer backwards from the far end, per BLAS
/// convention: element 0 sits at physical index `(n-1)*|inc|`.
pub fn vector_index(i: i32, n: i32, inc: i32) -> usize {
    debug_assert!(i >= 0 && i < n);
    if inc >= 0 {
        (i as usize) * (inc as usize)
    } else {
        ((n - 1 - i) as usize) * (inc.unsigned_abs() as usize)
    }
}

/// Number of elements a column-major `rows x cols` matrix with leading
/// dimension `lda` spans.
pub fn matrix_span(rows: i32, cols: i32, lda: i32) -> usize {
    if rows <= 0 || cols <= 0 {
        0
    } else {
        (lda as usize) * (cols as usize - 1) + rows as usize
    }
}
