//! Shared argument validation for the routine surface.
//!
//! Size arguments are checked before anything else; extent checks come after
//! quick returns, so degenerate problems never reject a buffer. Extents are
//! checked against the actual allocation, which is the one contract a real
//! device library cannot enforce and silently corrupts memory over instead.

use crate::device::{DeviceBatch, DeviceBuffer};
use oxblas_common::{matrix_span, vector_span, Error, Result, Scalar};

pub(crate) fn size(arg: &'static str, value: i32) -> Result<()> {
    if value < 0 {
        return Err(Error::InvalidSize { arg, value: value as i64 });
    }
    Ok(())
}

pub(crate) fn increment(arg: &'static str, value: i32) -> Result<()> {
    if value == 0 {
        return Err(Error::InvalidIncrement { arg, value });
    }
    Ok(())
}

pub(crate) fn stride(arg: &'static str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(Error::InvalidSize { arg, value });
    }
    Ok(())
}

/// Leading dimension must cover the row count (and be at least 1).
pub(crate) fn leading_dim(arg: &'static str, ld: i32, rows: i32) -> Result<()> {
    if ld < rows.max(1) {
        return Err(Error::InvalidSize { arg, value: ld as i64 });
    }
    Ok(())
}

pub(crate) fn vector_extent<T: Scalar>(
    arg: &'static str,
    buf: &DeviceBuffer<T>,
    n: i32,
    inc: i32,
) -> Result<()> {
    let required = vector_span(n, inc);
    if buf.len() < required {
        return Err(Error::SizeMismatch { arg, required, actual: buf.len() });
    }
    Ok(())
}

pub(crate) fn strided_vector_extent<T: Scalar>(
    arg: &'static str,
    buf: &DeviceBuffer<T>,
    n: i32,
    inc: i32,
    stride: i64,
    batch_count: i32,
) -> Result<()> {
    let required = (batch_count as usize - 1) * stride as usize + vector_span(n, inc);
    if buf.len() < required {
        return Err(Error::SizeMismatch { arg, required, actual: buf.len() });
    }
    Ok(())
}

pub(crate) fn batch_extent<T: Scalar>(
    arg: &'static str,
    batch: &DeviceBatch<T>,
    n: i32,
    inc: i32,
    batch_count: i32,
) -> Result<()> {
    if batch.batch_count() < batch_count as usize {
        return Err(Error::SizeMismatch {
            arg,
            required: batch_count as usize,
            actual: batch.batch_count(),
        });
    }
    let required = vector_span(n, inc);
    for b in 0..batch_count as usize {
        if batch.buf(b).len() < required {
            return Err(Error::SizeMismatch { arg, required, actual: batch.buf(b).len() });
        }
    }
    Ok(())
}

pub(crate) fn matrix_extent<T: Scalar>(
    arg: &'static str,
    buf: &DeviceBuffer<T>,
    rows: i32,
    cols: i32,
    ld: i32,
) -> Result<()> {
    let required = matrix_span(rows, cols, ld);
    if buf.len() < required {
        return Err(Error::SizeMismatch { arg, required, actual: buf.len() });
    }
    Ok(())
}

pub(crate) fn strided_matrix_extent<T: Scalar>(
    arg: &'static str,
    buf: &DeviceBuffer<T>,
    rows: i32,
    cols: i32,
    ld: i32,
    stride: i64,
    batch_count: i32,
) -> Result<()> {
    let required = (batch_count as usize - 1) * stride as usize + matrix_span(rows, cols, ld);
    if buf.len() < required {
        return Err(Error::SizeMismatch { arg, required, actual: buf.len() });
    }
    Ok(())
}

pub(crate) fn matrix_batch_extent<T: Scalar>(
    arg: &'static str,
    batch: &DeviceBatch<T>,
    rows: i32,
    cols: i32,
    ld: i32,
    batch_count: i32,
) -> Result<()> {
    if batch.batch_count() < batch_count as usize {
        return Err(Error::SizeMismatch {
            arg,
            required: batch_count as usize,
            actual: batch.batch_count(),
        });
    }
    let required = matrix_span(rows, cols, ld);
    for b in 0..batch_count as usize {
        if batch.buf(b).len() < required {
            return Err(Error::SizeMismatch { arg, required, actual: batch.buf(b).len() });
        }
    }
    Ok(())
}
