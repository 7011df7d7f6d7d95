//! Per-routine test drivers.
//!
//! Each driver owns the full life of one case: seeded input generation,
//! the host oracle run, device runs in host and device pointer mode, the
//! requested checks, and optional timing. Drivers are generic over the
//! element type; the dispatcher instantiates them per datatype tag.

pub mod blas1;
pub mod blas2;
pub mod blas3;
pub mod blas_ex;

use crate::arguments::Arguments;
use crate::compare;
use anyhow::{ensure, Context, Result};
use oxblas_common::{Float, PointerMode, Result as BlasResult, Scalar};
use oxblas_kernels::{DeviceBatch, DeviceBuffer, Handle};

pub(crate) fn to_device<T: Scalar>(host: &[T]) -> Result<DeviceBuffer<T>> {
    let mut buf = DeviceBuffer::new(host.len()).context("device allocation")?;
    buf.transfer_from(host)?;
    Ok(buf)
}

pub(crate) fn to_host<T: Scalar>(buf: &DeviceBuffer<T>) -> Result<Vec<T>> {
    let mut out = vec![T::ZERO; buf.len()];
    buf.transfer_to(&mut out)?;
    Ok(out)
}

pub(crate) fn to_device_batch<T: Scalar>(host: &[Vec<T>]) -> Result<DeviceBatch<T>> {
    let len = host.first().map_or(0, Vec::len);
    let mut batch = DeviceBatch::new(host.len(), len).context("device batch allocation")?;
    batch.transfer_from(host)?;
    Ok(batch)
}

pub(crate) fn batch_to_host<T: Scalar>(batch: &DeviceBatch<T>) -> Result<Vec<Vec<T>>> {
    let len = if batch.batch_count() > 0 { batch.buf(0).len() } else { 0 };
    let mut out = vec![vec![T::ZERO; len]; batch.batch_count()];
    batch.transfer_to(&mut out)?;
    Ok(out)
}

pub(crate) fn handle_for(mode: PointerMode) -> Handle {
    let mut handle = Handle::new();
    handle.set_pointer_mode(mode);
    handle
}

/// Wall-clocks one host-oracle evaluation, in microseconds.
pub(crate) fn time_cpu(f: impl FnOnce()) -> f64 {
    let start = std::time::Instant::now();
    f();
    start.elapsed().as_secs_f64() * 1e6
}

/// Scores one device result against the oracle.
///
/// Unit checking degrades to a near check for half-precision types, with
/// the tolerance scaled by `reduction_len`, the number of additions behind
/// each output element. When a norm check was requested the relative error
/// lands in `norm_slot` and is bounded by the same budget.
pub(crate) fn score<T: Float>(
    args: &Arguments,
    label: &str,
    reduction_len: i32,
    gold: &[T],
    actual: &[T],
    norm_slot: &mut Option<f64>,
) -> Result<()> {
    let k = reduction_len.max(1) as f64;
    if args.unit_check {
        let tol = k * compare::sum_error_tolerance(T::DATATYPE);
        if tol == 0.0 {
            compare::unit_check(label, gold, actual)?;
        } else {
            compare::near_check(label, gold, actual, tol)?;
        }
    }
    if args.norm_check {
        let err = compare::norm_check(gold, actual);
        let allowable = 10.0 * k * compare::machine_epsilon(T::DATATYPE);
        ensure!(
            err <= allowable,
            "{label}: norm error {err} exceeds allowable {allowable}"
        );
        *norm_slot = Some(err);
    }
    Ok(())
}

/// Maps a routine result into anyhow for driver plumbing.
pub(crate) fn run(r: BlasResult<()>) -> Result<()> {
    r.map_err(Into::into)
}

/// Asserts that a call failed with a size or increment complaint; the
/// bad-argument drivers use this to pin validation behavior.
pub(crate) fn expect_invalid(r: BlasResult<()>, what: &str) -> Result<()> {
    use oxblas_common::Error;
    match r {
        Err(Error::InvalidSize { .. } | Error::InvalidIncrement { .. }) => Ok(()),
        Err(other) => anyhow::bail!("{what}: wrong error kind: {other}"),
        Ok(()) => anyhow::bail!("{what}: invalid arguments were accepted"),
    }
}
