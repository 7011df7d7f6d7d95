//! Numeric hygiene scans.
//!
//! When enabled on the handle, routines scan their floating-point operands
//! before and after the compute kernel, counting zeros, NaNs and Infs. The
//! mode decides what happens on a bad value: log it, or fail the call with
//! [`Error::CheckNumericsFail`]. All-zero data is only ever reported, never
//! an error.

use crate::device::{DeviceBatch, DeviceBuffer};
use oxblas_common::{vector_index, Error, Float, Result};

/// Numeric checking policy carried by the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckNumericsMode {
    /// No scanning; zero overhead.
    #[default]
    NoCheck,
    /// Log counts at info level, never fail.
    Info,
    /// Log a warning when a NaN or Inf is present, never fail.
    Warn,
    /// Fail the call when a NaN or Inf is present.
    Fail,
}

/// Tally of one scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NumericsReport {
    pub checked: usize,
    pub zero: usize,
    pub nan: usize,
    pub inf: usize,
}

impl NumericsReport {
    pub fn has_bad_values(&self) -> bool {
        self.nan > 0 || self.inf > 0
    }

    pub fn all_zero(&self) -> bool {
        self.checked > 0 && self.zero == self.checked
    }

    fn absorb<T: Float>(&mut self, v: T) {
        self.checked += 1;
        if v.is_nan() {
            self.nan += 1;
        } else if v.is_inf() {
            self.inf += 1;
        } else if v == T::ZERO {
            self.zero += 1;
        }
    }

    fn resolve(
        self,
        mode: CheckNumericsMode,
        function: &'static str,
        location: &'static str,
    ) -> Result<()> {
        match mode {
            CheckNumericsMode::NoCheck => {}
            CheckNumericsMode::Info => {
                log::info!(
                    "check_numerics {function} {location}: checked={} zero={} nan={} inf={}",
                    self.checked,
                    self.zero,
                    self.nan,
                    self.inf
                );
            }
            CheckNumericsMode::Warn => {
                if self.has_bad_values() {
                    log::warn!(
                        "check_numerics {function} {location}: nan={} inf={}",
                        self.nan,
                        self.inf
                    );
                } else if self.all_zero() {
                    log::warn!("check_numerics {function} {location}: all zero");
                }
            }
            CheckNumericsMode::Fail => {
                if self.has_bad_values() {
                    return Err(Error::CheckNumericsFail { function, location });
                }
            }
        }
        Ok(())
    }
}

/// Scans a strided vector, `batch_count` copies `stride` apart.
///
/// Degenerate shapes (non-positive `n`, `inc` or `batch_count`) scan
/// nothing, matching the quick-return shapes of the routines themselves.
pub fn check_vector<T: Float>(
    mode: CheckNumericsMode,
    function: &'static str,
    location: &'static str,
    x: &DeviceBuffer<T>,
    n: i32,
    inc: i32,
    stride: i64,
    batch_count: i32,
) -> Result<()> {
    if mode == CheckNumericsMode::NoCheck {
        return Ok(());
    }
    let mut report = NumericsReport::default();
    if n > 0 && inc != 0 && batch_count > 0 {
        let data = x.as_slice();
        for b in 0..batch_count {
            let base = b as usize * stride as usize;
            for i in 0..n {
                report.absorb(data[base + vector_index(i, n, inc)]);
            }
        }
    }
    report.resolve(mode, function, location)
}

/// Scans every member of a pointer-array batch of vectors.
pub fn check_vector_batched<T: Float>(
    mode: CheckNumericsMode,
    function: &'static str,
    location: &'static str,
    x: &DeviceBatch<T>,
    n: i32,
    inc: i32,
    batch_count: i32,
) -> Result<()> {
    if mode == CheckNumericsMode::NoCheck {
        return Ok(());
    }
    let mut report = NumericsReport::default();
    if n > 0 && inc != 0 && batch_count > 0 {
        for b in 0..batch_count as usize {
            let data = x.buf(b).as_slice();
            for i in 0..n {
                report.absorb(data[vector_index(i, n, inc)]);
            }
        }
    }
    report.resolve(mode, function, location)
}

/// Scans a strided column-major matrix, `batch_count` copies `stride` apart.
pub fn check_matrix<T: Float>(
    mode: CheckNumericsMode,
    function: &'static str,
    location: &'static str,
    a: &DeviceBuffer<T>,
    rows: i32,
    cols: i32,
    lda: i32,
    stride: i64,
    batch_count: i32,
) -> Result<()> {
    if mode == CheckNumericsMode::NoCheck {
        return Ok(());
    }
    let mut report = NumericsReport::default();
    if rows > 0 && cols > 0 && batch_count > 0 {
        let data = a.as_slice();
        for b in 0..batch_count {
            let base = b as usize * stride as usize;
            for j in 0..cols as usize {
                for i in 0..rows as usize {
                    report.absorb(data[base + j * lda as usize + i]);
                }
            }
        }
    }
    report.resolve(mode, function, location)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(vals: &[f32]) -> DeviceBuffer<f32> {
        let mut b = DeviceBuffer::new(vals.len()).unwrap();
        b.transfer_from(vals).unwrap();
        b
    }

    #[test]
    fn clean_data_passes_in_fail_mode() {
        let x = buf(&[1.0, -2.0, 3.0]);
        check_vector(CheckNumericsMode::Fail, "axpy", "input x", &x, 3, 1, 0, 1).unwrap();
    }

    #[test]
    fn nan_fails_only_in_fail_mode() {
        let x = buf(&[1.0, f32::NAN, 3.0]);
        check_vector(CheckNumericsMode::Warn, "axpy", "input x", &x, 3, 1, 0, 1).unwrap();
        let err =
            check_vector(CheckNumericsMode::Fail, "axpy", "input x", &x, 3, 1, 0, 1).unwrap_err();
        assert!(matches!(err, Error::CheckNumericsFail { function: "axpy", .. }));
    }

    #[test]
    fn all_zero_is_not_an_error() {
        let x = buf(&[0.0; 4]);
        check_vector(CheckNumericsMode::Fail, "scal", "input x", &x, 4, 1, 0, 1).unwrap();
    }

    #[test]
    fn stride_skips_padding_elements() {
        // Two batch members of length 2 with a NaN hidden in the stride gap.
        let x = buf(&[1.0, 2.0, f32::NAN, 4.0, 5.0, 0.0]);
        check_vector(CheckNumericsMode::Fail, "axpy", "input x", &x, 2, 1, 3, 2).unwrap();
    }

    #[test]
    fn matrix_scan_respects_lda() {
        // 2x2 matrix with lda 3; the pad row holds an Inf that must be skipped.
        let a = buf(&[1.0, 2.0, f32::INFINITY, 4.0, 5.0, f32::INFINITY]);
        check_matrix(CheckNumericsMode::Fail, "gemm", "input a", &a, 2, 2, 3, 0, 1).unwrap();
        let err = check_matrix(CheckNumericsMode::Fail, "gemm", "input a", &a, 3, 2, 3, 0, 1)
            .unwrap_err();
        assert!(matches!(err, Error::CheckNumericsFail { .. }));
    }

    #[test]
    fn report_tallies() {
        let mut r = NumericsReport::default();
        for v in [0.0f32, 1.0, f32::NAN, f32::INFINITY, 0.0] {
            r.absorb(v);
        }
        assert_eq!(r, NumericsReport { checked: 5, zero: 2, nan: 1, inf: 1 });
        assert!(r.has_bad_values());
        assert!(!r.all_zero());
    }
}
