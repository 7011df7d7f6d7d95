//! Numeric comparison against the host oracle.
//!
//! Three regimes, matching how much rounding the routine under test is
//! allowed to introduce:
//!
//! * [`unit_check`]: element-wise exact. Used whenever the device and the
//!   oracle run the same arithmetic in the same order.
//! * [`near_check`]: element-wise within a tolerance derived from
//!   [`sum_error_tolerance`] scaled by the reduction length.
//! * [`norm_check`]: Frobenius relative error in f64, scored against a
//!   multiple of machine epsilon by the caller.

use anyhow::{bail, Result};
use oxblas_common::{Datatype, Scalar};

/// Per-step rounding bound for a sum in the given type. Zero for types
/// whose test data never rounds (f32/f64 over small integers, and the
/// integer types).
pub fn sum_error_tolerance(dt: Datatype) -> f64 {
    match dt {
        Datatype::F16 => 1.0 / 1024.0,
        Datatype::Bf16 => 1.0 / 256.0,
        _ => 0.0,
    }
}

/// Unit roundoff of the given floating-point type, used to budget norm
/// checks. Integer tags report zero.
pub fn machine_epsilon(dt: Datatype) -> f64 {
    match dt {
        Datatype::F16 => 2.0f64.powi(-10),
        Datatype::Bf16 => 2.0f64.powi(-7),
        Datatype::F32 => f64::from(f32::EPSILON),
        Datatype::F64 => f64::EPSILON,
        // Integer tags (and any future ones) never round.
        _ => 0.0,
    }
}

/// Element-wise exact comparison. NaN in both slots counts as equal, so
/// NaN-propagation cases can still be scored.
pub fn unit_check<T: Scalar>(name: &str, expect: &[T], actual: &[T]) -> Result<()> {
    if expect.len() != actual.len() {
        bail!("{name}: length mismatch, expected {} got {}", expect.len(), actual.len());
    }
    for (i, (e, a)) in expect.iter().zip(actual).enumerate() {
        let both_nan = e.is_nan() && a.is_nan();
        if e != a && !both_nan {
            bail!("{name}: mismatch at [{i}]: expected {e:?} got {a:?}");
        }
    }
    Ok(())
}

/// Element-wise comparison within `tol`, relative to the expected value's
/// magnitude (floored at 1 so near-zero expectations get an absolute bound).
pub fn near_check<T: Scalar>(name: &str, expect: &[T], actual: &[T], tol: f64) -> Result<()> {
    if expect.len() != actual.len() {
        bail!("{name}: length mismatch, expected {} got {}", expect.len(), actual.len());
    }
    for (i, (e, a)) in expect.iter().zip(actual).enumerate() {
        let (e, a) = (e.to_f64(), a.to_f64());
        if e.is_nan() && a.is_nan() {
            continue;
        }
        let bound = tol * e.abs().max(1.0);
        if !((e - a).abs() <= bound) {
            bail!("{name}: [{i}] expected {e} got {a}, |diff| {} > {bound}", (e - a).abs());
        }
    }
    Ok(())
}

/// Frobenius relative error ||expect - actual|| / ||expect||, computed in
/// f64. Zero over zero reports zero.
pub fn norm_check<T: Scalar>(expect: &[T], actual: &[T]) -> f64 {
    let mut diff = 0.0f64;
    let mut norm = 0.0f64;
    for (e, a) in expect.iter().zip(actual) {
        let (e, a) = (e.to_f64(), a.to_f64());
        diff += (e - a) * (e - a);
        norm += e * e;
    }
    if norm == 0.0 {
        return if diff == 0.0 { 0.0 } else { f64::INFINITY };
    }
    (diff / norm).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    #[test]
    fn unit_check_exact_or_fails() {
        unit_check("t", &[1.0f32, 2.0], &[1.0, 2.0]).unwrap();
        assert!(unit_check("t", &[1.0f32], &[1.0 + f32::EPSILON]).is_err());
    }

    #[test]
    fn unit_check_treats_nan_pairs_as_equal() {
        unit_check("t", &[f32::NAN], &[f32::NAN]).unwrap();
        assert!(unit_check("t", &[f32::NAN], &[1.0]).is_err());
    }

    #[test]
    fn near_check_scales_with_magnitude() {
        near_check("t", &[1000.0f32], &[1000.5], 0.001).unwrap();
        assert!(near_check("t", &[1.0f32], &[1.5], 0.001).is_err());
    }

    #[test]
    fn near_check_rejects_nan_actual() {
        // NaN against a finite expectation must fail the <= comparison.
        assert!(near_check("t", &[1.0f32], &[f32::NAN], 0.5).is_err());
    }

    #[test]
    fn norm_check_relative_error() {
        let e = [3.0f64, 4.0];
        let a = [3.0f64, 4.0];
        assert_eq!(norm_check(&e, &a), 0.0);
        let a = [3.0f64, 4.1];
        let err = norm_check(&e, &a);
        assert!(err > 0.0 && err < 0.05);
    }

    #[test]
    fn norm_check_zero_expectation() {
        assert_eq!(norm_check::<f32>(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
        assert!(norm_check::<f32>(&[0.0], &[1.0]).is_infinite());
    }

    #[test]
    fn tolerance_is_zero_for_exact_types() {
        assert_eq!(sum_error_tolerance(Datatype::F32), 0.0);
        assert_eq!(sum_error_tolerance(Datatype::I32), 0.0);
        // bf16 has fewer mantissa bits than f16, so its bound is looser.
        assert!(sum_error_tolerance(Datatype::Bf16) > sum_error_tolerance(Datatype::F16));
    }

    #[test]
    fn epsilon_is_zero_for_integer_tags() {
        assert_eq!(machine_epsilon(Datatype::I8), 0.0);
        assert_eq!(machine_epsilon(Datatype::I32), 0.0);
        assert!(machine_epsilon(Datatype::F32) > machine_epsilon(Datatype::F64));
    }

    #[test]
    fn near_check_passes_half_rounding() {
        let tol = 4.0 * sum_error_tolerance(Datatype::F16);
        let e = [f16::from_f64(10.0)];
        let a = [f16::from_f64(10.0 + 0.01)];
        near_check("t", &e, &a, tol).unwrap();
    }
}
