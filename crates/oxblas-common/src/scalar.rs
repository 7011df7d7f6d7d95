//! Scalar element traits.
//!
//! [`Scalar`] is implemented by every type a buffer can hold; [`Compute`]
//! adds the arithmetic a mixed-precision accumulator needs; [`Float`] adds
//! what the floating-point routines and numeric checks need. Conversions go
//! through f64, which represents every f16/bf16/f32/i8/i32 value exactly.

use crate::datatype::Datatype;
use half::{bf16, f16};
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// An element type a device buffer can hold.
pub trait Scalar: Copy + Send + Sync + PartialEq + Debug + 'static {
    const DATATYPE: Datatype;
    const ZERO: Self;
    const ONE: Self;

    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;

    /// NaN test; always false for integer types.
    fn is_nan(self) -> bool;
}

/// A type mixed-precision routines may accumulate in.
pub trait Compute: Scalar + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> {}

/// A floating-point element type.
pub trait Float:
    Compute + Div<Output = Self> + Neg<Output = Self> + PartialOrd
{
    const NAN: Self;

    fn abs(self) -> Self;
    fn sqrt(self) -> Self;
    fn is_inf(self) -> bool;
}

impl Scalar for f32 {
    const DATATYPE: Datatype = Datatype::F32;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn from_f64(v: f64) -> Self {
        v as f32
    }
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }
}

impl Compute for f32 {}

impl Float for f32 {
    const NAN: Self = f32::NAN;

    fn abs(self) -> Self {
        f32::abs(self)
    }
    fn sqrt(self) -> Self {
        f32::sqrt(self)
    }
    fn is_inf(self) -> bool {
        f32::is_infinite(self)
    }
}

impl Scalar for f64 {
    const DATATYPE: Datatype = Datatype::F64;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn from_f64(v: f64) -> Self {
        v
    }
    fn to_f64(self) -> f64 {
        self
    }
    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }
}

impl Compute for f64 {}

impl Float for f64 {
    const NAN: Self = f64::NAN;

    fn abs(self) -> Self {
        f64::abs(self)
    }
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }
    fn is_inf(self) -> bool {
        f64::is_infinite(self)
    }
}

impl Scalar for f16 {
    const DATATYPE: Datatype = Datatype::F16;
    const ZERO: Self = f16::ZERO;
    const ONE: Self = f16::ONE;

    fn from_f64(v: f64) -> Self {
        f16::from_f64(v)
    }
    fn to_f64(self) -> f64 {
        f16::to_f64(self)
    }
    fn is_nan(self) -> bool {
        f16::is_nan(self)
    }
}

impl Compute for f16 {}

impl Float for f16 {
    const NAN: Self = f16::NAN;

    fn abs(self) -> Self {
        f16::from_f32(f16::to_f32(self).abs())
    }
    fn sqrt(self) -> Self {
        f16::from_f32(f16::to_f32(self).sqrt())
    }
    fn is_inf(self) -> bool {
        f16::is_infinite(self)
    }
}

impl Scalar for bf16 {
    const DATATYPE: Datatype = Datatype::Bf16;
    const ZERO: Self = bf16::ZERO;
    const ONE: Self = bf16::ONE;

    fn from_f64(v: f64) -> Self {
        bf16::from_f64(v)
    }
    fn to_f64(self) -> f64 {
        bf16::to_f64(self)
    }
    fn is_nan(self) -> bool {
        bf16::is_nan(self)
    }
}

impl Compute for bf16 {}

impl Float for bf16 {
    const NAN: Self = bf16::NAN;

    fn abs(self) -> Self {
        bf16::from_f32(bf16::to_f32(self).abs())
    }
    fn sqrt(self) -> Self {
        bf16::from_f32(bf16::to_f32(self).sqrt())
    }
    fn is_inf(self) -> bool {
        bf16::is_infinite(self)
    }
}

impl Scalar for i8 {
    const DATATYPE: Datatype = Datatype::I8;
    const ZERO: Self = 0;
    const ONE: Self = 1;

    fn from_f64(v: f64) -> Self {
        v as i8
    }
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
    fn is_nan(self) -> bool {
        false
    }
}

impl Scalar for i32 {
    const DATATYPE: Datatype = Datatype::I32;
    const ZERO: Self = 0;
    const ONE: Self = 1;

    fn from_f64(v: f64) -> Self {
        v as i32
    }
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
    fn is_nan(self) -> bool {
        false
    }
}

impl Compute for i32 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datatype_tags_match_types() {
        assert_eq!(<f16 as Scalar>::DATATYPE, Datatype::F16);
        assert_eq!(<bf16 as Scalar>::DATATYPE, Datatype::Bf16);
        assert_eq!(<f32 as Scalar>::DATATYPE, Datatype::F32);
        assert_eq!(<f64 as Scalar>::DATATYPE, Datatype::F64);
        assert_eq!(<i8 as Scalar>::DATATYPE, Datatype::I8);
        assert_eq!(<i32 as Scalar>::DATATYPE, Datatype::I32);
    }

    #[test]
    fn f64_round_trip_is_exact_for_representable_values() {
        for v in [-2.0, -0.5, 0.0, 1.0, 1.5, 1024.0] {
            assert_eq!(f16::from_f64(v).to_f64(), v);
            assert_eq!(bf16::from_f64(v).to_f64(), v);
            assert_eq!(<f32 as Scalar>::from_f64(v).to_f64(), v);
        }
        for v in [-128.0, -1.0, 0.0, 127.0] {
            assert_eq!(<i8 as Scalar>::from_f64(v).to_f64(), v);
        }
    }

    #[test]
    fn nan_detection() {
        assert!(Scalar::is_nan(<f16 as Float>::NAN));
        assert!(<f32 as Scalar>::is_nan(f32::NAN));
        assert!(!Scalar::is_nan(0i32));
    }

    #[test]
    fn half_arithmetic_goes_through_compute_bounds() {
        fn fma<T: Compute>(a: T, b: T, c: T) -> T {
            a * b + c
        }
        assert_eq!(fma(f16::from_f64(2.0), f16::from_f64(3.0), f16::ONE).to_f64(), 7.0);
        assert_eq!(fma(4i32, 5i32, 1i32), 21);
    }
}
