//! The flat argument record.
//!
//! One plain struct describes any test case for any routine: sizes, leading
//! dimensions, increments, strides, scalars, datatype tags, initialization,
//! checking and timing switches. Cases deserialize from JSON with every
//! field optional, so a case names only what it cares about.

use oxblas_common::{Datatype, Scalar};
use serde::{Deserialize, Serialize};

/// How input data is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Initialization {
    /// Small uniform integers in [1, 10]; products and short sums stay
    /// exactly representable in every supported type.
    #[default]
    RandInt,
    /// Uniform reals in [-0.5, 0.5), the classic HPL distribution.
    HplRand,
    /// Every element NaN; exercises quick-return paths that must not read.
    NanInit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Arguments {
    /// Routine name, e.g. "axpy", "gemm_strided_batched", "gemm_ex".
    pub function: String,
    /// Free-form case label carried through to reports.
    pub name: String,
    /// Suite grouping label, e.g. "quick", "pre_checkin", "nightly".
    pub category: String,

    pub a_type: Datatype,
    pub b_type: Datatype,
    pub c_type: Datatype,
    pub d_type: Datatype,
    pub compute_type: Datatype,

    pub m: i32,
    pub n: i32,
    pub k: i32,

    pub lda: i32,
    pub ldb: i32,
    pub ldc: i32,

    pub incx: i32,
    pub incy: i32,

    /// Scalars as f64; NaN means "pass zero", letting a case probe the
    /// quick-return paths without tripping over NaN arithmetic.
    pub alpha: f64,
    pub beta: f64,

    pub stride_a: i64,
    pub stride_b: i64,
    pub stride_c: i64,
    pub stride_x: i64,
    pub stride_y: i64,
    pub batch_count: i32,

    pub transa: char,
    pub transb: char,
    pub uplo: char,
    pub side: char,
    pub diag: char,

    pub initialization: Initialization,
    pub seed: u64,

    /// Run the routine with host-resident scalars.
    pub pointer_mode_host: bool,
    /// Run the routine with device-resident scalars.
    pub pointer_mode_device: bool,

    pub unit_check: bool,
    pub norm_check: bool,
    pub timing: bool,
    pub iters: u32,
    pub cold_iters: u32,
}

impl Default for Arguments {
    fn default() -> Self {
        Arguments {
            function: String::new(),
            name: String::new(),
            category: String::new(),
            a_type: Datatype::F32,
            b_type: Datatype::F32,
            c_type: Datatype::F32,
            d_type: Datatype::F32,
            compute_type: Datatype::F32,
            m: 128,
            n: 128,
            k: 128,
            lda: 128,
            ldb: 128,
            ldc: 128,
            incx: 1,
            incy: 1,
            alpha: 1.0,
            beta: 0.0,
            stride_a: 0,
            stride_b: 0,
            stride_c: 0,
            stride_x: 0,
            stride_y: 0,
            batch_count: 1,
            transa: 'N',
            transb: 'N',
            uplo: 'L',
            side: 'L',
            diag: 'N',
            initialization: Initialization::default(),
            seed: 69069,
            pointer_mode_host: true,
            pointer_mode_device: true,
            unit_check: true,
            norm_check: false,
            timing: false,
            iters: 10,
            cold_iters: 2,
        }
    }
}

impl Arguments {
    pub fn new(function: &str) -> Self {
        Arguments { function: function.to_string(), ..Default::default() }
    }

    /// Alpha as the routine's scalar type; NaN maps to zero.
    pub fn get_alpha<T: Scalar>(&self) -> T {
        if self.alpha.is_nan() {
            T::ZERO
        } else {
            T::from_f64(self.alpha)
        }
    }

    /// Beta as the routine's scalar type; NaN maps to zero.
    pub fn get_beta<T: Scalar>(&self) -> T {
        if self.beta.is_nan() {
            T::ZERO
        } else {
            T::from_f64(self.beta)
        }
    }
}
