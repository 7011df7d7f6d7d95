//! Level-1 cross-validation cases.

use oxblas_common::Datatype;
use oxblas_crossval::{run_case, Arguments, Initialization};

fn args(function: &str) -> Arguments {
    let mut args = Arguments::new(function);
    args.n = 257;
    args
}

fn set_uniform(args: &mut Arguments, dt: Datatype) {
    args.a_type = dt;
    args.b_type = dt;
    args.c_type = dt;
    args.d_type = dt;
    args.compute_type = dt;
}

fn assert_runs(args: &Arguments) {
    let outcome = run_case(args).unwrap_or_else(|e| panic!("{}: {e:#}", args.function));
    assert!(!outcome.is_skipped(), "{} unexpectedly skipped", args.function);
}

#[test]
fn axpy_all_float_types() {
    for dt in [Datatype::F16, Datatype::F32, Datatype::F64] {
        let mut a = args("axpy");
        set_uniform(&mut a, dt);
        a.alpha = 2.0;
        assert_runs(&a);
    }
}

#[test]
fn axpy_increments_and_alpha_sweep() {
    for (incx, incy) in [(1, 1), (2, 1), (1, 3), (-1, 1), (2, -2)] {
        for alpha in [0.0, 1.0, -2.5] {
            let mut a = args("axpy");
            a.incx = incx;
            a.incy = incy;
            a.alpha = alpha;
            a.initialization = Initialization::HplRand;
            assert_runs(&a);
        }
    }
}

#[test]
fn axpy_nan_alpha_quick_returns_over_nan_data() {
    // NaN alpha reads as zero; the routine must not touch x, and y full of
    // NaN must come back untouched (NaN compares equal to NaN here).
    let mut a = args("axpy");
    a.alpha = f64::NAN;
    a.initialization = Initialization::NanInit;
    assert_runs(&a);
}

#[test]
fn axpy_empty_problem() {
    let mut a = args("axpy");
    a.n = 0;
    assert_runs(&a);
    a.n = -3;
    assert_runs(&a);
}

#[test]
fn scal_types_and_alpha_one_shortcut() {
    for dt in [Datatype::F16, Datatype::F32, Datatype::F64] {
        for alpha in [1.0, 0.0, -3.0] {
            let mut a = args("scal");
            set_uniform(&mut a, dt);
            a.alpha = alpha;
            assert_runs(&a);
        }
    }
}

#[test]
fn dot_including_half_precision() {
    for dt in [Datatype::F16, Datatype::Bf16, Datatype::F32, Datatype::F64] {
        let mut a = args("dot");
        set_uniform(&mut a, dt);
        assert_runs(&a);
    }
}

#[test]
fn dot_negative_increments() {
    let mut a = args("dot");
    a.incx = -2;
    a.incy = 1;
    a.initialization = Initialization::HplRand;
    assert_runs(&a);
}

#[test]
fn reductions_basic() {
    for f in ["nrm2", "asum", "iamax"] {
        let mut a = args(f);
        a.initialization = Initialization::HplRand;
        assert_runs(&a);
        // Non-positive increments quick-return zero.
        a.incx = -1;
        assert_runs(&a);
    }
}

#[test]
fn copy_and_swap() {
    for f in ["copy", "swap"] {
        let mut a = args(f);
        a.incx = 2;
        a.incy = -1;
        assert_runs(&a);
    }
}

#[test]
fn axpy_batched_variants() {
    let mut a = args("axpy_batched");
    a.batch_count = 5;
    a.alpha = 1.5;
    assert_runs(&a);

    let mut a = args("axpy_strided_batched");
    a.n = 33;
    a.batch_count = 4;
    // Strides larger than the span leave gaps the kernel must skip.
    a.stride_x = 40;
    a.stride_y = 50;
    assert_runs(&a);
}

#[test]
fn dot_batched_variants() {
    let mut a = args("dot_batched");
    a.batch_count = 3;
    assert_runs(&a);

    let mut a = args("dot_strided_batched");
    a.n = 16;
    a.batch_count = 6;
    a.stride_x = 20;
    a.stride_y = 16;
    assert_runs(&a);
}

#[test]
fn batch_count_zero_is_a_quick_return() {
    let mut a = args("axpy_strided_batched");
    a.batch_count = 0;
    a.stride_x = 300;
    a.stride_y = 300;
    assert_runs(&a);
}

#[test]
fn integer_tuple_skips() {
    let mut a = args("axpy");
    set_uniform(&mut a, Datatype::I32);
    assert!(run_case(&a).unwrap().is_skipped());
}

#[test]
fn bad_arg_contract() {
    assert_runs(&args("axpy_bad_arg"));
}

#[test]
fn axpy_timing_produces_a_record() {
    let mut a = args("axpy");
    a.timing = true;
    a.iters = 5;
    a.cold_iters = 2;
    let report = run_case(&a).unwrap().unwrap_report();
    let perf = report.perf.expect("timing requested");
    assert_eq!(perf.iters, 5);
    assert!(perf.us_per_iter >= 0.0);
    assert!(perf.gflops.is_some());
    assert!(perf.cpu_us.is_some());
}

#[test]
fn reduction_timing_reports_flops_and_bandwidth() {
    for function in ["nrm2", "asum"] {
        let mut a = args(function);
        a.timing = true;
        a.iters = 3;
        a.cold_iters = 1;
        let report = run_case(&a).unwrap().unwrap_report();
        let perf = report.perf.expect("timing requested");
        assert!(perf.gflops.is_some(), "{function} missing gflops");
        assert!(perf.gbytes_per_sec.is_some(), "{function} missing bandwidth");
        assert!(perf.cpu_us.is_some(), "{function} missing oracle time");
    }
}

#[test]
fn norm_check_reports_zero_error_for_exact_types() {
    let mut a = args("axpy");
    a.norm_check = true;
    let report = run_case(&a).unwrap().unwrap_report();
    assert_eq!(report.norm_error_host, Some(0.0));
    assert_eq!(report.norm_error_device, Some(0.0));
}
