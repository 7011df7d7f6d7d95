//! Level-3 cross-validation cases.

use oxblas_common::Datatype;
use oxblas_crossval::{run_case, Arguments, Initialization};

fn args(function: &str) -> Arguments {
    let mut a = Arguments::new(function);
    a.m = 33;
    a.n = 27;
    a.k = 21;
    a.lda = 36;
    a.ldb = 36;
    a.ldc = 36;
    a
}

fn set_uniform(a: &mut Arguments, dt: Datatype) {
    a.a_type = dt;
    a.b_type = dt;
    a.c_type = dt;
    a.d_type = dt;
    a.compute_type = dt;
}

fn assert_runs(a: &Arguments) {
    let outcome = run_case(a).unwrap_or_else(|e| panic!("{}: {e:#}", a.function));
    assert!(!outcome.is_skipped(), "{} unexpectedly skipped", a.function);
}

#[test]
fn gemm_transpose_grid() {
    for transa in ['N', 'T'] {
        for transb in ['N', 'T'] {
            let mut a = args("gemm");
            a.transa = transa;
            a.transb = transb;
            assert_runs(&a);
        }
    }
}

#[test]
fn gemm_scalar_grid() {
    for (alpha, beta) in [(1.0, 0.0), (0.0, 1.0), (0.0, 2.0), (-1.0, 0.5), (2.0, 1.0)] {
        let mut a = args("gemm");
        a.alpha = alpha;
        a.beta = beta;
        a.initialization = Initialization::HplRand;
        assert_runs(&a);
    }
}

#[test]
fn gemm_all_uniform_types() {
    for dt in [Datatype::F16, Datatype::F32, Datatype::F64] {
        let mut a = args("gemm");
        // Keep the reduction short so f16 stays within its bound.
        a.k = 8;
        set_uniform(&mut a, dt);
        assert_runs(&a);
    }
}

#[test]
fn gemm_degenerate_shapes() {
    let mut a = args("gemm");
    a.m = 0;
    assert_runs(&a);

    let mut a = args("gemm");
    a.k = 0;
    a.beta = 2.0;
    assert_runs(&a);

    let mut a = args("gemm");
    a.n = 0;
    assert_runs(&a);
}

#[test]
fn gemm_crosses_block_boundaries() {
    // Larger than one 64-wide output tile in both directions.
    let mut a = args("gemm");
    a.m = 65;
    a.n = 70;
    a.k = 65;
    a.lda = 70;
    a.ldb = 70;
    a.ldc = 70;
    a.initialization = Initialization::HplRand;
    assert_runs(&a);
}

#[test]
fn gemm_nan_scalars_quick_return() {
    let mut a = args("gemm");
    a.alpha = f64::NAN;
    a.beta = f64::NAN;
    a.initialization = Initialization::NanInit;
    // alpha and beta both read as zero: C must come back all zero even
    // though every input element is NaN.
    assert_runs(&a);
}

#[test]
fn gemm_batched_variants() {
    let mut a = args("gemm_batched");
    a.batch_count = 3;
    assert_runs(&a);

    let mut a = args("gemm_strided_batched");
    a.batch_count = 4;
    a.stride_a = 36 * 36;
    a.stride_b = 36 * 36;
    a.stride_c = 36 * 36;
    assert_runs(&a);
}

#[test]
fn syrk_triangle_and_trans_grid() {
    for uplo in ['U', 'L'] {
        for trans in ['N', 'T'] {
            let mut a = args("syrk");
            a.n = 25;
            a.k = 12;
            a.lda = 30;
            a.ldc = 25;
            a.uplo = uplo;
            a.transa = trans;
            a.beta = 1.5;
            assert_runs(&a);
        }
    }
}

#[test]
fn trsm_full_option_grid() {
    for side in ['L', 'R'] {
        for uplo in ['U', 'L'] {
            for trans in ['N', 'T'] {
                for diag in ['N', 'U'] {
                    let mut a = args("trsm");
                    a.m = 19;
                    a.n = 14;
                    a.lda = 20;
                    a.ldb = 19;
                    a.side = side;
                    a.uplo = uplo;
                    a.transa = trans;
                    a.diag = diag;
                    a.alpha = 1.0;
                    a.initialization = Initialization::HplRand;
                    assert_runs(&a);
                }
            }
        }
    }
}

#[test]
fn trsm_alpha_zero_zeroes_output() {
    let mut a = args("trsm");
    a.m = 8;
    a.n = 8;
    a.lda = 8;
    a.ldb = 8;
    a.alpha = 0.0;
    a.initialization = Initialization::NanInit;
    assert_runs(&a);
}

#[test]
fn bad_arg_contract() {
    assert_runs(&args("gemm_bad_arg"));
    assert_runs(&args("syrk_bad_arg"));
    assert_runs(&args("trsm_bad_arg"));
}

#[test]
fn gemm_timing_reports_throughput() {
    let mut a = args("gemm");
    a.timing = true;
    a.iters = 3;
    a.cold_iters = 1;
    let report = run_case(&a).unwrap().unwrap_report();
    let perf = report.perf.expect("timing requested");
    assert!(perf.gflops.is_some());
    assert!(perf.gbytes_per_sec.is_some());
    assert!(perf.cpu_us.is_some());
    assert!(perf.kernel_caps.contains("gemm="));
}

#[test]
fn syrk_and_trsm_timing_report_oracle_time() {
    for function in ["syrk", "trsm"] {
        let mut a = args(function);
        a.m = 16;
        a.n = 16;
        a.k = 8;
        a.lda = 16;
        a.ldb = 16;
        a.ldc = 16;
        a.timing = true;
        a.iters = 2;
        a.cold_iters = 1;
        a.initialization = Initialization::HplRand;
        let report = run_case(&a).unwrap().unwrap_report();
        let perf = report.perf.expect("timing requested");
        assert!(perf.gflops.is_some(), "{function} missing gflops");
        assert!(perf.cpu_us.is_some(), "{function} missing oracle time");
    }
}
